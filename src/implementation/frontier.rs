// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This module provides the implementation of the solver's frontier. That is
//! the value-sorted collection of evaluated points which is retained between
//! the phases of a solve.

use crate::EvaluatedPoint;

/// The frontier of a solve: evaluated points kept sorted by ascending value.
/// The sort is *stable*, so points of equal value keep their insertion order;
/// this is what makes the whole solve deterministic when an objective has
/// plateaus.
///
/// # Note:
/// The frontier assumes every inserted value is an actual number. The solver
/// upholds this by sanitizing objective values before insertion and by
/// dropping failed local runs; a NaN can therefore never reach this point.
///
/// # Example
/// ```
/// # use tiktak::{EvaluatedPoint, Frontier};
/// let mut frontier = Frontier::new();
/// frontier.insert_bulk(vec![
///     EvaluatedPoint { location: vec![1.0], value: 3.0 },
///     EvaluatedPoint { location: vec![2.0], value: 1.0 },
///     EvaluatedPoint { location: vec![3.0], value: 2.0 },
/// ]);
/// frontier.keep_lowest(2);
/// assert_eq!(2, frontier.len());
/// assert_eq!(1.0, frontier.first().unwrap().value);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Frontier {
    /// The points, maintained sorted by ascending value
    points: Vec<EvaluatedPoint>,
}

impl Frontier {
    /// Creates an empty frontier.
    pub fn new() -> Self {
        Frontier { points: vec![] }
    }

    /// Appends the given points and restores the ascending value order with
    /// one stable sort.
    pub fn insert_bulk(&mut self, points: Vec<EvaluatedPoint>) {
        debug_assert!(points.iter().all(|p| !p.value.is_nan()));
        self.points.extend(points);
        self.points.sort_by(|a, b| a.value.total_cmp(&b.value));
    }

    /// Retains only the `k` points of smallest value. `k` is expected to lie
    /// within `1..=len`; anything larger just keeps the whole frontier.
    pub fn keep_lowest(&mut self, k: usize) {
        debug_assert!(k >= 1);
        self.points.truncate(k);
    }

    /// The point of smallest value, if any.
    pub fn first(&self) -> Option<&EvaluatedPoint> {
        self.points.first()
    }

    /// The number of points currently on the frontier.
    pub fn len(&self) -> usize {
        self.points.len()
    }
    /// Returns true iff the frontier holds no point.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
    /// Iterates over the points by ascending value.
    pub fn iter(&self) -> std::slice::Iter<'_, EvaluatedPoint> {
        self.points.iter()
    }
    /// Consumes the frontier and hands the sorted points back.
    pub fn into_vec(self) -> Vec<EvaluatedPoint> {
        self.points
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

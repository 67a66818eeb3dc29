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

//! This module defines the `BoundedProblem` trait. That is the abstraction of
//! the optimization problem a solver works on: a real valued objective over
//! an axis aligned box. This is the one trait a client *must* implement (or
//! let [`BoxedProblem`] implement on its behalf) in order to use the library.

use crate::TikTakError;

/// The abstraction of a box constrained minimization problem: an objective
/// function over ℝᴺ together with the lower and upper corners of the box it
/// is restricted to.
///
/// # Note:
/// The solvers assume the objective is *pure*: evaluating it twice at the
/// same location yields the same value, and replicating it across workers is
/// safe. They never parallelize within one evaluation; they only ever issue
/// many independent evaluations at once. The objective may well be
/// non-differentiable or numerically noisy, but it is expected to be defined
/// everywhere inside the box (an occasional NaN is tolerated and sanitized
/// during seed evaluation).
///
/// Callers are responsible for in-bounds generation: every location passed to
/// `evaluate` lies within the box, because both the quasirandom sampler and
/// the convex mixing rule preserve the bounds by construction.
pub trait BoundedProblem {
    /// The dimension N of the search box.
    fn nb_vars(&self) -> usize;
    /// The lower corner of the box, one entry per dimension.
    fn lower(&self) -> &[f64];
    /// The upper corner of the box, one entry per dimension.
    fn upper(&self) -> &[f64];
    /// Evaluates the objective at the given location.
    fn evaluate(&self, location: &[f64]) -> f64;

    /// Returns true iff the given location lies within the box (bounds
    /// included).
    fn contains(&self, location: &[f64]) -> bool {
        location.len() == self.nb_vars()
            && location
                .iter()
                .zip(self.lower().iter().zip(self.upper().iter()))
                .all(|(x, (lo, up))| *lo <= *x && *x <= *up)
    }
}

/// The easiest way to get a [`BoundedProblem`]: wrap a closure together with
/// the two corners of its box. The constructor is where the bounds are
/// validated; a successfully built `BoxedProblem` is guaranteed to describe
/// a well formed box.
///
/// # Example
/// ```
/// # use tiktak::{BoundedProblem, BoxedProblem};
/// let sphere = BoxedProblem::new(
///     |x: &[f64]| x.iter().map(|xi| xi * xi).sum::<f64>(),
///     vec![-5.0, -5.0],
///     vec![ 5.0,  5.0],
/// ).unwrap();
///
/// assert_eq!(2, sphere.nb_vars());
/// assert_eq!(8.0, sphere.evaluate(&[2.0, 2.0]));
/// assert!( sphere.contains(&[ 0.0, 0.0]));
/// assert!(!sphere.contains(&[ 6.0, 0.0]));
/// ```
pub struct BoxedProblem<F> {
    /// The objective function
    objective: F,
    /// The lower corner of the box
    lower: Vec<f64>,
    /// The upper corner of the box
    upper: Vec<f64>,
}

impl<F: Fn(&[f64]) -> f64> BoxedProblem<F> {
    /// Wraps the given objective and bounds into a problem, after having
    /// checked that the box is well formed: same number of lower and upper
    /// bounds, at least one dimension, all bounds finite, and every lower
    /// bound strictly below its upper counterpart.
    pub fn new(objective: F, lower: Vec<f64>, upper: Vec<f64>) -> Result<Self, TikTakError> {
        if lower.len() != upper.len() {
            return Err(TikTakError::InvalidBounds(format!(
                "{} lower bounds vs {} upper bounds",
                lower.len(),
                upper.len()
            )));
        }
        if lower.is_empty() {
            return Err(TikTakError::InvalidBounds(
                "the box must have at least one dimension".to_string(),
            ));
        }
        for (i, (lo, up)) in lower.iter().zip(upper.iter()).enumerate() {
            if !lo.is_finite() || !up.is_finite() {
                return Err(TikTakError::InvalidBounds(format!(
                    "bound {} is not finite ({} .. {})",
                    i, lo, up
                )));
            }
            if lo >= up {
                return Err(TikTakError::InvalidBounds(format!(
                    "lower[{}] = {} is not strictly below upper[{}] = {}",
                    i, lo, i, up
                )));
            }
        }
        Ok(BoxedProblem {
            objective,
            lower,
            upper,
        })
    }
}

impl<F: Fn(&[f64]) -> f64> BoundedProblem for BoxedProblem<F> {
    fn nb_vars(&self) -> usize {
        self.lower.len()
    }
    fn lower(&self) -> &[f64] {
        &self.lower
    }
    fn upper(&self) -> &[f64] {
        &self.upper
    }
    fn evaluate(&self, location: &[f64]) -> f64 {
        (self.objective)(location)
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

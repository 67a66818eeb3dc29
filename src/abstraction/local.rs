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

//! This module defines the `LocalMethod` trait. That is the abstraction of a
//! bound constrained local minimizer: the component the solver delegates the
//! actual descent work to, once it has decided where a descent should start.

use std::time::Duration;

use crate::{BoundedProblem, LocalResult, SuccessSet};

/// The abstraction of a bound constrained local minimizer. Given a problem
/// and a starting location inside the box, an implementation either returns
/// a [`LocalResult`] or no result at all.
///
/// # Note:
/// The evaluation budget is a per-call argument rather than a construction
/// option because the solver uses two distinct budgets: one for the initial
/// refinement of the promising seeds, and one for the batched rounds that
/// follow. Every other stopping rule is fixed at construction time through
/// [`LocalOptions`].
///
/// Implementations *must* honor the box bounds of the problem: a local
/// method that can wander outside of the box is unsuitable, no matter how
/// good its iterates are. They must also cope with non-differentiable
/// objectives; a backend requiring derivatives has no place here.
pub trait LocalMethod {
    /// Runs one local minimization of `problem` starting from `start`, with
    /// at most `maxeval` objective evaluations. Returns `None` when the run
    /// failed or terminated with a status outside of the accepted set, in
    /// which case the candidate is simply dropped by the caller.
    fn solve(
        &self,
        problem: &dyn BoundedProblem,
        start: &[f64],
        maxeval: usize,
    ) -> Option<LocalResult>;
}

/// The stopping rules and acceptance policy of a local method, fixed when
/// the method is built. The evaluation budget is deliberately absent: it is
/// passed along with each solve call.
#[derive(Debug, Clone, Default)]
pub struct LocalOptions {
    /// Per-coordinate absolute tolerance on the location (none = backend default)
    pub xtol_abs: Option<Vec<f64>>,
    /// Relative tolerance on the location (none = backend default)
    pub xtol_rel: Option<f64>,
    /// Wall time budget for one local run (none = unlimited)
    pub maxtime: Option<Duration>,
    /// The terminating statuses treated as success
    pub success: SuccessSet,
}

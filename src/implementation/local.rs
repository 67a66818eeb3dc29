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

//! This module provides the adapter between the `LocalMethod` abstraction
//! and the derivative-free algorithms of the nlopt backend.

use nlopt::{Algorithm, Nlopt, SuccessState, Target};

use crate::{BoundedProblem, LocalMethod, LocalOptions, LocalResult, LocalStatus};

/// The derivative-free, bound honoring algorithms of the backend that are
/// suitable for this solver. Gradient based algorithms are deliberately not
/// listed: the objectives this library is meant for have no usable
/// derivatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalAlgorithm {
    /// The downhill simplex method of Nelder and Mead
    NelderMead,
    /// Rowan's subplex, a more robust restarting variant of the simplex
    Subplex,
    /// Powell's linear approximation method
    Cobyla,
    /// Powell's quadratic approximation method
    Bobyqa,
}

impl LocalAlgorithm {
    fn backend(self) -> Algorithm {
        match self {
            LocalAlgorithm::NelderMead => Algorithm::Neldermead,
            LocalAlgorithm::Subplex => Algorithm::Sbplx,
            LocalAlgorithm::Cobyla => Algorithm::Cobyla,
            LocalAlgorithm::Bobyqa => Algorithm::Bobyqa,
        }
    }
}

/// A [`LocalMethod`] backed by one of the nlopt algorithms. The adapter owns
/// the stopping rules and the acceptance policy; each solve call builds a
/// fresh backend optimizer, so a single adapter can safely serve any number
/// of concurrent workers.
pub struct NloptMethod {
    /// Which backend algorithm performs the descent
    algorithm: LocalAlgorithm,
    /// Stopping rules and acceptance policy
    options: LocalOptions,
}

impl NloptMethod {
    /// Creates a method running the given algorithm under the given options.
    pub fn new(algorithm: LocalAlgorithm, options: LocalOptions) -> Self {
        NloptMethod { algorithm, options }
    }
}

impl LocalMethod for NloptMethod {
    fn solve(
        &self,
        problem: &dyn BoundedProblem,
        start: &[f64],
        maxeval: usize,
    ) -> Option<LocalResult> {
        let nb_vars = problem.nb_vars();
        debug_assert_eq!(start.len(), nb_vars);
        debug_assert!(problem.contains(start));

        let objective = |x: &[f64], gradient: Option<&mut [f64]>, _: &mut ()| -> f64 {
            // every listed algorithm is derivative free
            debug_assert!(gradient.is_none());
            problem.evaluate(x)
        };
        let mut optimizer = Nlopt::new(
            self.algorithm.backend(),
            nb_vars,
            objective,
            Target::Minimize,
            (),
        );
        optimizer.set_lower_bounds(problem.lower()).ok()?;
        optimizer.set_upper_bounds(problem.upper()).ok()?;
        optimizer.set_maxeval(maxeval as u32).ok()?;
        if let Some(tolerance) = &self.options.xtol_abs {
            optimizer.set_xtol_abs(tolerance).ok()?;
        }
        if let Some(tolerance) = self.options.xtol_rel {
            optimizer.set_xtol_rel(tolerance).ok()?;
        }
        if let Some(budget) = self.options.maxtime {
            optimizer.set_maxtime(budget.as_secs_f64()).ok()?;
        }

        let mut location = start.to_vec();
        match optimizer.optimize(&mut location) {
            Ok((state, value)) => {
                let status = status_of(state);
                // a NaN out of a local run drops the candidate, it is never
                // patched up the way seed evaluations are
                if value.is_finite() && self.options.success.accepts(status) {
                    Some(LocalResult {
                        location,
                        value,
                        status,
                    })
                } else {
                    None
                }
            }
            Err(_) => None,
        }
    }
}

/// Folds the backend's termination report onto our own status vocabulary.
fn status_of(state: SuccessState) -> LocalStatus {
    match state {
        SuccessState::Success => LocalStatus::Converged,
        SuccessState::StopValReached => LocalStatus::TargetReached,
        SuccessState::FtolReached => LocalStatus::ToleranceReached,
        SuccessState::XtolReached => LocalStatus::ToleranceReached,
        SuccessState::MaxEvalReached => LocalStatus::BudgetExhausted,
        SuccessState::MaxTimeReached => LocalStatus::TimeExhausted,
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

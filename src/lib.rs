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

//! # TikTak
//! TikTak is a multistart solver for the approximate global minimization of
//! a bounded, possibly non-differentiable, possibly noisy objective over an
//! axis aligned box. It was designed with structural estimation in mind:
//! the regime where one objective evaluation costs seconds to minutes, and
//! where the only way to get an answer this week is to fan thousands of
//! evaluations out to parallel workers.
//!
//! A solve interleaves global exploration with incumbent biased local
//! refinement:
//!
//! 1. a low discrepancy (Sobol) sample of the box is evaluated in bulk and
//!    only the most promising seeds are kept;
//! 2. one bound constrained local minimization is launched from every kept
//!    seed, all in parallel; the survivors, sorted by value, become the
//!    candidate minima and the best of them the *incumbent*;
//! 3. the remaining candidates are consumed in batched rounds: each one is
//!    dragged toward the incumbent with the convex mix
//!    `(1 − θ)·candidate + θ·incumbent` (the later the candidate, the
//!    stronger the drag), a local run is started from every dragged
//!    location at once, and the incumbent jumps to the best improver of the
//!    round. When a round improves nothing, the incumbent is the answer.
//!
//! The local descent itself is delegated to a pluggable [`LocalMethod`];
//! the [`NloptMethod`] adapter exposes the derivative free, bound honoring
//! algorithms of the nlopt backend (Nelder-Mead, Sbplx, Cobyla, Bobyqa).
//!
//! ## Quick Example
//! The following minimizes the 2-D Rosenbrock function. With a real
//! objective you would keep the default worker pool (one thread per core)
//! and probably request checkpoints; both are configurable on the solver.
//!
//! ```no_run
//! use tiktak::*;
//!
//! let problem = BoxedProblem::new(
//!     |x: &[f64]| {
//!         (1.0 - x[0]) * (1.0 - x[0])
//!             + 100.0 * (x[1] - x[0] * x[0]) * (x[1] - x[0] * x[0])
//!     },
//!     vec![-5.0, -5.0],
//!     vec![ 5.0,  5.0],
//! ).unwrap();
//!
//! let method = NloptMethod::new(LocalAlgorithm::Subplex, LocalOptions::default());
//! let config = TikTakConfigBuilder::default()
//!     .quasirandom_n(10_000)
//!     .keep_ratio(0.1)
//!     .local_maxeval_initial(100)
//!     .local_maxeval_final(1000)
//!     .build()
//!     .unwrap();
//!
//! let mut solver = TikTakSolver::new(&problem, &method, config);
//! let outcome = solver.solve().unwrap();
//!
//! println!(
//!     "minimum {} at {:?}",
//!     outcome.global_minimum.value,
//!     outcome.global_minimum.location
//! );
//! ```

mod abstraction;
mod common;
mod implementation;

pub use abstraction::*;
pub use common::*;
pub use implementation::*;

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

//! This module defines the most basic data types that are used throughout all
//! the code of our library (both at the abstraction and implementation levels).
//! These are also the types your client library is likely to work with.

use serde::{Deserialize, Serialize};

/// The value substituted for a quasirandom seed whose objective evaluation
/// did not produce a finite number. Substitution only ever happens during the
/// seed evaluation phase: it keeps the pool of evaluated seeds totally
/// ordered without letting a poisoned seed ever become the incumbent.
///
/// Local minimization runs are *never* patched up this way: a failed local
/// run simply drops its candidate.
pub const NAN_SENTINEL: f64 = 1e10;

// ----------------------------------------------------------------------------
// --- EVALUATED POINT --------------------------------------------------------
// ----------------------------------------------------------------------------
/// A location of the search box together with the objective value measured
/// there. This is the currency of the whole solver: seeds, promising points,
/// candidate minima and the final incumbent are all evaluated points.
///
/// # Example
/// ```
/// # use tiktak::EvaluatedPoint;
/// let point = EvaluatedPoint { location: vec![0.5, 0.5], value: 42.0 };
/// assert_eq!(2, point.location.len());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedPoint {
    /// Where the objective was evaluated
    pub location: Vec<f64>,
    /// The objective value at that location
    pub value: f64,
}

// ----------------------------------------------------------------------------
// --- LOCAL RESULTS ----------------------------------------------------------
// ----------------------------------------------------------------------------
/// The reason why a local minimization run terminated. Only runs terminating
/// with a status in the configured [`SuccessSet`] produce a [`LocalResult`];
/// every other run is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocalStatus {
    /// The backend declared plain convergence
    Converged,
    /// The objective value dropped below the configured target
    TargetReached,
    /// The x or f tolerance was met
    ToleranceReached,
    /// The evaluation budget was exhausted; the best iterate so far is returned
    BudgetExhausted,
    /// The wall time budget was exhausted; the best iterate so far is returned
    TimeExhausted,
    /// The backend reported a failure
    Failed,
}

/// The set of terminating statuses that a local minimization run may end
/// with and still be considered successful. Anything outside of the set
/// makes the run yield no result and drops the candidate.
///
/// # Example
/// ```
/// # use tiktak::{LocalStatus, SuccessSet};
/// let strict = SuccessSet::default().without(LocalStatus::BudgetExhausted);
/// assert!( strict.accepts(LocalStatus::Converged));
/// assert!(!strict.accepts(LocalStatus::BudgetExhausted));
/// assert!(!strict.accepts(LocalStatus::Failed));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessSet(Vec<LocalStatus>);

impl SuccessSet {
    /// Creates a success set accepting exactly the given statuses.
    pub fn new(statuses: Vec<LocalStatus>) -> Self {
        SuccessSet(statuses)
    }
    /// Returns true iff the given status belongs to the set.
    pub fn accepts(&self, status: LocalStatus) -> bool {
        self.0.contains(&status)
    }
    /// Returns a copy of this set which additionally accepts `status`.
    pub fn with(mut self, status: LocalStatus) -> Self {
        if !self.0.contains(&status) {
            self.0.push(status);
        }
        self
    }
    /// Returns a copy of this set which no longer accepts `status`.
    pub fn without(mut self, status: LocalStatus) -> Self {
        self.0.retain(|s| *s != status);
        self
    }
}
/// By default, every terminating status except a backend failure is deemed
/// acceptable. In particular a run that merely ran out of budget still hands
/// its best iterate back to the solver.
impl Default for SuccessSet {
    fn default() -> Self {
        SuccessSet(vec![
            LocalStatus::Converged,
            LocalStatus::TargetReached,
            LocalStatus::ToleranceReached,
            LocalStatus::BudgetExhausted,
            LocalStatus::TimeExhausted,
        ])
    }
}

/// The outcome of one local minimization run whose terminating status was
/// deemed acceptable.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalResult {
    /// The minimizer the local run settled on
    pub location: Vec<f64>,
    /// The objective value at that location
    pub value: f64,
    /// The reason why the run terminated
    pub status: LocalStatus,
}

impl From<LocalResult> for EvaluatedPoint {
    fn from(result: LocalResult) -> Self {
        EvaluatedPoint {
            location: result.location,
            value: result.value,
        }
    }
}

// ----------------------------------------------------------------------------
// --- SOLVE OUTCOME ----------------------------------------------------------
// ----------------------------------------------------------------------------
/// Everything a completed solve hands back to the caller. In addition to the
/// global minimum itself, the intermediate materials are returned so that a
/// long estimation run can be audited after the fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TikTakOutcome {
    /// Every quasirandom seed with its (sanitized) objective value, in the
    /// order the seeds were generated
    pub quasirandom_points: Vec<EvaluatedPoint>,
    /// The seeds that were retained for local refinement, sorted by
    /// ascending value
    pub promising_points: Vec<EvaluatedPoint>,
    /// The candidate minima produced by the refinement phase (prepended
    /// warm starts included), sorted by ascending value
    pub local_minima: Vec<EvaluatedPoint>,
    /// The incumbent at termination: the best point found by the whole solve
    pub global_minimum: EvaluatedPoint,
}

// ----------------------------------------------------------------------------
// --- ERRORS -----------------------------------------------------------------
// ----------------------------------------------------------------------------
/// The errors that can make a solve impossible. Per-evaluation incidents
/// (an objective returning NaN, a failed local run, a lost worker) are *not*
/// errors: they are sanitized or dropped as the phases go, and the solve
/// carries on with the surviving material.
#[derive(Debug, thiserror::Error)]
pub enum TikTakError {
    /// The box is ill formed (some lower bound at or above its upper bound,
    /// mismatched or empty bound vectors, a non finite bound)
    #[error("invalid bounds: {0}")]
    InvalidBounds(String),
    /// The solver configuration violates one of its invariants
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The problem has more dimensions than the quasirandom tables cover
    #[error("the quasirandom tables cover up to {max} dimensions but the problem has {given}")]
    UnsupportedDimension { given: usize, max: usize },
    /// Every single local run of the refinement phase failed. The evaluated
    /// seeds are carried along so that the failure can be diagnosed.
    #[error("no viable seeds: every local run of the refinement phase failed")]
    NoViableSeeds {
        quasirandom_points: Vec<EvaluatedPoint>,
    },
    /// A checkpoint artefact could not be written or read back
    #[error("checkpoint i/o error: {0}")]
    Checkpoint(#[from] std::io::Error),
    /// A checkpoint artefact could not be serialized or deserialized
    #[error("checkpoint serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

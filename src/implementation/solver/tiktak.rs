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

//! This module provides the implementation of the multistart solver itself.
//! A solve proceeds in three steps: a bulk evaluation of quasirandom seeds,
//! a parallel local refinement of the most promising ones, and a sequence of
//! batched rounds during which the remaining candidates, dragged ever closer
//! to the incumbent, try to dethrone it.

use std::path::PathBuf;

use log::{debug, info};
use serde::Serialize;

use crate::{
    pull, BoundedProblem, Checkpointer, EvaluatedPoint, EvaluationPool, Frontier, LocalMethod,
    PullSchedule, SobolSampler, TikTakConfig, TikTakError, TikTakOutcome, WorkerPool,
    NAN_SENTINEL,
};

/// The multistart solver. It owns nothing but its configuration: the problem
/// and the local method are borrowed, and the solver only ever shares them
/// immutably with its workers. All the mutable state of a solve (the
/// frontier, the incumbent) lives on the coordinator side, between two
/// batches.
///
/// # Example
/// ```
/// # use tiktak::*;
/// # struct NoMove;
/// # impl LocalMethod for NoMove {
/// #     fn solve(&self, problem: &dyn BoundedProblem, start: &[f64], _maxeval: usize)
/// #         -> Option<LocalResult>
/// #     {
/// #         Some(LocalResult {
/// #             location: start.to_vec(),
/// #             value: problem.evaluate(start),
/// #             status: LocalStatus::BudgetExhausted,
/// #         })
/// #     }
/// # }
/// let problem = BoxedProblem::new(
///     |x: &[f64]| x.iter().map(|xi| (xi - 0.3) * (xi - 0.3)).sum::<f64>(),
///     vec![-1.0, -1.0],
///     vec![ 1.0,  1.0],
/// ).unwrap();
/// let method = NoMove; // a real solve would use e.g. NloptMethod
/// let config = TikTakConfigBuilder::default().quasirandom_n(64).build().unwrap();
///
/// let mut solver = TikTakSolver::new(&problem, &method, config);
/// let outcome = solver.solve().unwrap();
///
/// assert_eq!(64, outcome.quasirandom_points.len());
/// assert!(outcome.global_minimum.value < 0.5);
/// ```
pub struct TikTakSolver<'a, Pool = WorkerPool> {
    /// The problem being minimized
    problem: &'a (dyn BoundedProblem + Send + Sync),
    /// The local method refining the candidate starts
    method: &'a (dyn LocalMethod + Send + Sync),
    /// The knobs of the solve
    config: TikTakConfig,
    /// The scatter/gather facility evaluations are fanned out with
    pool: Pool,
    /// Externally promising locations evaluated ahead of the refined seeds
    prepend: Vec<Vec<f64>>,
    /// Where to dump the per-phase artefacts, if anywhere
    checkpointer: Option<Checkpointer>,
}

impl<'a> TikTakSolver<'a, WorkerPool> {
    /// Creates a solver for the given problem, local method and
    /// configuration. The evaluation pool defaults to one worker thread per
    /// hardware thread; use [`TikTakSolver::with_pool`] to change that.
    pub fn new(
        problem: &'a (dyn BoundedProblem + Send + Sync),
        method: &'a (dyn LocalMethod + Send + Sync),
        config: TikTakConfig,
    ) -> Self {
        TikTakSolver {
            problem,
            method,
            config,
            pool: WorkerPool::new(),
            prepend: vec![],
            checkpointer: None,
        }
    }
}

impl<'a, Pool> TikTakSolver<'a, Pool>
where
    Pool: EvaluationPool,
{
    /// Replaces the evaluation pool dispatching the batches.
    pub fn with_pool<P: EvaluationPool>(self, pool: P) -> TikTakSolver<'a, P> {
        TikTakSolver {
            problem: self.problem,
            method: self.method,
            config: self.config,
            pool,
            prepend: self.prepend,
            checkpointer: self.checkpointer,
        }
    }
    /// Registers locations known (or suspected) to be good, typically the
    /// result of an earlier estimation. They are evaluated with the plain
    /// objective and compete with the refined seeds for the incumbency.
    pub fn with_prepend(mut self, points: Vec<Vec<f64>>) -> Self {
        self.prepend = points;
        self
    }
    /// Requests the per-phase artefacts to be dumped into the given
    /// directory.
    pub fn with_checkpoint(mut self, directory: impl Into<PathBuf>) -> Self {
        self.checkpointer = Some(Checkpointer::new(directory.into()));
        self
    }

    /// Runs the whole solve and returns the global minimum along with the
    /// intermediate materials.
    pub fn solve(&mut self) -> Result<TikTakOutcome, TikTakError> {
        for point in &self.prepend {
            if !self.problem.contains(point) {
                return Err(TikTakError::InvalidBounds(format!(
                    "prepended location {:?} lies outside of the box",
                    point
                )));
            }
        }
        let sampler = SobolSampler::new(self.problem.lower(), self.problem.upper())?;

        // -- seed evaluation -------------------------------------------------
        let seeds = sampler.sample(self.config.quasirandom_n);
        let quasirandom_points = self.evaluate_objective(&seeds);
        self.checkpoint("quasirandom_points", &quasirandom_points)?;

        let initial_n = self.config.initial_n();
        info!(
            "seed evaluation: {} quasirandom points, keeping the best {}",
            quasirandom_points.len(),
            initial_n
        );

        let mut frontier = Frontier::new();
        frontier.insert_bulk(quasirandom_points.clone());
        frontier.keep_lowest(initial_n);
        let promising_points = frontier.into_vec();
        self.checkpoint("all_points", &promising_points)?;

        // -- local refinement of the promising seeds -------------------------
        let problem = self.problem;
        let method = self.method;
        let budget = self.config.local_maxeval_initial;
        let refined = self.pool.map(&promising_points, move |p: &EvaluatedPoint| {
            method.solve(problem, &p.location, budget)
        });

        // externally promising locations go through the seed evaluation
        // path: one plain objective call each, no local run
        let mut candidates = self.evaluate_objective(&self.prepend);
        let nb_runs = refined.len();
        candidates.extend(refined.into_iter().flatten().map(EvaluatedPoint::from));
        info!(
            "local refinement: {} runs, {} candidates survived",
            nb_runs,
            candidates.len()
        );
        if candidates.is_empty() {
            return Err(TikTakError::NoViableSeeds { quasirandom_points });
        }

        let mut frontier = Frontier::new();
        frontier.insert_bulk(candidates);
        let local_minima = frontier.into_vec();
        self.checkpoint("local_minima", &local_minima)?;

        // -- batched rounds around the incumbent -----------------------------
        let global_minimum = self.pull_rounds(&local_minima);
        self.checkpoint("global_minimum", &global_minimum)?;

        Ok(TikTakOutcome {
            quasirandom_points,
            promising_points,
            local_minima,
            global_minimum,
        })
    }

    /// Evaluates the objective at each given location, in one batch. A value
    /// that is not a finite number, or an evaluation lost altogether, is
    /// replaced by the sentinel; this is the only place where such patching
    /// occurs.
    fn evaluate_objective(&self, locations: &[Vec<f64>]) -> Vec<EvaluatedPoint> {
        let problem = self.problem;
        let values = self
            .pool
            .map(locations, move |x: &Vec<f64>| Some(problem.evaluate(x)));
        locations
            .iter()
            .zip(values)
            .map(|(location, value)| EvaluatedPoint {
                location: location.clone(),
                value: value.filter(|v| v.is_finite()).unwrap_or(NAN_SENTINEL),
            })
            .collect()
    }

    /// The rounds that close a solve. The candidates keep their ascending
    /// value order; the best of them is the initial incumbent. Each round
    /// drags every candidate past the cursor toward the incumbent (the later
    /// the candidate, the stronger the drag), runs one local minimization
    /// from each dragged start, and jumps the cursor right past the *best*
    /// improver found, which becomes the new incumbent.
    ///
    /// Jumping to the best improver rather than the first one deliberately
    /// trades exhaustiveness for descent speed: intermediate improvers may
    /// get skipped, but a batch of workers is paid for whether the round
    /// exploits it or not.
    ///
    /// Terminates when a round improves nothing or when the cursor runs off
    /// the candidate list; the incumbent value decreases strictly along the
    /// way.
    fn pull_rounds(&self, candidates: &[EvaluatedPoint]) -> EvaluatedPoint {
        debug_assert!(!candidates.is_empty());
        let schedule = PullSchedule::new(
            self.config.initial_n(),
            self.config.theta_min,
            self.config.theta_max,
            self.config.theta_pow,
        );
        let problem = self.problem;
        let method = self.method;
        let budget = self.config.local_maxeval_final;

        let mut incumbent = candidates[0].clone();
        let mut cursor = 1;
        let mut round = 0;
        while cursor < candidates.len() {
            round += 1;
            let starts = (cursor..candidates.len())
                .map(|j| {
                    (
                        j,
                        pull(
                            &candidates[j].location,
                            &incumbent.location,
                            schedule.theta(j),
                        ),
                    )
                })
                .collect::<Vec<_>>();
            let results = self.pool.map(&starts, move |start: &(usize, Vec<f64>)| {
                method.solve(problem, &start.1, budget)
            });
            let survivors = starts
                .iter()
                .zip(results)
                .filter_map(|((j, _), result)| result.map(|r| (*j, r)))
                .collect::<Vec<_>>();
            debug!(
                "round {}: {} candidates submitted, {} survived",
                round,
                starts.len(),
                survivors.len()
            );

            // first strict minimum wins, so ties go to the earliest submission
            let mut best = None;
            for survivor in survivors.iter() {
                if best.map_or(true, |b: &(usize, crate::LocalResult)| {
                    survivor.1.value < b.1.value
                }) {
                    best = Some(survivor);
                }
            }

            match best {
                Some(&(j, ref result)) if result.value < incumbent.value => {
                    info!(
                        "round {}: {} candidates, incumbent improved {} -> {}",
                        round,
                        starts.len(),
                        incumbent.value,
                        result.value
                    );
                    incumbent = EvaluatedPoint::from(result.clone());
                    cursor = j + 1;
                }
                _ => {
                    info!(
                        "round {}: {} candidates, no improvement (incumbent {})",
                        round,
                        starts.len(),
                        incumbent.value
                    );
                    break;
                }
            }
        }
        incumbent
    }

    /// Dumps one artefact when checkpointing was requested, and does nothing
    /// at all otherwise.
    fn checkpoint<T: Serialize>(&self, artefact: &str, data: &T) -> Result<(), TikTakError> {
        match &self.checkpointer {
            Some(checkpointer) => checkpointer.write(artefact, data),
            None => Ok(()),
        }
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

/// The solver tests rely on scripted local methods rather than on a real
/// descent backend: what is under scrutiny here is the orchestration (the
/// filtering, the mixing, the cursor, the failure policies), not the descent
/// itself.
#[cfg(test)]
mod test_tiktak_solver {
    use crate::*;

    /// A local method that teleports every start to one fixed location.
    struct Oracle {
        location: Vec<f64>,
    }
    impl LocalMethod for Oracle {
        fn solve(
            &self,
            problem: &dyn BoundedProblem,
            _start: &[f64],
            _maxeval: usize,
        ) -> Option<LocalResult> {
            Some(LocalResult {
                location: self.location.clone(),
                value: problem.evaluate(&self.location),
                status: LocalStatus::Converged,
            })
        }
    }

    /// A local method that does not move at all: it reports the start
    /// itself, evaluated.
    struct NoMove;
    impl LocalMethod for NoMove {
        fn solve(
            &self,
            problem: &dyn BoundedProblem,
            start: &[f64],
            _maxeval: usize,
        ) -> Option<LocalResult> {
            Some(LocalResult {
                location: start.to_vec(),
                value: problem.evaluate(start),
                status: LocalStatus::BudgetExhausted,
            })
        }
    }

    /// A local method that always fails.
    struct NeverWorks;
    impl LocalMethod for NeverWorks {
        fn solve(
            &self,
            _problem: &dyn BoundedProblem,
            _start: &[f64],
            _maxeval: usize,
        ) -> Option<LocalResult> {
            None
        }
    }

    /// A local method that only works on a thin slice of the box.
    struct Picky;
    impl LocalMethod for Picky {
        fn solve(
            &self,
            problem: &dyn BoundedProblem,
            start: &[f64],
            _maxeval: usize,
        ) -> Option<LocalResult> {
            if start[0] < 0.1 {
                Some(LocalResult {
                    location: start.to_vec(),
                    value: problem.evaluate(start),
                    status: LocalStatus::Converged,
                })
            } else {
                None
            }
        }
    }

    fn bowl() -> BoxedProblem<impl Fn(&[f64]) -> f64 + Send + Sync> {
        BoxedProblem::new(
            |x: &[f64]| {
                let center = [0.3, -0.7];
                x.iter()
                    .zip(center.iter())
                    .map(|(xi, ci)| (xi - ci) * (xi - ci))
                    .sum::<f64>()
            },
            vec![-5.0, -5.0],
            vec![5.0, 5.0],
        )
        .unwrap()
    }

    fn small_config() -> TikTakConfig {
        TikTakConfigBuilder::default()
            .quasirandom_n(128)
            .keep_ratio(0.25)
            .build()
            .unwrap()
    }

    #[test]
    fn the_outcome_carries_all_four_materials() {
        let problem = bowl();
        let method = Oracle {
            location: vec![0.3, -0.7],
        };
        let outcome = TikTakSolver::new(&problem, &method, small_config())
            .solve()
            .unwrap();
        assert_eq!(128, outcome.quasirandom_points.len());
        assert_eq!(32, outcome.promising_points.len());
        assert!(!outcome.local_minima.is_empty());
        assert_eq!(vec![0.3, -0.7], outcome.global_minimum.location);
        assert_eq!(0.0, outcome.global_minimum.value);
    }
    #[test]
    fn the_promising_points_are_sorted_ascending() {
        let problem = bowl();
        let method = NoMove;
        let outcome = TikTakSolver::new(&problem, &method, small_config())
            .solve()
            .unwrap();
        for pair in outcome.promising_points.windows(2) {
            assert!(pair[0].value <= pair[1].value);
        }
        for pair in outcome.local_minima.windows(2) {
            assert!(pair[0].value <= pair[1].value);
        }
    }
    #[test]
    fn the_final_incumbent_never_regresses_behind_the_candidates() {
        let problem = bowl();
        let method = NoMove;
        let outcome = TikTakSolver::new(&problem, &method, small_config())
            .solve()
            .unwrap();
        assert!(outcome.global_minimum.value <= outcome.local_minima[0].value);
        assert!(outcome.global_minimum.value <= outcome.promising_points[0].value);
    }
    #[test]
    fn every_reported_location_lies_within_the_box() {
        let problem = bowl();
        let method = NoMove;
        let outcome = TikTakSolver::new(&problem, &method, small_config())
            .solve()
            .unwrap();
        for point in outcome
            .quasirandom_points
            .iter()
            .chain(outcome.promising_points.iter())
            .chain(outcome.local_minima.iter())
        {
            assert!(problem.contains(&point.location));
        }
        assert!(problem.contains(&outcome.global_minimum.location));
    }
    #[test]
    fn when_every_local_run_fails_the_solve_reports_no_viable_seeds() {
        let problem = bowl();
        let method = NeverWorks;
        let error = TikTakSolver::new(&problem, &method, small_config()).solve();
        match error {
            Err(TikTakError::NoViableSeeds { quasirandom_points }) => {
                // the opening phase materials survive for diagnosis
                assert_eq!(128, quasirandom_points.len());
            }
            other => panic!("expected NoViableSeeds, got {:?}", other.map(|_| ())),
        }
    }
    #[test]
    fn when_most_local_runs_fail_the_solve_still_succeeds() {
        let problem = BoxedProblem::new(
            |x: &[f64]| x.iter().map(|xi| xi * xi).sum::<f64>(),
            vec![0.0, 0.0],
            vec![1.0, 1.0],
        )
        .unwrap();
        let method = Picky;
        let outcome = TikTakSolver::new(&problem, &method, small_config())
            .solve()
            .unwrap();
        // only starts with a small first coordinate survived
        assert!(outcome.global_minimum.location[0] < 0.1);
    }
    #[test]
    fn a_poisoned_objective_is_sentinelled_and_never_wins() {
        let problem = BoxedProblem::new(
            |x: &[f64]| {
                if 0.4 < x[0] && x[0] < 0.6 {
                    f64::NAN
                } else {
                    (x[0] - 0.9) * (x[0] - 0.9) + x[1] * x[1]
                }
            },
            vec![0.0, 0.0],
            vec![1.0, 1.0],
        )
        .unwrap();
        let method = Oracle {
            location: vec![0.9, 0.0],
        };
        let outcome = TikTakSolver::new(&problem, &method, small_config())
            .solve()
            .unwrap();
        let sentinelled = outcome
            .quasirandom_points
            .iter()
            .filter(|p| p.value == NAN_SENTINEL)
            .count();
        assert!(sentinelled > 0);
        assert!(outcome.global_minimum.value < NAN_SENTINEL);
        assert_eq!(vec![0.9, 0.0], outcome.global_minimum.location);
    }
    #[test]
    fn a_prepended_exact_minimum_wins_immediately() {
        let problem = bowl();
        let method = NoMove;
        let outcome = TikTakSolver::new(&problem, &method, small_config())
            .with_prepend(vec![vec![0.3, -0.7]])
            .solve()
            .unwrap();
        assert_eq!(vec![0.3, -0.7], outcome.global_minimum.location);
        assert_eq!(0.0, outcome.global_minimum.value);
        // it also tops the candidate list
        assert_eq!(vec![0.3, -0.7], outcome.local_minima[0].location);
    }
    #[test]
    fn a_prepended_location_outside_the_box_is_rejected() {
        let problem = bowl();
        let method = NoMove;
        let error = TikTakSolver::new(&problem, &method, small_config())
            .with_prepend(vec![vec![50.0, 0.0]])
            .solve();
        assert!(matches!(error, Err(TikTakError::InvalidBounds(_))));
    }
    #[test]
    fn prepending_keeps_a_failing_refinement_alive() {
        let problem = bowl();
        let method = NeverWorks;
        let outcome = TikTakSolver::new(&problem, &method, small_config())
            .with_prepend(vec![vec![1.0, 1.0]])
            .solve()
            .unwrap();
        assert_eq!(vec![1.0, 1.0], outcome.global_minimum.location);
    }
    #[test]
    fn the_outcome_does_not_depend_on_the_pool() {
        let problem = bowl();
        let method = NoMove;
        let sequential = TikTakSolver::new(&problem, &method, small_config())
            .with_pool(SequentialPool)
            .solve()
            .unwrap();
        let parallel = TikTakSolver::new(&problem, &method, small_config())
            .with_pool(WorkerPool::new().with_nb_workers(4))
            .solve()
            .unwrap();
        assert_eq!(sequential, parallel);
    }
    #[test]
    fn solving_twice_yields_the_exact_same_outcome() {
        let problem = bowl();
        let method = NoMove;
        let first = TikTakSolver::new(&problem, &method, small_config())
            .solve()
            .unwrap();
        let second = TikTakSolver::new(&problem, &method, small_config())
            .solve()
            .unwrap();
        assert_eq!(first, second);
    }
    #[test]
    fn the_artefacts_are_dumped_when_checkpointing_is_requested() {
        let dir = tempfile::tempdir().unwrap();
        let problem = bowl();
        let method = NoMove;
        let outcome = TikTakSolver::new(&problem, &method, small_config())
            .with_checkpoint(dir.path())
            .solve()
            .unwrap();
        for name in ARTEFACT_NAMES {
            assert!(dir.path().join(format!("{}.json", name)).exists());
        }
        let dumped =
            load_artefact::<EvaluatedPoint>(dir.path().join("global_minimum.json")).unwrap();
        assert_eq!(outcome.global_minimum, dumped.data);
        let dumped = load_artefact::<Vec<EvaluatedPoint>>(
            dir.path().join("quasirandom_points.json"),
        )
        .unwrap();
        assert_eq!(outcome.quasirandom_points, dumped.data);
    }
}

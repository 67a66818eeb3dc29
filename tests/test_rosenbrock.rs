#![cfg(test)]
//! End to end solves of the 2-D Rosenbrock function. The solver modules are
//! unit tested with scripted local methods; here the whole machinery runs
//! against the real descent backend on a landmark objective with a known
//! optimum.

use tiktak::*;

/// The classic banana shaped valley, minimized at (1, 1) where it is zero.
fn rosenbrock(x: &[f64]) -> f64 {
    (1.0 - x[0]) * (1.0 - x[0]) + 100.0 * (x[1] - x[0] * x[0]) * (x[1] - x[0] * x[0])
}

#[test]
fn it_finds_the_bottom_of_the_banana_valley() {
    let problem =
        BoxedProblem::new(rosenbrock, vec![0.0, 0.0], vec![100.0, 100.0]).unwrap();
    let method = NloptMethod::new(LocalAlgorithm::Subplex, LocalOptions::default());
    let config = TikTakConfigBuilder::default()
        .quasirandom_n(10_000)
        .keep_ratio(0.5)
        .local_maxeval_initial(100)
        .local_maxeval_final(100)
        .build()
        .unwrap();

    let outcome = TikTakSolver::new(&problem, &method, config).solve().unwrap();

    let minimum = &outcome.global_minimum;
    assert!(minimum.value < 1e-6, "value = {}", minimum.value);
    assert!((minimum.location[0] - 1.0).abs() < 1e-3, "{:?}", minimum.location);
    assert!((minimum.location[1] - 1.0).abs() < 1e-3, "{:?}", minimum.location);
    assert!(problem.contains(&minimum.location));
}

#[test]
fn a_nan_trap_is_sentinelled_away_and_never_wins() {
    // same valley, except for a thin poisoned band of the first coordinate
    let trapped = |x: &[f64]| {
        if 49.5 < x[0] && x[0] < 50.5 {
            f64::NAN
        } else {
            rosenbrock(x)
        }
    };
    let problem = BoxedProblem::new(trapped, vec![0.0, 0.0], vec![100.0, 100.0]).unwrap();
    let method = NloptMethod::new(LocalAlgorithm::Subplex, LocalOptions::default());
    let config = TikTakConfigBuilder::default()
        .quasirandom_n(2_000)
        .keep_ratio(0.1)
        .local_maxeval_initial(100)
        .local_maxeval_final(100)
        .build()
        .unwrap();

    let outcome = TikTakSolver::new(&problem, &method, config).solve().unwrap();

    // the poisoned seeds show up with the sentinel value, nothing else does
    let sentinelled = outcome
        .quasirandom_points
        .iter()
        .filter(|p| p.value == NAN_SENTINEL)
        .count();
    assert!(sentinelled > 0);
    for point in &outcome.quasirandom_points {
        assert!(point.value.is_finite());
    }
    // and none of them ever got anywhere near the incumbency
    assert!(outcome.global_minimum.value < 1.0);
}

#[test]
fn a_prepended_exact_optimum_settles_the_race_immediately() {
    let problem =
        BoxedProblem::new(rosenbrock, vec![0.0, 0.0], vec![100.0, 100.0]).unwrap();
    let method = NloptMethod::new(LocalAlgorithm::Subplex, LocalOptions::default());
    let config = TikTakConfigBuilder::default()
        .quasirandom_n(2_000)
        .keep_ratio(0.1)
        .local_maxeval_initial(100)
        .local_maxeval_final(100)
        .build()
        .unwrap();

    let outcome = TikTakSolver::new(&problem, &method, config)
        .with_prepend(vec![vec![1.0, 1.0]])
        .solve()
        .unwrap();

    // the warm start tops the candidate list and, the objective being
    // nonnegative, nothing can strictly improve on it
    assert_eq!(vec![1.0, 1.0], outcome.local_minima[0].location);
    assert_eq!(vec![1.0, 1.0], outcome.global_minimum.location);
    assert_eq!(0.0, outcome.global_minimum.value);
}

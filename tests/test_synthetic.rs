#![cfg(test)]
//! End to end solves on synthetic landscapes: a smooth bowl with a known
//! center, a flat plateau surrounded by a cliff, and the reproducibility of
//! a whole solve.

use tiktak::*;

#[test]
fn it_pins_the_center_of_a_quadratic_bowl() {
    let center = [0.3, -0.7, 1.1];
    let problem = BoxedProblem::new(
        move |x: &[f64]| {
            x.iter()
                .zip(center.iter())
                .map(|(xi, ci)| (xi - ci) * (xi - ci))
                .sum::<f64>()
        },
        vec![-5.0; 3],
        vec![5.0; 3],
    )
    .unwrap();
    let method = NloptMethod::new(LocalAlgorithm::Subplex, LocalOptions::default());
    let config = TikTakConfigBuilder::default()
        .quasirandom_n(4_000)
        .keep_ratio(0.1)
        .local_maxeval_initial(200)
        .local_maxeval_final(1_000)
        .build()
        .unwrap();

    let outcome = TikTakSolver::new(&problem, &method, config).solve().unwrap();

    let minimum = &outcome.global_minimum;
    assert!(minimum.value < 1e-10, "value = {}", minimum.value);
    for (x, c) in minimum.location.iter().zip(center.iter()) {
        assert!((x - c).abs() < 1e-5, "{:?}", minimum.location);
    }
    assert!(problem.contains(&minimum.location));
}

#[test]
fn a_flat_plateau_is_reached_exactly() {
    // zero on the disk of radius 2, a quadratic skirt up to radius 3, and a
    // hundred-high cliff everywhere else
    let problem = BoxedProblem::new(
        |x: &[f64]| {
            let norm2 = x.iter().map(|xi| xi * xi).sum::<f64>();
            if norm2 <= 9.0 {
                (norm2 - 4.0).max(0.0)
            } else {
                100.0
            }
        },
        vec![-5.0, -5.0],
        vec![5.0, 5.0],
    )
    .unwrap();
    let method = NloptMethod::new(LocalAlgorithm::Subplex, LocalOptions::default());
    let config = TikTakConfigBuilder::default()
        .quasirandom_n(2_000)
        .keep_ratio(0.1)
        .local_maxeval_initial(100)
        .local_maxeval_final(100)
        .build()
        .unwrap();

    let outcome = TikTakSolver::new(&problem, &method, config).solve().unwrap();

    let minimum = &outcome.global_minimum;
    assert_eq!(0.0, minimum.value);
    let norm2 = minimum.location.iter().map(|xi| xi * xi).sum::<f64>();
    assert!(norm2 <= 4.0 + 1e-9, "{:?}", minimum.location);
}

#[test]
fn two_identical_solves_agree_to_the_bit() {
    let problem = BoxedProblem::new(
        |x: &[f64]| (x[0] - 2.0) * (x[0] - 2.0) + (x[1] + 1.0) * (x[1] + 1.0),
        vec![-5.0, -5.0],
        vec![5.0, 5.0],
    )
    .unwrap();
    let method = NloptMethod::new(LocalAlgorithm::Subplex, LocalOptions::default());
    let config = || {
        TikTakConfigBuilder::default()
            .quasirandom_n(1_000)
            .keep_ratio(0.1)
            .local_maxeval_initial(100)
            .local_maxeval_final(200)
            .build()
            .unwrap()
    };

    let first = TikTakSolver::new(&problem, &method, config()).solve().unwrap();
    let second = TikTakSolver::new(&problem, &method, config()).solve().unwrap();

    // the seeds are bitwise identical and so is everything downstream,
    // whatever the number of workers that processed the batches
    assert_eq!(first.quasirandom_points, second.quasirandom_points);
    assert_eq!(first, second);

    let sequential = TikTakSolver::new(&problem, &method, config())
        .with_pool(SequentialPool)
        .solve()
        .unwrap();
    assert_eq!(first, sequential);
}

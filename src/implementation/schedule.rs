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

//! This module provides the schedule of mixing weights which drags candidate
//! starts toward the incumbent, and the convex mixing rule itself.

/// The schedule of mixing weights θ. Candidate i of the sorted candidate
/// list is started from the convex mix `(1 − θ(i))·candidate + θ(i)·incumbent`:
/// early candidates are nearly pure seeds (exploration), late candidates are
/// pulled strongly toward the incumbent (refinement).
///
/// The weight grows like `(i / initial_n)^theta_pow`, clamped to the
/// configured `[theta_min, theta_max]` band; `theta_pow` controls the
/// curvature of the ramp. Index 0 is degenerate: the very first candidate
/// *is* the incumbent, so its weight is pinned at one.
///
/// # Example
/// ```
/// # use tiktak::PullSchedule;
/// let schedule = PullSchedule::new(100, 0.1, 0.995, 1.0);
/// assert_eq!(1.0, schedule.theta(0));
/// assert_eq!(0.25, schedule.theta(25));
/// assert_eq!(0.995, schedule.theta(100));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PullSchedule {
    /// The number of candidates retained for refinement
    initial_n: usize,
    /// The smallest weight ever put on the incumbent (index 0 aside)
    theta_min: f64,
    /// The largest weight ever put on the incumbent
    theta_max: f64,
    /// The curvature of the ramp between the two
    theta_pow: f64,
}

impl PullSchedule {
    /// Creates the schedule for a refinement list of `initial_n` candidates.
    pub fn new(initial_n: usize, theta_min: f64, theta_max: f64, theta_pow: f64) -> Self {
        debug_assert!(initial_n >= 1);
        debug_assert!(0.0 < theta_min && theta_min <= theta_max && theta_max < 1.0);
        debug_assert!(theta_pow > 0.0);
        PullSchedule {
            initial_n,
            theta_min,
            theta_max,
            theta_pow,
        }
    }

    /// The weight put on the incumbent when mixing candidate `i`.
    pub fn theta(&self, i: usize) -> f64 {
        if i == 0 {
            1.0
        } else {
            let ramp = (i as f64 / self.initial_n as f64).powf(self.theta_pow);
            ramp.clamp(self.theta_min, self.theta_max)
        }
    }
}

/// The convex mix `(1 − θ)·seed + θ·incumbent`, componentwise. Since it is a
/// convex combination of two in-box locations, the result always lies within
/// the box as well.
pub fn pull(seed: &[f64], incumbent: &[f64], theta: f64) -> Vec<f64> {
    debug_assert_eq!(seed.len(), incumbent.len());
    seed.iter()
        .zip(incumbent.iter())
        .map(|(s, b)| (1.0 - theta) * s + theta * b)
        .collect()
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_pull_schedule {
    use crate::PullSchedule;

    #[test]
    fn index_zero_is_pinned_at_one() {
        let schedule = PullSchedule::new(50, 0.1, 0.995, 0.5);
        assert_eq!(1.0, schedule.theta(0));
    }
    #[test]
    fn every_weight_lies_within_the_configured_band() {
        let schedule = PullSchedule::new(50, 0.1, 0.995, 0.5);
        for i in 1..=50 {
            let theta = schedule.theta(i);
            assert!((0.1..=0.995).contains(&theta), "theta({}) = {}", i, theta);
        }
    }
    #[test]
    fn the_ramp_is_non_decreasing() {
        let schedule = PullSchedule::new(200, 0.05, 0.99, 2.0);
        let mut prev = schedule.theta(1);
        for i in 2..=200 {
            let theta = schedule.theta(i);
            assert!(theta >= prev, "theta({}) = {} < {}", i, theta, prev);
            prev = theta;
        }
    }
    #[test]
    fn outside_the_clamp_the_ramp_follows_the_power_law() {
        let schedule = PullSchedule::new(100, 0.01, 0.999, 1.0);
        assert_eq!(0.5, schedule.theta(50));
        assert_eq!(0.25, schedule.theta(25));
    }
    #[test]
    fn small_indices_saturate_at_theta_min() {
        let schedule = PullSchedule::new(10_000, 0.1, 0.995, 0.5);
        assert_eq!(0.1, schedule.theta(1));
    }
    #[test]
    fn large_indices_saturate_at_theta_max() {
        let schedule = PullSchedule::new(10, 0.1, 0.5, 0.5);
        assert_eq!(0.5, schedule.theta(10));
    }
}

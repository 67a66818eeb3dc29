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

//! This module defines the configuration of a solve and the builder through
//! which it is put together and validated.

use derive_builder::Builder;

use crate::TikTakError;

const DEFAULT_KEEP_RATIO: f64 = 0.1;
const DEFAULT_THETA_MIN: f64 = 0.1;
const DEFAULT_THETA_MAX: f64 = 0.995;
const DEFAULT_THETA_POW: f64 = 0.5;

/// The knobs of a solve. The only mandatory one is `quasirandom_n`, the
/// number of quasirandom seeds the search opens with; everything else has a
/// sensible default. The builder refuses to hand out a configuration that
/// violates any of the invariants, so a `TikTakConfig` in hand is always a
/// usable one.
///
/// # Example
/// ```
/// # use tiktak::TikTakConfigBuilder;
/// let config = TikTakConfigBuilder::default()
///     .quasirandom_n(10_000)
///     .keep_ratio(0.5)
///     .build()
///     .unwrap();
/// assert_eq!(5_000, config.initial_n());
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct TikTakConfig {
    /// How many quasirandom seeds are evaluated when the search opens
    pub quasirandom_n: usize,
    /// The share of the seeds retained for local refinement, in (0, 1]
    #[builder(default = "DEFAULT_KEEP_RATIO")]
    pub keep_ratio: f64,
    /// The smallest weight the mixing schedule ever puts on the incumbent
    #[builder(default = "DEFAULT_THETA_MIN")]
    pub theta_min: f64,
    /// The largest weight the mixing schedule ever puts on the incumbent
    #[builder(default = "DEFAULT_THETA_MAX")]
    pub theta_max: f64,
    /// The curvature of the mixing schedule ramp
    #[builder(default = "DEFAULT_THETA_POW")]
    pub theta_pow: f64,
    /// The evaluation budget of each local run refining a promising seed
    #[builder(default = "100")]
    pub local_maxeval_initial: usize,
    /// The evaluation budget of each local run of the batched rounds
    #[builder(default = "1000")]
    pub local_maxeval_final: usize,
}

impl TikTakConfig {
    /// How many seeds survive the opening filter: the ceiling of
    /// `keep_ratio * quasirandom_n`. Always within `1..=quasirandom_n`.
    pub fn initial_n(&self) -> usize {
        (self.keep_ratio * self.quasirandom_n as f64).ceil() as usize
    }
}

impl TikTakConfigBuilder {
    /// The semantic checks run by `build` on top of the mere presence of the
    /// mandatory fields.
    fn validate(&self) -> Result<(), String> {
        if let Some(n) = self.quasirandom_n {
            if n == 0 {
                return Err("quasirandom_n must be positive".to_string());
            }
        }
        let keep_ratio = self.keep_ratio.unwrap_or(DEFAULT_KEEP_RATIO);
        if !(keep_ratio > 0.0 && keep_ratio <= 1.0) {
            return Err(format!("keep_ratio must lie in (0, 1], got {}", keep_ratio));
        }
        let theta_min = self.theta_min.unwrap_or(DEFAULT_THETA_MIN);
        let theta_max = self.theta_max.unwrap_or(DEFAULT_THETA_MAX);
        if !(theta_min > 0.0 && theta_min < 1.0) {
            return Err(format!("theta_min must lie in (0, 1), got {}", theta_min));
        }
        if !(theta_max > 0.0 && theta_max < 1.0) {
            return Err(format!("theta_max must lie in (0, 1), got {}", theta_max));
        }
        if theta_min > theta_max {
            return Err(format!(
                "theta_min = {} exceeds theta_max = {}",
                theta_min, theta_max
            ));
        }
        let theta_pow = self.theta_pow.unwrap_or(DEFAULT_THETA_POW);
        if !(theta_pow > 0.0) {
            return Err(format!("theta_pow must be positive, got {}", theta_pow));
        }
        if self.local_maxeval_initial == Some(0) || self.local_maxeval_final == Some(0) {
            return Err("local evaluation budgets must be positive".to_string());
        }
        Ok(())
    }
}

impl From<TikTakConfigBuilderError> for TikTakError {
    fn from(error: TikTakConfigBuilderError) -> Self {
        TikTakError::InvalidConfig(error.to_string())
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

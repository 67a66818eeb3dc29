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

//! This module provides the quasirandom sampler used to seed a solve. It
//! implements a Sobol sequence with the usual gray code construction, mapped
//! affinely onto the search box.

use crate::TikTakError;

/// The number of dimensions covered by the embedded direction number tables.
/// Estimation problems routinely fit well under this limit; a larger table
/// could be embedded should the need ever arise.
pub const MAX_DIMENSION: usize = 21;

/// The number of bits of resolution of the generated sequence.
const BITS: usize = 32;

/// The primitive polynomial degrees, encoded interior coefficients and
/// initial direction numbers for the coordinates beyond the first one
/// (which needs none of this, being a plain van der Corput sequence in
/// base 2). These are the classic Joe and Kuo values.
#[rustfmt::skip]
const DIRECTION_SEEDS: [(usize, u32, &[u32]); MAX_DIMENSION - 1] = [
    (1,  0, &[1]),
    (2,  1, &[1, 3]),
    (3,  1, &[1, 3, 1]),
    (3,  2, &[1, 1, 1]),
    (4,  1, &[1, 1, 3, 3]),
    (4,  4, &[1, 3, 5, 13]),
    (5,  2, &[1, 1, 5, 5, 17]),
    (5,  4, &[1, 1, 5, 5, 5]),
    (5,  7, &[1, 1, 7, 11, 19]),
    (5, 11, &[1, 1, 5, 1, 1]),
    (5, 13, &[1, 1, 1, 3, 11]),
    (5, 14, &[1, 3, 5, 5, 31]),
    (6,  1, &[1, 3, 3, 9, 7, 49]),
    (6, 13, &[1, 1, 1, 15, 21, 21]),
    (6, 16, &[1, 3, 1, 13, 27, 49]),
    (6, 19, &[1, 1, 1, 15, 7, 5]),
    (6, 22, &[1, 3, 1, 15, 13, 25]),
    (6, 25, &[1, 1, 5, 5, 19, 61]),
    (7,  1, &[1, 3, 7, 11, 23, 15, 103]),
    (7,  4, &[1, 3, 7, 13, 13, 15, 69]),
];

/// A low discrepancy sampler tiling a given box with Sobol points.
///
/// # Contract:
/// + The produced points only depend on the box and on the requested count:
///   sampling twice yields bitwise identical locations.
/// + The first `n` entries of the raw sequence (the origin of the unit cube
///   included) are discarded before yielding, a burn-in equal to the
///   requested length which noticeably improves the uniformity of short
///   samples.
/// + Exactly `n` points are yielded, each strictly inside the open box.
///
/// # Example
/// ```
/// # use tiktak::SobolSampler;
/// let sampler = SobolSampler::new(&[0.0, 0.0], &[1.0, 1.0]).unwrap();
/// assert_eq!(vec![vec![0.5, 0.5]], sampler.sample(1));
/// assert_eq!(sampler.sample(100), sampler.sample(100));
/// ```
#[derive(Debug, Clone)]
pub struct SobolSampler {
    /// The lower corner of the box to tile
    lower: Vec<f64>,
    /// The upper corner of the box to tile
    upper: Vec<f64>,
    /// One direction vector per coordinate of the box
    directions: Vec<[u32; BITS]>,
}

impl SobolSampler {
    /// Creates a sampler for the box delimited by the two given corners.
    /// Fails when the dimension exceeds the embedded tables.
    pub fn new(lower: &[f64], upper: &[f64]) -> Result<Self, TikTakError> {
        debug_assert_eq!(lower.len(), upper.len());
        let nb_vars = lower.len();
        if nb_vars > MAX_DIMENSION {
            return Err(TikTakError::UnsupportedDimension {
                given: nb_vars,
                max: MAX_DIMENSION,
            });
        }
        Ok(SobolSampler {
            lower: lower.to_vec(),
            upper: upper.to_vec(),
            directions: Self::direction_vectors(nb_vars),
        })
    }

    /// The dimension of the sampled box.
    pub fn nb_vars(&self) -> usize {
        self.lower.len()
    }

    /// Produces `n` points of the box, skipping the first `n` entries of the
    /// raw sequence beforehand.
    pub fn sample(&self, n: usize) -> Vec<Vec<f64>> {
        debug_assert!((n as u64) < (1_u64 << (BITS - 1)));
        let mut state = vec![0_u32; self.nb_vars()];
        let mut out = Vec::with_capacity(n);
        for index in 1..(2 * n as u64) {
            // gray code update: one coordinate-wise xor per generated entry
            let c = index.trailing_zeros() as usize;
            for (x, v) in state.iter_mut().zip(self.directions.iter()) {
                *x ^= v[c];
            }
            if index >= n as u64 {
                out.push(self.embed(&state));
            }
        }
        out
    }

    /// Maps one raw entry of the unit cube onto the box.
    fn embed(&self, raw: &[u32]) -> Vec<f64> {
        const SCALE: f64 = 1.0 / (1_u64 << BITS) as f64;
        raw.iter()
            .zip(self.lower.iter().zip(self.upper.iter()))
            .map(|(x, (lo, up))| lo + (*x as f64 * SCALE) * (up - lo))
            .collect()
    }

    /// Expands the compact table entries into one full direction vector per
    /// coordinate.
    fn direction_vectors(nb_vars: usize) -> Vec<[u32; BITS]> {
        let mut all = Vec::with_capacity(nb_vars);
        if nb_vars == 0 {
            return all;
        }
        // the first coordinate uses the van der Corput numbers in base 2
        let mut first = [0_u32; BITS];
        for (k, v) in first.iter_mut().enumerate() {
            *v = 1 << (BITS - 1 - k);
        }
        all.push(first);

        for &(degree, poly, seed) in DIRECTION_SEEDS.iter().take(nb_vars - 1) {
            let s = degree;
            let mut v = [0_u32; BITS];
            for k in 0..BITS {
                if k < s {
                    v[k] = seed[k] << (BITS - 1 - k);
                } else {
                    // the usual direction number recurrence over GF(2)
                    let mut vk = v[k - s] ^ (v[k - s] >> s);
                    for i in 1..s {
                        if (poly >> (s - 1 - i)) & 1 == 1 {
                            vk ^= v[k - i];
                        }
                    }
                    v[k] = vk;
                }
            }
            all.push(v);
        }
        all
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

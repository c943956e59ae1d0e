//! Percentile projection over a reservoir sample
//!
//! Percentiles are read as order statistics of the sorted sample, so their
//! accuracy is bounded by the sample size rather than by the stream length.
//! They are local to the reservoir they were computed from and cannot be
//! combined across shards by averaging or summing.

use tracing::debug;

use crate::state::CounterState;

/// Percentile cut-points reported by every projection, in output order
pub const PERCENTILES: [f64; 6] = [0.25, 0.50, 0.75, 0.90, 0.95, 0.99];

/// Summary of a counter state
///
/// `count` and `total` are exact and can be summed across shards;
/// `percentiles` are sample-based approximations aligned positionally with
/// [`PERCENTILES`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Projection {
    /// Number of observations folded in
    pub count: u64,
    /// Exact sum of all observations
    pub total: f64,
    /// `total / count`, or 0 when empty
    pub average: f64,
    /// Approximate value at each of [`PERCENTILES`]
    pub percentiles: [f64; PERCENTILES.len()],
}

impl Projection {
    /// Value reported for cut-point `p`, if `p` is one of [`PERCENTILES`]
    pub fn percentile(&self, p: f64) -> Option<f64> {
        PERCENTILES
            .iter()
            .position(|&q| q == p)
            .and_then(|i| self.percentiles.get(i).copied())
    }

    /// Median estimate
    pub fn median(&self) -> f64 {
        self.percentiles[1]
    }
}

impl core::fmt::Display for Projection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "count={} total={} average={}",
            self.count, self.total, self.average
        )?;
        for (p, value) in PERCENTILES.iter().zip(&self.percentiles) {
            write!(f, " p{}={}", (p * 100.0).round(), value)?;
        }
        Ok(())
    }
}

/// Project `state` into count, total, average and percentiles
///
/// Sorts a copy of the occupied sample; `state` itself is left untouched.
pub fn project(state: &CounterState) -> Projection {
    let mut sorted = state.sample().to_vec();
    sorted.sort_unstable_by(f64::total_cmp);

    let mut percentiles = [0.0; PERCENTILES.len()];
    if !sorted.is_empty() {
        for (out, &p) in percentiles.iter_mut().zip(PERCENTILES.iter()) {
            let index = percentile_index(p, sorted.len());
            *out = sorted.get(index).copied().unwrap_or_default();
        }
    }

    debug!(count = state.count(), sampled = sorted.len(), "projected counter state");

    Projection {
        count: state.count(),
        total: state.total(),
        average: state.average(),
        percentiles,
    }
}

/// Index of cut-point `p` in a sorted sample of `len` values
///
/// `floor(p * len)`, clamped into `[0, len - 1]` so that `p >= 1.0` maps to
/// the maximum. Returns 0 for an empty sample.
pub fn percentile_index(p: f64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let raw = (p * len as f64).floor();
    if raw <= 0.0 {
        0
    } else {
        (raw as usize).min(len - 1)
    }
}

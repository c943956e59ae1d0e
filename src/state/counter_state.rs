//! In-memory view of a counter's state

use rand::Rng;

use crate::sampling::{offer, Placement};
use crate::traits::CounterError;

/// Number of slots in the reservoir sample
pub const SAMPLE_CAPACITY: usize = 200;

/// Largest count the 4-byte count field can hold
pub const MAX_COUNT: u64 = i32::MAX as u64;

/// Decoded counter state
///
/// `count` and `total` are exact. `sample` is a uniform random subset of
/// the observations seen so far, kept in insertion/replacement order; only
/// the first `min(count, SAMPLE_CAPACITY)` slots are occupied.
///
/// # Example
///
/// ```
/// use flowcounter::state::CounterState;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let mut state = CounterState::new();
///
/// for value in [3.0, 1.0, 2.0] {
///     state.record(value, &mut rng).unwrap();
/// }
///
/// assert_eq!(state.count(), 3);
/// assert_eq!(state.total(), 6.0);
/// assert_eq!(state.sample(), &[3.0, 1.0, 2.0]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CounterState {
    pub(super) count: u64,
    pub(super) total: f64,
    pub(super) sample: [f64; SAMPLE_CAPACITY],
}

impl Default for CounterState {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterState {
    /// Empty state: no observations, zero total, zeroed sample slots
    pub fn new() -> Self {
        Self {
            count: 0,
            total: 0.0,
            sample: [0.0; SAMPLE_CAPACITY],
        }
    }

    /// Fold one value into the state
    ///
    /// Runs the reservoir step with the count before this observation,
    /// then bumps the count and adds the value to the total. The value is
    /// expected to be finite; the event folder rejects anything else before
    /// it gets here.
    pub fn record<R: Rng + ?Sized>(
        &mut self,
        value: f64,
        rng: &mut R,
    ) -> Result<Placement, CounterError> {
        if self.count >= MAX_COUNT {
            return Err(CounterError::CountOverflow { count: self.count });
        }

        let placement = offer(&mut self.sample, self.count, value, rng);
        self.count += 1;
        self.total += value;

        Ok(placement)
    }

    /// Total number of observations ever recorded
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Exact running sum of all observations
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Mean of all observations, 0 when empty
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }

    /// Number of occupied sample slots
    pub fn occupied(&self) -> usize {
        // count <= MAX_COUNT, so this never truncates on 32-bit targets
        (self.count as usize).min(SAMPLE_CAPACITY)
    }

    /// The occupied part of the sample, unsorted
    pub fn sample(&self) -> &[f64] {
        &self.sample[..self.occupied()]
    }

    /// Check if no observation has been recorded
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Check if every sample slot is occupied
    pub fn is_full(&self) -> bool {
        self.occupied() == SAMPLE_CAPACITY
    }

    /// Probability that any given observation is currently in the sample
    pub fn sampling_probability(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (SAMPLE_CAPACITY as f64 / self.count as f64).min(1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_empty() {
        let state = CounterState::new();

        assert!(state.is_empty());
        assert_eq!(state.count(), 0);
        assert_eq!(state.total(), 0.0);
        assert_eq!(state.average(), 0.0);
        assert!(state.sample().is_empty());
        assert_eq!(state.sampling_probability(), 0.0);
    }

    #[test]
    fn test_fill_phase_keeps_order() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = CounterState::new();

        for i in 0..SAMPLE_CAPACITY {
            let placement = state.record(i as f64, &mut rng).unwrap();
            assert_eq!(placement, Placement::Filled(i));
        }

        assert!(state.is_full());
        let expected: Vec<f64> = (0..SAMPLE_CAPACITY).map(|i| i as f64).collect();
        assert_eq!(state.sample(), expected.as_slice());
    }

    #[test]
    fn test_occupied_caps_at_capacity() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut state = CounterState::new();

        for i in 0..1000 {
            state.record(i as f64, &mut rng).unwrap();
            assert_eq!(state.occupied(), (i + 1).min(SAMPLE_CAPACITY));
        }

        assert_eq!(state.count(), 1000);
        assert!((state.total() - 499_500.0).abs() < 1e-9);
        assert!((state.average() - 499.5).abs() < 1e-9);
        assert!((state.sampling_probability() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_count_overflow() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = CounterState::new();
        state.count = MAX_COUNT;

        let err = state.record(1.0, &mut rng).unwrap_err();
        assert_eq!(err, CounterError::CountOverflow { count: MAX_COUNT });
        assert_eq!(state.count(), MAX_COUNT);
        assert_eq!(state.total(), 0.0);
    }
}

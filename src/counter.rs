//! The reservoir-sampled counter type
//!
//! [`SampleCounter`] ties the pieces together: the state codec, the
//! reservoir step and the percentile projection. It is stateless; each
//! call takes a state buffer and, for folds, returns a new one.

use rand::Rng;
use tracing::{debug, warn};

use crate::config::CounterConfig;
use crate::quantiles::{project, Projection};
use crate::state::{decode, encode, CounterState};
use crate::traits::{CounterError, CounterType, MalformedReason, Observation};

/// Counter keeping exact count/total and a 200-slot reservoir sample
///
/// # Example
///
/// ```
/// use flowcounter::{CounterType, SampleCounter};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let counter = SampleCounter::new();
/// let mut rng = StdRng::seed_from_u64(42);
///
/// let state = counter.new_state();
/// let state = counter
///     .fold_events(&state, &[1.0, 2.0, 3.0, 4.0], &mut rng)
///     .unwrap();
///
/// let projection = counter.project_state(&state).unwrap();
/// assert_eq!(projection.count, 4);
/// assert_eq!(projection.total, 10.0);
/// assert_eq!(projection.average, 2.5);
/// assert_eq!(projection.percentiles, [2.0, 3.0, 4.0, 4.0, 4.0, 4.0]);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SampleCounter {
    config: CounterConfig,
}

impl SampleCounter {
    /// Counter reading the value from field 0 of each event
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter with explicit configuration
    pub fn with_config(config: CounterConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &CounterConfig {
        &self.config
    }

    /// Fold `events` into an already decoded state
    ///
    /// Works on a copy, so `state` is only replaced when the whole batch
    /// applies cleanly.
    pub fn fold_into<E, R>(
        &self,
        state: &mut CounterState,
        events: &[E],
        rng: &mut R,
    ) -> Result<(), CounterError>
    where
        E: Observation,
        R: Rng + ?Sized,
    {
        let mut next = state.clone();
        for (index, event) in events.iter().enumerate() {
            let value = self.extract(index, event)?;
            next.record(value, rng)?;
        }
        *state = next;
        Ok(())
    }

    fn extract<E: Observation>(&self, index: usize, event: &E) -> Result<f64, CounterError> {
        let field = self.config.value_field;
        let reason = match event.field(field) {
            Some(value) if value.is_finite() => return Ok(value),
            Some(_) => MalformedReason::NonFinite,
            None => MalformedReason::MissingField { field },
        };
        Err(CounterError::MalformedEvent { index, reason })
    }
}

impl CounterType for SampleCounter {
    fn name(&self) -> &'static str {
        "reservoir"
    }

    fn new_state(&self) -> Vec<u8> {
        encode(&CounterState::new())
    }

    fn fold_events<E, R>(
        &self,
        state: &[u8],
        events: &[E],
        rng: &mut R,
    ) -> Result<Vec<u8>, CounterError>
    where
        E: Observation,
        R: Rng + ?Sized,
    {
        let mut decoded = decode(state).map_err(|err| {
            warn!(error = %err, "rejecting fold: state buffer does not decode");
            err
        })?;

        if let Err(err) = self.fold_into(&mut decoded, events, rng) {
            warn!(error = %err, batch = events.len(), "rejecting fold");
            return Err(err);
        }

        debug!(batch = events.len(), count = decoded.count(), "folded events");
        Ok(encode(&decoded))
    }

    fn project_state(&self, state: &[u8]) -> Result<Projection, CounterError> {
        let decoded = decode(state)?;
        Ok(project(&decoded))
    }
}

/// Empty state buffer for the default [`SampleCounter`]
pub fn new_state() -> Vec<u8> {
    SampleCounter::new().new_state()
}

/// Fold `events` with the default [`SampleCounter`] (value in field 0)
pub fn fold_events<E, R>(state: &[u8], events: &[E], rng: &mut R) -> Result<Vec<u8>, CounterError>
where
    E: Observation,
    R: Rng + ?Sized,
{
    SampleCounter::new().fold_events(state, events, rng)
}

/// Project `state` with the default [`SampleCounter`]
pub fn project_state(state: &[u8]) -> Result<Projection, CounterError> {
    SampleCounter::new().project_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{SAMPLE_CAPACITY, STATE_SIZE};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_new_state_projects_to_zero() {
        let state = new_state();
        assert_eq!(state.len(), STATE_SIZE);

        let projection = project_state(&state).unwrap();
        assert_eq!(
            projection,
            Projection {
                count: 0,
                total: 0.0,
                average: 0.0,
                percentiles: [0.0; 6],
            }
        );
    }

    #[test]
    fn test_fold_accumulates_across_batches() {
        let mut rng = StdRng::seed_from_u64(1);
        let state = new_state();

        let state = fold_events(&state, &[1.0, 2.0], &mut rng).unwrap();
        let state = fold_events(&state, &[3.0, 4.0], &mut rng).unwrap();
        let state = fold_events::<f64, _>(&state, &[], &mut rng).unwrap();

        let projection = project_state(&state).unwrap();
        assert_eq!(projection.count, 4);
        assert_eq!(projection.total, 10.0);
        assert_eq!(projection.percentiles, [2.0, 3.0, 4.0, 4.0, 4.0, 4.0]);
    }

    #[test]
    fn test_configured_field() {
        let mut rng = StdRng::seed_from_u64(2);
        let counter = SampleCounter::with_config(CounterConfig::new().with_value_field(1));
        let events: Vec<Vec<f64>> = vec![vec![100.0, 1.0], vec![200.0, 3.0]];

        let state = counter.fold_events(&counter.new_state(), &events, &mut rng).unwrap();

        let projection = counter.project_state(&state).unwrap();
        assert_eq!(projection.total, 4.0);
        assert_eq!(projection.average, 2.0);
    }

    #[test]
    fn test_missing_field() {
        let mut rng = StdRng::seed_from_u64(3);
        let events: Vec<Vec<f64>> = vec![vec![1.0], vec![], vec![2.0]];

        let err = fold_events(&new_state(), &events, &mut rng).unwrap_err();
        assert_eq!(
            err,
            CounterError::MalformedEvent {
                index: 1,
                reason: MalformedReason::MissingField { field: 0 },
            }
        );
    }

    #[test]
    fn test_sparse_record_missing_value() {
        let mut rng = StdRng::seed_from_u64(3);
        let events: Vec<Vec<Option<f64>>> = vec![vec![Some(1.0)], vec![None]];

        let err = fold_events(&new_state(), &events, &mut rng).unwrap_err();
        assert!(matches!(err, CounterError::MalformedEvent { index: 1, .. }));
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut rng = StdRng::seed_from_u64(4);

        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = fold_events(&new_state(), &[1.0, bad], &mut rng).unwrap_err();
            assert_eq!(
                err,
                CounterError::MalformedEvent {
                    index: 1,
                    reason: MalformedReason::NonFinite,
                }
            );
        }
    }

    #[test]
    fn test_failed_fold_leaves_state_untouched() {
        let mut rng = StdRng::seed_from_u64(5);
        let counter = SampleCounter::new();
        let mut state = CounterState::new();
        counter.fold_into(&mut state, &[1.0, 2.0], &mut rng).unwrap();
        let before = state.clone();

        let result = counter.fold_into(&mut state, &[3.0, f64::NAN], &mut rng);

        assert!(result.is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn test_wrong_length_buffer() {
        let mut rng = StdRng::seed_from_u64(6);

        let err = fold_events(&[0u8; 8], &[1.0], &mut rng).unwrap_err();
        assert_eq!(
            err,
            CounterError::LengthMismatch {
                expected: STATE_SIZE,
                found: 8
            }
        );
        assert!(project_state(&[0u8; 808]).is_err());
    }

    #[test]
    fn test_fill_phase_is_exact() {
        let mut rng = StdRng::seed_from_u64(7);
        let values: Vec<f64> = (0..SAMPLE_CAPACITY).map(|i| (i * 3 % 17) as f64).collect();

        let state = fold_events(&new_state(), &values, &mut rng).unwrap();

        let decoded = decode(&state).unwrap();
        assert_eq!(decoded.sample(), values.as_slice());
    }

    #[test]
    fn test_name() {
        assert_eq!(SampleCounter::new().name(), "reservoir");
    }
}

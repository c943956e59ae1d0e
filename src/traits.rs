//! Core traits and errors for counter types
//!
//! A host aggregation service stores one opaque state buffer per key and
//! drives it through the [`CounterType`] trait. Events reach a counter as
//! [`Observation`] records, from which a single numeric field is read.

use rand::Rng;
use thiserror::Error;

use crate::quantiles::Projection;

/// Why an event could not be folded into a counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// The record has no value at the configured field index
    MissingField {
        /// Field index the counter is configured to read
        field: usize,
    },
    /// The value is NaN or infinite
    NonFinite,
}

impl core::fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MalformedReason::MissingField { field } => write!(f, "missing field {}", field),
            MalformedReason::NonFinite => write!(f, "value is not finite"),
        }
    }
}

/// Error returned by counter operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CounterError {
    /// State buffer length differs from the fixed layout size
    #[error("state length mismatch: expected {expected} bytes, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    /// An event in the batch has no usable numeric value
    #[error("malformed event at position {index}: {reason}")]
    MalformedEvent {
        /// Position of the offending event within the batch
        index: usize,
        reason: MalformedReason,
    },

    /// The observation count no longer fits the 4-byte count field
    #[error("observation count overflow: state already holds {count} observations")]
    CountOverflow { count: u64 },

    /// Buffer has the right size but holds values no encoder produces
    #[error("corrupted state: {0}")]
    Corrupted(String),
}

/// A record carrying numeric fields addressable by position
///
/// The field layout belongs to the host's event format; a counter only
/// knows which index holds the value it aggregates.
pub trait Observation {
    /// Value at `index`, or `None` when the record has no such field
    fn field(&self, index: usize) -> Option<f64>;
}

impl Observation for f64 {
    fn field(&self, index: usize) -> Option<f64> {
        (index == 0).then_some(*self)
    }
}

impl Observation for [f64] {
    fn field(&self, index: usize) -> Option<f64> {
        self.get(index).copied()
    }
}

impl<const N: usize> Observation for [f64; N] {
    fn field(&self, index: usize) -> Option<f64> {
        self.get(index).copied()
    }
}

impl Observation for Vec<f64> {
    fn field(&self, index: usize) -> Option<f64> {
        self.as_slice().field(index)
    }
}

impl Observation for [Option<f64>] {
    fn field(&self, index: usize) -> Option<f64> {
        self.get(index).copied().flatten()
    }
}

impl Observation for Vec<Option<f64>> {
    fn field(&self, index: usize) -> Option<f64> {
        self.as_slice().field(index)
    }
}

impl<T: Observation + ?Sized> Observation for &T {
    fn field(&self, index: usize) -> Option<f64> {
        (**self).field(index)
    }
}

/// A pluggable counter type
///
/// Implementations own no state between calls: every operation takes a
/// state buffer in and, when it changes anything, hands a new buffer back.
/// The host is responsible for serializing folds per key.
pub trait CounterType {
    /// Short identifier the host can register this counter type under
    fn name(&self) -> &'static str;

    /// Fresh, empty state buffer
    fn new_state(&self) -> Vec<u8>;

    /// Fold an ordered batch of events into `state`
    ///
    /// Either the whole batch is applied and a new buffer is returned, or
    /// an error is returned and `state` remains the latest valid state.
    fn fold_events<E, R>(
        &self,
        state: &[u8],
        events: &[E],
        rng: &mut R,
    ) -> Result<Vec<u8>, CounterError>
    where
        E: Observation,
        R: Rng + ?Sized;

    /// Summarize `state` without modifying it
    fn project_state(&self, state: &[u8]) -> Result<Projection, CounterError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_fields() {
        assert_eq!(3.5f64.field(0), Some(3.5));
        assert_eq!(3.5f64.field(1), None);

        let record: Vec<f64> = vec![1.0, 2.0];
        assert_eq!(record.field(1), Some(2.0));
        assert_eq!(record.field(2), None);

        let sparse: Vec<Option<f64>> = vec![None, Some(7.0)];
        assert_eq!(sparse.field(0), None);
        assert_eq!(sparse.field(1), Some(7.0));

        assert_eq!([4.0f64, 5.0, 6.0].field(2), Some(6.0));
    }

    #[test]
    fn test_error_display() {
        let err = CounterError::LengthMismatch { expected: 1612, found: 3 };
        assert_eq!(err.to_string(), "state length mismatch: expected 1612 bytes, found 3");

        let err = CounterError::MalformedEvent {
            index: 4,
            reason: MalformedReason::MissingField { field: 2 },
        };
        assert_eq!(err.to_string(), "malformed event at position 4: missing field 2");
    }
}

//! Counter configuration

/// Settings for a [`SampleCounter`](crate::SampleCounter)
///
/// The field index is part of the contract with the host's event format
/// and must stay the same for every fold into a given state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CounterConfig {
    /// Index of the numeric field read from each event
    pub value_field: usize,
}

impl CounterConfig {
    /// Configuration reading field 0 of every event
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the observed value from `index` instead
    pub fn with_value_field(mut self, index: usize) -> Self {
        self.value_field = index;
        self
    }
}

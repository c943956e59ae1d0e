//! Quantile estimation
//!
//! Percentiles are derived from the counter's reservoir sample: the
//! occupied slots are copied, sorted, and read at fixed cut-points.
//!
//! # Example
//!
//! ```
//! use flowcounter::quantiles::{project, PERCENTILES};
//! use flowcounter::state::CounterState;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(3);
//! let mut state = CounterState::new();
//! for value in 1..=100 {
//!     state.record(value as f64, &mut rng).unwrap();
//! }
//!
//! let projection = project(&state);
//! assert_eq!(projection.percentiles.len(), PERCENTILES.len());
//! assert_eq!(projection.median(), 51.0);
//! ```

mod percentile;

pub use percentile::{percentile_index, project, Projection, PERCENTILES};

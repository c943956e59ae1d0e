//! # Flowcounter
//!
//! Streaming statistics counter with a fixed-size binary state.
//!
//! A counter folds batches of numeric observations into a compact state
//! buffer and projects that buffer, on demand, into count, total, average
//! and approximate percentiles. The buffer never grows: count and total are
//! kept exactly, while percentiles come from a 200-slot uniform reservoir
//! sample of everything seen so far.
//!
//! The crate is meant to be plugged into a metrics aggregation service that
//! stores one opaque buffer per key. The service owns storage, scheduling
//! and the event format; this crate only needs to read one numeric field
//! from each event.
//!
//! ## Features
//!
//! - **Fixed layout**: 1612-byte little-endian packed state, see [`state`]
//! - **Reservoir sampling**: Algorithm R with an injected random source
//! - **Percentiles**: p25, p50, p75, p90, p95 and p99 from the sorted sample
//! - **Strict inputs**: wrong-size buffers and malformed events are errors
//!
//! ## Quick Start
//!
//! ```rust
//! use flowcounter::prelude::*;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//!
//! let state = new_state();
//! let state = fold_events(&state, &[12.0, 40.0, 7.5], &mut rng).unwrap();
//!
//! let projection = project_state(&state).unwrap();
//! assert_eq!(projection.count, 3);
//! println!("{}", projection);
//! ```
//!
//! ## Events
//!
//! Anything implementing [`Observation`](traits::Observation) can be folded.
//! The value is read from a configurable field index:
//!
//! ```rust
//! use flowcounter::{CounterConfig, CounterType, SampleCounter};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let counter = SampleCounter::with_config(CounterConfig::new().with_value_field(2));
//! let mut rng = StdRng::seed_from_u64(1);
//!
//! // (timestamp, status, latency_ms)
//! let events = [[1.7e9, 200.0, 31.0], [1.7e9, 500.0, 120.0]];
//! let state = counter.fold_events(&counter.new_state(), &events, &mut rng).unwrap();
//!
//! assert_eq!(counter.project_state(&state).unwrap().total, 151.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for [`Projection`] and [`CounterConfig`]

pub mod config;
pub mod counter;
pub mod quantiles;
pub mod sampling;
pub mod state;
pub mod traits;

pub mod prelude {
    pub use crate::traits::*;

    pub use crate::config::CounterConfig;
    pub use crate::counter::{fold_events, new_state, project_state, SampleCounter};
    pub use crate::quantiles::{Projection, PERCENTILES};
}

pub use config::CounterConfig;
pub use counter::{fold_events, new_state, project_state, SampleCounter};
pub use quantiles::{Projection, PERCENTILES};
pub use traits::{CounterError, CounterType, MalformedReason, Observation};

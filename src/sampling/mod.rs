//! Stream sampling algorithms
//!
//! This module provides the reservoir step used by counters to keep a
//! fixed-size uniform random sample of an unbounded stream. The reservoir
//! lives in caller-owned slots, so the same step works on a decoded state
//! buffer and on any scratch array.
//!
//! # Example
//!
//! ```
//! use flowcounter::sampling::offer;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! let mut slots = [0.0; 10];
//!
//! // Stream a million values, keep a uniform sample of 10
//! for seen in 0..1_000_000u64 {
//!     offer(&mut slots, seen, seen as f64, &mut rng);
//! }
//!
//! assert!(slots.iter().all(|&v| v < 1_000_000.0));
//! ```

mod reservoir;

pub use reservoir::{offer, Placement};

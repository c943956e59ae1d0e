//! Counter state and its binary layout
//!
//! A counter's whole history is summarized by a [`CounterState`]: the exact
//! observation count, the exact running total, and a fixed-capacity
//! reservoir sample. Hosts never see the struct, only the packed buffer
//! produced by [`encode`] and read back by [`decode`].
//!
//! # Layout
//!
//! All fields are little-endian and packed without padding:
//!
//! | offset | width | field    | encoding                      |
//! |-------:|------:|----------|-------------------------------|
//! | 0      | 4     | `count`  | `i32`, never negative         |
//! | 4      | 8     | `total`  | `f64`                         |
//! | 12     | 1600  | `sample` | 200 consecutive `f64` values  |
//!
//! The format carries no version tag. Changing any width, the capacity, or
//! the byte order makes existing buffers unreadable, so such a change needs
//! a migration of every stored state by the host.
//!
//! # Example
//!
//! ```
//! use flowcounter::state::{decode, encode, CounterState, STATE_SIZE};
//!
//! let bytes = encode(&CounterState::new());
//! assert_eq!(bytes.len(), STATE_SIZE);
//!
//! let state = decode(&bytes).unwrap();
//! assert!(state.is_empty());
//! assert!(decode(&bytes[1..]).is_err());
//! ```

mod codec;
mod counter_state;

pub use codec::{
    decode, encode, encode_into, COUNT_WIDTH, SAMPLE_WIDTH, STATE_SIZE, TOTAL_WIDTH,
};
pub use counter_state::{CounterState, MAX_COUNT, SAMPLE_CAPACITY};

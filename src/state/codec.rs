//! Packed little-endian encoding of [`CounterState`]

use super::counter_state::{CounterState, SAMPLE_CAPACITY};
use crate::traits::CounterError;

/// Width of the `count` field (`i32`)
pub const COUNT_WIDTH: usize = 4;
/// Width of the `total` field (`f64`)
pub const TOTAL_WIDTH: usize = 8;
/// Width of one sample slot (`f64`)
pub const SAMPLE_WIDTH: usize = 8;

/// Exact size of an encoded state buffer
pub const STATE_SIZE: usize = COUNT_WIDTH + TOTAL_WIDTH + SAMPLE_CAPACITY * SAMPLE_WIDTH;

const TOTAL_OFFSET: usize = COUNT_WIDTH;
const SAMPLE_OFFSET: usize = TOTAL_OFFSET + TOTAL_WIDTH;

/// Encode `state` into a fresh buffer of [`STATE_SIZE`] bytes
pub fn encode(state: &CounterState) -> Vec<u8> {
    let mut buf = vec![0u8; STATE_SIZE];
    write_fields(state, &mut buf);
    buf
}

/// Encode `state` into a caller-provided buffer
///
/// Fails with [`CounterError::LengthMismatch`] unless `buf` is exactly
/// [`STATE_SIZE`] bytes long; nothing is written in that case.
pub fn encode_into(state: &CounterState, buf: &mut [u8]) -> Result<(), CounterError> {
    check_len(buf.len())?;
    write_fields(state, buf);
    Ok(())
}

/// Decode a state buffer into an owned [`CounterState`]
///
/// The buffer must be exactly [`STATE_SIZE`] bytes and hold a
/// non-negative count.
pub fn decode(bytes: &[u8]) -> Result<CounterState, CounterError> {
    check_len(bytes.len())?;

    let count = i32::from_le_bytes(read_array(bytes, 0));
    let count = u64::try_from(count)
        .map_err(|_| CounterError::Corrupted(format!("negative count {}", count)))?;
    let total = f64::from_le_bytes(read_array(bytes, TOTAL_OFFSET));

    let mut sample = [0.0; SAMPLE_CAPACITY];
    let slots = bytes[SAMPLE_OFFSET..].chunks_exact(SAMPLE_WIDTH);
    for (slot, chunk) in sample.iter_mut().zip(slots) {
        *slot = f64::from_le_bytes(read_array(chunk, 0));
    }

    Ok(CounterState {
        count,
        total,
        sample,
    })
}

fn check_len(found: usize) -> Result<(), CounterError> {
    if found != STATE_SIZE {
        return Err(CounterError::LengthMismatch {
            expected: STATE_SIZE,
            found,
        });
    }
    Ok(())
}

/// Copy `W` bytes starting at `offset`; callers pass in-bounds ranges only
fn read_array<const W: usize>(bytes: &[u8], offset: usize) -> [u8; W] {
    let mut out = [0u8; W];
    out.copy_from_slice(&bytes[offset..offset + W]);
    out
}

/// `buf` must already be [`STATE_SIZE`] bytes long
fn write_fields(state: &CounterState, buf: &mut [u8]) {
    // record() keeps count within MAX_COUNT
    let count = i32::try_from(state.count).unwrap_or(i32::MAX);

    let (count_bytes, rest) = buf.split_at_mut(COUNT_WIDTH);
    count_bytes.copy_from_slice(&count.to_le_bytes());

    let (total_bytes, sample_bytes) = rest.split_at_mut(TOTAL_WIDTH);
    total_bytes.copy_from_slice(&state.total.to_le_bytes());

    for (chunk, value) in sample_bytes.chunks_exact_mut(SAMPLE_WIDTH).zip(&state.sample) {
        chunk.copy_from_slice(&value.to_le_bytes());
    }
}

//! Reservoir sampling for uniform random sampling from streams
//!
//! Reservoir sampling maintains a fixed-size uniform random sample from
//! a stream of unknown length. Each item in the stream has equal probability
//! of being in the sample, whatever the arrival order.

use rand::Rng;
use tracing::trace;

/// Outcome of offering one value to a reservoir
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Reservoir was not full yet; value stored in the next free slot
    Filled(usize),
    /// Value accepted and written over the slot at this index
    Replaced(usize),
    /// Value not kept; the reservoir is unchanged
    Rejected,
}

impl Placement {
    /// Check if the value ended up in the reservoir
    pub fn is_stored(&self) -> bool {
        !matches!(self, Placement::Rejected)
    }
}

/// Offer `value` to the reservoir held in `slots` (Algorithm R)
///
/// `seen` is the number of values offered before this one, so the first
/// value ever offered has `seen == 0`. The reservoir capacity is
/// `slots.len()`.
///
/// # Algorithm
///
/// Algorithm R (Vitter, 1985):
/// 1. While `seen < k`, store the value at slot `seen`
/// 2. Otherwise accept it with probability `k / (seen + 1)` and, if
///    accepted, overwrite a slot chosen uniformly in `[0, k)`
///
/// After `n` offers every one of them is in the reservoir with probability
/// `min(1, k / n)`.
///
/// # Example
///
/// ```
/// use flowcounter::sampling::{offer, Placement};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let mut slots = [0.0; 4];
///
/// for seen in 0..4u64 {
///     let placement = offer(&mut slots, seen, seen as f64, &mut rng);
///     assert_eq!(placement, Placement::Filled(seen as usize));
/// }
/// assert_eq!(slots, [0.0, 1.0, 2.0, 3.0]);
///
/// // From here on values only get in by replacement
/// let placement = offer(&mut slots, 4, 10.0, &mut rng);
/// assert!(!matches!(placement, Placement::Filled(_)));
/// ```
pub fn offer<R: Rng + ?Sized>(
    slots: &mut [f64],
    seen: u64,
    value: f64,
    rng: &mut R,
) -> Placement {
    let capacity = slots.len();
    if capacity == 0 {
        return Placement::Rejected;
    }

    if seen < capacity as u64 {
        let index = seen as usize;
        return match slots.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Placement::Filled(index)
            }
            None => Placement::Rejected,
        };
    }

    let accept = capacity as f64 / (seen as f64 + 1.0);
    if rng.gen::<f64>() >= accept {
        return Placement::Rejected;
    }

    let index = rng.gen_range(0..capacity);
    match slots.get_mut(index) {
        Some(slot) => {
            trace!(index, seen, "reservoir slot replaced");
            *slot = value;
            Placement::Replaced(index)
        }
        None => Placement::Rejected,
    }
}

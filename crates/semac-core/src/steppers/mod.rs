pub mod exact;
pub mod lut;

use crate::state::StateId;
use crate::table::TransitionTable;

pub use exact::ExactStepper;
pub use lut::{LutStepper, LutTable, MAX_DURATION_TYPES};

/// One synchronous transition of a contiguous slice of paths.
///
/// All four counter slices and the uniform slice must have equal length.
/// Paths are mutually independent within a step, so callers may hand
/// disjoint chunks of the batch to parallel workers.
pub trait Stepper: Send + Sync {
    fn step_chunk(
        &self,
        table: &TransitionTable,
        states: &mut [StateId],
        age: &mut [u32],
        dur_in_state: &mut [u32],
        dur_since_b: &mut [u32],
        uniforms: &[f64],
    );
}

/// Duration-counter update shared by all steppers. `s` is the pre-update
/// state, `to` the chosen successor; the order of the four rules is fixed:
/// age, time-in-state, visit increment, visit reset.
#[inline]
pub(crate) fn update_counters(
    b_id: Option<StateId>,
    s: StateId,
    to: StateId,
    age: &mut u32,
    dur_in_state: &mut u32,
    dur_since_b: &mut u32,
) {
    *age += 1;
    if to == s {
        *dur_in_state += 1;
    } else {
        *dur_in_state = 0;
    }
    // Without a "B" state the visit counter is inert.
    if let Some(b) = b_id {
        if s == b || *dur_since_b > 0 {
            *dur_since_b += 1;
        }
        if to == b && s != b {
            *dur_since_b = 0;
        }
    }
}

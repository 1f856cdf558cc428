use super::{update_counters, Stepper};
use crate::state::{DurationType, StateId};
use crate::table::TransitionTable;

/// Cumulative search over a state's outgoing records at the current
/// duration. Records are tested in loader order (the tie-break contract);
/// residual probability leaves the path in place.
#[derive(Clone, Copy, Debug)]
pub struct ExactStepper;

impl Stepper for ExactStepper {
    fn step_chunk(
        &self,
        table: &TransitionTable,
        states: &mut [StateId],
        age: &mut [u32],
        dur_in_state: &mut [u32],
        dur_since_b: &mut [u32],
        uniforms: &[f64],
    ) {
        debug_assert_eq!(states.len(), uniforms.len());
        let b_id = table.b_id();
        for i in 0..states.len() {
            let s = states[i];
            let recs = table.outgoing(s);
            let to = if recs.is_empty() {
                // Absorbing: counters still advance, with to = s.
                s
            } else {
                let d = match recs[0].dtype {
                    DurationType::Age => age[i],
                    DurationType::State => dur_in_state[i],
                    DurationType::Visit => dur_since_b[i],
                };
                let u = uniforms[i];
                let mut cum = 0.0;
                let mut chosen = s;
                for rec in recs {
                    cum += table.prob(rec, d);
                    if u <= cum {
                        chosen = rec.to;
                        break;
                    }
                }
                chosen
            };
            update_counters(
                b_id,
                s,
                to,
                &mut age[i],
                &mut dur_in_state[i],
                &mut dur_since_b[i],
            );
            states[i] = to;
        }
    }
}

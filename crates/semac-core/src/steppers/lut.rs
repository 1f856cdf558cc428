use super::{update_counters, Stepper};
use crate::state::StateId;
use crate::table::TransitionTable;

/// Fixed stride of the arrow table's duration-type axis.
pub const MAX_DURATION_TYPES: usize = 4;

/// Bucketed inverse-CDF arrow table built from the duration-0 slice of a
/// transition table.
///
/// The build collapses the duration dependence entirely: probabilities are
/// read at duration index 0, normalized, and turned into one successor per
/// uniform bucket. For tables whose probabilities vary with duration, LUT
/// stepping is therefore a different process from exact stepping, not an
/// approximation of it; callers choose between the two explicitly.
#[derive(Clone, Debug)]
pub struct LutTable {
    buckets: usize,
    // Indexed (s * MAX_DURATION_TYPES + dt) * buckets + bucket.
    arrows: Vec<StateId>,
    state_dt: Vec<u8>,
}

impl LutTable {
    pub fn build(table: &TransitionTable, buckets: usize) -> Self {
        assert!(buckets > 0, "LUT needs at least one bucket");
        let n_states = table.n_states();
        let mut arrows = vec![0 as StateId; n_states * MAX_DURATION_TYPES * buckets];
        let mut state_dt = vec![0u8; n_states];

        for s in 0..n_states as StateId {
            let recs = table.outgoing(s);
            let dt = table.dtype_of(s).map(|d| d.as_index()).unwrap_or(0);
            state_dt[s as usize] = dt as u8;
            let base = (s as usize * MAX_DURATION_TYPES + dt) * buckets;

            if recs.is_empty() {
                // Absorbing states arrow to themselves.
                for b in 0..buckets {
                    arrows[base + b] = s;
                }
                continue;
            }

            let probs: Vec<f64> = recs.iter().map(|r| table.prob(r, 0)).collect();
            let total: f64 = probs.iter().sum();
            let mut cdf = Vec::with_capacity(probs.len());
            let mut acc = 0.0;
            for p in &probs {
                acc += if total > 0.0 { p / total } else { *p };
                cdf.push(acc);
            }

            for b in 0..buckets {
                let ru = (b as f64 + 1.0) / buckets as f64;
                let k = cdf
                    .iter()
                    .position(|&c| ru <= c)
                    .unwrap_or(cdf.len() - 1);
                arrows[base + b] = recs[k].to;
            }
        }

        Self {
            buckets,
            arrows,
            state_dt,
        }
    }

    pub fn buckets(&self) -> usize {
        self.buckets
    }

    /// Successor for state `s` and uniform bucket `bucket`.
    #[inline]
    pub fn arrow(&self, s: StateId, bucket: usize) -> StateId {
        let dt = self.state_dt[s as usize] as usize;
        self.arrows[(s as usize * MAX_DURATION_TYPES + dt) * self.buckets + bucket]
    }

    /// Bucket index for a uniform draw, clamped into range.
    #[inline]
    pub fn bucket_of(&self, u: f64) -> usize {
        ((u * self.buckets as f64) as usize).min(self.buckets - 1)
    }
}

/// Steps a batch by a single arrow-table read per path. Counter updates
/// are identical to the exact stepper's.
pub struct LutStepper<'a> {
    lut: &'a LutTable,
}

impl<'a> LutStepper<'a> {
    pub fn new(lut: &'a LutTable) -> Self {
        Self { lut }
    }
}

impl Stepper for LutStepper<'_> {
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
            let to = self.lut.arrow(s, self.lut.bucket_of(uniforms[i]));
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

use std::collections::HashMap;

use crate::state::{DurationType, StateId};

/// One `from -> to` transition column. Probabilities live in the table's
/// packed buffer; `offset`/`length` delimit this record's slice.
#[derive(Clone, Copy, Debug)]
pub struct TransitionRecord {
    pub from: StateId,
    pub to: StateId,
    pub dtype: DurationType,
    pub offset: u32,
    pub length: u32,
}

/// Immutable post-load store of a semi-Markov transition model.
///
/// Records are sorted stably by `from`, preserving input column order
/// within a state; `state_begin`/`state_end` give each state's half-open
/// outgoing range. A state with an empty range is absorbing.
#[derive(Clone, Debug)]
pub struct TransitionTable {
    pub(crate) names: Vec<String>,
    pub(crate) index: HashMap<String, StateId>,
    pub(crate) records: Vec<TransitionRecord>,
    pub(crate) all_probs: Vec<f64>,
    pub(crate) state_begin: Vec<u32>,
    pub(crate) state_end: Vec<u32>,
    pub(crate) b_id: Option<StateId>,
}

impl TransitionTable {
    pub fn n_states(&self) -> usize {
        self.names.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[inline]
    pub fn name(&self, s: StateId) -> &str {
        &self.names[s as usize]
    }

    /// Name lookup; load-time and test use only, steppers work on ids.
    pub fn id_of(&self, name: &str) -> Option<StateId> {
        self.index.get(name).copied()
    }

    /// Id of the state literally named `"B"`, if present. Without it the
    /// visit counter is inert.
    pub fn b_id(&self) -> Option<StateId> {
        self.b_id
    }

    pub fn records(&self) -> &[TransitionRecord] {
        &self.records
    }

    #[inline]
    pub fn outgoing(&self, s: StateId) -> &[TransitionRecord] {
        let b = self.state_begin[s as usize] as usize;
        let e = self.state_end[s as usize] as usize;
        &self.records[b..e]
    }

    pub fn is_absorbing(&self, s: StateId) -> bool {
        self.outgoing(s).is_empty()
    }

    /// Shared duration type of a state's outgoing records; `None` for
    /// absorbing states.
    pub fn dtype_of(&self, s: StateId) -> Option<DurationType> {
        self.outgoing(s).first().map(|r| r.dtype)
    }

    /// Probability of `rec` firing at duration `d`; zero past the record's
    /// tabulated length.
    #[inline]
    pub fn prob(&self, rec: &TransitionRecord, d: u32) -> f64 {
        if d < rec.length {
            self.all_probs[(rec.offset + d) as usize]
        } else {
            0.0
        }
    }
}

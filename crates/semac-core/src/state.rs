use serde::{Deserialize, Serialize};

/// Dense state identifier, assigned at load time in order of first
/// appearance across the `from`/`to` header rows.
pub type StateId = u32;

/// Which duration counter drives probability lookup for a state's
/// outgoing transitions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationType {
    /// Steps since the start of the path; never reset.
    Age,
    /// Steps since the path last changed state.
    State,
    /// Steps since the path first entered the distinguished `"B"` state.
    Visit,
}

impl DurationType {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "age" => Some(DurationType::Age),
            "state" => Some(DurationType::State),
            "visit" => Some(DurationType::Visit),
            _ => None,
        }
    }

    #[inline]
    pub fn as_index(self) -> usize {
        match self {
            DurationType::Age => 0,
            DurationType::State => 1,
            DurationType::Visit => 2,
        }
    }
}

/// Per-path simulation state for a batch of `M` independent paths, stored
/// as parallel vectors so steppers and workers can operate on contiguous
/// slices.
#[derive(Clone, Debug, Default)]
pub struct BatchState {
    pub states: Vec<StateId>,
    pub age: Vec<u32>,
    pub dur_in_state: Vec<u32>,
    pub dur_since_b: Vec<u32>,
}

impl BatchState {
    /// Fill all `m` paths with identical origin values.
    pub fn initialized(
        m: usize,
        state: StateId,
        age: u32,
        dur_in_state: u32,
        dur_since_b: u32,
    ) -> Self {
        Self {
            states: vec![state; m],
            age: vec![age; m],
            dur_in_state: vec![dur_in_state; m],
            dur_since_b: vec![dur_since_b; m],
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

use std::path::Path;

use crate::error::CoreError;
use crate::state::{BatchState, StateId};
use crate::steppers::{ExactStepper, LutStepper, LutTable, Stepper};
use crate::table::TransitionTable;

/// Origin values every path of a batch is (re-)initialized to.
#[derive(Clone, Copy, Debug)]
pub struct Origin {
    pub state: StateId,
    pub age: u32,
    pub dur_in_state: u32,
    pub dur_since_b: u32,
}

/// Facade tying a loaded transition table to its batch state and optional
/// lookup-table accelerator. The table and LUT are immutable after
/// construction; only the batch mutates during a run.
pub struct Model {
    table: TransitionTable,
    lut: Option<LutTable>,
    batch: BatchState,
    origin: Option<Origin>,
}

impl Model {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        Ok(Self::from_table(TransitionTable::load(path)?))
    }

    pub fn from_table(table: TransitionTable) -> Self {
        Self {
            table,
            lut: None,
            batch: BatchState::default(),
            origin: None,
        }
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    pub fn lut(&self) -> Option<&LutTable> {
        self.lut.as_ref()
    }

    pub fn batch(&self) -> &BatchState {
        &self.batch
    }

    pub fn origin(&self) -> Option<Origin> {
        self.origin
    }

    /// Set all `m` paths to the given origin. Fails with `UnknownState`
    /// when `init_state` does not occur in the table.
    pub fn initialize_batch(
        &mut self,
        m: usize,
        init_state: &str,
        age0: u32,
        dur_state0: u32,
        dur_since_b0: u32,
    ) -> Result<(), CoreError> {
        let state = self
            .table
            .id_of(init_state)
            .ok_or_else(|| CoreError::UnknownState {
                name: init_state.to_string(),
            })?;
        let origin = Origin {
            state,
            age: age0,
            dur_in_state: dur_state0,
            dur_since_b: dur_since_b0,
        };
        self.origin = Some(origin);
        self.batch = BatchState::initialized(m, state, age0, dur_state0, dur_since_b0);
        Ok(())
    }

    /// Refill the batch from the stored origin, resizing it to `m` paths.
    pub fn reset_batch(&mut self, m: usize) -> Result<(), CoreError> {
        let o = self.origin.ok_or(CoreError::BatchNotInitialized)?;
        self.batch = BatchState::initialized(m, o.state, o.age, o.dur_in_state, o.dur_since_b);
        Ok(())
    }

    /// Advance every path one step with the exact cumulative-search
    /// stepper. `uniforms` must hold one draw per path.
    pub fn step_batch(&mut self, uniforms: &[f64]) {
        assert_eq!(uniforms.len(), self.batch.len());
        ExactStepper.step_chunk(
            &self.table,
            &mut self.batch.states,
            &mut self.batch.age,
            &mut self.batch.dur_in_state,
            &mut self.batch.dur_since_b,
            uniforms,
        );
    }

    /// Precompute the bucketed arrow table used by `step_batch_lut`.
    pub fn build_lut(&mut self, buckets: usize) {
        self.lut = Some(LutTable::build(&self.table, buckets));
    }

    /// Advance every path one step through the arrow table. Errors if the
    /// LUT was never built; exact stepping is never substituted silently.
    pub fn step_batch_lut(&mut self, uniforms: &[f64]) -> Result<(), CoreError> {
        assert_eq!(uniforms.len(), self.batch.len());
        let lut = self.lut.as_ref().ok_or(CoreError::LutNotBuilt)?;
        LutStepper::new(lut).step_chunk(
            &self.table,
            &mut self.batch.states,
            &mut self.batch.age,
            &mut self.batch.dur_in_state,
            &mut self.batch.dur_since_b,
            uniforms,
        );
        Ok(())
    }

    /// Split borrows for callers that drive stepping themselves while the
    /// table (and LUT) stay shared.
    pub fn parts_mut(&mut self) -> (&TransitionTable, Option<&LutTable>, &mut BatchState) {
        (&self.table, self.lut.as_ref(), &mut self.batch)
    }
}

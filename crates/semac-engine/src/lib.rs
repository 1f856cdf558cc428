use std::collections::BTreeMap;

use nalgebra::DMatrix;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use semac_core::{
    BatchState, CoreError, ExactStepper, LutStepper, Model, Payoff, Stepper, TransitionTable,
    UniformSource,
};

/// Paths per worker chunk. Each worker consumes a contiguous slice of the
/// step's uniform row and owns a contiguous slice of every batch vector.
const CHUNK: usize = 4096;

/// Stepping algorithm selector. The lookup table collapses duration
/// dependence to the duration-0 slice, so the two kinds simulate different
/// processes on duration-varying tables; callers pick one explicitly.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepperKind {
    Exact,
    Lut,
}

/// One Monte Carlo projection request: horizon, payoff moment and
/// stepping algorithm. The origin is injected through
/// `Model::initialize_batch` beforehand.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSpec {
    pub moment: i32,
    pub steps: usize,
    pub stepper: StepperKind,
}

impl RunSpec {
    pub fn new(moment: i32, steps: usize) -> Self {
        Self {
            moment,
            steps,
            stepper: StepperKind::Exact,
        }
    }

    pub fn with_stepper(mut self, stepper: StepperKind) -> Self {
        self.stepper = stepper;
        self
    }
}

/// Per-state expected cashflow sequences of length `steps + 1`, plus the
/// reserved `"Total"` aggregate. Every state of the table gets a column;
/// never-visited states are all zero.
#[derive(Clone, Debug)]
pub struct Cashflows {
    columns: BTreeMap<String, Vec<f64>>,
    steps: usize,
}

impl Cashflows {
    pub const TOTAL_KEY: &'static str = "Total";

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn total(&self) -> &[f64] {
        &self.columns[Self::TOTAL_KEY]
    }

    /// State names in ascending lexicographic order, aggregate excluded.
    pub fn state_names(&self) -> impl Iterator<Item = &str> {
        self.columns
            .keys()
            .map(String::as_str)
            .filter(|&k| k != Self::TOTAL_KEY)
    }

    pub fn as_map(&self) -> &BTreeMap<String, Vec<f64>> {
        &self.columns
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<f64>> {
        self.columns
    }
}

/// Monte Carlo cashflow engine. Borrows the model for the lifetime of the
/// projection; the payoff must be pure, as chunks of the batch are
/// evaluated on parallel workers.
pub struct Engine<'m, P: Payoff> {
    model: &'m mut Model,
    payoff: P,
    simulations: usize,
}

impl<'m, P: Payoff> Engine<'m, P> {
    pub fn new(model: &'m mut Model, payoff: P, simulations: usize) -> Self {
        Self {
            model,
            payoff,
            simulations,
        }
    }

    /// Run the projection and return the averaged cashflow matrix.
    ///
    /// A `seed` makes the run reproducible; `None` draws the seed from OS
    /// entropy. The payoff is accumulated raw at `t = 0` and raised to
    /// `moment` from `t = 1` on; the asymmetry is deliberate and pinned
    /// by the scenario tests.
    pub fn get_cashflow(&mut self, spec: &RunSpec, seed: Option<u64>) -> Result<Cashflows, CoreError> {
        let steps = spec.steps;
        let m = self.simulations;
        self.model.reset_batch(m)?;

        let mut source = match seed {
            Some(s) => UniformSource::seeded(s),
            None => UniformSource::from_entropy(),
        };
        let uniforms = source.matrix(steps, m);

        if spec.stepper == StepperKind::Lut && self.model.lut().is_none() {
            return Err(CoreError::LutNotBuilt);
        }
        let (table, lut, batch) = self.model.parts_mut();
        let exact = ExactStepper;
        let lut_stepper;
        let stepper: &dyn Stepper = match spec.stepper {
            StepperKind::Exact => &exact,
            StepperKind::Lut => {
                lut_stepper = LutStepper::new(lut.expect("checked above"));
                &lut_stepper
            }
        };

        let n_states = table.n_states();
        let mut sums = DMatrix::<f64>::zeros(n_states, steps + 1);

        // t = 0 takes the raw payoff; the moment applies from t = 1 on.
        accumulate_into(&mut sums, 0, table, batch, &self.payoff, 1);
        for t in 1..=steps {
            step_parallel(stepper, table, batch, uniforms.row(t - 1));
            accumulate_into(&mut sums, t, table, batch, &self.payoff, spec.moment);
        }

        let m_f = m as f64;
        let mut columns = BTreeMap::new();
        for (sid, name) in table.names().iter().enumerate() {
            let series: Vec<f64> = (0..=steps).map(|t| sums[(sid, t)] / m_f).collect();
            columns.insert(name.clone(), series);
        }
        let total: Vec<f64> = (0..=steps).map(|t| sums.column(t).sum() / m_f).collect();
        columns.insert(Cashflows::TOTAL_KEY.to_string(), total);

        Ok(Cashflows { columns, steps })
    }
}

/// Advance the whole batch one step, fanning contiguous chunks out to
/// rayon workers. Chunk boundaries are identical for all five slices, so
/// each worker sees a consistent window of paths.
fn step_parallel(
    stepper: &dyn Stepper,
    table: &TransitionTable,
    batch: &mut BatchState,
    uniforms: &[f64],
) {
    batch
        .states
        .par_chunks_mut(CHUNK)
        .zip(batch.age.par_chunks_mut(CHUNK))
        .zip(batch.dur_in_state.par_chunks_mut(CHUNK))
        .zip(batch.dur_since_b.par_chunks_mut(CHUNK))
        .zip(uniforms.par_chunks(CHUNK))
        .for_each(|((((states, age), dur_in_state), dur_since_b), us)| {
            stepper.step_chunk(table, states, age, dur_in_state, dur_since_b, us);
        });
}

/// Accumulate the (possibly moment-raised) payoff of every path into
/// column `t` of the sums matrix. Workers produce per-chunk partial sums
/// that are merged in chunk order, keeping the result independent of
/// thread scheduling.
fn accumulate_into<P: Payoff>(
    sums: &mut DMatrix<f64>,
    t: usize,
    table: &TransitionTable,
    batch: &BatchState,
    payoff: &P,
    moment: i32,
) {
    let n_states = table.n_states();
    let partials: Vec<Vec<f64>> = batch
        .states
        .par_chunks(CHUNK)
        .zip(batch.dur_in_state.par_chunks(CHUNK))
        .map(|(states, durs)| {
            let mut partial = vec![0.0; n_states];
            for (&s, &d) in states.iter().zip(durs) {
                let v = payoff.evaluate(table.name(s), d);
                let v = if moment == 1 { v } else { v.powi(moment) };
                partial[s as usize] += v;
            }
            partial
        })
        .collect();

    let mut column = sums.column_mut(t);
    for partial in partials {
        for (s, v) in partial.into_iter().enumerate() {
            column[s] += v;
        }
    }
}

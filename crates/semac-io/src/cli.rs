use crate::emitter::write_cashflows;
use crate::manifest::RunManifest;
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use semac_core::{Model, Payoff};
use semac_engine::{Cashflows, Engine, RunSpec, StepperKind};
use semac_payoff::{ConstantPayoff, PowerPayoff, WaitingPeriodBenefit};
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "semac")]
#[command(about = "SEMAC - semi-Markov cashflow Monte Carlo")]
#[command(
    long_about = "Batched Monte Carlo projection of duration-dependent state processes \
                  with per-state expected cashflow output"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Project expected cashflows from a transition table
    Project {
        /// Transition table file (three `;`-separated header rows, then
        /// one probability row per duration index)
        #[arg(long)]
        transitions: PathBuf,

        /// State every path starts in
        #[arg(long)]
        initial_state: String,

        /// Origin age counter
        #[arg(long, default_value = "0")]
        age0: u32,

        /// Origin time-in-state counter
        #[arg(long, default_value = "0")]
        dur_state0: u32,

        /// Origin time-since-B counter
        #[arg(long, default_value = "0")]
        dur_since_b0: u32,

        /// Projection horizon in steps
        #[arg(long, default_value = "120")]
        steps: usize,

        /// Number of simulated paths
        #[arg(long, default_value = "10000")]
        paths: usize,

        /// Moment applied to payoffs from step 1 onward
        #[arg(long, default_value = "1")]
        moment: i32,

        /// Stepping algorithm
        #[arg(long, value_enum, default_value = "exact")]
        stepper: StepperType,

        /// Buckets for the inverse-CDF lookup table
        #[arg(long, default_value = "1024")]
        lut_buckets: usize,

        /// Fixed RNG seed; omit for OS entropy
        #[arg(long)]
        seed: Option<u64>,

        /// Payoff function
        #[arg(long, value_enum, default_value = "constant")]
        payoff: PayoffType,

        /// Payoff parameters (JSON)
        #[arg(long)]
        params: Option<String>,

        /// Output cashflow file
        #[arg(long)]
        out: PathBuf,

        /// Manifest path (default: <out>.manifest.json)
        #[arg(long)]
        manifest: Option<PathBuf>,
    },
}

#[derive(Clone, Debug, ValueEnum)]
pub enum StepperType {
    #[value(name = "exact")]
    Exact,
    #[value(name = "lut")]
    Lut,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum PayoffType {
    #[value(name = "constant")]
    Constant,
    #[value(name = "waiting-period")]
    WaitingPeriod,
    #[value(name = "power")]
    Power,
}

impl From<StepperType> for StepperKind {
    fn from(s: StepperType) -> Self {
        match s {
            StepperType::Exact => StepperKind::Exact,
            StepperType::Lut => StepperKind::Lut,
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn run_project_command(
    transitions: PathBuf,
    initial_state: String,
    age0: u32,
    dur_state0: u32,
    dur_since_b0: u32,
    steps: usize,
    paths: usize,
    moment: i32,
    stepper: StepperType,
    lut_buckets: usize,
    seed: Option<u64>,
    payoff: PayoffType,
    params: Option<String>,
    out: PathBuf,
    manifest: Option<PathBuf>,
) -> anyhow::Result<()> {
    println!("SEMAC Projection");
    println!("================");
    println!("Transitions: {:?}", transitions);
    println!("Initial state: {}", initial_state);
    println!("Steps: {}", steps);
    println!("Paths: {}", paths);
    println!("Moment: {}", moment);
    println!("Stepper: {:?}", stepper);
    match seed {
        Some(s) => println!("Seed: {}", s),
        None => println!("Seed: OS entropy"),
    }
    println!("Output: {:?}", out);

    let payoff_params: serde_json::Value = match &params {
        Some(text) => serde_json::from_str(text).context("parsing --params JSON")?,
        None => json!({}),
    };

    let transitions_str = transitions.display().to_string();
    let mut model = Model::load(&transitions)
        .with_context(|| format!("loading transition table {transitions_str}"))?;
    model.initialize_batch(paths, &initial_state, age0, dur_state0, dur_since_b0)?;

    let stepper_kind = StepperKind::from(stepper.clone());
    if stepper_kind == StepperKind::Lut {
        model.build_lut(lut_buckets);
    }
    let spec = RunSpec {
        moment,
        steps,
        stepper: stepper_kind,
    };

    let stepper_str = match stepper {
        StepperType::Exact => "exact",
        StepperType::Lut => "lut",
    };
    let payoff_str = match &payoff {
        PayoffType::Constant => "constant",
        PayoffType::WaitingPeriod => "waiting_period",
        PayoffType::Power => "power",
    };

    // Monomorphic dispatch per payoff kind.
    let cashflows = match payoff {
        PayoffType::Constant => {
            let amount = param_f64(&payoff_params, "amount").unwrap_or(100.0);
            run_projection(&mut model, ConstantPayoff::new(amount), paths, &spec, seed)?
        }
        PayoffType::WaitingPeriod => {
            let amount = param_f64(&payoff_params, "amount").unwrap_or(100.0);
            let waiting = param_u64(&payoff_params, "waiting_months").unwrap_or(0) as u32;
            run_projection(
                &mut model,
                WaitingPeriodBenefit::new(amount, waiting),
                paths,
                &spec,
                seed,
            )?
        }
        PayoffType::Power => {
            let base = param_f64(&payoff_params, "base").unwrap_or(100.0);
            let pmoment = param_u64(&payoff_params, "moment").unwrap_or(1) as i32;
            let dead = payoff_params
                .get("dead_state")
                .and_then(|v| v.as_str())
                .unwrap_or("D");
            run_projection(
                &mut model,
                PowerPayoff::new(base, pmoment).with_dead_state(dead),
                paths,
                &spec,
                seed,
            )?
        }
    };

    write_cashflows(&out, &cashflows)?;

    let manifest_path = manifest.unwrap_or_else(|| out.with_extension("manifest.json"));
    let record = RunManifest::new(
        seed,
        stepper_str,
        (stepper_kind == StepperKind::Lut).then_some(lut_buckets),
        moment,
        steps,
        paths,
        &transitions_str,
        model.table().n_states(),
        &initial_state,
        payoff_str,
        payoff_params,
    );
    record.save_to_file(manifest_path.to_str().context("manifest path is not UTF-8")?)?;

    println!();
    println!("Cashflow Summary:");
    println!("=================");
    println!("States: {}", model.table().n_states());
    let total = cashflows.total();
    println!("Total[0]: {:.6}", total.first().copied().unwrap_or(0.0));
    println!(
        "Total[{}]: {:.6}",
        cashflows.steps(),
        total.last().copied().unwrap_or(0.0)
    );
    println!("Wrote cashflows to {:?}", out);
    println!("Wrote manifest to {:?}", manifest_path);

    Ok(())
}

fn run_projection<P: Payoff>(
    model: &mut Model,
    payoff: P,
    paths: usize,
    spec: &RunSpec,
    seed: Option<u64>,
) -> anyhow::Result<Cashflows> {
    let mut engine = Engine::new(model, payoff, paths);
    Ok(engine.get_cashflow(spec, seed)?)
}

fn param_f64(params: &serde_json::Value, key: &str) -> Option<f64> {
    params.get(key).and_then(|v| v.as_f64())
}

fn param_u64(params: &serde_json::Value, key: &str) -> Option<u64> {
    params.get(key).and_then(|v| v.as_u64())
}

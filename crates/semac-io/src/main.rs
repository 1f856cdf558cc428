use clap::Parser;
use semac_io::cli::{run_project_command, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Project {
            transitions,
            initial_state,
            age0,
            dur_state0,
            dur_since_b0,
            steps,
            paths,
            moment,
            stepper,
            lut_buckets,
            seed,
            payoff,
            params,
            out,
            manifest,
        } => {
            run_project_command(
                transitions,
                initial_state,
                age0,
                dur_state0,
                dur_since_b0,
                steps,
                paths,
                moment,
                stepper,
                lut_buckets,
                seed,
                payoff,
                params,
                out,
                manifest,
            )?;
        }
    }

    Ok(())
}

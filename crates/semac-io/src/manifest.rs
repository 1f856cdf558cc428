use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reproducibility record written alongside every projection: everything
/// needed to re-run the projection and get the same numbers back.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: String,
    pub timestamp: String,
    pub seed: Option<u64>,
    pub stepper: String, // "exact" | "lut"
    pub lut_buckets: Option<usize>,
    pub moment: i32,
    pub steps: usize,
    pub simulations: usize,
    pub transition_file: String,
    pub n_states: usize,
    pub initial_state: String,
    pub payoff: String,
    pub payoff_params: serde_json::Value,
    pub commit_hash: Option<String>,
    pub rust_version: String,
}

impl RunManifest {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        seed: Option<u64>,
        stepper: &str,
        lut_buckets: Option<usize>,
        moment: i32,
        steps: usize,
        simulations: usize,
        transition_file: &str,
        n_states: usize,
        initial_state: &str,
        payoff: &str,
        payoff_params: serde_json::Value,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            seed,
            stepper: stepper.to_string(),
            lut_buckets,
            moment,
            steps,
            simulations,
            transition_file: transition_file.to_string(),
            n_states,
            initial_state: initial_state.to_string(),
            payoff: payoff.to_string(),
            payoff_params,
            commit_hash: git_commit(),
            rust_version: rustc_version(),
        }
    }

    pub fn save_to_file(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load_from_file(path: &str) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

fn command_stdout(cmd: &str, args: &[&str]) -> Option<String> {
    std::process::Command::new(cmd)
        .args(args)
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
}

fn git_commit() -> Option<String> {
    command_stdout("git", &["rev-parse", "HEAD"])
}

fn rustc_version() -> String {
    command_stdout("rustc", &["--version"]).unwrap_or_else(|| "unknown".to_string())
}

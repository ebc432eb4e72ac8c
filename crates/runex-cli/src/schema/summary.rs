//! Serde view of the persisted run-expectancy summary.

use runex_stats::expectancy::{ExpectancyEntry, round4};
use serde::{Deserialize, Serialize};

/// One row of the game-state summary CSV.
///
/// `GameState` is the canonical state key; consumers join on it, so the
/// column set and 4-decimal rounding are part of the persisted contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRow {
    #[serde(rename = "GameState")]
    pub game_state: String,
    #[serde(rename = "Count")]
    pub count: u64,
    #[serde(rename = "TotalRunsRemaining")]
    pub total_runs_remaining: u64,
    #[serde(rename = "ExpectedRuns")]
    pub expected_runs: f64,
    #[serde(rename = "ZeroRunsCount")]
    pub zero_runs_count: u64,
    #[serde(rename = "ZeroRunProbability")]
    pub zero_run_probability: f64,
}

impl SummaryRow {
    pub fn from_entry(entry: &ExpectancyEntry) -> Self {
        Self {
            game_state: entry.state.to_string(),
            count: entry.count,
            total_runs_remaining: entry.total_runs,
            expected_runs: round4(entry.expected_runs),
            zero_runs_count: entry.zero_runs,
            zero_run_probability: round4(entry.zero_run_probability),
        }
    }
}

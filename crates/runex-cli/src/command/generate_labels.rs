use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use runex_analysis::{enrich::EnrichedPitch, label::label_game};
use runex_engine::GameState;
use runex_stats::expectancy::ExpectedRunsLookup;

use crate::{
    corpus,
    schema::{pitch::LabeledRow, summary::SummaryRow},
    util::Output,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GenerateLabelsArg {
    /// Root of the year/month/day pitch-log tree
    #[arg(long)]
    data_root: PathBuf,
    /// Game-state summary CSV produced by build-table
    #[arg(long)]
    summary: PathBuf,
    /// Output file path (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &GenerateLabelsArg) -> anyhow::Result<()> {
    let lookup = load_summary(&arg.summary)?;
    eprintln!("Loaded expected runs for {} game states", lookup.len());

    let files = corpus::discover_files(&arg.data_root)?;
    eprintln!("Discovered {} pitch log files", files.len());

    let output = Output::from_output_path(arg.output.clone())?;
    let output_name = output.display_path();
    let mut writer = csv::Writer::from_writer(output);

    let mut labeled = 0_usize;
    let mut skipped = 0_usize;
    for path in &files {
        match label_file(&lookup, path) {
            Ok(rows) => {
                labeled += rows.len();
                for row in rows {
                    writer
                        .serialize(row)
                        .with_context(|| format!("Failed to write row to {output_name}"))?;
                }
            }
            Err(err) => {
                skipped += 1;
                eprintln!("Skipping {}: {err:#}", path.display());
            }
        }
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush output to {output_name}"))?;

    eprintln!(
        "Labeled {labeled} pitches from {} files ({skipped} skipped)",
        files.len() - skipped,
    );
    eprintln!("Labels saved: {output_name}");

    Ok(())
}

/// Loads the `GameState -> ExpectedRuns` mapping from a persisted summary.
///
/// The summary is this pipeline's own artifact, so a malformed state key in
/// it is a fatal error rather than a row to skip.
fn load_summary(path: &Path) -> anyhow::Result<ExpectedRunsLookup> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open summary file: {}", path.display()))?;

    let mut lookup = ExpectedRunsLookup::new();
    for result in reader.deserialize() {
        let row: SummaryRow = result
            .with_context(|| format!("Failed to parse summary file: {}", path.display()))?;
        let state: GameState = row.game_state.parse().with_context(|| {
            format!(
                "Invalid game state key {:?} in {}",
                row.game_state,
                path.display()
            )
        })?;
        lookup.insert(&state, row.expected_runs);
    }
    if lookup.is_empty() {
        bail!("summary file {} contains no game states", path.display());
    }
    Ok(lookup)
}

/// Labels every countable pitch of one game file.
///
/// Filtering precedes labeling, so "next pitch" always refers to the next
/// surviving row; the labeled output therefore matches what a consumer
/// reading it sequentially would reconstruct.
fn label_file(lookup: &ExpectedRunsLookup, path: &Path) -> anyhow::Result<Vec<LabeledRow>> {
    let log = corpus::read_pitch_log(path)?;
    let enriched = EnrichedPitch::from_game(&log.events);

    let mut kept_records = Vec::with_capacity(enriched.len());
    let mut kept_pitches = Vec::with_capacity(enriched.len());
    for (record, pitch) in log.records.iter().zip(enriched) {
        if pitch.is_countable() {
            kept_records.push(record);
            kept_pitches.push(pitch);
        }
    }

    let labels = label_game(lookup, &kept_pitches);
    Ok(kept_records
        .iter()
        .zip(&kept_pitches)
        .zip(&labels)
        .map(|((record, pitch), label)| LabeledRow::new(record, pitch, label))
        .collect())
}

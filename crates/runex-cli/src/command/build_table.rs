use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use chrono::Utc;
use rayon::prelude::*;
use runex_analysis::enrich::EnrichedPitch;
use runex_stats::expectancy::{ExpectancyAccumulator, ExpectancyTable};

use crate::{corpus, schema::summary::SummaryRow};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BuildTableArg {
    /// Root of the year/month/day pitch-log tree
    #[arg(long)]
    data_root: PathBuf,
    /// Directory for the summary CSV
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

pub(crate) fn run(arg: &BuildTableArg) -> anyhow::Result<()> {
    let files = corpus::discover_files(&arg.data_root)?;
    eprintln!("Discovered {} pitch log files", files.len());

    // One partial accumulator per file; merging raw tallies afterwards is
    // the only step that touches shared state.
    let partials: Vec<_> = files
        .par_iter()
        .map(|path| build_partial(path))
        .collect();

    let mut merged = ExpectancyAccumulator::new();
    let mut skipped = 0_usize;
    for (path, partial) in files.iter().zip(partials) {
        match partial {
            Ok(partial) => merged.merge(&partial),
            Err(err) => {
                skipped += 1;
                eprintln!("Skipping {}: {err:#}", path.display());
            }
        }
    }
    eprintln!(
        "Tallied {} pitches from {} files ({} skipped)",
        merged.total_samples(),
        files.len() - skipped,
        skipped,
    );

    let table = merged.finalize();
    let output_path = summary_output_path(&arg.output_dir);
    save_summary(&table, &output_path)?;
    eprintln!("Summary saved: {}", output_path.display());

    Ok(())
}

/// Tallies one file into a fresh accumulator.
fn build_partial(path: &Path) -> anyhow::Result<ExpectancyAccumulator> {
    let log = corpus::read_pitch_log(path)?;
    let mut acc = ExpectancyAccumulator::new();
    for pitch in EnrichedPitch::from_game(&log.events) {
        if pitch.is_countable() {
            acc.record(&pitch.state, pitch.runs_remaining);
        }
    }
    Ok(acc)
}

fn summary_output_path(output_dir: &Path) -> PathBuf {
    let timestamp = Utc::now().format("%Y%m%d_%H%M");
    output_dir.join(format!("GameState_Summary_{timestamp}.csv"))
}

fn save_summary(table: &ExpectancyTable, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create summary file: {}", path.display()))?;
    for entry in table.observed() {
        writer
            .serialize(SummaryRow::from_entry(entry))
            .with_context(|| format!("Failed to write summary row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush summary to {}", path.display()))?;
    Ok(())
}

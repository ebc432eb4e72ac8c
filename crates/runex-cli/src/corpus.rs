//! Corpus discovery and per-file pitch-log reading.
//!
//! Source data lives in a `<root>/<year>/<month>/<day>/CSV/*.csv` tree. The
//! walk is deterministic (lexicographic at every level) and the per-file
//! readers are strict about the seven required columns but forgiving about
//! everything else, so that one bad file costs exactly one file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, bail};
use runex_engine::PitchEvent;

use crate::schema::pitch::RawPitchRecord;

/// Columns a source file must carry to be usable; a file missing any of
/// them is skipped in its entirety.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "Inning",
    "Top/Bottom",
    "Outs",
    "Balls",
    "Strikes",
    "RunsScored",
    "PlayResult",
];

/// Extra innings are excluded from the pipeline before reconstruction.
const MAX_INNING_EXCLUSIVE: u16 = 9;

/// One game file: source rows paired index-for-index with engine events.
#[derive(Debug, Clone)]
pub struct PitchLog {
    pub records: Vec<RawPitchRecord>,
    pub events: Vec<PitchEvent>,
}

/// Walks the corpus tree and returns every candidate pitch-log file.
///
/// Filenames containing `unverified` or `playerpositioning` (any case) and
/// non-CSV files are skipped; days without a `CSV` subdirectory are skipped
/// silently, matching the layout of partially synced corpora.
pub fn discover_files(data_root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = vec![];
    for year in sorted_dirs(data_root)? {
        for month in sorted_dirs(&year)? {
            for day in sorted_dirs(&month)? {
                let csv_dir = day.join("CSV");
                if !csv_dir.is_dir() {
                    continue;
                }
                let mut day_files: Vec<PathBuf> = fs::read_dir(&csv_dir)
                    .with_context(|| format!("Failed to read {}", csv_dir.display()))?
                    .filter_map(Result::ok)
                    .map(|entry| entry.path())
                    .filter(|path| path.is_file() && is_candidate_file(path))
                    .collect();
                day_files.sort();
                files.append(&mut day_files);
            }
        }
    }
    Ok(files)
}

fn sorted_dirs(path: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(path)
        .with_context(|| format!("Failed to read directory {}", path.display()))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn is_candidate_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    let lower = name.to_lowercase();
    lower.ends_with(".csv")
        && !lower.contains("unverified")
        && !lower.contains("playerpositioning")
}

/// Reads one game file into paired raw rows and engine events.
///
/// Enforces the required-column contract against the header, drops extra
/// innings before reconstruction, and converts each surviving row. Any
/// failure here is a file-level failure; callers skip the file and
/// continue.
pub fn read_pitch_log(path: &Path) -> anyhow::Result<PitchLog> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read CSV header: {}", path.display()))?
        .clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            bail!("missing required column {column:?} in {}", path.display());
        }
    }

    let mut records = vec![];
    let mut events = vec![];
    for (row, result) in reader.deserialize().enumerate() {
        let record: RawPitchRecord = result
            .with_context(|| format!("Failed to parse row {} of {}", row + 1, path.display()))?;
        if record.inning >= MAX_INNING_EXCLUSIVE {
            continue;
        }
        let event = record
            .to_event()
            .with_context(|| format!("Invalid row {} of {}", row + 1, path.display()))?;
        records.push(record);
        events.push(event);
    }

    Ok(PitchLog { records, events })
}

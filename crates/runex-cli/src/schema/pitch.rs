//! Serde views of the pitch-log CSV schema.
//!
//! [`RawPitchRecord`] deserializes one source row permissively: required
//! fields fail the row (and therefore the file), while the nullable numeric
//! and indicator fields coerce to their defaults. [`LabeledRow`] is the
//! serialized shape of the final training output.

use anyhow::bail;
use runex_analysis::{enrich::EnrichedPitch, label::PitchLabel};
use runex_engine::{HalfInning, PitchEvent, PlayResult};
use serde::{Deserialize, Serialize};

/// One row of a source pitch log.
///
/// Field presence mirrors the skip policies: the seven required columns are
/// enforced by a header check before deserialization, so a malformed value
/// in them is a file-level parse failure, while `KorBB`, `PitchCall`,
/// `OutsOnPlay`, and `RunsScored` are nullable and coerce.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPitchRecord {
    #[serde(rename = "PitchNo", default)]
    pub pitch_no: Option<String>,
    #[serde(rename = "Date", default)]
    pub date: Option<String>,
    #[serde(rename = "Pitcher", default)]
    pub pitcher: Option<String>,
    #[serde(rename = "Batter", default)]
    pub batter: Option<String>,
    #[serde(rename = "Inning")]
    pub inning: u16,
    #[serde(rename = "Top/Bottom")]
    pub top_bottom: String,
    #[serde(rename = "Outs")]
    pub outs: u8,
    #[serde(rename = "Balls")]
    pub balls: u8,
    #[serde(rename = "Strikes")]
    pub strikes: u8,
    #[serde(rename = "PlayResult", default)]
    pub play_result: Option<String>,
    #[serde(rename = "KorBB", default)]
    pub kor_bb: Option<String>,
    #[serde(rename = "PitchCall", default)]
    pub pitch_call: Option<String>,
    #[serde(rename = "OutsOnPlay", default)]
    pub outs_on_play: Option<String>,
    #[serde(rename = "RunsScored", default)]
    pub runs_scored: Option<String>,
}

impl RawPitchRecord {
    /// Converts the row into an engine event.
    ///
    /// Fails only on an unrecognized `Top/Bottom` value; every nullable
    /// field has already collapsed to its default by this point.
    pub fn to_event(&self) -> anyhow::Result<PitchEvent> {
        let Ok(half) = self.top_bottom.trim().parse::<HalfInning>() else {
            bail!("unrecognized Top/Bottom value: {:?}", self.top_bottom);
        };
        Ok(PitchEvent {
            inning: self.inning,
            half,
            outs: self.outs,
            balls: self.balls,
            strikes: self.strikes,
            play_result: PlayResult::from_label(self.play_result.as_deref().unwrap_or_default()),
            is_walk_or_hbp: self.is_walk_or_hbp(),
            outs_on_play: coerce_count(self.outs_on_play.as_deref()),
            runs_scored: coerce_count(self.runs_scored.as_deref()),
        })
    }

    fn is_walk_or_hbp(&self) -> bool {
        self.kor_bb.as_deref().is_some_and(|v| v.trim() == "Walk")
            || self
                .pitch_call
                .as_deref()
                .is_some_and(|v| v.trim() == "HitByPitch")
    }
}

/// Coerces a nullable numeric field to a small count, defaulting to 0.
///
/// Source files store these as integers or floats (`"1"`, `"1.0"`); anything
/// unparseable or negative is treated as 0 rather than failing the row.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn coerce_count(raw: Option<&str>) -> u8 {
    raw.and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite() && *value >= 0.0)
        .map_or(0, |value| value.round().min(255.0) as u8)
}

/// One row of the labeled training output.
///
/// Column order is the persisted contract: the derived columns follow
/// directly after `RunsScored`, with the label fields last. `ExpectedRuns`
/// and `Target` serialize as empty fields when the state was unknown.
#[derive(Debug, Clone, Serialize)]
pub struct LabeledRow {
    #[serde(rename = "PitchNo")]
    pub pitch_no: Option<String>,
    #[serde(rename = "Date")]
    pub date: Option<String>,
    #[serde(rename = "Pitcher")]
    pub pitcher: Option<String>,
    #[serde(rename = "Batter")]
    pub batter: Option<String>,
    #[serde(rename = "Inning")]
    pub inning: u16,
    #[serde(rename = "Top/Bottom")]
    pub top_bottom: String,
    #[serde(rename = "Outs")]
    pub outs: u8,
    #[serde(rename = "Balls")]
    pub balls: u8,
    #[serde(rename = "Strikes")]
    pub strikes: u8,
    #[serde(rename = "PlayResult")]
    pub play_result: Option<String>,
    #[serde(rename = "OutsOnPlay")]
    pub outs_on_play: u8,
    #[serde(rename = "RunsScored")]
    pub runs_scored: u8,
    #[serde(rename = "RunnerOn1B")]
    pub runner_on_1b: u8,
    #[serde(rename = "RunnerOn2B")]
    pub runner_on_2b: u8,
    #[serde(rename = "RunnerOn3B")]
    pub runner_on_3b: u8,
    #[serde(rename = "GameState")]
    pub game_state: String,
    #[serde(rename = "RunsRemaining")]
    pub runs_remaining: u64,
    #[serde(rename = "ExpectedRuns")]
    pub expected_runs: Option<f64>,
    #[serde(rename = "Target")]
    pub target: Option<f64>,
}

impl LabeledRow {
    pub fn new(record: &RawPitchRecord, pitch: &EnrichedPitch, label: &PitchLabel) -> Self {
        use runex_stats::expectancy::round4;

        Self {
            pitch_no: record.pitch_no.clone(),
            date: record.date.clone(),
            pitcher: record.pitcher.clone(),
            batter: record.batter.clone(),
            inning: record.inning,
            top_bottom: record.top_bottom.clone(),
            outs: record.outs,
            balls: record.balls,
            strikes: record.strikes,
            play_result: record.play_result.clone(),
            outs_on_play: pitch.event.outs_on_play,
            runs_scored: pitch.event.runs_scored,
            runner_on_1b: u8::from(pitch.runners.on_first),
            runner_on_2b: u8::from(pitch.runners.on_second),
            runner_on_3b: u8::from(pitch.runners.on_third),
            game_state: pitch.state.to_string(),
            runs_remaining: pitch.runs_remaining,
            expected_runs: label.expected_runs.map(round4),
            target: label.target.map(round4),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(top_bottom: &str) -> RawPitchRecord {
        RawPitchRecord {
            pitch_no: None,
            date: None,
            pitcher: None,
            batter: None,
            inning: 3,
            top_bottom: top_bottom.to_string(),
            outs: 1,
            balls: 2,
            strikes: 0,
            play_result: None,
            kor_bb: None,
            pitch_call: None,
            outs_on_play: None,
            runs_scored: None,
        }
    }

    #[test]
    fn test_to_event_defaults_nullable_numerics_to_zero() {
        let event = record("Top").to_event().unwrap();
        assert_eq!(event.outs_on_play, 0);
        assert_eq!(event.runs_scored, 0);
        assert_eq!(event.play_result, PlayResult::None);
        assert!(!event.is_walk_or_hbp);
    }

    #[test]
    fn test_to_event_coerces_float_formatted_counts() {
        let mut raw = record("Bottom");
        raw.runs_scored = Some("2.0".to_string());
        raw.outs_on_play = Some("1".to_string());
        let event = raw.to_event().unwrap();
        assert_eq!(event.runs_scored, 2);
        assert_eq!(event.outs_on_play, 1);
    }

    #[test]
    fn test_to_event_coerces_malformed_counts_to_zero() {
        let mut raw = record("Top");
        raw.runs_scored = Some("n/a".to_string());
        raw.outs_on_play = Some("-1".to_string());
        let event = raw.to_event().unwrap();
        assert_eq!(event.runs_scored, 0);
        assert_eq!(event.outs_on_play, 0);
    }

    #[test]
    fn test_to_event_detects_walk_and_hbp() {
        let mut walk = record("Top");
        walk.kor_bb = Some("Walk".to_string());
        assert!(walk.to_event().unwrap().is_walk_or_hbp);

        let mut hbp = record("Top");
        hbp.pitch_call = Some("HitByPitch".to_string());
        assert!(hbp.to_event().unwrap().is_walk_or_hbp);

        let mut strikeout = record("Top");
        strikeout.kor_bb = Some("Strikeout".to_string());
        assert!(!strikeout.to_event().unwrap().is_walk_or_hbp);
    }

    #[test]
    fn test_to_event_rejects_unknown_half() {
        assert!(record("Middle").to_event().is_err());
    }
}

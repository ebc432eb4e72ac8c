use serde::{Deserialize, Serialize};

/// Which team is batting: the top or bottom half of an inning.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    derive_more::Display,
    derive_more::FromStr,
    Serialize,
    Deserialize,
)]
pub enum HalfInning {
    Top,
    Bottom,
}

/// Identifies one half-inning within a game, e.g. `5-Top`.
///
/// The half-inning is the unit of sequential simulation: runner flags and the
/// running out count are only meaningful within one half-inning, and every
/// suffix aggregation (runs remaining) is bounded by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, Serialize, Deserialize)]
#[display("{inning}-{half}")]
pub struct HalfInningKey {
    pub inning: u16,
    pub half: HalfInning,
}

/// Outcome of the plate appearance ending on a pitch.
///
/// Only the four hit types move runners; everything else is either `None`
/// (the plate appearance continues or no result was recorded) or `Other`
/// (a recorded result with no modeled runner movement, such as an out in
/// play). Keeping the set closed means a misspelled result string becomes an
/// explicit `Other` instead of a silently skipped branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayResult {
    None,
    Single,
    Double,
    Triple,
    HomeRun,
    Other,
}

impl PlayResult {
    /// Maps a raw result label onto the closed outcome set.
    ///
    /// Empty and `Undefined` labels mean no play result was recorded for the
    /// pitch; any unrecognized label maps to [`PlayResult::Other`].
    ///
    /// # Examples
    ///
    /// ```
    /// use runex_engine::PlayResult;
    ///
    /// assert_eq!(PlayResult::from_label("HomeRun"), PlayResult::HomeRun);
    /// assert_eq!(PlayResult::from_label(""), PlayResult::None);
    /// assert_eq!(PlayResult::from_label("Sacrifice"), PlayResult::Other);
    /// ```
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "" | "Undefined" => Self::None,
            "Single" => Self::Single,
            "Double" => Self::Double,
            "Triple" => Self::Triple,
            "HomeRun" => Self::HomeRun,
            _ => Self::Other,
        }
    }

    /// Returns `true` for the four hit types that move runners.
    #[must_use]
    pub const fn is_hit(self) -> bool {
        matches!(self, Self::Single | Self::Double | Self::Triple | Self::HomeRun)
    }
}

/// One pitch as recorded in the source log.
///
/// `outs`, `balls`, and `strikes` are the recorded values *before* the pitch
/// was thrown. `outs_on_play` and `runs_scored` describe what the play ending
/// on this pitch did; both default to zero when the source field is missing
/// or malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchEvent {
    pub inning: u16,
    pub half: HalfInning,
    pub outs: u8,
    pub balls: u8,
    pub strikes: u8,
    pub play_result: PlayResult,
    /// Walk or hit-by-pitch: forces runner advancement when no hit-type play
    /// result is present.
    pub is_walk_or_hbp: bool,
    pub outs_on_play: u8,
    pub runs_scored: u8,
}

impl PitchEvent {
    /// The half-inning this pitch belongs to.
    #[must_use]
    pub const fn half_inning(&self) -> HalfInningKey {
        HalfInningKey {
            inning: self.inning,
            half: self.half,
        }
    }
}

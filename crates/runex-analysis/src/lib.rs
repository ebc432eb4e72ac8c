//! Per-game stream analysis for the runex pipeline.
//!
//! This crate turns an ordered pitch log into the observations the
//! aggregation and labeling passes consume:
//!
//! - [`enrich::EnrichedPitch`]: one pitch with its reconstructed runner
//!   state, canonical game-state key, and realized runs remaining in the
//!   half-inning
//! - [`label::label_game`]: per-pitch delta-expected-runs training targets
//!   against a finalized expected-runs lookup
//!
//! # Pipeline position
//!
//! ```text
//! pitch log (one game)
//!     |
//! EnrichedPitch::from_game     reconstruction + suffix sums
//!     |
//! filter valid pre-pitch states
//!     |
//!     +--> ExpectancyAccumulator::record   (table build, many games)
//!     +--> label::label_game               (label pass, per game)
//! ```
//!
//! # Examples
//!
//! ```
//! use runex_analysis::enrich::EnrichedPitch;
//! use runex_engine::{HalfInning, PitchEvent, PlayResult};
//!
//! let event = PitchEvent {
//!     inning: 1,
//!     half: HalfInning::Top,
//!     outs: 0,
//!     balls: 0,
//!     strikes: 0,
//!     play_result: PlayResult::None,
//!     is_walk_or_hbp: false,
//!     outs_on_play: 0,
//!     runs_scored: 0,
//! };
//!
//! let enriched = EnrichedPitch::from_game(&[event]);
//! assert_eq!(enriched[0].state.to_string(), "000-O0-B0-S0");
//! assert_eq!(enriched[0].runs_remaining, 0);
//! ```

pub mod enrich;
pub mod label;

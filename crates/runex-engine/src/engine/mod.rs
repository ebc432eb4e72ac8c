//! Sequential game-state reconstruction.
//!
//! This module rebuilds the context each batter faced from an ordered log of
//! pitch events:
//!
//! - [`RunnerSimulation`] - fold-with-carry reconstruction of base occupancy
//! - [`RunnerState`] - which bases were occupied before a pitch
//! - [`GameState`] - the canonical pre-pitch state key (runners, outs, count)
//!
//! # Reconstruction Flow
//!
//! 1. Feed pitches to [`RunnerSimulation::observe`] in log order
//! 2. Each call returns the [`RunnerState`] that existed before that pitch
//! 3. Combine it with the recorded outs/balls/strikes into a [`GameState`]
//!
//! The simulation carries all of its state explicitly (runner flags, running
//! out count, previous half-inning key), so independent games or shards can
//! be reconstructed concurrently with one simulator each.
//!
//! # Example
//!
//! ```
//! use runex_engine::{HalfInning, PitchEvent, PlayResult, RunnerSimulation};
//!
//! let mut sim = RunnerSimulation::new();
//! let single = PitchEvent {
//!     inning: 1,
//!     half: HalfInning::Top,
//!     outs: 0,
//!     balls: 0,
//!     strikes: 0,
//!     play_result: PlayResult::Single,
//!     is_walk_or_hbp: false,
//!     outs_on_play: 0,
//!     runs_scored: 0,
//! };
//!
//! let before = sim.observe(&single);
//! assert!(!before.on_first, "bases are empty before the first pitch");
//! ```

pub use self::{game_state::*, runner_state::*};

mod game_state;
mod runner_state;

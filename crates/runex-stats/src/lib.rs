//! Run-expectancy aggregation for the runex pipeline.
//!
//! This crate reduces enriched per-pitch observations into a corpus-wide
//! run-expectancy table:
//!
//! - [`expectancy::ExpectancyAccumulator`]: per-state running tallies
//!   (sample count, total future runs, zero-future-runs count) over the
//!   fixed pre-enumerable game-state space
//! - [`expectancy::ExpectancyTable`]: finalized lookup table mapping each
//!   game state to its expected runs and zero-run probability
//!
//! Accumulation is an associative, commutative reduction: independent shards
//! (files, games, seasons) can be tallied in parallel and merged by summing
//! raw counts. Means and probabilities are derived only at finalization,
//! never merged across shards.
//!
//! # Examples
//!
//! ```
//! use runex_engine::{GameState, RunnerState};
//! use runex_stats::expectancy::ExpectancyAccumulator;
//!
//! let state = GameState::new(RunnerState::EMPTY, 0, 0, 0);
//!
//! let mut acc = ExpectancyAccumulator::new();
//! acc.record(&state, 2);
//! acc.record(&state, 0);
//!
//! let table = acc.finalize();
//! assert_eq!(table.expected_runs(&state), Some(1.0));
//! assert_eq!(table.zero_run_probability(&state), Some(0.5));
//! ```

pub mod expectancy;

//! Enrichment of a game's pitch log with reconstructed context.

use runex_engine::{GameState, HalfInningKey, PitchEvent, RunnerSimulation, RunnerState};

/// One pitch together with its reconstructed pre-pitch context.
///
/// The game state combines the *reconstructed* runner flags with the
/// *recorded* outs/balls/strikes columns; the simulator's own out counter is
/// only used for reset detection, never emitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnrichedPitch {
    pub event: PitchEvent,
    /// Base occupancy the batter faced.
    pub runners: RunnerState,
    /// Canonical pre-pitch state key.
    pub state: GameState,
    /// Runs scored strictly after this pitch in the same half-inning.
    pub runs_remaining: u64,
}

impl EnrichedPitch {
    /// Enriches one game's ordered pitch log.
    ///
    /// Runs the runner-state fold left-to-right and the runs-remaining
    /// suffix scan right-to-left, both bounded by half-inning keys.
    #[must_use]
    pub fn from_game(events: &[PitchEvent]) -> Vec<Self> {
        let runners = RunnerSimulation::reconstruct(events);
        let remaining = runs_remaining(events);
        events
            .iter()
            .zip(runners)
            .zip(remaining)
            .map(|((event, runners), runs_remaining)| Self {
                event: *event,
                runners,
                state: GameState::new(runners, event.outs, event.balls, event.strikes),
                runs_remaining,
            })
            .collect()
    }

    #[must_use]
    pub const fn half_inning(&self) -> HalfInningKey {
        self.event.half_inning()
    }

    /// Whether this pitch's state may enter the expectancy table or the
    /// label pass (recorded outs/balls/strikes within the pre-pitch range).
    #[must_use]
    pub const fn is_countable(&self) -> bool {
        self.state.is_valid_pre_pitch()
    }
}

/// Runs scored strictly after each pitch, within its half-inning.
///
/// A single right-to-left pass with a running accumulator that resets at
/// half-inning boundaries; O(n) regardless of half-inning length. The last
/// pitch of every half-inning gets 0.
#[must_use]
pub fn runs_remaining(events: &[PitchEvent]) -> Vec<u64> {
    let mut remaining = vec![0; events.len()];
    let mut acc = 0_u64;
    let mut following: Option<HalfInningKey> = None;
    for (i, event) in events.iter().enumerate().rev() {
        let key = event.half_inning();
        if following != Some(key) {
            acc = 0;
        }
        remaining[i] = acc;
        acc += u64::from(event.runs_scored);
        following = Some(key);
    }
    remaining
}

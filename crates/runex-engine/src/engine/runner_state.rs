use serde::{Deserialize, Serialize};

use crate::core::{HalfInningKey, PitchEvent, PlayResult};

/// Base occupancy immediately before a pitch.
///
/// This is the state the batter faced, produced by [`RunnerSimulation`]
/// before the pitch's own play result is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunnerState {
    pub on_first: bool,
    pub on_second: bool,
    pub on_third: bool,
}

impl RunnerState {
    /// All bases empty.
    pub const EMPTY: Self = Self {
        on_first: false,
        on_second: false,
        on_third: false,
    };

    #[must_use]
    pub const fn new(on_first: bool, on_second: bool, on_third: bool) -> Self {
        Self {
            on_first,
            on_second,
            on_third,
        }
    }

    /// Occupancy as a 3-bit value: first base is the high bit, third the low.
    ///
    /// Matches the digit order of the persisted game-state key, so
    /// `101` (runners on first and third) maps to `0b101`.
    #[must_use]
    pub fn occupancy_bits(self) -> u8 {
        u8::from(self.on_first) << 2 | u8::from(self.on_second) << 1 | u8::from(self.on_third)
    }

    /// Inverse of [`occupancy_bits`](Self::occupancy_bits); only the low
    /// three bits are read.
    #[must_use]
    pub const fn from_occupancy_bits(bits: u8) -> Self {
        Self {
            on_first: bits & 0b100 != 0,
            on_second: bits & 0b010 != 0,
            on_third: bits & 0b001 != 0,
        }
    }
}

/// Sequential reconstruction of base-runner occupancy from a pitch log.
///
/// Feed every pitch of a game in log order to [`observe`](Self::observe);
/// each call returns the pre-pitch [`RunnerState`]. Runner flags and the
/// running out count reset whenever the half-inning key changes or three
/// outs have been recorded.
///
/// The simulator owns all of its state; one instance reconstructs one
/// ordered stream and nothing else.
#[derive(Debug, Clone, Default)]
pub struct RunnerSimulation {
    runners: RunnerState,
    outs: u8,
    prev_half: Option<HalfInningKey>,
}

impl RunnerSimulation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the simulation by one pitch.
    ///
    /// Returns the runner state that existed immediately before the pitch,
    /// then applies the pitch's scoring, runner movement, and outs.
    pub fn observe(&mut self, event: &PitchEvent) -> RunnerState {
        let key = event.half_inning();
        if self.prev_half != Some(key) || self.outs >= 3 {
            self.runners = RunnerState::EMPTY;
            self.outs = 0;
        }

        // Emit before mutating: the caller wants the state the batter faced.
        let before = self.runners;

        self.remove_scoring_runners(event.runs_scored);
        self.apply_play(event);
        self.outs = self.outs.saturating_add(event.outs_on_play);
        self.prev_half = Some(key);

        before
    }

    /// Reconstructs the pre-pitch runner state for every event of a game.
    #[must_use]
    pub fn reconstruct(events: &[PitchEvent]) -> Vec<RunnerState> {
        let mut sim = Self::new();
        events.iter().map(|event| sim.observe(event)).collect()
    }

    /// Clears one base per run scored, nearest to home first.
    ///
    /// The batter's own run (home run, bases-loaded walk) is already counted
    /// in `runs_scored`, so no separate batter slot is needed: once the bases
    /// are cleared the remaining decrements are no-ops.
    fn remove_scoring_runners(&mut self, runs_scored: u8) {
        for _ in 0..runs_scored {
            if self.runners.on_third {
                self.runners.on_third = false;
            } else if self.runners.on_second {
                self.runners.on_second = false;
            } else if self.runners.on_first {
                self.runners.on_first = false;
            }
        }
    }

    fn apply_play(&mut self, event: &PitchEvent) {
        // Well-formed input never carries both a hit-type result and a
        // walk/HBP indicator; the hit branch wins when it does.
        debug_assert!(
            !(event.play_result.is_hit() && event.is_walk_or_hbp),
            "hit-type play result combined with walk/HBP indicator"
        );

        let r = &mut self.runners;
        match event.play_result {
            PlayResult::Single => {
                r.on_third = r.on_second;
                r.on_second = r.on_first;
                r.on_first = true;
            }
            PlayResult::Double => {
                r.on_third = r.on_first;
                r.on_second = true;
                r.on_first = false;
            }
            PlayResult::Triple => {
                r.on_third = true;
                r.on_second = false;
                r.on_first = false;
            }
            PlayResult::HomeRun => {
                *r = RunnerState::EMPTY;
            }
            PlayResult::None | PlayResult::Other if event.is_walk_or_hbp => {
                self.force_advance();
            }
            PlayResult::None | PlayResult::Other => {}
        }
    }

    /// Forced advancement on a walk or hit-by-pitch.
    ///
    /// Only forced runners move; a lone runner on second or third stays put.
    /// With the bases loaded the forced run was already removed by the
    /// scoring step, so nothing is left to do.
    fn force_advance(&mut self) {
        let r = &mut self.runners;
        if r.on_first && r.on_second && r.on_third {
            // Bases-loaded walk: handled by the run-removal step.
        } else if r.on_first && r.on_second {
            r.on_third = true;
            // First and second stay forced-occupied, batter takes first.
        } else if r.on_first {
            r.on_second = true;
        } else {
            r.on_first = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HalfInning;

    fn pitch(inning: u16, half: HalfInning, result: PlayResult) -> PitchEvent {
        PitchEvent {
            inning,
            half,
            outs: 0,
            balls: 0,
            strikes: 0,
            play_result: result,
            is_walk_or_hbp: false,
            outs_on_play: 0,
            runs_scored: 0,
        }
    }

    fn walk(inning: u16, half: HalfInning, runs_scored: u8) -> PitchEvent {
        PitchEvent {
            is_walk_or_hbp: true,
            runs_scored,
            ..pitch(inning, half, PlayResult::None)
        }
    }

    #[test]
    fn test_single_then_double_advances_runners() {
        // Single then Double, no runs scored.
        let events = [
            pitch(1, HalfInning::Top, PlayResult::Single),
            pitch(1, HalfInning::Top, PlayResult::Double),
        ];
        let states = RunnerSimulation::reconstruct(&events);

        assert_eq!(states[0], RunnerState::EMPTY, "first batter faces empty bases");
        assert_eq!(
            states[1],
            RunnerState::new(true, false, false),
            "second batter faces a runner on first"
        );

        // Post-double configuration: batter to second, runner from first to third.
        let mut sim = RunnerSimulation::new();
        for event in &events {
            sim.observe(event);
        }
        let third = pitch(1, HalfInning::Top, PlayResult::None);
        assert_eq!(sim.observe(&third), RunnerState::new(false, true, true));
    }

    #[test]
    fn test_bases_loaded_walk_scores_and_stays_loaded() {
        let mut sim = RunnerSimulation::new();
        for _ in 0..3 {
            sim.observe(&walk(1, HalfInning::Top, 0));
        }
        // Fourth walk forces a run home; bases stay loaded.
        sim.observe(&walk(1, HalfInning::Top, 1));

        let next = pitch(1, HalfInning::Top, PlayResult::None);
        assert_eq!(sim.observe(&next), RunnerState::new(true, true, true));
    }

    #[test]
    fn test_walk_forces_only_forced_runners() {
        let mut sim = RunnerSimulation::new();
        // Runner reaches second via a double; a walk must not move them.
        sim.observe(&pitch(1, HalfInning::Top, PlayResult::Double));
        sim.observe(&walk(1, HalfInning::Top, 0));

        let next = pitch(1, HalfInning::Top, PlayResult::None);
        assert_eq!(
            sim.observe(&next),
            RunnerState::new(true, true, false),
            "unforced runner on second holds, batter takes first"
        );
    }

    #[test]
    fn test_walk_with_first_and_second_loads_bases() {
        let mut sim = RunnerSimulation::new();
        sim.observe(&walk(1, HalfInning::Top, 0));
        sim.observe(&walk(1, HalfInning::Top, 0));
        sim.observe(&walk(1, HalfInning::Top, 0));

        let next = pitch(1, HalfInning::Top, PlayResult::None);
        assert_eq!(sim.observe(&next), RunnerState::new(true, true, true));
    }

    #[test]
    fn test_home_run_clears_bases_regardless_of_runners() {
        // Home run with two runners on, three runs scored.
        let mut sim = RunnerSimulation::new();
        sim.observe(&pitch(1, HalfInning::Top, PlayResult::Single));
        sim.observe(&pitch(1, HalfInning::Top, PlayResult::Single));

        let homer = PitchEvent {
            runs_scored: 3,
            ..pitch(1, HalfInning::Top, PlayResult::HomeRun)
        };
        sim.observe(&homer);

        let next = pitch(1, HalfInning::Top, PlayResult::None);
        assert_eq!(
            sim.observe(&next),
            RunnerState::EMPTY,
            "scoring removal and the home-run branch agree on empty bases"
        );
    }

    #[test]
    fn test_triple_scores_all_prior_runners() {
        let mut sim = RunnerSimulation::new();
        sim.observe(&pitch(1, HalfInning::Top, PlayResult::Single));
        let triple = PitchEvent {
            runs_scored: 1,
            ..pitch(1, HalfInning::Top, PlayResult::Triple)
        };
        sim.observe(&triple);

        let next = pitch(1, HalfInning::Top, PlayResult::None);
        assert_eq!(sim.observe(&next), RunnerState::new(false, false, true));
    }

    #[test]
    fn test_reset_on_three_outs() {
        let mut sim = RunnerSimulation::new();
        sim.observe(&pitch(1, HalfInning::Top, PlayResult::Single));
        let double_play = PitchEvent {
            outs_on_play: 3,
            ..pitch(1, HalfInning::Top, PlayResult::Other)
        };
        sim.observe(&double_play);

        // Same half-inning key in the log, but the out count forces a reset.
        let next = pitch(1, HalfInning::Top, PlayResult::None);
        assert_eq!(sim.observe(&next), RunnerState::EMPTY);
    }

    #[test]
    fn test_reset_on_half_inning_change() {
        let mut sim = RunnerSimulation::new();
        sim.observe(&pitch(1, HalfInning::Top, PlayResult::Single));
        assert_eq!(
            sim.observe(&pitch(1, HalfInning::Bottom, PlayResult::None)),
            RunnerState::EMPTY,
            "runners never carry across a half-inning boundary"
        );

        sim.observe(&pitch(1, HalfInning::Bottom, PlayResult::Double));
        assert_eq!(
            sim.observe(&pitch(2, HalfInning::Top, PlayResult::None)),
            RunnerState::EMPTY,
            "a new inning resets the bases as well"
        );
    }

    #[test]
    fn test_other_result_moves_no_runners() {
        let mut sim = RunnerSimulation::new();
        sim.observe(&pitch(1, HalfInning::Top, PlayResult::Single));
        let out_in_play = PitchEvent {
            outs_on_play: 1,
            ..pitch(1, HalfInning::Top, PlayResult::Other)
        };
        sim.observe(&out_in_play);

        let next = pitch(1, HalfInning::Top, PlayResult::None);
        assert_eq!(sim.observe(&next), RunnerState::new(true, false, false));
    }

    #[test]
    fn test_occupancy_bits_round_trip() {
        for bits in 0..8 {
            let state = RunnerState::from_occupancy_bits(bits);
            assert_eq!(state.occupancy_bits(), bits);
        }
        assert_eq!(RunnerState::new(true, false, true).occupancy_bits(), 0b101);
    }
}

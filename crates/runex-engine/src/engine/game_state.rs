use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{ParseGameStateError, engine::RunnerState};

/// Number of distinct valid pre-pitch states:
/// 8 occupancy patterns x 3 out counts x 4 ball counts x 3 strike counts.
pub const NUM_GAME_STATES: usize = 288;

/// Canonical pre-pitch game state: base occupancy, outs, and count.
///
/// The persisted key format is `RRR-O{outs}-B{balls}-S{strikes}`, where `RRR`
/// are the 0/1 occupancy flags for first, second, and third base. For
/// example, `101-O2-B1-S2` is runners on first and third, two outs, one ball,
/// two strikes. Consumers of the expectancy table join on this exact string,
/// so the encoding is a stable contract.
///
/// A state is *valid pre-pitch* when `outs <= 2`, `balls <= 3`, and
/// `strikes <= 2`; a half-inning over, a fourth ball, or a third strike end
/// the plate appearance and are never observed before a pitch. Valid states
/// map onto a dense index in `0..NUM_GAME_STATES` so that aggregation can be
/// array-backed and an unseen state is a genuine zero-count entry rather
/// than an absent key.
///
/// # Examples
///
/// ```
/// use runex_engine::{GameState, RunnerState};
///
/// let state = GameState::new(RunnerState::new(true, false, true), 2, 1, 2);
/// assert_eq!(state.to_string(), "101-O2-B1-S2");
/// assert_eq!("101-O2-B1-S2".parse::<GameState>().unwrap(), state);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    pub runners: RunnerState,
    pub outs: u8,
    pub balls: u8,
    pub strikes: u8,
}

impl GameState {
    pub const MAX_OUTS: u8 = 2;
    pub const MAX_BALLS: u8 = 3;
    pub const MAX_STRIKES: u8 = 2;

    #[must_use]
    pub const fn new(runners: RunnerState, outs: u8, balls: u8, strikes: u8) -> Self {
        Self {
            runners,
            outs,
            balls,
            strikes,
        }
    }

    /// Whether this state can exist immediately before a pitch.
    ///
    /// Records outside this range (three recorded outs, a four-ball or
    /// three-strike count) are excluded from aggregation and labeling.
    #[must_use]
    pub const fn is_valid_pre_pitch(&self) -> bool {
        self.outs <= Self::MAX_OUTS
            && self.balls <= Self::MAX_BALLS
            && self.strikes <= Self::MAX_STRIKES
    }

    /// Dense index in `0..NUM_GAME_STATES`, or `None` for states outside the
    /// valid pre-pitch range.
    ///
    /// The index orders states by occupancy bits, then outs, balls, strikes;
    /// iteration in index order is the deterministic table order.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        if !self.is_valid_pre_pitch() {
            return None;
        }
        let occupancy = usize::from(self.runners.occupancy_bits());
        let outs = usize::from(self.outs);
        let balls = usize::from(self.balls);
        let strikes = usize::from(self.strikes);
        Some(((occupancy * 3 + outs) * 4 + balls) * 3 + strikes)
    }

    /// Inverse of [`index`](Self::index).
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= NUM_GAME_STATES {
            return None;
        }
        let strikes = index % 3;
        let rest = index / 3;
        let balls = rest % 4;
        let rest = rest / 4;
        let outs = rest % 3;
        let occupancy = rest / 3;
        Some(Self {
            runners: RunnerState::from_occupancy_bits(occupancy as u8),
            outs: outs as u8,
            balls: balls as u8,
            strikes: strikes as u8,
        })
    }

    /// Iterates every valid pre-pitch state in index order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..NUM_GAME_STATES).filter_map(Self::from_index)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}-O{}-B{}-S{}",
            u8::from(self.runners.on_first),
            u8::from(self.runners.on_second),
            u8::from(self.runners.on_third),
            self.outs,
            self.balls,
            self.strikes,
        )
    }
}

impl FromStr for GameState {
    type Err = ParseGameStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fn flag(byte: u8) -> Result<bool, ParseGameStateError> {
            match byte {
                b'0' => Ok(false),
                b'1' => Ok(true),
                _ => Err(ParseGameStateError::MalformedKey),
            }
        }
        fn component(part: Option<&str>, prefix: u8) -> Result<u8, ParseGameStateError> {
            let part = part.ok_or(ParseGameStateError::MalformedKey)?;
            let [head, digit] = part.as_bytes() else {
                return Err(ParseGameStateError::MalformedKey);
            };
            if *head != prefix || !digit.is_ascii_digit() {
                return Err(ParseGameStateError::MalformedKey);
            }
            Ok(*digit - b'0')
        }

        let mut parts = s.split('-');
        let occupancy = parts.next().ok_or(ParseGameStateError::MalformedKey)?;
        let [r1, r2, r3] = occupancy.as_bytes() else {
            return Err(ParseGameStateError::MalformedKey);
        };
        let runners = RunnerState::new(flag(*r1)?, flag(*r2)?, flag(*r3)?);
        let outs = component(parts.next(), b'O')?;
        let balls = component(parts.next(), b'B')?;
        let strikes = component(parts.next(), b'S')?;
        if parts.next().is_some() {
            return Err(ParseGameStateError::MalformedKey);
        }

        let state = Self::new(runners, outs, balls, strikes);
        if !state.is_valid_pre_pitch() {
            return Err(ParseGameStateError::OutOfRange);
        }
        Ok(state)
    }
}

//! Per-state run-expectancy tallies and the finalized lookup table.

use runex_engine::{GameState, NUM_GAME_STATES};

/// Raw tallies for one game state.
///
/// Only raw sums live here so that tallies from disjoint shards can be merged
/// by addition. The derived mean and probability exist solely on
/// [`ExpectancyEntry`] after finalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateTally {
    /// Number of pitches observed in this state.
    pub count: u64,
    /// Sum of future runs over those pitches.
    pub total_runs: u64,
    /// Number of those pitches after which no further run scored in the
    /// half-inning.
    pub zero_runs: u64,
}

impl StateTally {
    fn add(&mut self, other: &Self) {
        self.count += other.count;
        self.total_runs += other.total_runs;
        self.zero_runs += other.zero_runs;
    }
}

/// Running run-expectancy tallies over the fixed game-state space.
///
/// One accumulator per shard (file, game, worker); shards merge with
/// [`merge`](Self::merge) and the combined result finalizes exactly once.
/// Backing storage is a dense array indexed by [`GameState::index`], so every
/// valid state exists from the start and "never observed" is a zero count,
/// not a missing key.
#[derive(Debug, Clone)]
pub struct ExpectancyAccumulator {
    tallies: Vec<StateTally>,
}

impl Default for ExpectancyAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpectancyAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tallies: vec![StateTally::default(); NUM_GAME_STATES],
        }
    }

    /// Tallies one observation: a pitch seen in `state` with `future_runs`
    /// scored later in the same half-inning.
    ///
    /// States outside the valid pre-pitch range are ignored; callers filter
    /// them out before aggregation and this keeps the reduction total.
    pub fn record(&mut self, state: &GameState, future_runs: u64) {
        let Some(index) = state.index() else {
            return;
        };
        let tally = &mut self.tallies[index];
        tally.count += 1;
        tally.total_runs += future_runs;
        if future_runs == 0 {
            tally.zero_runs += 1;
        }
    }

    /// Adds another shard's raw tallies into this one.
    ///
    /// Merging is associative and commutative, so any partitioning of the
    /// corpus produces the same final table.
    pub fn merge(&mut self, other: &Self) {
        for (tally, shard) in self.tallies.iter_mut().zip(&other.tallies) {
            tally.add(shard);
        }
    }

    /// Total number of observations tallied so far.
    #[must_use]
    pub fn total_samples(&self) -> u64 {
        self.tallies.iter().map(|tally| tally.count).sum()
    }

    /// Derives the expectancy table from the merged raw tallies.
    ///
    /// Division happens here and nowhere else: averaging per-shard means
    /// would weight unequal shards incorrectly.
    #[must_use]
    pub fn finalize(self) -> ExpectancyTable {
        let entries = self
            .tallies
            .iter()
            .enumerate()
            .map(|(index, tally)| {
                let state =
                    GameState::from_index(index).expect("tally array matches the state space");
                ExpectancyEntry::from_tally(state, tally)
            })
            .collect();
        ExpectancyTable { entries }
    }
}

/// Finalized aggregate for one game state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpectancyEntry {
    pub state: GameState,
    pub count: u64,
    pub total_runs: u64,
    /// Mean future runs from this state; zero when the state was never seen.
    pub expected_runs: f64,
    pub zero_runs: u64,
    /// Share of observations after which no further run scored.
    pub zero_run_probability: f64,
}

impl ExpectancyEntry {
    #[expect(clippy::cast_precision_loss)]
    fn from_tally(state: GameState, tally: &StateTally) -> Self {
        let (expected_runs, zero_run_probability) = if tally.count == 0 {
            (0.0, 0.0)
        } else {
            (
                tally.total_runs as f64 / tally.count as f64,
                tally.zero_runs as f64 / tally.count as f64,
            )
        };
        Self {
            state,
            count: tally.count,
            total_runs: tally.total_runs,
            expected_runs,
            zero_runs: tally.zero_runs,
            zero_run_probability,
        }
    }
}

/// Corpus-wide run-expectancy table, read-only after finalization.
#[derive(Debug, Clone)]
pub struct ExpectancyTable {
    entries: Vec<ExpectancyEntry>,
}

impl ExpectancyTable {
    /// The entry for `state`, including genuine zero-count entries.
    ///
    /// Returns `None` only for states outside the valid pre-pitch range.
    #[must_use]
    pub fn entry(&self, state: &GameState) -> Option<&ExpectancyEntry> {
        state.index().map(|index| &self.entries[index])
    }

    /// Expected future runs for `state`, or `None` when the state was never
    /// observed (or is out of range).
    #[must_use]
    pub fn expected_runs(&self, state: &GameState) -> Option<f64> {
        self.entry(state)
            .filter(|entry| entry.count > 0)
            .map(|entry| entry.expected_runs)
    }

    /// Probability of zero future runs for `state`, or `None` when unseen.
    #[must_use]
    pub fn zero_run_probability(&self, state: &GameState) -> Option<f64> {
        self.entry(state)
            .filter(|entry| entry.count > 0)
            .map(|entry| entry.zero_run_probability)
    }

    /// Entries actually observed in the corpus, in deterministic state-index
    /// order. This is the persisted view of the table.
    pub fn observed(&self) -> impl Iterator<Item = &ExpectancyEntry> {
        self.entries.iter().filter(|entry| entry.count > 0)
    }

    /// Builds an expected-runs lookup from the table itself.
    #[must_use]
    pub fn expected_runs_lookup(&self) -> ExpectedRunsLookup {
        let mut lookup = ExpectedRunsLookup::new();
        for entry in self.observed() {
            lookup.insert(&entry.state, entry.expected_runs);
        }
        lookup
    }
}

/// Expected-runs-per-state lookup used by the labeling pass.
///
/// Built either from a freshly finalized [`ExpectancyTable`] or from a
/// persisted summary file. States absent from the lookup are cold-start
/// gaps: the label pass surfaces them as null targets instead of failing.
#[derive(Debug, Clone)]
pub struct ExpectedRunsLookup {
    values: Vec<Option<f64>>,
}

impl Default for ExpectedRunsLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpectedRunsLookup {
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: vec![None; NUM_GAME_STATES],
        }
    }

    /// Registers the expected-runs value for `state`; out-of-range states
    /// are ignored.
    pub fn insert(&mut self, state: &GameState, expected_runs: f64) {
        if let Some(index) = state.index() {
            self.values[index] = Some(expected_runs);
        }
    }

    #[must_use]
    pub fn get(&self, state: &GameState) -> Option<f64> {
        state.index().and_then(|index| self.values[index])
    }

    /// Number of states with a known expected-runs value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.iter().filter(|value| value.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }
}

/// Rounds to four decimal places, the precision of every persisted float.
#[must_use]
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use runex_engine::RunnerState;

    use super::*;

    fn state(bits: u8, outs: u8, balls: u8, strikes: u8) -> GameState {
        GameState::new(RunnerState::from_occupancy_bits(bits), outs, balls, strikes)
    }

    #[test]
    fn test_record_and_finalize_single_state() {
        let s = state(0b000, 0, 0, 0);
        let mut acc = ExpectancyAccumulator::new();
        acc.record(&s, 2);
        acc.record(&s, 1);
        acc.record(&s, 0);

        let table = acc.finalize();
        let entry = table.entry(&s).unwrap();
        assert_eq!(entry.count, 3);
        assert_eq!(entry.total_runs, 3);
        assert_eq!(entry.zero_runs, 1);
        assert_relative_eq!(entry.expected_runs, 1.0);
        assert_relative_eq!(entry.zero_run_probability, 1.0 / 3.0);
    }

    #[test]
    fn test_unseen_state_is_zero_count_not_absent() {
        let acc = ExpectancyAccumulator::new();
        let table = acc.finalize();
        let s = state(0b111, 2, 3, 2);

        // The entry exists with a genuine zero count...
        assert_eq!(table.entry(&s).unwrap().count, 0);
        // ...but lookups report it as unknown.
        assert_eq!(table.expected_runs(&s), None);
        assert_eq!(table.zero_run_probability(&s), None);
    }

    #[test]
    fn test_out_of_range_observation_is_ignored() {
        let mut acc = ExpectancyAccumulator::new();
        acc.record(&state(0b000, 3, 0, 0), 5);
        acc.record(&state(0b000, 0, 0, 3), 5);
        assert_eq!(acc.total_samples(), 0);
    }

    #[test]
    fn test_merge_equals_pooled_totals_not_averaged_means() {
        let s = state(0b100, 1, 2, 1);

        // Shard A: 1 sample, 4 runs. Shard B: 3 samples, 0 runs.
        let mut shard_a = ExpectancyAccumulator::new();
        shard_a.record(&s, 4);
        let mut shard_b = ExpectancyAccumulator::new();
        for _ in 0..3 {
            shard_b.record(&s, 0);
        }

        let mut merged = ExpectancyAccumulator::new();
        merged.merge(&shard_a);
        merged.merge(&shard_b);
        let table = merged.finalize();

        // (4 + 0) / (1 + 3), not (4.0 + 0.0) / 2.
        assert_relative_eq!(table.expected_runs(&s).unwrap(), 1.0);
        assert_relative_eq!(table.zero_run_probability(&s).unwrap(), 0.75);
    }

    #[test]
    fn test_merge_is_order_independent() {
        let s1 = state(0b010, 0, 1, 0);
        let s2 = state(0b011, 2, 0, 2);

        let mut shard_a = ExpectancyAccumulator::new();
        shard_a.record(&s1, 1);
        shard_a.record(&s2, 3);
        let mut shard_b = ExpectancyAccumulator::new();
        shard_b.record(&s1, 0);

        let mut ab = ExpectancyAccumulator::new();
        ab.merge(&shard_a);
        ab.merge(&shard_b);
        let mut ba = ExpectancyAccumulator::new();
        ba.merge(&shard_b);
        ba.merge(&shard_a);

        let (ab, ba) = (ab.finalize(), ba.finalize());
        for st in GameState::all() {
            assert_eq!(ab.entry(&st), ba.entry(&st));
        }
    }

    #[test]
    fn test_observed_iterates_in_state_index_order() {
        let mut acc = ExpectancyAccumulator::new();
        acc.record(&state(0b111, 2, 3, 2), 0);
        acc.record(&state(0b000, 0, 0, 0), 1);
        acc.record(&state(0b010, 1, 0, 0), 0);

        let table = acc.finalize();
        let indices: Vec<usize> = table
            .observed()
            .map(|entry| entry.state.index().unwrap())
            .collect();
        let mut sorted = indices.clone();
        sorted.sort_unstable();
        assert_eq!(indices, sorted, "persisted order must be deterministic");
        assert_eq!(indices.len(), 3);
    }

    #[test]
    fn test_zero_run_probability_ordering_sanity() {
        // Empty bases with nobody out should go scoreless more often than
        // bases loaded with two outs, where any hit or walk scores.
        let empty = state(0b000, 0, 0, 0);
        let loaded = state(0b111, 2, 3, 2);

        let mut acc = ExpectancyAccumulator::new();
        for i in 0..100 {
            acc.record(&empty, u64::from(i % 4 == 0)); // scores 25% of the time
            acc.record(&loaded, u64::from(i % 3 > 0) * 2); // scores 67% of the time
        }

        let table = acc.finalize();
        assert!(
            table.zero_run_probability(&empty).unwrap()
                > table.zero_run_probability(&loaded).unwrap()
        );
    }

    #[test]
    fn test_expected_runs_lookup_round_trip() {
        let s = state(0b101, 2, 1, 2);
        let mut acc = ExpectancyAccumulator::new();
        acc.record(&s, 1);
        acc.record(&s, 0);

        let table = acc.finalize();
        let lookup = table.expected_runs_lookup();
        assert_eq!(lookup.len(), 1);
        assert_relative_eq!(lookup.get(&s).unwrap(), 0.5);
        assert_eq!(lookup.get(&state(0b000, 0, 0, 0)), None);
    }

    #[test]
    fn test_round4() {
        assert_relative_eq!(round4(0.123_45), 0.1235);
        assert_relative_eq!(round4(1.0 / 3.0), 0.3333);
        assert_relative_eq!(round4(-0.42), -0.42);
    }
}

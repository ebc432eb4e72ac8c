//! Delta-expected-runs training labels.

use runex_stats::expectancy::ExpectedRunsLookup;

use crate::enrich::EnrichedPitch;

/// Label values for one pitch.
///
/// Both fields are `None` when the pitch's state is missing from the
/// expected-runs lookup (a cold-start gap between the label corpus and the
/// table corpus); downstream consumers filter nulls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchLabel {
    /// Expected future runs for the pre-pitch state.
    pub expected_runs: Option<f64>,
    /// Change in expected runs caused by this pitch.
    pub target: Option<f64>,
}

/// Computes the training target for every pitch of one game.
///
/// `pitches` must already be filtered to countable states, in log order;
/// "next pitch" means the next surviving row, exactly as the labels are
/// consumed downstream.
///
/// For each pitch the target is `ER(next) - ER(current)`. When the next
/// pitch belongs to a different half-inning, or there is no next pitch, the
/// half-inning ends here and the target is `-ER(current)`: the state resets
/// to an implicit zero-value terminal state belonging to the other side.
/// An unknown current or next state yields a `None` target for that pitch
/// instead of failing the game.
#[must_use]
pub fn label_game(lookup: &ExpectedRunsLookup, pitches: &[EnrichedPitch]) -> Vec<PitchLabel> {
    pitches
        .iter()
        .enumerate()
        .map(|(i, pitch)| {
            let expected_runs = lookup.get(&pitch.state);
            let next = pitches.get(i + 1);
            let half_inning_ends =
                next.is_none_or(|next| next.half_inning() != pitch.half_inning());

            let target = expected_runs.and_then(|current| {
                if half_inning_ends {
                    Some(0.0 - current)
                } else {
                    let next = next.expect("half-inning continues, so a next pitch exists");
                    lookup.get(&next.state).map(|next_er| next_er - current)
                }
            });

            PitchLabel {
                expected_runs,
                target,
            }
        })
        .collect()
}

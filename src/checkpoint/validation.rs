//! Consistency checks for restored snapshots using Validation.

use crate::checkpoint::GameStateRecord;
use crate::core::{ActionKind, MatchParameters, Player, Seat};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// One way a snapshot can contradict itself or its parameters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SnapshotViolation {
    #[error("score limit must be at least 1")]
    ZeroScoreLimit,

    #[error("{player} has {score} points, limit is {limit}")]
    ScoreAtLimit { player: Player, score: u32, limit: u32 },

    #[error("game value {0} is not a power of two")]
    GameValueNotPowerOfTwo(u32),

    #[error("cube owner {owner} does not fit game value {value}")]
    CubeOwnerMismatch { owner: Player, value: u32 },

    #[error("{player} {budget} time {remaining_ms} ms exceeds the configured {configured_ms} ms")]
    TimeExceedsConfigured {
        player: Player,
        budget: &'static str,
        remaining_ms: u64,
        configured_ms: u64,
    },

    #[error("die value {0} is outside 1..=6")]
    DieOutOfRange(u8),

    #[error("start action names no starting player")]
    StartWithoutPlayer,

    #[error("{action} action has no acting player")]
    MissingActingPlayer { action: &'static str },

    #[error("snapshot of the current action: {0}")]
    InCurrentAction(Box<SnapshotViolation>),
}

type Check = Validation<(), NonEmptyVec<SnapshotViolation>>;

fn ensure(ok: bool, violation: impl FnOnce() -> SnapshotViolation) -> Check {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(violation())
    }
}

/// Scores, clocks and cube of one position. `wrap` tags where the position
/// came from.
fn check_position(
    params: &MatchParameters,
    seat: impl Fn(Player) -> Option<Seat>,
    value: u32,
    cube_owner: Player,
    wrap: fn(SnapshotViolation) -> SnapshotViolation,
) -> Vec<Check> {
    let mut checks = Vec::new();

    for player in [Player::One, Player::Two] {
        let Some(seat) = seat(player) else { continue };
        checks.push(ensure(seat.score < params.score_limit, || {
            wrap(SnapshotViolation::ScoreAtLimit {
                player,
                score: seat.score,
                limit: params.score_limit,
            })
        }));
        checks.push(ensure(
            seat.total_time_remaining_ms <= params.total_game_time_ms,
            || {
                wrap(SnapshotViolation::TimeExceedsConfigured {
                    player,
                    budget: "total",
                    remaining_ms: seat.total_time_remaining_ms,
                    configured_ms: params.total_game_time_ms,
                })
            },
        ));
        checks.push(ensure(
            seat.reserve_time_remaining_ms <= params.reserve_time_ms,
            || {
                wrap(SnapshotViolation::TimeExceedsConfigured {
                    player,
                    budget: "reserve",
                    remaining_ms: seat.reserve_time_remaining_ms,
                    configured_ms: params.reserve_time_ms,
                })
            },
        ));
    }

    checks.push(ensure(value.is_power_of_two(), || {
        wrap(SnapshotViolation::GameValueNotPowerOfTwo(value))
    }));
    checks.push(ensure(cube_owner.is_some() == (value >= 2), || {
        wrap(SnapshotViolation::CubeOwnerMismatch {
            owner: cube_owner,
            value,
        })
    }));

    checks
}

/// Check a decoded game state against its parameters, accumulating ALL
/// violations. The snapshot carried by the current action is checked as
/// well, since undo and redo copy it back verbatim.
pub fn validate_record(
    params: &MatchParameters,
    record: &GameStateRecord,
) -> Validation<(), NonEmptyVec<SnapshotViolation>> {
    let mut checks: Vec<Check> = Vec::new();

    checks.push(ensure(params.score_limit >= 1, || SnapshotViolation::ZeroScoreLimit));

    checks.extend(check_position(
        params,
        |player| Some(record.seat(player)),
        record.current_game_value,
        record.cube_owner,
        |violation| violation,
    ));

    let snapshot = record.current_action.snapshot();
    checks.extend(check_position(
        params,
        |player| snapshot.seat(player).copied(),
        snapshot.current_game_value,
        snapshot.cube_owner,
        |violation| SnapshotViolation::InCurrentAction(Box::new(violation)),
    ));

    let action = &record.current_action;
    match *action.kind() {
        ActionKind::Roll { die_one, die_two } => {
            for die in [die_one, die_two] {
                checks.push(ensure((1..=6).contains(&die), || {
                    SnapshotViolation::DieOutOfRange(die)
                }));
            }
        }
        ActionKind::Start { player_to_start } => {
            checks.push(ensure(player_to_start.is_some(), || {
                SnapshotViolation::StartWithoutPlayer
            }));
        }
        _ => {}
    }
    if !matches!(action.kind(), ActionKind::EndGame { .. }) {
        checks.push(ensure(action.acting_player().is_some(), || {
            SnapshotViolation::MissingActingPlayer {
                action: action.name(),
            }
        }));
    }

    // Accumulate ALL failures using all_vec
    Validation::all_vec(checks).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Action, GameState};

    #[test]
    fn fresh_state_is_valid() {
        let params = MatchParameters::default();
        let record = GameStateRecord::from(&GameState::new(&params));

        assert!(validate_record(&params, &record).is_success());
    }

    #[test]
    fn validation_accumulates_all_violations() {
        let params = MatchParameters::default();
        let mut state = GameState::new(&params);
        let recorded = state.snapshot(Player::One);
        state.player_one.score = 7;
        state.current_game_value = 3;
        state.player_two.reserve_time_remaining_ms = 20_000;
        state.current_action = Action::new(
            ActionKind::Roll {
                die_one: 0,
                die_two: 4,
            },
            recorded,
        );
        let record = GameStateRecord::from(&state);

        match validate_record(&params, &record) {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 5);

                let has_score = errors
                    .iter()
                    .any(|e| matches!(e, SnapshotViolation::ScoreAtLimit { .. }));
                let has_value = errors
                    .iter()
                    .any(|e| matches!(e, SnapshotViolation::GameValueNotPowerOfTwo(3)));
                let has_owner = errors
                    .iter()
                    .any(|e| matches!(e, SnapshotViolation::CubeOwnerMismatch { .. }));
                let has_time = errors
                    .iter()
                    .any(|e| matches!(e, SnapshotViolation::TimeExceedsConfigured { .. }));
                let has_die = errors
                    .iter()
                    .any(|e| matches!(e, SnapshotViolation::DieOutOfRange(0)));

                assert!(has_score);
                assert!(has_value);
                assert!(has_owner);
                assert!(has_time);
                assert!(has_die);
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn owned_cube_needs_a_doubled_value() {
        let params = MatchParameters::default();
        let mut state = GameState::new(&params);
        state.cube_owner = Player::Two;
        let record = GameStateRecord::from(&state);

        assert!(validate_record(&params, &record).is_failure());

        state.current_game_value = 2;
        let record = GameStateRecord::from(&state);
        assert!(validate_record(&params, &record).is_success());
    }

    #[test]
    fn corrupt_action_snapshot_is_rejected() {
        let params = MatchParameters::default();
        let state = GameState::new(&params);
        let mut snapshot = state.snapshot(Player::One);
        snapshot.current_game_value = 3;
        snapshot.player_one.score = 99;
        snapshot.player_one.total_time_remaining_ms = 9_999_999;

        let mut record = GameStateRecord::from(&state);
        record.current_action = Action::new(ActionKind::EndTurn, snapshot);

        match validate_record(&params, &record) {
            Validation::Failure(errors) => {
                let nested: Vec<&SnapshotViolation> = errors
                    .iter()
                    .filter_map(|e| match e {
                        SnapshotViolation::InCurrentAction(inner) => Some(inner.as_ref()),
                        _ => None,
                    })
                    .collect();

                assert_eq!(nested.len(), errors.len());
                assert!(nested.contains(&&SnapshotViolation::GameValueNotPowerOfTwo(3)));
                assert!(nested
                    .iter()
                    .any(|e| matches!(e, SnapshotViolation::ScoreAtLimit { score: 99, .. })));
                assert!(nested.iter().any(|e| matches!(
                    e,
                    SnapshotViolation::TimeExceedsConfigured { budget: "total", .. }
                )));
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn recorded_actions_of_a_real_game_are_valid() {
        let params = MatchParameters::default();
        let mut state = GameState::new(&params);
        state.current_game_value = 2;
        state.cube_owner = Player::Two;
        state.current_action = Action::new(
            ActionKind::TakeDouble {
                player_taking: Player::Two,
                previous_game_value: 1,
                current_game_value: 2,
            },
            state.snapshot(Player::Two),
        );
        let record = GameStateRecord::from(&state);

        assert!(validate_record(&params, &record).is_success());
    }
}

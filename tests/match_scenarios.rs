//! End-to-end match flows driven through the public API.

use backgammon_clock::checkpoint::{load_from, save_to, MemoryStore};
use backgammon_clock::core::{Action, ActionKind, MatchParameters, Player, StartPolicy, TurnPhase};
use backgammon_clock::effects::{GameMachine, ManualEnvironment};
use backgammon_clock::enforcement::{Feature, GameError};
use backgammon_clock::observer::{Field, FieldChange};
use std::sync::{Arc, Mutex};

fn clicker_starts() -> MatchParameters {
    MatchParameters {
        start_policy: StartPolicy::ClickerStarts,
        reserve_time_ms: 10_000,
        total_game_time_ms: 600_000,
        score_limit: 7,
        ..MatchParameters::default()
    }
}

fn machine() -> GameMachine<ManualEnvironment> {
    GameMachine::new(clicker_starts(), ManualEnvironment::seeded(11))
}

fn record_changes(machine: &mut GameMachine<ManualEnvironment>) -> Arc<Mutex<Vec<FieldChange>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    machine.subscribe(move |change| sink.lock().unwrap().push(change.clone()));
    seen
}

#[test]
fn scenario_a_start_roll_end_turn() {
    let mut m = machine();

    m.start(Player::One).unwrap();
    assert_eq!(
        m.state().current_action.kind(),
        &ActionKind::Start {
            player_to_start: Player::One
        }
    );

    let (one, two) = m.roll(Player::One).unwrap();
    assert!((1..=6).contains(&one));
    assert!((1..=6).contains(&two));
    assert_eq!(m.state().current_action.acting_player(), Player::One);
    assert_eq!(
        m.state().current_action.kind(),
        &ActionKind::Roll {
            die_one: one,
            die_two: two
        }
    );

    m.end_turn(Player::One).unwrap();
    assert_eq!(m.state().current_action.kind(), &ActionKind::EndTurn);
    assert_eq!(m.state().current_action.acting_player(), Player::One);
    assert_eq!(m.phase(), TurnPhase::PlayerTwoTurn);
}

#[test]
fn scenario_b_offer_and_take() {
    let mut m = machine();
    m.start(Player::One).unwrap();
    assert_eq!(m.state().current_game_value, 1);

    m.offer_double(Player::One).unwrap();
    assert_eq!(
        m.state().current_action.kind(),
        &ActionKind::OfferDouble { new_game_value: 2 }
    );

    m.take_double(Player::Two).unwrap();
    assert_eq!(
        m.state().current_action.kind(),
        &ActionKind::TakeDouble {
            player_taking: Player::Two,
            previous_game_value: 1,
            current_game_value: 2,
        }
    );
    assert_eq!(m.state().current_game_value, 2);
}

#[test]
fn scenario_c_concession_wins_the_match() {
    let mut m = machine();

    m.start(Player::One).unwrap();
    m.propose_concession(Player::Two, 5).unwrap();
    m.accept_concession(Player::One).unwrap();
    assert_eq!(m.state().player_one.score, 5);
    assert_eq!(m.state().player_one.games, 1);

    m.start(Player::Two).unwrap();
    m.offer_double(Player::Two).unwrap();
    m.take_double(Player::One).unwrap();
    let seen = record_changes(&mut m);

    m.propose_concession(Player::Two, 2).unwrap();
    m.accept_concession(Player::One).unwrap();

    let action = &m.state().current_action;
    assert_eq!(action.kind(), &ActionKind::EndGame { points: 2 });
    assert_eq!(action.acting_player(), Player::One);

    let state = m.state();
    assert_eq!(state.player_one.games, 2);
    assert_eq!(state.player_one.score, 0);
    assert_eq!(state.player_two.score, 0);
    assert_eq!(state.current_game_value, 1);
    assert_eq!(state.cube_owner, Player::None);
    assert_eq!(state.player_one.total_time_remaining_ms, 600_000);

    let seen = seen.lock().unwrap();
    let winner = seen
        .iter()
        .find(|change| change.field == Field::MatchWinner)
        .expect("match winner notification");
    assert_eq!(winner.value["winner"], "ONE");
    assert_eq!(winner.value["finalScore"], 7);
}

#[test]
fn scenario_d_two_rolls_undone() {
    let mut m = machine();
    m.start(Player::One).unwrap();
    let before = m.state().clone();

    m.roll(Player::One).unwrap();
    m.roll(Player::One).unwrap();
    m.undo().unwrap();
    m.undo().unwrap();

    let state = m.state();
    assert_eq!(state.current_action, before.current_action);
    assert_eq!(state.player_one, before.player_one);
    assert_eq!(state.player_two, before.player_two);
    assert_eq!(state.current_game_value, before.current_game_value);
    assert_eq!(state.cube_owner, before.cube_owner);
    assert_eq!(m.phase(), TurnPhase::PlayerOneTurn);
}

#[test]
fn dropped_double_pays_the_offerer() {
    let mut m = machine();
    m.start(Player::One).unwrap();
    m.offer_double(Player::One).unwrap();
    m.take_double(Player::Two).unwrap();
    m.roll(Player::One).unwrap();
    m.end_turn(Player::One).unwrap();

    m.offer_double(Player::Two).unwrap();
    m.drop_double(Player::One).unwrap();

    assert_eq!(m.state().player_two.score, 2);
    assert_eq!(m.state().player_two.games, 1);
    assert_eq!(m.state().current_game_value, 1);
    assert_eq!(m.phase(), TurnPhase::NoGame);
}

#[test]
fn only_the_cube_owner_redoubles() {
    let mut m = machine();
    m.start(Player::One).unwrap();
    m.offer_double(Player::One).unwrap();
    m.take_double(Player::Two).unwrap();
    m.roll(Player::One).unwrap();
    m.end_turn(Player::One).unwrap();
    m.roll(Player::Two).unwrap();
    m.end_turn(Player::Two).unwrap();

    assert!(!m.can_offer_double(Player::One));
    assert!(matches!(
        m.offer_double(Player::One),
        Err(GameError::InvalidTransition { .. })
    ));
}

#[test]
fn disabled_cube_is_reported() {
    let params = MatchParameters {
        use_cube: false,
        ..clicker_starts()
    };
    let mut m = GameMachine::new(params, ManualEnvironment::seeded(1));
    m.start(Player::One).unwrap();

    assert_eq!(
        m.offer_double(Player::One),
        Err(GameError::FeatureDisabled {
            operation: "offer double",
            feature: Feature::Cube,
        })
    );
}

#[test]
fn game_without_dice_ends_turns_directly() {
    let params = MatchParameters {
        use_dice: false,
        ..clicker_starts()
    };
    let mut m = GameMachine::new(params, ManualEnvironment::seeded(1));
    m.start(Player::Two).unwrap();

    assert!(m.roll(Player::Two).is_err());
    m.end_turn(Player::Two).unwrap();
    assert_eq!(m.phase(), TurnPhase::PlayerOneTurn);
}

#[test]
fn conceding_the_match_awards_exactly_enough() {
    let mut m = machine();
    m.start(Player::One).unwrap();
    m.propose_concession(Player::One, 3).unwrap();
    m.accept_concession(Player::Two).unwrap();
    assert_eq!(m.state().player_two.score, 3);

    m.start(Player::One).unwrap();
    m.concede_match(Player::One).unwrap();

    assert_eq!(
        m.state().current_action.kind(),
        &ActionKind::EndGame { points: 4 }
    );
    assert_eq!(m.state().player_two.games, 2);
    assert_eq!(m.state().player_two.score, 0);
}

#[test]
fn first_game_random_then_clicker_starts() {
    let params = MatchParameters {
        start_policy: StartPolicy::FirstGameRandom,
        ..clicker_starts()
    };
    let env = ManualEnvironment::seeded(0).with_coins([false, true, true]);
    let mut m = GameMachine::new(params, env);

    assert_eq!(m.start(Player::One), Ok(Player::Two));
    m.propose_concession(Player::One, 1).unwrap();
    m.accept_concession(Player::Two).unwrap();

    assert_eq!(m.start(Player::Two), Ok(Player::Two));
}

#[test]
fn paused_game_refuses_every_input() {
    let mut m = machine();
    m.start(Player::One).unwrap();
    m.pause().unwrap();

    assert!(m.roll(Player::One).is_err());
    assert!(m.offer_double(Player::One).is_err());
    assert!(m.propose_concession(Player::Two, 1).is_err());
    assert!(m.concede_match(Player::Two).is_err());
    assert!(m.pause().is_err());

    m.resume().unwrap();
    assert!(m.roll(Player::One).is_ok());
}

#[test]
fn new_action_after_undo_drops_the_redo_branch() {
    let mut m = machine();
    m.start(Player::One).unwrap();
    m.roll(Player::One).unwrap();
    m.undo().unwrap();
    assert!(m.can_redo());

    m.resume().unwrap();
    m.offer_double(Player::One).unwrap();

    assert!(!m.can_redo());
    assert_eq!(m.phase(), TurnPhase::DoubleOfferedToTwo);
}

#[test]
fn saved_match_resumes_paused_in_place() {
    let mut m = machine();
    m.start(Player::One).unwrap();
    m.offer_double(Player::One).unwrap();
    m.take_double(Player::Two).unwrap();
    m.run_for(4_000);

    let mut store = MemoryStore::new();
    save_to(&mut store, &m.serialize()).unwrap();
    let snapshot = load_from(&store).unwrap().unwrap();

    let mut restored = GameMachine::new(MatchParameters::default(), ManualEnvironment::seeded(5));
    restored.restore(&snapshot).unwrap();

    assert_eq!(restored.params(), m.params());
    assert_eq!(restored.phase(), TurnPhase::PlayerOneTurn);
    assert_eq!(restored.state().current_game_value, 2);
    assert_eq!(restored.state().cube_owner, Player::Two);
    assert_eq!(
        restored.state().player_one.reserve_time_remaining_ms,
        m.state().player_one.reserve_time_remaining_ms
    );
    assert!(restored.state().is_paused);
    assert_eq!(restored.armed_player(), Player::None);

    restored.undo().unwrap();
    assert_eq!(restored.phase(), TurnPhase::NoGame);
    assert_eq!(restored.state().current_game_value, 1);
    assert_eq!(restored.state().cube_owner, Player::None);
    assert_eq!(restored.state().player_one.score, m.state().player_one.score);
}

#[test]
fn corrupt_action_snapshot_is_not_adopted() {
    let mut m = machine();
    m.start(Player::One).unwrap();
    m.roll(Player::One).unwrap();
    m.end_turn(Player::One).unwrap();

    let mut snapshot = m.serialize();
    let mut recorded = *snapshot.game_state.current_action.snapshot();
    recorded.current_game_value = 3;
    recorded.player_one.score = 99;
    recorded.player_one.total_time_remaining_ms = 9_999_999;
    snapshot.game_state.current_action = Action::new(ActionKind::EndTurn, recorded);

    let mut restored = GameMachine::new(clicker_starts(), ManualEnvironment::seeded(5));
    assert!(restored.restore(&snapshot).is_err());

    assert_eq!(restored.phase(), TurnPhase::NoGame);
    assert!(!restored.can_undo());
    assert!(!restored.can_redo());
    assert_eq!(restored.state().current_game_value, 1);
    assert_eq!(restored.state().player_one.score, 0);
}

#[test]
fn corrupt_snapshot_falls_back_to_defaults() {
    let mut m = machine();
    m.start(Player::One).unwrap();
    let mut snapshot = m.serialize();
    snapshot.game_state.current_game_value = 3;
    snapshot.match_parameters.score_limit = 11;

    let mut restored = GameMachine::new(clicker_starts(), ManualEnvironment::seeded(5));
    assert!(restored.restore(&snapshot).is_err());

    assert_eq!(restored.params(), &MatchParameters::default());
    assert_eq!(restored.phase(), TurnPhase::NoGame);
    assert_eq!(restored.state().current_game_value, 1);
    assert!(!restored.can_undo());
}

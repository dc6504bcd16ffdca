//! The mutable game aggregate.

use super::action::{Action, Seat, Snapshot};
use super::params::MatchParameters;
use super::player::Player;
use super::state::TurnPhase;
use serde::{Deserialize, Serialize};

/// A concession waiting for the opponent's answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concession {
    pub conceding: Player,
    pub points: u32,
}

impl Concession {
    /// The player who would collect the points.
    pub fn beneficiary(&self) -> Player {
        self.conceding.opponent()
    }
}

/// Everything that changes while a match is played.
///
/// The game machine owns the only instance and is the only writer; every
/// write goes through its diff-and-notify path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub current_action: Action,
    pub current_game_value: u32,
    pub cube_owner: Player,
    pub player_one: Seat,
    pub player_two: Seat,
    pub force_stop_timer: bool,
    pub is_paused: bool,
    pub pending_concession: Option<Concession>,
}

impl GameState {
    /// Fresh state for a new match: full clocks, no points, centred cube.
    pub fn new(params: &MatchParameters) -> Self {
        let seat = Seat::fresh(params.total_game_time_ms, params.reserve_time_ms);
        let snapshot = Snapshot {
            acting_player: Player::None,
            player_one: seat,
            player_two: seat,
            current_game_value: 1,
            cube_owner: Player::None,
        };
        Self::from_snapshot(Action::sentinel(snapshot))
    }

    /// State whose replayable fields are taken verbatim from `action`.
    pub fn from_snapshot(action: Action) -> Self {
        let snapshot = *action.snapshot();
        Self {
            current_action: action,
            current_game_value: snapshot.current_game_value,
            cube_owner: snapshot.cube_owner,
            player_one: snapshot.player_one,
            player_two: snapshot.player_two,
            force_stop_timer: true,
            is_paused: false,
            pending_concession: None,
        }
    }

    /// Overwrite the replayable fields with those recorded in `action`.
    pub fn replay(&mut self, action: &Action) {
        let snapshot = action.snapshot();
        self.current_action = action.clone();
        self.current_game_value = snapshot.current_game_value;
        self.cube_owner = snapshot.cube_owner;
        self.player_one = snapshot.player_one;
        self.player_two = snapshot.player_two;
        self.pending_concession = None;
    }

    /// Freeze the current facts, attributing them to `acting`.
    pub fn snapshot(&self, acting: Player) -> Snapshot {
        Snapshot {
            acting_player: acting,
            player_one: self.player_one,
            player_two: self.player_two,
            current_game_value: self.current_game_value,
            cube_owner: self.cube_owner,
        }
    }

    pub fn phase(&self) -> TurnPhase {
        TurnPhase::after(&self.current_action)
    }

    pub fn seat(&self, player: Player) -> Option<&Seat> {
        match player {
            Player::One => Some(&self.player_one),
            Player::Two => Some(&self.player_two),
            Player::None => None,
        }
    }

    pub fn seat_mut(&mut self, player: Player) -> Option<&mut Seat> {
        match player {
            Player::One => Some(&mut self.player_one),
            Player::Two => Some(&mut self.player_two),
            Player::None => None,
        }
    }

    pub fn score(&self, player: Player) -> u32 {
        self.seat(player).map_or(0, |seat| seat.score)
    }

    /// Both scores are zero: no game of this match has been decided yet.
    pub fn is_first_game(&self) -> bool {
        self.player_one.score == 0 && self.player_two.score == 0
    }
}

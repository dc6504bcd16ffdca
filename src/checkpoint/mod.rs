//! Snapshot and restore for a match in progress.
//!
//! A [`MatchSnapshot`] holds the match parameters and a flat record of the
//! game state, enough to bring a match back after the host restarts. The
//! undo/redo history and the running clock are not part of it: a restored
//! match has a fresh history and, when a game is in progress, comes back
//! paused.

use crate::core::{Action, GameState, MatchParameters, Player, Seat};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stillwater::validation::Validation;
use tracing::warn;
use uuid::Uuid;

pub mod error;
pub mod store;
pub mod validation;

pub use error::CheckpointError;
pub use store::{load_from, save_to, KeyValueStore, MemoryStore, GAME_STATE_KEY, PARAMETERS_KEY};
pub use validation::{validate_record, SnapshotViolation};

/// Version identifier for snapshot format
pub const CHECKPOINT_VERSION: u32 = 1;

/// The persisted game state, one flat key per field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateRecord {
    pub current_action: Action,
    pub current_game_value: u32,
    pub cube_owner: Player,
    pub player_one_games: u32,
    pub player_one_score: u32,
    pub player_one_total_time_remaining_ms: u64,
    pub player_one_reserve_time_remaining_ms: u64,
    pub player_two_games: u32,
    pub player_two_score: u32,
    pub player_two_total_time_remaining_ms: u64,
    pub player_two_reserve_time_remaining_ms: u64,
    pub force_stop_timer: bool,
    pub is_paused: bool,
}

impl GameStateRecord {
    /// The seat of `player`; `Player::None` yields an empty seat.
    pub fn seat(&self, player: Player) -> Seat {
        match player {
            Player::One => Seat {
                games: self.player_one_games,
                score: self.player_one_score,
                total_time_remaining_ms: self.player_one_total_time_remaining_ms,
                reserve_time_remaining_ms: self.player_one_reserve_time_remaining_ms,
            },
            Player::Two => Seat {
                games: self.player_two_games,
                score: self.player_two_score,
                total_time_remaining_ms: self.player_two_total_time_remaining_ms,
                reserve_time_remaining_ms: self.player_two_reserve_time_remaining_ms,
            },
            Player::None => Seat::default(),
        }
    }

    /// Rebuild the game state with the clock stopped. A game in progress
    /// comes back paused.
    pub fn into_state(self) -> GameState {
        let player_one = self.seat(Player::One);
        let player_two = self.seat(Player::Two);
        let mut state = GameState::from_snapshot(self.current_action);
        state.current_game_value = self.current_game_value;
        state.cube_owner = self.cube_owner;
        state.player_one = player_one;
        state.player_two = player_two;
        state.force_stop_timer = true;
        state.is_paused = state.phase().in_game();
        state
    }
}

impl From<&GameState> for GameStateRecord {
    fn from(state: &GameState) -> Self {
        Self {
            current_action: state.current_action.clone(),
            current_game_value: state.current_game_value,
            cube_owner: state.cube_owner,
            player_one_games: state.player_one.games,
            player_one_score: state.player_one.score,
            player_one_total_time_remaining_ms: state.player_one.total_time_remaining_ms,
            player_one_reserve_time_remaining_ms: state.player_one.reserve_time_remaining_ms,
            player_two_games: state.player_two.games,
            player_two_score: state.player_two.score,
            player_two_total_time_remaining_ms: state.player_two.total_time_remaining_ms,
            player_two_reserve_time_remaining_ms: state.player_two.reserve_time_remaining_ms,
            force_stop_timer: state.force_stop_timer,
            is_paused: state.is_paused,
        }
    }
}

/// Serializable snapshot of a match.
/// Does NOT include the undo/redo history or timer handles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSnapshot {
    /// Snapshot format version
    pub version: u32,

    /// Unique snapshot identifier
    pub id: String,

    /// When the snapshot was taken
    pub timestamp: DateTime<Utc>,

    pub match_parameters: MatchParameters,

    pub game_state: GameStateRecord,
}

impl MatchSnapshot {
    /// Snapshot `params` and `state` now.
    pub fn capture(params: &MatchParameters, state: &GameState) -> Self {
        Self::from_records(params.clone(), GameStateRecord::from(state))
    }

    pub fn from_records(match_parameters: MatchParameters, game_state: GameStateRecord) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            match_parameters,
            game_state,
        }
    }

    /// Check the version, then every consistency rule at once.
    pub fn validate(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        match validate_record(&self.match_parameters, &self.game_state) {
            Validation::Success(_) => Ok(()),
            Validation::Failure(errors) => {
                for violation in errors.iter() {
                    warn!(snapshot = %self.id, %violation, "snapshot violation");
                }
                Err(CheckpointError::CorruptSnapshot {
                    violations: errors.iter().cloned().collect(),
                })
            }
        }
    }

    /// Validate and split into parameters and a restorable game state.
    pub fn to_parts(&self) -> Result<(MatchParameters, GameState), CheckpointError> {
        self.validate()?;
        Ok((
            self.match_parameters.clone(),
            self.game_state.clone().into_state(),
        ))
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        serde_json::from_str(json).map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        bincode::deserialize(bytes).map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))
    }
}

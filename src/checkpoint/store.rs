//! Key-value persistence of snapshots.
//!
//! The parameters and the game state are stored as two JSON documents under
//! fixed keys, so a settings screen can read the parameters without the
//! rest of the match.

use crate::checkpoint::{CheckpointError, GameStateRecord, MatchSnapshot};
use crate::core::{GameState, MatchParameters};
use std::collections::HashMap;
use tracing::debug;

pub const PARAMETERS_KEY: &str = "matchParameters";
pub const GAME_STATE_KEY: &str = "gameState";

/// A string-to-string store such as browser local storage or a file.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, CheckpointError>;

    fn set(&mut self, key: &str, value: String) -> Result<(), CheckpointError>;
}

/// In-process store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CheckpointError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), CheckpointError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, CheckpointError> {
    serde_json::to_string(value).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
}

fn from_json<T: serde::de::DeserializeOwned>(json: &str) -> Result<T, CheckpointError> {
    serde_json::from_str(json).map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))
}

/// Write both records of `snapshot`.
pub fn save_to<S: KeyValueStore + ?Sized>(
    store: &mut S,
    snapshot: &MatchSnapshot,
) -> Result<(), CheckpointError> {
    store.set(PARAMETERS_KEY, to_json(&snapshot.match_parameters)?)?;
    store.set(GAME_STATE_KEY, to_json(&snapshot.game_state)?)?;
    debug!(snapshot = %snapshot.id, "snapshot saved");
    Ok(())
}

/// Read a snapshot back. `Ok(None)` when nothing was ever saved; a missing
/// half is filled with defaults.
pub fn load_from<S: KeyValueStore + ?Sized>(
    store: &S,
) -> Result<Option<MatchSnapshot>, CheckpointError> {
    let params_json = store.get(PARAMETERS_KEY)?;
    let state_json = store.get(GAME_STATE_KEY)?;
    if params_json.is_none() && state_json.is_none() {
        return Ok(None);
    }

    let params: MatchParameters = match params_json {
        Some(json) => from_json(&json)?,
        None => MatchParameters::default(),
    };
    let state = match state_json {
        Some(json) => from_json(&json)?,
        None => GameStateRecord::from(&GameState::new(&params)),
    };
    Ok(Some(MatchSnapshot::from_records(params, state)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StartPolicy;

    #[test]
    fn empty_store_loads_nothing() {
        let store = MemoryStore::new();
        assert_eq!(load_from(&store), Ok(None));
    }

    #[test]
    fn save_writes_both_keys() {
        let params = MatchParameters::default();
        let snapshot = MatchSnapshot::capture(&params, &GameState::new(&params));
        let mut store = MemoryStore::new();

        save_to(&mut store, &snapshot).unwrap();

        assert_eq!(store.len(), 2);
        let loaded = load_from(&store).unwrap().unwrap();
        assert_eq!(loaded.match_parameters, snapshot.match_parameters);
        assert_eq!(loaded.game_state, snapshot.game_state);
    }

    #[test]
    fn legacy_parameter_keys_are_accepted() {
        let mut store = MemoryStore::new();
        let legacy = r#"{
            "playerOneName": "Ana",
            "playerTwoName": "Ben",
            "useCube": true,
            "useDice": false,
            "useTimer": true,
            "startType": "PLAYER_THAT_CLICKS",
            "totalGameTimeMs": 300000,
            "reserveTimeMs": 5000,
            "scoreLimit": 5
        }"#;
        store.set(PARAMETERS_KEY, legacy.to_string()).unwrap();

        let loaded = load_from(&store).unwrap().unwrap();

        assert_eq!(loaded.match_parameters.start_policy, StartPolicy::ClickerStarts);
        assert_eq!(loaded.game_state.player_one_total_time_remaining_ms, 300_000);
        assert!(loaded.validate().is_ok());
    }

    #[test]
    fn unreadable_state_is_an_error() {
        let mut store = MemoryStore::new();
        store.set(GAME_STATE_KEY, "not json".to_string()).unwrap();

        assert!(matches!(
            load_from(&store),
            Err(CheckpointError::DeserializationFailed(_))
        ));
    }
}

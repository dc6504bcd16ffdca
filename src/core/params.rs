//! Static configuration of a match.

use serde::{Deserialize, Serialize};

pub const ONE_SECOND_MS: u64 = 1_000;
pub const DEFAULT_TOTAL_GAME_TIME_MS: u64 = 600_000;
pub const DEFAULT_RESERVE_TIME_MS: u64 = 10_000;
pub const DEFAULT_SCORE_LIMIT: u32 = 7;

/// How the first player of a game is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StartPolicy {
    /// Every game starts with a coin flip.
    #[default]
    AlwaysRandom,
    /// Coin flip while both scores are zero, afterwards the clicker starts.
    FirstGameRandom,
    /// Whoever presses start moves first.
    #[serde(alias = "PLAYER_THAT_CLICKS")]
    ClickerStarts,
}

/// Match configuration.
///
/// Read-only to the game machine; the settings collaborator replaces it
/// wholesale through [`GameMachine::apply_parameters`](crate::effects::GameMachine::apply_parameters).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchParameters {
    pub player_one_name: String,
    pub player_two_name: String,
    pub use_cube: bool,
    pub use_dice: bool,
    pub use_timer: bool,
    #[serde(alias = "startType")]
    pub start_policy: StartPolicy,
    pub total_game_time_ms: u64,
    pub reserve_time_ms: u64,
    pub score_limit: u32,
}

impl Default for MatchParameters {
    fn default() -> Self {
        Self {
            player_one_name: "Player One".to_string(),
            player_two_name: "Player Two".to_string(),
            use_cube: true,
            use_dice: true,
            use_timer: true,
            start_policy: StartPolicy::AlwaysRandom,
            total_game_time_ms: DEFAULT_TOTAL_GAME_TIME_MS,
            reserve_time_ms: DEFAULT_RESERVE_TIME_MS,
            score_limit: DEFAULT_SCORE_LIMIT,
        }
    }
}

impl MatchParameters {
    /// Whether the start of the next game should be decided by a coin flip,
    /// given that both scores are zero or not.
    pub fn starts_randomly(&self, first_game: bool) -> bool {
        match self.start_policy {
            StartPolicy::AlwaysRandom => true,
            StartPolicy::FirstGameRandom => first_game,
            StartPolicy::ClickerStarts => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_a_ten_minute_game_to_seven() {
        let params = MatchParameters::default();
        assert_eq!(params.total_game_time_ms, 600_000);
        assert_eq!(params.reserve_time_ms, 10_000);
        assert_eq!(params.score_limit, 7);
        assert!(params.use_cube && params.use_dice && params.use_timer);
    }

    #[test]
    fn start_policy_decides_coin_flip() {
        let mut params = MatchParameters::default();
        assert!(params.starts_randomly(false));

        params.start_policy = StartPolicy::FirstGameRandom;
        assert!(params.starts_randomly(true));
        assert!(!params.starts_randomly(false));

        params.start_policy = StartPolicy::ClickerStarts;
        assert!(!params.starts_randomly(true));
    }

    #[test]
    fn accepts_legacy_start_keys() {
        let json = r#"{
            "playerOneName": "A", "playerTwoName": "B",
            "useCube": true, "useDice": false, "useTimer": true,
            "startType": "PLAYER_THAT_CLICKS",
            "totalGameTimeMs": 60000, "reserveTimeMs": 5000, "scoreLimit": 3
        }"#;
        let params: MatchParameters = serde_json::from_str(json).unwrap();
        assert_eq!(params.start_policy, StartPolicy::ClickerStarts);
        assert!(!params.use_dice);
    }

    #[test]
    fn missing_fields_are_rejected() {
        let result: Result<MatchParameters, _> = serde_json::from_str(r#"{"scoreLimit": 3}"#);
        assert!(result.is_err());
    }
}

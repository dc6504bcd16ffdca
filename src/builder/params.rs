//! Builder for match parameters.

use crate::builder::error::BuildError;
use crate::core::{MatchParameters, StartPolicy};
use std::time::Duration;

/// Check the invariants `MatchParameters` cannot express in its types.
pub fn validate_parameters(params: &MatchParameters) -> Result<(), BuildError> {
    if params.score_limit == 0 {
        return Err(BuildError::InvalidScoreLimit(params.score_limit));
    }
    Ok(())
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Builder for [`MatchParameters`] with a fluent API.
///
/// Starts from the defaults; every setter is optional.
///
/// # Example
///
/// ```
/// use backgammon_clock::builder::MatchParametersBuilder;
/// use backgammon_clock::core::StartPolicy;
/// use std::time::Duration;
///
/// let params = MatchParametersBuilder::new()
///     .names("Ana", "Ben")
///     .start_policy(StartPolicy::ClickerStarts)
///     .total_game_time(Duration::from_secs(300))
///     .score_limit(5)
///     .build()
///     .unwrap();
///
/// assert_eq!(params.total_game_time_ms, 300_000);
/// assert_eq!(params.player_two_name, "Ben");
/// ```
#[derive(Clone, Debug, Default)]
pub struct MatchParametersBuilder {
    params: MatchParameters,
}

impl MatchParametersBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing parameters.
    pub fn from_parameters(params: MatchParameters) -> Self {
        Self { params }
    }

    pub fn names(mut self, player_one: impl Into<String>, player_two: impl Into<String>) -> Self {
        self.params.player_one_name = player_one.into();
        self.params.player_two_name = player_two.into();
        self
    }

    pub fn use_cube(mut self, enabled: bool) -> Self {
        self.params.use_cube = enabled;
        self
    }

    pub fn use_dice(mut self, enabled: bool) -> Self {
        self.params.use_dice = enabled;
        self
    }

    pub fn use_timer(mut self, enabled: bool) -> Self {
        self.params.use_timer = enabled;
        self
    }

    pub fn start_policy(mut self, policy: StartPolicy) -> Self {
        self.params.start_policy = policy;
        self
    }

    pub fn total_game_time(mut self, time: Duration) -> Self {
        self.params.total_game_time_ms = millis(time);
        self
    }

    pub fn reserve_time(mut self, time: Duration) -> Self {
        self.params.reserve_time_ms = millis(time);
        self
    }

    pub fn score_limit(mut self, limit: u32) -> Self {
        self.params.score_limit = limit;
        self
    }

    /// Build the parameters.
    /// Returns an error if the score limit is zero.
    pub fn build(self) -> Result<MatchParameters, BuildError> {
        validate_parameters(&self.params)?;
        Ok(self.params)
    }
}

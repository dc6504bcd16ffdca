//! Names of observable fields.

use crate::core::Player;
use std::fmt;

/// An observable field of the game state or the match parameters.
///
/// [`Field::name`] matches the key the field is persisted under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    CurrentAction,
    Phase,
    CurrentGameValue,
    CubeOwner,
    Games(Player),
    Score(Player),
    TotalTimeRemaining(Player),
    ReserveTimeRemaining(Player),
    ForceStopTimer,
    IsPaused,
    PendingConcession,
    /// Emitted once when a player reaches the score limit.
    MatchWinner,

    PlayerOneName,
    PlayerTwoName,
    UseCube,
    UseDice,
    UseTimer,
    StartPolicy,
    TotalGameTimeMs,
    ReserveTimeMs,
    ScoreLimit,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Self::CurrentAction => "currentAction",
            Self::Phase => "phase",
            Self::CurrentGameValue => "currentGameValue",
            Self::CubeOwner => "cubeOwner",
            Self::Games(Player::One) => "playerOneGames",
            Self::Games(Player::Two) => "playerTwoGames",
            Self::Score(Player::One) => "playerOneScore",
            Self::Score(Player::Two) => "playerTwoScore",
            Self::TotalTimeRemaining(Player::One) => "playerOneTotalTimeRemainingMs",
            Self::TotalTimeRemaining(Player::Two) => "playerTwoTotalTimeRemainingMs",
            Self::ReserveTimeRemaining(Player::One) => "playerOneReserveTimeRemainingMs",
            Self::ReserveTimeRemaining(Player::Two) => "playerTwoReserveTimeRemainingMs",
            Self::Games(Player::None)
            | Self::Score(Player::None)
            | Self::TotalTimeRemaining(Player::None)
            | Self::ReserveTimeRemaining(Player::None) => "unassignedSeat",
            Self::ForceStopTimer => "forceStopTimer",
            Self::IsPaused => "isPaused",
            Self::PendingConcession => "pendingConcession",
            Self::MatchWinner => "matchWinner",
            Self::PlayerOneName => "playerOneName",
            Self::PlayerTwoName => "playerTwoName",
            Self::UseCube => "useCube",
            Self::UseDice => "useDice",
            Self::UseTimer => "useTimer",
            Self::StartPolicy => "startPolicy",
            Self::TotalGameTimeMs => "totalGameTimeMs",
            Self::ReserveTimeMs => "reserveTimeMs",
            Self::ScoreLimit => "scoreLimit",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

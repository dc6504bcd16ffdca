//! Turn phases of the game automaton.
//!
//! The phase is never stored on its own: it is a pure function of the
//! current action, so replaying an action during undo or redo also restores
//! whose move it is.

use super::action::{Action, ActionKind};
use super::player::Player;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for automaton states.
///
/// All methods are pure - no side effects.
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Check if this is an error state.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}

/// The seven positions of the game automaton.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TurnPhase {
    NoGame,
    PlayerOneTurn,
    PlayerOneRolled,
    PlayerTwoTurn,
    PlayerTwoRolled,
    DoubleOfferedToOne,
    DoubleOfferedToTwo,
}

impl State for TurnPhase {
    fn name(&self) -> &str {
        match self {
            Self::NoGame => "NoGame",
            Self::PlayerOneTurn => "PlayerOneTurn",
            Self::PlayerOneRolled => "PlayerOneRolled",
            Self::PlayerTwoTurn => "PlayerTwoTurn",
            Self::PlayerTwoRolled => "PlayerTwoRolled",
            Self::DoubleOfferedToOne => "DoubleOfferedToOne",
            Self::DoubleOfferedToTwo => "DoubleOfferedToTwo",
        }
    }

    /// No game is running: both the initial position and the one every
    /// finished game returns to.
    fn is_final(&self) -> bool {
        matches!(self, Self::NoGame)
    }
}

impl TurnPhase {
    /// `player` may roll, double or end the turn.
    pub fn turn(player: Player) -> Self {
        match player {
            Player::One => Self::PlayerOneTurn,
            Player::Two => Self::PlayerTwoTurn,
            Player::None => Self::NoGame,
        }
    }

    /// `player` has rolled and may end the turn.
    pub fn rolled(player: Player) -> Self {
        match player {
            Player::One => Self::PlayerOneRolled,
            Player::Two => Self::PlayerTwoRolled,
            Player::None => Self::NoGame,
        }
    }

    /// `player` must take or drop the cube.
    pub fn double_offered_to(player: Player) -> Self {
        match player {
            Player::One => Self::DoubleOfferedToOne,
            Player::Two => Self::DoubleOfferedToTwo,
            Player::None => Self::NoGame,
        }
    }

    /// The phase the game is in once `action` has been applied.
    pub fn after(action: &Action) -> Self {
        let acting = action.acting_player();
        match action.kind() {
            ActionKind::Start { player_to_start } => Self::turn(*player_to_start),
            ActionKind::Roll { .. } => Self::rolled(acting),
            ActionKind::OfferDouble { .. } => Self::double_offered_to(acting.opponent()),
            ActionKind::TakeDouble { player_taking, .. } => Self::turn(player_taking.opponent()),
            ActionKind::EndTurn => Self::turn(acting.opponent()),
            ActionKind::EndGame { .. } => Self::NoGame,
        }
    }

    /// The player who has to act next, and whose clock runs. During a
    /// pending double this is the one deciding, not the offerer.
    pub fn clock_holder(self) -> Player {
        match self {
            Self::PlayerOneTurn | Self::PlayerOneRolled | Self::DoubleOfferedToOne => Player::One,
            Self::PlayerTwoTurn | Self::PlayerTwoRolled | Self::DoubleOfferedToTwo => Player::Two,
            Self::NoGame => Player::None,
        }
    }

    pub fn in_game(self) -> bool {
        !self.is_final()
    }
}

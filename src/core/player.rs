//! The two sides of a match.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a side of the board.
///
/// `None` is only meaningful as "no active player": before the first game
/// starts, between games, and as the acting player of the history sentinel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Player {
    #[default]
    None,
    One,
    Two,
}

impl Player {
    /// The side across the board. `None` has no opponent.
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
            Player::None => Player::None,
        }
    }

    pub fn is_none(self) -> bool {
        matches!(self, Player::None)
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }

    /// Maps a coin flip onto a side (`true` is player one).
    pub fn from_coin(heads: bool) -> Player {
        if heads {
            Player::One
        } else {
            Player::Two
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Player::None => "none",
            Player::One => "player one",
            Player::Two => "player two",
        };
        f.write_str(label)
    }
}

//! Immutable action records.
//!
//! Every player input that changes the game produces one [`Action`]. The
//! action carries a [`Snapshot`] of all externally visible facts as they
//! stand once the action has been applied, which is what lets undo and redo
//! restore a position by copying the snapshot back instead of re-deriving it.

use super::player::Player;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-player tally: games won, match score and the two time budgets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub games: u32,
    pub score: u32,
    pub total_time_remaining_ms: u64,
    pub reserve_time_remaining_ms: u64,
}

impl Seat {
    /// A seat with no games or points and full clocks.
    pub fn fresh(total_time_ms: u64, reserve_time_ms: u64) -> Self {
        Self {
            games: 0,
            score: 0,
            total_time_remaining_ms: total_time_ms,
            reserve_time_remaining_ms: reserve_time_ms,
        }
    }
}

/// Frozen copy of the game facts at the moment an action was recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub acting_player: Player,
    pub player_one: Seat,
    pub player_two: Seat,
    pub current_game_value: u32,
    pub cube_owner: Player,
}

impl Snapshot {
    pub fn seat(&self, player: Player) -> Option<&Seat> {
        match player {
            Player::One => Some(&self.player_one),
            Player::Two => Some(&self.player_two),
            Player::None => None,
        }
    }
}

/// What happened, with the data specific to each kind of action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    #[serde(rename_all = "camelCase")]
    Start { player_to_start: Player },
    #[serde(rename_all = "camelCase")]
    Roll { die_one: u8, die_two: u8 },
    #[serde(rename_all = "camelCase")]
    OfferDouble { new_game_value: u32 },
    #[serde(rename_all = "camelCase")]
    TakeDouble {
        player_taking: Player,
        previous_game_value: u32,
        current_game_value: u32,
    },
    EndTurn,
    /// Points awarded to the snapshot's acting player (the winner).
    EndGame { points: u32 },
}

impl ActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start { .. } => "START",
            Self::Roll { .. } => "ROLL",
            Self::OfferDouble { .. } => "OFFER_DOUBLE",
            Self::TakeDouble { .. } => "TAKE_DOUBLE",
            Self::EndTurn => "END_TURN",
            Self::EndGame { .. } => "END_GAME",
        }
    }
}

/// One entry of the action log.
///
/// Fields are private: once recorded an action is never modified.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    kind: ActionKind,
    snapshot: Snapshot,
    recorded_at: DateTime<Utc>,
}

impl Action {
    /// Record an action now.
    pub fn new(kind: ActionKind, snapshot: Snapshot) -> Self {
        Self {
            kind,
            snapshot,
            recorded_at: Utc::now(),
        }
    }

    /// The bottom-of-history marker: a game end with no winner.
    ///
    /// # Example
    ///
    /// ```rust
    /// use backgammon_clock::core::{Action, ActionKind, Player, Seat, Snapshot};
    ///
    /// let seat = Seat::fresh(600_000, 10_000);
    /// let sentinel = Action::sentinel(Snapshot {
    ///     acting_player: Player::One,
    ///     player_one: seat,
    ///     player_two: seat,
    ///     current_game_value: 1,
    ///     cube_owner: Player::None,
    /// });
    ///
    /// assert!(sentinel.is_sentinel());
    /// assert_eq!(sentinel.acting_player(), Player::None);
    /// assert_eq!(sentinel.kind(), &ActionKind::EndGame { points: 0 });
    /// ```
    pub fn sentinel(snapshot: Snapshot) -> Self {
        Self::new(
            ActionKind::EndGame { points: 0 },
            Snapshot {
                acting_player: Player::None,
                ..snapshot
            },
        )
    }

    pub fn kind(&self) -> &ActionKind {
        &self.kind
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    pub fn acting_player(&self) -> Player {
        self.snapshot.acting_player
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self.kind, ActionKind::EndGame { .. }) && self.acting_player().is_none()
    }
}

//! Core game types and logic.
//!
//! This module contains the pure part of the engine:
//! - Players, match parameters and the game aggregate
//! - Immutable action records and the linear undo/redo history
//! - Turn phases via the `State` trait, and guard predicates over them
//!
//! Nothing in here touches time, randomness or scheduling; that lives in
//! [`crate::effects`].

mod action;
mod game;
mod guard;
mod history;
mod params;
mod player;
mod state;

pub use action::{Action, ActionKind, Seat, Snapshot};
pub use game::{Concession, GameState};
pub use guard::Guard;
pub use history::{ActionHistory, HistoryError};
pub use params::{
    MatchParameters, StartPolicy, DEFAULT_RESERVE_TIME_MS, DEFAULT_SCORE_LIMIT,
    DEFAULT_TOTAL_GAME_TIME_MS, ONE_SECOND_MS,
};
pub use player::Player;
pub use state::{State, TurnPhase};

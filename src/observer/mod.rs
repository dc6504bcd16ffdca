//! Change notifications for the presentation layer.
//!
//! The machine never pushes pixels. Whenever a named field of the game state
//! or the match parameters actually changes value, every subscriber receives
//! a [`FieldChange`] carrying the field and its new value as JSON, and can do
//! with it whatever it likes.
//!
//! # Example
//!
//! ```rust
//! use backgammon_clock::observer::{Field, Observers};
//! use std::sync::{Arc, Mutex};
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//!
//! let mut observers = Observers::new();
//! observers.subscribe(move |change| sink.lock().unwrap().push(change.field.name()));
//! observers.notify(Field::CurrentGameValue, &2u32);
//!
//! assert_eq!(*seen.lock().unwrap(), vec!["currentGameValue"]);
//! ```

mod field;

pub use field::Field;

use crate::core::{GameState, MatchParameters, Player, Seat};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// One field, one new value.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldChange {
    pub field: Field,
    pub value: Value,
}

/// Returned by [`Observers::subscribe`]; pass it back to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A subscriber callback.
pub type Callback = Box<dyn FnMut(&FieldChange) + Send>;

/// Registered subscribers, notified in subscription order.
#[derive(Default)]
pub struct Observers {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Callback)>,
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&FieldChange) + Send + 'static,
    {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns whether a subscriber was removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Send `value` for `field` to every subscriber.
    pub fn notify<T: Serialize + ?Sized>(&mut self, field: Field, value: &T) {
        if self.subscribers.is_empty() {
            return;
        }
        let change = FieldChange {
            field,
            value: serde_json::to_value(value).unwrap_or(Value::Null),
        };
        for (_, callback) in &mut self.subscribers {
            callback(&change);
        }
    }

    fn notify_if_changed<T: Serialize + PartialEq>(&mut self, field: Field, before: &T, after: &T) {
        if before != after {
            self.notify(field, after);
        }
    }

    fn emit_seat_diff(&mut self, player: Player, before: &Seat, after: &Seat) {
        self.notify_if_changed(Field::Games(player), &before.games, &after.games);
        self.notify_if_changed(Field::Score(player), &before.score, &after.score);
        self.notify_if_changed(
            Field::TotalTimeRemaining(player),
            &before.total_time_remaining_ms,
            &after.total_time_remaining_ms,
        );
        self.notify_if_changed(
            Field::ReserveTimeRemaining(player),
            &before.reserve_time_remaining_ms,
            &after.reserve_time_remaining_ms,
        );
    }

    /// Notify every game state field that differs between the two states.
    pub fn emit_state_diff(&mut self, before: &GameState, after: &GameState) {
        if self.subscribers.is_empty() {
            return;
        }
        self.notify_if_changed(Field::CurrentAction, &before.current_action, &after.current_action);
        self.notify_if_changed(Field::Phase, &before.phase(), &after.phase());
        self.notify_if_changed(
            Field::CurrentGameValue,
            &before.current_game_value,
            &after.current_game_value,
        );
        self.notify_if_changed(Field::CubeOwner, &before.cube_owner, &after.cube_owner);
        self.emit_seat_diff(Player::One, &before.player_one, &after.player_one);
        self.emit_seat_diff(Player::Two, &before.player_two, &after.player_two);
        self.notify_if_changed(
            Field::ForceStopTimer,
            &before.force_stop_timer,
            &after.force_stop_timer,
        );
        self.notify_if_changed(Field::IsPaused, &before.is_paused, &after.is_paused);
        self.notify_if_changed(
            Field::PendingConcession,
            &before.pending_concession,
            &after.pending_concession,
        );
    }

    /// Notify every match parameter that differs between the two sets.
    pub fn emit_parameters_diff(&mut self, before: &MatchParameters, after: &MatchParameters) {
        if self.subscribers.is_empty() {
            return;
        }
        self.notify_if_changed(Field::PlayerOneName, &before.player_one_name, &after.player_one_name);
        self.notify_if_changed(Field::PlayerTwoName, &before.player_two_name, &after.player_two_name);
        self.notify_if_changed(Field::UseCube, &before.use_cube, &after.use_cube);
        self.notify_if_changed(Field::UseDice, &before.use_dice, &after.use_dice);
        self.notify_if_changed(Field::UseTimer, &before.use_timer, &after.use_timer);
        self.notify_if_changed(Field::StartPolicy, &before.start_policy, &after.start_policy);
        self.notify_if_changed(
            Field::TotalGameTimeMs,
            &before.total_game_time_ms,
            &after.total_game_time_ms,
        );
        self.notify_if_changed(Field::ReserveTimeMs, &before.reserve_time_ms, &after.reserve_time_ms);
        self.notify_if_changed(Field::ScoreLimit, &before.score_limit, &after.score_limit);
    }
}

//! Guard predicates for controlling state transitions.
//!
//! Guards are pure boolean functions that determine whether an operation
//! may run from a given phase. They let the rule table be declared rather
//! than written as nested conditionals.

use super::state::State;
use std::marker::PhantomData;
use std::sync::Arc;

/// Pure predicate that determines if a transition can execute.
///
/// # Example
///
/// ```rust
/// use backgammon_clock::core::{Guard, Player, TurnPhase};
///
/// let may_roll = Guard::new(|phase: &TurnPhase| phase.clock_holder() == Player::One);
///
/// assert!(may_roll.check(&TurnPhase::PlayerOneTurn));
/// assert!(!may_roll.check(&TurnPhase::PlayerTwoTurn));
/// ```
pub struct Guard<S: State> {
    predicate: Arc<dyn Fn(&S) -> bool + Send + Sync>,
    _phantom: PhantomData<S>,
}

impl<S: State> Guard<S> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be pure (deterministic, no side effects) and
    /// thread-safe (Send + Sync).
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
            _phantom: PhantomData,
        }
    }

    /// Guard that passes only for the listed states.
    ///
    /// ```rust
    /// use backgammon_clock::core::{Guard, TurnPhase};
    ///
    /// let pending = Guard::one_of([TurnPhase::DoubleOfferedToOne, TurnPhase::DoubleOfferedToTwo]);
    /// assert!(pending.check(&TurnPhase::DoubleOfferedToTwo));
    /// assert!(!pending.check(&TurnPhase::NoGame));
    /// ```
    pub fn one_of<I>(states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: 'static,
    {
        let allowed: Vec<S> = states.into_iter().collect();
        Self::new(move |state: &S| allowed.contains(state))
    }

    /// Check if the guard allows transition from this state.
    pub fn check(&self, state: &S) -> bool {
        (self.predicate)(state)
    }
}

impl<S: State> Clone for Guard<S> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
            _phantom: PhantomData,
        }
    }
}

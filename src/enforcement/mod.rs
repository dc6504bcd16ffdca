//! Operation rules for the game machine.
//!
//! Every player input is checked here before anything is recorded. A refused
//! input comes back as a [`GameError`] and leaves the game untouched, so
//! the UI layer can treat it as "nothing happened".
//!
//! The same checks back the machine's `can_*` accessors, which is what a UI
//! uses to show, hide or disable its controls.
//!
//! # Example
//!
//! ```rust
//! use backgammon_clock::core::{GameState, MatchParameters, Player};
//! use backgammon_clock::enforcement::{check, Operation, RuleContext};
//!
//! let params = MatchParameters::default();
//! let state = GameState::new(&params);
//! let ctx = RuleContext::new(&state, &params);
//!
//! assert!(check(Operation::Start, Player::One, &ctx).is_ok());
//! assert!(check(Operation::Roll, Player::One, &ctx).is_err());
//! ```

mod context;
mod rules;
mod violations;

pub use context::RuleContext;
pub use rules::{check, Operation};
pub use violations::{Feature, GameError};

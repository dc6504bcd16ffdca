//! Backgammon Clock: the game-state engine of a two-player backgammon match clock.
//!
//! The engine follows the "pure core, imperative shell" split. The core
//! records every player input as an immutable action carrying a snapshot of
//! the match, so undo and redo are a matter of copying a snapshot back. The
//! shell adds a chess-clock style countdown with per-turn reserve time,
//! randomness for dice and coin flips, and the scheduling to drive it.
//!
//! # Core Concepts
//!
//! - **Actions**: Start, Roll, OfferDouble, TakeDouble, EndTurn and EndGame records
//! - **History**: linear undo/redo over recorded actions
//! - **Phases**: the turn automaton, derived from the current action
//! - **Clock**: reserve time first, then the main budget, with drift correction
//! - **Observers**: one notification per field that actually changed
//!
//! # Example
//!
//! ```rust
//! use backgammon_clock::builder::{GameMachineBuilder, MatchParametersBuilder};
//! use backgammon_clock::core::{Player, StartPolicy, TurnPhase};
//! use backgammon_clock::effects::ManualEnvironment;
//!
//! let params = MatchParametersBuilder::new()
//!     .start_policy(StartPolicy::ClickerStarts)
//!     .build()
//!     .unwrap();
//! let mut machine = GameMachineBuilder::new()
//!     .parameters(params)
//!     .environment(ManualEnvironment::seeded(42))
//!     .build()
//!     .unwrap();
//!
//! machine.start(Player::One).unwrap();
//! machine.roll(Player::One).unwrap();
//! machine.run_for(3_000);
//! machine.end_turn(Player::One).unwrap();
//!
//! assert_eq!(machine.phase(), TurnPhase::PlayerTwoTurn);
//! assert_eq!(machine.state().player_one.reserve_time_remaining_ms, 10_000);
//!
//! machine.undo().unwrap();
//! assert_eq!(machine.phase(), TurnPhase::PlayerOneRolled);
//! assert!(machine.state().is_paused);
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod effects;
pub mod enforcement;
pub mod observer;

// Re-export commonly used types
pub use builder::{BuildError, GameMachineBuilder, MatchParametersBuilder};
pub use checkpoint::{CheckpointError, MatchSnapshot};
pub use crate::core::{Action, ActionKind, GameState, MatchParameters, Player, StartPolicy, TurnPhase};
pub use effects::{Environment, GameMachine, ManualEnvironment, SystemEnvironment, TickOutcome};
pub use enforcement::GameError;
pub use observer::{Field, FieldChange};

//! The imperative shell around the pure core.
//!
//! This module is where time, randomness and scheduling enter the engine.
//!
//! # Key Concepts
//!
//! - **Environment**: the host's clock, dice and timer service behind one trait
//! - **Clock**: a single self-rearming tick with drift correction
//! - **Game Machine**: executes player inputs and owns the undo/redo history
//!
//! Hosts drive the machine one event at a time: player inputs through its
//! operations, timer callbacks through [`GameMachine::on_timer`].

mod clock;
mod env;
mod machine;

pub use clock::{drain, Clock, Drained, TICK_MS};
pub use env::{Environment, ManualEnvironment, SystemEnvironment, TimerHandle, TimerQueue};
pub use machine::{GameMachine, TickOutcome};

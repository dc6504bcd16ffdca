//! Builder API for match parameters and game machines.
//!
//! This module provides fluent builders that validate what the plain
//! structs cannot express in their types.

pub mod error;
pub mod machine;
pub mod params;

pub use error::BuildError;
pub use machine::GameMachineBuilder;
pub use params::{validate_parameters, MatchParametersBuilder};

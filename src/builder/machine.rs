//! Builder for constructing game machines.

use crate::builder::error::BuildError;
use crate::builder::params::validate_parameters;
use crate::checkpoint::MatchSnapshot;
use crate::core::MatchParameters;
use crate::effects::{Environment, GameMachine};
use crate::observer::{FieldChange, Observers};
use tracing::debug;

/// Builder for constructing game machines with a fluent API.
pub struct GameMachineBuilder<E: Environment> {
    params: MatchParameters,
    env: Option<E>,
    observers: Observers,
    snapshot: Option<MatchSnapshot>,
}

impl<E: Environment> GameMachineBuilder<E> {
    /// Create a new builder with default match parameters.
    pub fn new() -> Self {
        Self {
            params: MatchParameters::default(),
            env: None,
            observers: Observers::new(),
            snapshot: None,
        }
    }

    pub fn parameters(mut self, params: MatchParameters) -> Self {
        self.params = params;
        self
    }

    /// Set the environment (required).
    pub fn environment(mut self, env: E) -> Self {
        self.env = Some(env);
        self
    }

    /// Register a subscriber before anything is emitted, so it also sees
    /// the changes made while restoring.
    pub fn observer<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&FieldChange) + Send + 'static,
    {
        self.observers.subscribe(callback);
        self
    }

    /// Restore this snapshot once the machine exists.
    pub fn restore(mut self, snapshot: MatchSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    /// Build the machine.
    /// Returns an error if the environment is missing or the parameters are
    /// invalid. A snapshot that fails to restore leaves the defaults in place.
    pub fn build(self) -> Result<GameMachine<E>, BuildError> {
        validate_parameters(&self.params)?;
        let env = self.env.ok_or(BuildError::MissingEnvironment)?;

        let mut machine = GameMachine::with_observers(self.params, env, self.observers);
        if let Some(snapshot) = self.snapshot {
            if let Err(err) = machine.restore(&snapshot) {
                debug!(error = %err, "built with default match");
            }
        }
        Ok(machine)
    }
}

impl<E: Environment> Default for GameMachineBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Player, StartPolicy, TurnPhase};
    use crate::effects::ManualEnvironment;
    use std::sync::{Arc, Mutex};

    #[test]
    fn builder_requires_environment() {
        let result = GameMachineBuilder::<ManualEnvironment>::new().build();
        assert!(matches!(result, Err(BuildError::MissingEnvironment)));
    }

    #[test]
    fn builder_validates_parameters() {
        let result = GameMachineBuilder::new()
            .environment(ManualEnvironment::seeded(1))
            .parameters(MatchParameters {
                score_limit: 0,
                ..MatchParameters::default()
            })
            .build();

        assert!(matches!(result, Err(BuildError::InvalidScoreLimit(0))));
    }

    #[test]
    fn fluent_api_builds_machine() {
        let seen = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&seen);

        let mut machine = GameMachineBuilder::new()
            .environment(ManualEnvironment::seeded(1))
            .parameters(MatchParameters {
                start_policy: StartPolicy::ClickerStarts,
                ..MatchParameters::default()
            })
            .observer(move |_| *sink.lock().unwrap() += 1)
            .build()
            .unwrap();

        machine.start(Player::One).unwrap();

        assert_eq!(machine.phase(), TurnPhase::PlayerOneTurn);
        assert!(*seen.lock().unwrap() > 0);
    }

    #[test]
    fn builder_restores_snapshot() {
        let mut source = GameMachine::new(
            MatchParameters {
                start_policy: StartPolicy::ClickerStarts,
                score_limit: 9,
                ..MatchParameters::default()
            },
            ManualEnvironment::seeded(2),
        );
        source.start(Player::Two).unwrap();

        let machine = GameMachineBuilder::new()
            .environment(ManualEnvironment::seeded(3))
            .restore(source.serialize())
            .build()
            .unwrap();

        assert_eq!(machine.params().score_limit, 9);
        assert_eq!(machine.phase(), TurnPhase::PlayerTwoTurn);
        assert!(machine.state().is_paused);
    }
}

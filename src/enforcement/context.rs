//! Context provided to rule checks.

use crate::core::{Concession, GameState, MatchParameters, Player, TurnPhase};

/// Read-only view of everything the rules look at.
#[derive(Clone, Debug)]
pub struct RuleContext<'a> {
    pub phase: TurnPhase,
    pub params: &'a MatchParameters,
    pub is_paused: bool,
    pub cube_owner: Player,
    pub current_game_value: u32,
    pub pending_concession: Option<Concession>,
}

impl<'a> RuleContext<'a> {
    pub fn new(state: &GameState, params: &'a MatchParameters) -> Self {
        Self {
            phase: state.phase(),
            params,
            is_paused: state.is_paused,
            cube_owner: state.cube_owner,
            current_game_value: state.current_game_value,
            pending_concession: state.pending_concession,
        }
    }
}

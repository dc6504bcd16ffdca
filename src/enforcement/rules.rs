//! Which operation may run, for whom, and when.

use crate::core::{Guard, Player, TurnPhase};
use crate::enforcement::context::RuleContext;
use crate::enforcement::violations::{Feature, GameError};

/// Player inputs the machine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Start,
    Roll,
    OfferDouble,
    TakeDouble,
    DropDouble,
    EndTurn,
    ProposeConcession,
    AcceptConcession,
    RejectConcession,
    ConcedeMatch,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Roll => "roll",
            Self::OfferDouble => "offer double",
            Self::TakeDouble => "take double",
            Self::DropDouble => "drop double",
            Self::EndTurn => "end turn",
            Self::ProposeConcession => "propose concession",
            Self::AcceptConcession => "accept concession",
            Self::RejectConcession => "reject concession",
            Self::ConcedeMatch => "concede match",
        }
    }

    /// The match parameter toggle this operation depends on, if any.
    pub fn required_feature(self) -> Option<Feature> {
        match self {
            Self::Roll => Some(Feature::Dice),
            Self::OfferDouble | Self::TakeDouble | Self::DropDouble => Some(Feature::Cube),
            _ => None,
        }
    }

    /// Phases from which `player` may perform this operation.
    fn phase_guard(self, player: Player, use_dice: bool) -> Guard<TurnPhase> {
        match self {
            Self::Start => Guard::one_of([TurnPhase::NoGame]),
            Self::Roll => Guard::one_of([TurnPhase::turn(player), TurnPhase::rolled(player)]),
            Self::OfferDouble => Guard::one_of([TurnPhase::turn(player)]),
            Self::TakeDouble | Self::DropDouble => {
                Guard::one_of([TurnPhase::double_offered_to(player)])
            }
            Self::EndTurn if use_dice => Guard::one_of([TurnPhase::rolled(player)]),
            Self::EndTurn => Guard::one_of([TurnPhase::turn(player)]),
            Self::ProposeConcession
            | Self::AcceptConcession
            | Self::RejectConcession
            | Self::ConcedeMatch => Guard::new(|phase: &TurnPhase| phase.in_game()),
        }
    }
}

fn feature_enabled(feature: Feature, ctx: &RuleContext<'_>) -> bool {
    match feature {
        Feature::Cube => ctx.params.use_cube,
        Feature::Dice => ctx.params.use_dice,
    }
}

/// Check whether `player` may perform `operation` right now.
///
/// Checks run in a fixed order (player, pause, feature, phase, then the
/// operation's own conditions) and the first failure is returned.
pub fn check(operation: Operation, player: Player, ctx: &RuleContext<'_>) -> Result<(), GameError> {
    let name = operation.name();

    if player.is_none() {
        return Err(GameError::invalid(name, "no player given"));
    }

    if ctx.is_paused {
        return Err(GameError::invalid(name, "the game is paused"));
    }

    if let Some(feature) = operation.required_feature() {
        if !feature_enabled(feature, ctx) {
            return Err(GameError::FeatureDisabled {
                operation: name,
                feature,
            });
        }
    }

    if !operation
        .phase_guard(player, ctx.params.use_dice)
        .check(&ctx.phase)
    {
        return Err(GameError::invalid(
            name,
            format!("not available to {player} during {:?}", ctx.phase),
        ));
    }

    match operation {
        Operation::OfferDouble => {
            if ctx.cube_owner.is_some() && ctx.cube_owner != player {
                return Err(GameError::invalid(name, format!("the cube belongs to {}", ctx.cube_owner)));
            }
            if ctx.current_game_value.checked_mul(2).is_none() {
                return Err(GameError::invalid(name, "the cube cannot go any higher"));
            }
        }
        Operation::ProposeConcession => {
            if ctx.pending_concession.is_some() {
                return Err(GameError::invalid(name, "a concession is already waiting for an answer"));
            }
        }
        Operation::AcceptConcession | Operation::RejectConcession => match ctx.pending_concession {
            None => return Err(GameError::invalid(name, "no concession has been offered")),
            Some(offer) if offer.beneficiary() != player => {
                return Err(GameError::invalid(name, format!("only {} can answer", offer.beneficiary())));
            }
            Some(_) => {}
        },
        _ => {}
    }

    Ok(())
}

//! The game state machine.
//!
//! [`GameMachine`] owns the match parameters, the game state, the undo/redo
//! history and the clock. Every player input goes through the same steps:
//! check the rules, build an [`Action`], apply its effects, snapshot the
//! result into the action, push it onto the history, and hand the clock to
//! whoever has to act next. A refused input changes nothing.

use super::clock::{drain, Clock, Drained};
use super::env::{Environment, ManualEnvironment, SystemEnvironment, TimerHandle};
use crate::builder::validate_parameters;
use crate::checkpoint::{CheckpointError, MatchSnapshot};
use crate::core::{
    Action, ActionHistory, ActionKind, Concession, GameState, HistoryError, MatchParameters,
    Player, TurnPhase,
};
use crate::enforcement::{check, GameError, Operation, RuleContext};
use crate::observer::{Field, FieldChange, Observers, SubscriptionId};
use std::time::Duration;
use tracing::{debug, info, warn};

/// What a delivered timer callback did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The handle was not the armed tick.
    Ignored,
    /// The clock had been force-stopped; nothing was charged.
    Stopped,
    Ticked { player: Player, drained: Drained },
    /// The player's main time ran out and the game was awarded to the opponent.
    Expired { player: Player },
}

/// Refill the reserve of the player waiting while `to` acts, and note
/// whether a clock will run.
fn hand_turn(state: &mut GameState, to: Player, reserve_ms: u64, timer_runs: bool) {
    if let Some(seat) = state.seat_mut(to.opponent()) {
        seat.reserve_time_remaining_ms = reserve_ms;
    }
    state.force_stop_timer = !timer_runs;
}

/// Two-player backgammon match engine.
#[derive(Debug)]
pub struct GameMachine<E: Environment> {
    params: MatchParameters,
    state: GameState,
    history: ActionHistory<Action>,
    clock: Clock,
    env: E,
    observers: Observers,
}

impl<E: Environment> GameMachine<E> {
    /// A machine with no game in progress.
    pub fn new(params: MatchParameters, env: E) -> Self {
        Self::with_observers(params, env, Observers::new())
    }

    pub fn with_observers(params: MatchParameters, env: E, observers: Observers) -> Self {
        let state = GameState::new(&params);
        let history = ActionHistory::new(state.current_action.clone());
        Self {
            params,
            state,
            history,
            clock: Clock::new(),
            env,
            observers,
        }
    }

    pub fn params(&self) -> &MatchParameters {
        &self.params
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> TurnPhase {
        self.state.phase()
    }

    pub fn history(&self) -> &ActionHistory<Action> {
        &self.history
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    /// Whose clock is running, `Player::None` when stopped.
    pub fn armed_player(&self) -> Player {
        self.clock.armed_player()
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&FieldChange) + Send + 'static,
    {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    // Validity accessors

    fn allows(&self, operation: Operation, player: Player) -> bool {
        check(operation, player, &RuleContext::new(&self.state, &self.params)).is_ok()
    }

    pub fn can_start(&self, player: Player) -> bool {
        self.allows(Operation::Start, player)
    }

    pub fn can_roll(&self, player: Player) -> bool {
        self.allows(Operation::Roll, player)
    }

    pub fn can_offer_double(&self, player: Player) -> bool {
        self.allows(Operation::OfferDouble, player)
    }

    pub fn can_take_double(&self, player: Player) -> bool {
        self.allows(Operation::TakeDouble, player)
    }

    pub fn can_drop_double(&self, player: Player) -> bool {
        self.allows(Operation::DropDouble, player)
    }

    pub fn can_end_turn(&self, player: Player) -> bool {
        self.allows(Operation::EndTurn, player)
    }

    pub fn can_propose_concession(&self, player: Player) -> bool {
        self.allows(Operation::ProposeConcession, player)
    }

    pub fn can_accept_concession(&self, player: Player) -> bool {
        self.allows(Operation::AcceptConcession, player)
    }

    pub fn can_reject_concession(&self, player: Player) -> bool {
        self.allows(Operation::RejectConcession, player)
    }

    pub fn can_concede_match(&self, player: Player) -> bool {
        self.allows(Operation::ConcedeMatch, player)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn can_pause(&self) -> bool {
        self.phase().in_game() && !self.state.is_paused
    }

    pub fn can_resume(&self) -> bool {
        self.state.is_paused
    }

    // Player operations

    fn ensure(&self, operation: Operation, player: Player) -> Result<(), GameError> {
        check(operation, player, &RuleContext::new(&self.state, &self.params)).map_err(|err| {
            debug!(operation = operation.name(), %player, error = %err, "operation refused");
            err
        })
    }

    /// Start a game. The starter is drawn by coin flip or is `requesting`,
    /// depending on the start policy.
    pub fn start(&mut self, requesting: Player) -> Result<Player, GameError> {
        self.ensure(Operation::Start, requesting)?;

        let starter = if self.params.starts_randomly(self.state.is_first_game()) {
            Player::from_coin(self.env.coin_flip())
        } else {
            requesting
        };
        let reserve = self.params.reserve_time_ms;
        let timer = self.params.use_timer;

        self.record(ActionKind::Start { player_to_start: starter }, starter, |state| {
            state.pending_concession = None;
            hand_turn(state, starter, reserve, timer);
        });
        self.run_clock_for(starter);
        Ok(starter)
    }

    /// Roll both dice. Rolling again before ending the turn replaces them.
    pub fn roll(&mut self, player: Player) -> Result<(u8, u8), GameError> {
        self.ensure(Operation::Roll, player)?;

        let die_one = self.env.roll_die();
        let die_two = self.env.roll_die();
        self.record(ActionKind::Roll { die_one, die_two }, player, |_| {});
        Ok((die_one, die_two))
    }

    pub fn offer_double(&mut self, player: Player) -> Result<(), GameError> {
        self.ensure(Operation::OfferDouble, player)?;

        let new_game_value = self.state.current_game_value.saturating_mul(2);
        let decider = player.opponent();
        let reserve = self.params.reserve_time_ms;
        let timer = self.params.use_timer;

        self.record(ActionKind::OfferDouble { new_game_value }, player, |state| {
            hand_turn(state, decider, reserve, timer);
        });
        self.run_clock_for(decider);
        Ok(())
    }

    /// Accept the pending double: the value doubles, the taker owns the
    /// cube and the offerer resumes their turn.
    pub fn take_double(&mut self, player: Player) -> Result<(), GameError> {
        self.ensure(Operation::TakeDouble, player)?;

        let previous_game_value = self.state.current_game_value;
        let current_game_value = previous_game_value.saturating_mul(2);
        let offerer = player.opponent();
        let reserve = self.params.reserve_time_ms;
        let timer = self.params.use_timer;

        let kind = ActionKind::TakeDouble {
            player_taking: player,
            previous_game_value,
            current_game_value,
        };
        self.record(kind, player, |state| {
            state.current_game_value = current_game_value;
            state.cube_owner = player;
            hand_turn(state, offerer, reserve, timer);
        });
        self.run_clock_for(offerer);
        Ok(())
    }

    /// Refuse the pending double, losing the game at the current value.
    pub fn drop_double(&mut self, player: Player) -> Result<(), GameError> {
        self.ensure(Operation::DropDouble, player)?;

        let points = self.state.current_game_value;
        self.finish_game(player.opponent(), points);
        Ok(())
    }

    pub fn end_turn(&mut self, player: Player) -> Result<(), GameError> {
        self.ensure(Operation::EndTurn, player)?;

        let next = player.opponent();
        let reserve = self.params.reserve_time_ms;
        let timer = self.params.use_timer;

        self.record(ActionKind::EndTurn, player, |state| {
            hand_turn(state, next, reserve, timer);
        });
        self.run_clock_for(next);
        Ok(())
    }

    /// Offer the opponent `points` to end the game. Nothing is recorded
    /// until the opponent accepts.
    pub fn propose_concession(&mut self, conceding: Player, points: u32) -> Result<(), GameError> {
        self.ensure(Operation::ProposeConcession, conceding)?;
        if points == 0 {
            return Err(GameError::invalid(
                Operation::ProposeConcession.name(),
                "a concession must be worth at least one point",
            ));
        }

        debug!(%conceding, points, "concession proposed");
        self.mutate(|state| state.pending_concession = Some(Concession { conceding, points }));
        Ok(())
    }

    pub fn accept_concession(&mut self, player: Player) -> Result<(), GameError> {
        self.ensure(Operation::AcceptConcession, player)?;

        let points = self.state.pending_concession.map_or(1, |offer| offer.points);
        self.finish_game(player, points);
        Ok(())
    }

    pub fn reject_concession(&mut self, player: Player) -> Result<(), GameError> {
        self.ensure(Operation::RejectConcession, player)?;

        debug!(%player, "concession rejected");
        self.mutate(|state| state.pending_concession = None);
        Ok(())
    }

    /// Give up the whole match: the opponent gets exactly enough points to win.
    pub fn concede_match(&mut self, conceding: Player) -> Result<(), GameError> {
        self.ensure(Operation::ConcedeMatch, conceding)?;

        let winner = conceding.opponent();
        self.finish_game(winner, self.force_win_points(winner));
        Ok(())
    }

    /// `player` ran out of main time. Same outcome as conceding the match,
    /// and accepted while paused. Only the player on the clock can expire.
    pub fn handle_time_expiry(&mut self, player: Player) -> Result<(), GameError> {
        if player.is_none() || !self.phase().in_game() {
            return Err(GameError::invalid(
                "time expiry",
                format!("no game in progress for {player}"),
            ));
        }
        let holder = self.phase().clock_holder();
        if player != holder {
            return Err(GameError::invalid(
                "time expiry",
                format!("{player} is not on the clock, {holder} is"),
            ));
        }

        info!(%player, "time expired");
        let winner = player.opponent();
        self.finish_game(winner, self.force_win_points(winner));
        Ok(())
    }

    fn force_win_points(&self, winner: Player) -> u32 {
        self.params
            .score_limit
            .saturating_sub(self.state.score(winner))
            .max(1)
    }

    // History and control

    pub fn undo(&mut self) -> Result<(), GameError> {
        if !self.history.can_undo() {
            return Err(HistoryError::NothingToUndo.into());
        }
        self.clock.disarm(&mut self.env);
        let action = self.history.undo()?.clone();
        debug!(action = action.name(), "undo");
        self.replay(&action);
        Ok(())
    }

    pub fn redo(&mut self) -> Result<(), GameError> {
        if !self.history.can_redo() {
            return Err(HistoryError::NothingToRedo.into());
        }
        self.clock.disarm(&mut self.env);
        let action = self.history.redo()?.clone();
        debug!(action = action.name(), "redo");
        self.replay(&action);
        Ok(())
    }

    /// Load `action`'s snapshot with the clock stopped. An in-game position
    /// comes back paused.
    fn replay(&mut self, action: &Action) {
        self.mutate(|state| {
            state.replay(action);
            state.force_stop_timer = true;
            state.is_paused = state.phase().in_game();
        });
    }

    pub fn pause(&mut self) -> Result<(), GameError> {
        if !self.can_pause() {
            return Err(GameError::invalid("pause", "no running game to pause"));
        }
        self.clock.disarm(&mut self.env);
        self.mutate(|state| {
            state.is_paused = true;
            state.force_stop_timer = true;
        });
        debug!("paused");
        Ok(())
    }

    /// Clear the pause and restart the clock of whoever has to act.
    pub fn resume(&mut self) -> Result<(), GameError> {
        if !self.can_resume() {
            return Err(GameError::invalid("resume", "the game is not paused"));
        }
        let holder = self.phase().clock_holder();
        let runs = self.params.use_timer && holder.is_some();
        self.mutate(|state| {
            state.is_paused = false;
            state.force_stop_timer = !runs;
        });
        self.run_clock_for(holder);
        debug!(%holder, "resumed");
        Ok(())
    }

    /// Replace the match parameters and start a new match with them.
    pub fn apply_parameters(&mut self, params: MatchParameters) -> Result<(), GameError> {
        validate_parameters(&params)?;
        let before = std::mem::replace(&mut self.params, params);
        self.observers.emit_parameters_diff(&before, &self.params);
        self.new_match();
        Ok(())
    }

    /// Reset scores, games, clocks and history.
    pub fn new_match(&mut self) {
        self.clock.disarm(&mut self.env);
        let fresh = GameState::new(&self.params);
        self.history = ActionHistory::new(fresh.current_action.clone());
        self.mutate(|state| *state = fresh);
        info!("new match");
    }

    // Snapshot and restore

    /// Capture parameters and state. The history is not included.
    pub fn serialize(&self) -> MatchSnapshot {
        MatchSnapshot::capture(&self.params, &self.state)
    }

    /// Load a snapshot. On failure the machine falls back to default
    /// parameters and a fresh state, and the error is returned.
    pub fn restore(&mut self, snapshot: &MatchSnapshot) -> Result<(), CheckpointError> {
        self.clock.disarm(&mut self.env);

        let (params, state, result) = match snapshot.to_parts() {
            Ok((params, state)) => (params, state, Ok(())),
            Err(err) => {
                warn!(error = %err, "snapshot rejected, falling back to defaults");
                let params = MatchParameters::default();
                let state = GameState::new(&params);
                (params, state, Err(err))
            }
        };

        let before = std::mem::replace(&mut self.params, params);
        self.observers.emit_parameters_diff(&before, &self.params);

        // Undoing past the restore point lands between games with the
        // restored scores and clocks.
        let mut base = state.snapshot(Player::None);
        base.current_game_value = 1;
        base.cube_owner = Player::None;
        let mut history = ActionHistory::new(Action::sentinel(base));
        if state.phase().in_game() {
            history.push(state.current_action.clone());
        }
        self.history = history;
        self.mutate(|current| *current = state);
        result
    }

    // Clock

    /// Deliver a timer callback scheduled through the environment.
    pub fn on_timer(&mut self, handle: TimerHandle) -> TickOutcome {
        let Some(player) = self.clock.claim(handle) else {
            debug!(handle = handle.id(), "stale tick ignored");
            return TickOutcome::Ignored;
        };
        if self.state.force_stop_timer {
            self.clock.disarm(&mut self.env);
            return TickOutcome::Stopped;
        }

        match self.mutate(|state| state.seat_mut(player).map(drain)) {
            None => TickOutcome::Ignored,
            Some(Drained::Expired) => {
                self.clock.disarm(&mut self.env);
                if let Err(err) = self.handle_time_expiry(player) {
                    warn!(error = %err, "time expiry could not be processed");
                }
                TickOutcome::Expired { player }
            }
            Some(drained) => {
                self.clock.reschedule(&mut self.env);
                TickOutcome::Ticked { player, drained }
            }
        }
    }

    fn run_clock_for(&mut self, player: Player) {
        if self.params.use_timer && !self.state.is_paused && player.is_some() {
            self.clock.arm(player, &mut self.env);
        } else {
            self.clock.disarm(&mut self.env);
        }
    }

    // Recording

    /// Apply `effects`, then record the result as the current action.
    fn record<R>(
        &mut self,
        kind: ActionKind,
        acting: Player,
        effects: impl FnOnce(&mut GameState) -> R,
    ) -> R {
        let out = self.mutate(|state| {
            let out = effects(state);
            state.current_action = Action::new(kind, state.snapshot(acting));
            out
        });
        debug!(action = self.state.current_action.name(), player = %acting, "action recorded");
        self.history.push(self.state.current_action.clone());
        out
    }

    /// Change the state and notify subscribers of every field that differs.
    fn mutate<R>(&mut self, apply: impl FnOnce(&mut GameState) -> R) -> R {
        if self.observers.is_empty() {
            return apply(&mut self.state);
        }
        let before = self.state.clone();
        let out = apply(&mut self.state);
        self.observers.emit_state_diff(&before, &self.state);
        out
    }

    /// Record the game for `winner`, then settle the match if it is over.
    fn finish_game(&mut self, winner: Player, points: u32) {
        self.clock.disarm(&mut self.env);

        let limit = self.params.score_limit;
        let total = self.params.total_game_time_ms;
        let reserve = self.params.reserve_time_ms;

        let final_score = self.record(ActionKind::EndGame { points }, winner, |state| {
            state.pending_concession = None;
            state.force_stop_timer = true;
            state.is_paused = false;
            state.current_game_value = 1;
            state.cube_owner = Player::None;

            let final_score = state.seat_mut(winner).map_or(0, |seat| {
                seat.games += 1;
                seat.score = seat.score.saturating_add(points);
                seat.score
            });
            let match_won = final_score >= limit;
            for seat in [&mut state.player_one, &mut state.player_two] {
                seat.reserve_time_remaining_ms = reserve;
                if match_won {
                    seat.score = 0;
                    seat.total_time_remaining_ms = total;
                }
            }
            final_score
        });

        if final_score >= limit {
            info!(%winner, final_score, "match won");
            self.observers.notify(
                Field::MatchWinner,
                &serde_json::json!({ "winner": winner, "finalScore": final_score }),
            );
        } else {
            info!(%winner, points, score = final_score, "game won");
        }
    }
}

impl GameMachine<ManualEnvironment> {
    /// Advance virtual time by `ms`, delivering every tick that falls due.
    pub fn run_for(&mut self, ms: u64) -> Vec<TickOutcome> {
        let until = self.env.now_ms().saturating_add(ms);
        let mut outcomes = Vec::new();
        while let Some(handle) = self.env.pop_due(until) {
            outcomes.push(self.on_timer(handle));
        }
        self.env.set_now(until);
        outcomes
    }
}

impl GameMachine<SystemEnvironment> {
    /// How long the host may sleep before calling
    /// [`fire_due_timers`](Self::fire_due_timers).
    pub fn next_due_in(&self) -> Option<Duration> {
        self.env.next_due_in()
    }

    pub fn fire_due_timers(&mut self) -> Vec<TickOutcome> {
        let due = self.env.take_due();
        due.into_iter().map(|handle| self.on_timer(handle)).collect()
    }
}

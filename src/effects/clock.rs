//! Countdown clock for the player who has to act.
//!
//! Exactly one player's clock runs at a time. Each tick is a single-shot
//! callback that re-arms itself; the next delay is shortened by however late
//! the current tick fired, so execution delay never accumulates over a long
//! turn.

use super::env::{Environment, TimerHandle};
use crate::core::{Player, Seat, ONE_SECOND_MS};
use tracing::debug;

/// Interval between ticks.
pub const TICK_MS: u64 = ONE_SECOND_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Armed {
    player: Player,
    handle: TimerHandle,
    expected_at_ms: u64,
}

/// Which budget a tick was charged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drained {
    Reserve,
    Total,
    /// The main budget is exhausted.
    Expired,
}

/// Charge one tick to `seat`: reserve first, then the main budget.
///
/// Both budgets saturate at zero.
pub fn drain(seat: &mut Seat) -> Drained {
    if seat.reserve_time_remaining_ms > 0 {
        seat.reserve_time_remaining_ms = seat.reserve_time_remaining_ms.saturating_sub(TICK_MS);
        return Drained::Reserve;
    }
    seat.total_time_remaining_ms = seat.total_time_remaining_ms.saturating_sub(TICK_MS);
    if seat.total_time_remaining_ms == 0 {
        Drained::Expired
    } else {
        Drained::Total
    }
}

/// The single pending tick, if any.
#[derive(Debug, Default)]
pub struct Clock {
    armed: Option<Armed>,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting for `player`, cancelling whatever was running.
    pub fn arm<E: Environment>(&mut self, player: Player, env: &mut E) -> TimerHandle {
        self.disarm(env);
        let expected_at_ms = env.now_ms().saturating_add(TICK_MS);
        let handle = env.schedule(TICK_MS);
        debug!(%player, handle = handle.id(), "clock armed");
        self.armed = Some(Armed {
            player,
            handle,
            expected_at_ms,
        });
        handle
    }

    /// Cancel the pending tick. Nobody's clock runs afterwards.
    pub fn disarm<E: Environment>(&mut self, env: &mut E) {
        if let Some(armed) = self.armed.take() {
            env.cancel(armed.handle);
            debug!(player = %armed.player, "clock disarmed");
        }
    }

    pub fn armed_player(&self) -> Player {
        self.armed.map_or(Player::None, |armed| armed.player)
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// When the pending tick should ideally fire.
    pub fn expected_at(&self) -> Option<u64> {
        self.armed.map(|armed| armed.expected_at_ms)
    }

    /// Match a delivered callback against the pending one. Returns the armed
    /// player when `handle` is the live tick, `None` for anything stale.
    pub fn claim(&self, handle: TimerHandle) -> Option<Player> {
        self.armed
            .filter(|armed| armed.handle == handle)
            .map(|armed| armed.player)
    }

    /// Schedule the next tick, shortening the delay by the current tick's
    /// lateness. Does nothing when disarmed.
    pub fn reschedule<E: Environment>(&mut self, env: &mut E) -> Option<TimerHandle> {
        let armed = self.armed.as_mut()?;
        let now = env.now_ms();
        let drift = i128::from(now) - i128::from(armed.expected_at_ms);
        armed.expected_at_ms = armed.expected_at_ms.saturating_add(TICK_MS);
        let delay = (i128::from(TICK_MS) - drift).clamp(0, i128::from(TICK_MS) * 2);
        let delay = u64::try_from(delay).unwrap_or(TICK_MS);
        armed.handle = env.schedule(delay);
        Some(armed.handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::env::ManualEnvironment;

    #[test]
    fn drain_uses_reserve_first() {
        let mut seat = Seat::fresh(3_000, 1_500);

        assert_eq!(drain(&mut seat), Drained::Reserve);
        assert_eq!(seat.reserve_time_remaining_ms, 500);
        assert_eq!(drain(&mut seat), Drained::Reserve);
        assert_eq!(seat.reserve_time_remaining_ms, 0);
        assert_eq!(drain(&mut seat), Drained::Total);
        assert_eq!(seat.total_time_remaining_ms, 2_000);
    }

    #[test]
    fn drain_reports_expiry_at_zero() {
        let mut seat = Seat::fresh(1_000, 0);
        assert_eq!(drain(&mut seat), Drained::Expired);
        assert_eq!(seat.total_time_remaining_ms, 0);
    }

    #[test]
    fn arming_replaces_previous_tick() {
        let mut env = ManualEnvironment::seeded(0);
        let mut clock = Clock::new();

        let first = clock.arm(Player::One, &mut env);
        let second = clock.arm(Player::Two, &mut env);

        assert_ne!(first, second);
        assert_eq!(env.pending_timers(), 1);
        assert_eq!(clock.armed_player(), Player::Two);
        assert_eq!(clock.claim(first), None);
        assert_eq!(clock.claim(second), Some(Player::Two));
    }

    #[test]
    fn disarm_cancels_pending_tick() {
        let mut env = ManualEnvironment::seeded(0);
        let mut clock = Clock::new();
        clock.arm(Player::One, &mut env);

        clock.disarm(&mut env);

        assert!(!clock.is_armed());
        assert_eq!(env.pending_timers(), 0);
        assert_eq!(clock.armed_player(), Player::None);
    }

    #[test]
    fn late_tick_shortens_next_delay() {
        let mut env = ManualEnvironment::seeded(0);
        let mut clock = Clock::new();
        clock.arm(Player::One, &mut env);
        assert_eq!(clock.expected_at(), Some(1_000));

        // Fired 300 ms late.
        env.advance(1_300);
        assert!(env.pop_due(1_300).is_some());
        clock.reschedule(&mut env);

        assert_eq!(clock.expected_at(), Some(2_000));
        assert_eq!(env.next_due(), Some(2_000));
    }

    #[test]
    fn very_late_tick_fires_immediately() {
        let mut env = ManualEnvironment::seeded(0);
        let mut clock = Clock::new();
        clock.arm(Player::One, &mut env);

        env.advance(2_500);
        assert!(env.pop_due(2_500).is_some());
        clock.reschedule(&mut env);

        assert_eq!(env.next_due(), Some(2_500));
    }
}

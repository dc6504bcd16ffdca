//! The machine's view of the outside world.
//!
//! The engine needs three things it cannot compute itself: a monotonic
//! clock, a source of randomness for dice and coin flips, and a way to be
//! called back later. [`Environment`] bundles them so the machine can run
//! against the real world ([`SystemEnvironment`]) or against virtual time
//! with scripted dice ([`ManualEnvironment`]).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Identifies one scheduled callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Time, randomness and deferred callbacks.
///
/// A scheduled callback is delivered by the host calling
/// [`GameMachine::on_timer`](crate::effects::GameMachine::on_timer) with the
/// handle returned here. Cancelled handles must never be delivered; a late
/// delivery of a handle that is no longer armed is tolerated by the machine.
pub trait Environment {
    /// Milliseconds on a monotonic clock with an arbitrary origin.
    fn now_ms(&self) -> u64;

    /// A uniform value in `1..=6`.
    fn roll_die(&mut self) -> u8;

    /// A fair coin; `true` means player one.
    fn coin_flip(&mut self) -> bool;

    /// Ask to be called back after `delay_ms`.
    fn schedule(&mut self, delay_ms: u64) -> TimerHandle;

    fn cancel(&mut self, handle: TimerHandle);
}

/// Pending deadlines ordered by due time, then by creation order.
#[derive(Clone, Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    pending: Vec<(u64, TimerHandle)>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_at_ms: u64) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.pending.push((due_at_ms, handle));
        handle
    }

    pub fn cancel(&mut self, handle: TimerHandle) {
        self.pending.retain(|(_, pending)| *pending != handle);
    }

    /// Earliest deadline still pending.
    pub fn next_due(&self) -> Option<u64> {
        self.pending.iter().map(|(due, _)| *due).min()
    }

    /// Remove and return the earliest timer due at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(u64, TimerHandle)> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, (due, _))| *due <= now_ms)
            .min_by_key(|(_, entry)| *entry)
            .map(|(index, _)| index)?;
        Some(self.pending.remove(index))
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Wall-clock environment backed by [`Instant`] and an entropy-seeded RNG.
///
/// The host owns the event loop: sleep for [`next_due_in`](Self::next_due_in),
/// then deliver everything [`take_due`](Self::take_due) returns.
#[derive(Debug)]
pub struct SystemEnvironment {
    origin: Instant,
    rng: StdRng,
    timers: TimerQueue,
}

impl SystemEnvironment {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            rng: StdRng::from_entropy(),
            timers: TimerQueue::new(),
        }
    }

    /// How long until the next callback is due, if any is pending.
    pub fn next_due_in(&self) -> Option<Duration> {
        self.timers
            .next_due()
            .map(|due| Duration::from_millis(due.saturating_sub(self.now_ms())))
    }

    /// Remove every callback whose deadline has passed, earliest first.
    pub fn take_due(&mut self) -> Vec<TimerHandle> {
        let now = self.now_ms();
        let mut due = Vec::new();
        while let Some((_, handle)) = self.timers.pop_due(now) {
            due.push(handle);
        }
        due
    }
}

impl Default for SystemEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for SystemEnvironment {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn roll_die(&mut self) -> u8 {
        self.rng.gen_range(1..=6)
    }

    fn coin_flip(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }

    fn schedule(&mut self, delay_ms: u64) -> TimerHandle {
        let due = self.now_ms().saturating_add(delay_ms);
        self.timers.schedule(due)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.timers.cancel(handle);
    }
}

/// Deterministic environment: virtual time, seeded RNG, optional scripted
/// dice and coin flips. Scripted values are used first, in order.
#[derive(Debug)]
pub struct ManualEnvironment {
    now_ms: u64,
    rng: StdRng,
    dice: VecDeque<u8>,
    coins: VecDeque<bool>,
    timers: TimerQueue,
}

impl ManualEnvironment {
    pub fn seeded(seed: u64) -> Self {
        Self {
            now_ms: 0,
            rng: StdRng::seed_from_u64(seed),
            dice: VecDeque::new(),
            coins: VecDeque::new(),
            timers: TimerQueue::new(),
        }
    }

    /// Queue dice values; each is clamped into `1..=6`.
    pub fn with_dice<I>(mut self, dice: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        self.dice.extend(dice.into_iter().map(|die| die.clamp(1, 6)));
        self
    }

    pub fn with_coins<I>(mut self, coins: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        self.coins.extend(coins);
        self
    }

    pub fn push_dice(&mut self, one: u8, two: u8) {
        self.dice.push_back(one.clamp(1, 6));
        self.dice.push_back(two.clamp(1, 6));
    }

    pub fn push_coin(&mut self, heads: bool) {
        self.coins.push_back(heads);
    }

    /// Move virtual time forward without delivering anything.
    pub fn advance(&mut self, ms: u64) {
        self.now_ms = self.now_ms.saturating_add(ms);
    }

    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    /// Pop the earliest timer due no later than `until_ms`, moving virtual
    /// time to its deadline (or leaving it where it is if that is later).
    pub fn pop_due(&mut self, until_ms: u64) -> Option<TimerHandle> {
        let (due, handle) = self.timers.pop_due(until_ms)?;
        self.set_now(due);
        Some(handle)
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Deadline of the earliest pending timer.
    pub fn next_due(&self) -> Option<u64> {
        self.timers.next_due()
    }
}

impl Default for ManualEnvironment {
    fn default() -> Self {
        Self::seeded(0)
    }
}

impl Environment for ManualEnvironment {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn roll_die(&mut self) -> u8 {
        match self.dice.pop_front() {
            Some(die) => die,
            None => self.rng.gen_range(1..=6),
        }
    }

    fn coin_flip(&mut self) -> bool {
        match self.coins.pop_front() {
            Some(heads) => heads,
            None => self.rng.gen_bool(0.5),
        }
    }

    fn schedule(&mut self, delay_ms: u64) -> TimerHandle {
        self.timers.schedule(self.now_ms.saturating_add(delay_ms))
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.timers.cancel(handle);
    }
}

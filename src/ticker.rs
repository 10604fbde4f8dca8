// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Matrix Workbench - Analysis Ticker

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Default tick period.
pub const TICK_PERIOD_MS: u64 = 1_000;
/// Default number of ticks between full recomputations.
pub const RECOMPUTE_EVERY_TICKS: u64 = 5;
/// Longest accepted tick period (one day).
pub const MAX_TICK_PERIOD_MS: u64 = 86_400_000;
/// Most overdue ticks released after a stall; older ones are dropped.
pub const MAX_CATCH_UP_TICKS: u64 = 60;

// ─── CancelHandle ────────────────────────────────────────────────────────────

/// Shared cancellation flag for a running [`Ticker`].
///
/// Cancelling stops future ticks only; a tick that is already being
/// processed runs to completion.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Rc<Cell<bool>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

// ─── ElapsedTime ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElapsedTime {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl ElapsedTime {
    pub fn from_ms(ms: u64) -> Self {
        let total = ms / 1_000;
        Self {
            hours: total / 3_600,
            minutes: (total / 60) % 60,
            seconds: total % 60,
        }
    }
}

impl fmt::Display for ElapsedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

// ─── Tick ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tick {
    /// 1-based tick number since the ticker started.
    pub index: u64,
    pub elapsed_ms: u64,
    pub elapsed: ElapsedTime,
    /// Whether this tick should trigger recomputation and a threshold check.
    pub recompute_due: bool,
}

// ─── Ticker ──────────────────────────────────────────────────────────────────

/// Fixed-period schedule anchored at `origin_ms`.
///
/// Tick `k` is due at `origin_ms + k * period_ms`. [`poll`](Self::poll)
/// releases at most one tick per call, so ticks never overlap. After a stall
/// only the last [`MAX_CATCH_UP_TICKS`] overdue ticks are released and tick
/// indices jump past the dropped ones.
#[derive(Debug, Clone)]
pub struct Ticker {
    origin_ms: u64,
    period_ms: u64,
    recompute_every: u64,
    fired: u64,
    cancel: CancelHandle,
}

impl Ticker {
    pub fn new(origin_ms: u64, period_ms: u64, recompute_every: u64) -> Self {
        Self {
            origin_ms,
            period_ms: period_ms.max(1),
            recompute_every: recompute_every.max(1),
            fired: 0,
            cancel: CancelHandle::default(),
        }
    }

    pub fn origin_ms(&self) -> u64 {
        self.origin_ms
    }

    pub fn fired(&self) -> u64 {
        self.fired
    }

    pub fn handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn next_due_ms(&self) -> u64 {
        self.origin_ms
            .saturating_add((self.fired + 1).saturating_mul(self.period_ms))
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.fired.saturating_mul(self.period_ms)
    }

    /// Release the next tick if it is due at `now_ms` and not cancelled.
    pub fn poll(&mut self, now_ms: u64) -> Option<Tick> {
        if self.is_cancelled() || now_ms < self.next_due_ms() {
            return None;
        }
        let due = now_ms.saturating_sub(self.origin_ms) / self.period_ms;
        if due.saturating_sub(self.fired) > MAX_CATCH_UP_TICKS {
            self.fired = due - MAX_CATCH_UP_TICKS;
        }
        self.fired += 1;
        let elapsed_ms = self.elapsed_ms();
        Some(Tick {
            index: self.fired,
            elapsed_ms,
            elapsed: ElapsedTime::from_ms(elapsed_ms),
            recompute_due: self.fired % self.recompute_every == 0,
        })
    }
}

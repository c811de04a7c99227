//! Cancellable single-shot timers over an injectable clock.
//!
//! Nothing here sleeps. The owner asks the queue for due entries with the
//! current time and dispatches them itself, so tests drive time with
//! [`ManualClock`] instead of waiting.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Milliseconds since an arbitrary clock epoch.
pub type Millis = u64;

pub trait Clock: Send + Sync {
    fn now_ms(&self) -> Millis;
}

pub struct SystemClock {
    started: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        self.started.elapsed().as_millis() as Millis
    }
}

#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start: Millis) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    pub fn advance(&self, by: Millis) -> Millis {
        self.now.fetch_add(by, Ordering::SeqCst) + by
    }

    pub fn set(&self, to: Millis) {
        self.now.store(to, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.now.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct PendingTimer<K> {
    handle: TimerHandle,
    deadline: Millis,
    key: K,
}

#[derive(Debug)]
pub struct TimerQueue<K> {
    next_id: u64,
    pending: Vec<PendingTimer<K>>,
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self {
            next_id: 1,
            pending: Vec::new(),
        }
    }
}

impl<K: Clone> TimerQueue<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Millis, after_ms: Millis, key: K) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(PendingTimer {
            handle,
            deadline: now.saturating_add(after_ms),
            key,
        });
        handle
    }

    /// Cancel `previous` (if still pending) and schedule a fresh timer. This is
    /// the debounce primitive: at most one timer per slot is ever pending.
    pub fn reschedule(
        &mut self,
        previous: Option<TimerHandle>,
        now: Millis,
        after_ms: Millis,
        key: K,
    ) -> TimerHandle {
        if let Some(previous) = previous {
            self.cancel(previous);
        }
        self.schedule(now, after_ms, key)
    }

    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|timer| timer.handle != handle);
        before != self.pending.len()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|timer| timer.handle == handle)
    }

    /// Remove and return every timer whose deadline is at or before `now`,
    /// earliest first. Ties keep scheduling order.
    pub fn take_due(&mut self, now: Millis) -> Vec<(TimerHandle, K)> {
        let mut due: Vec<PendingTimer<K>> = Vec::new();
        let mut index = 0;
        while index < self.pending.len() {
            if self.pending[index].deadline <= now {
                due.push(self.pending.remove(index));
            } else {
                index += 1;
            }
        }
        due.sort_by_key(|timer| (timer.deadline, timer.handle.0));
        due.into_iter()
            .map(|timer| (timer.handle, timer.key))
            .collect()
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.pending.iter().map(|timer| timer.deadline).min()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

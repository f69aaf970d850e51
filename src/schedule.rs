use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use glam::Vec2;

use crate::ecs::components::ActionState;

/// Motion + frame tick period.
pub const TICK_MS: u64 = 60;
/// Behavior re-evaluation period.
pub const BEHAVIOR_MS: u64 = 2000;
/// Blink check period.
pub const BLINK_CHECK_MS: u64 = 1000;

/// Pointer input already hit-tested against the cat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Click,
    Enter,
    Leave,
}

/// Every state change in the scene arrives as one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    Tick,
    BehaviorCheck,
    BlinkCheck,
    Pointer(PointerEvent),
    EndBlink,
    EndReaction { reaction: u64 },
    ExpireHearts { ids: [u64; 2] },
    ForceAction(ActionState),
    WalkTo(Vec2),
}

impl SimEvent {
    /// Ordering among events due at the same millisecond (lower runs first).
    fn priority(&self) -> u8 {
        match self {
            SimEvent::Tick => 0,
            SimEvent::BehaviorCheck => 1,
            SimEvent::BlinkCheck => 2,
            SimEvent::Pointer(_) => 3,
            SimEvent::EndBlink | SimEvent::EndReaction { .. } | SimEvent::ExpireHearts { .. } => 4,
            SimEvent::ForceAction(_) | SimEvent::WalkTo(_) => 5,
        }
    }
}

/// Cancellation handle for a periodic timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle(u32);

struct Pending {
    due: u64,
    priority: u8,
    seq: u64,
    event: SimEvent,
    /// Set for interval timers: owning handle and period.
    every: Option<(TimerHandle, u64)>,
}

impl Pending {
    fn key(&self) -> (u64, u8, u64) {
        (self.due, self.priority, self.seq)
    }
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Single serialized event queue on a simulated millisecond clock.
///
/// Interval timers, one-shot timeouts and posted input all land in the
/// same heap, so the scene never sees two mutations at once.
pub struct Scheduler {
    now: u64,
    queue: BinaryHeap<Reverse<Pending>>,
    next_seq: u64,
    next_handle: u32,
    live: Vec<TimerHandle>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            now: 0,
            queue: BinaryHeap::new(),
            next_seq: 0,
            next_handle: 0,
            live: Vec::new(),
        }
    }

    /// Current simulated time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Number of interval timers that will still fire.
    pub fn live_intervals(&self) -> usize {
        self.live.len()
    }

    /// Number of queued occurrences (including stale ones from cleared intervals).
    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    fn push(&mut self, event: SimEvent, due: u64, every: Option<(TimerHandle, u64)>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Pending {
            due,
            priority: event.priority(),
            seq,
            event,
            every,
        }));
    }

    /// Fire `event` every `period_ms`, first at `now + period_ms`.
    pub fn set_interval(&mut self, event: SimEvent, period_ms: u64) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.live.push(handle);
        let period = period_ms.max(1);
        self.push(event, self.now + period, Some((handle, period)));
        handle
    }

    /// Fire `event` once, `delay_ms` from now.
    pub fn set_timeout(&mut self, event: SimEvent, delay_ms: u64) {
        self.push(event, self.now + delay_ms, None);
    }

    /// Queue `event` to run at the current time.
    pub fn post(&mut self, event: SimEvent) {
        self.push(event, self.now, None);
    }

    /// Stop an interval. Returns false if it was already cleared.
    pub fn clear(&mut self, handle: TimerHandle) -> bool {
        let before = self.live.len();
        self.live.retain(|h| *h != handle);
        self.queue
            .retain(|Reverse(p)| p.every.map_or(true, |(h, _)| h != handle));
        self.live.len() != before
    }

    /// Drop every interval and pending one-shot.
    pub fn clear_all(&mut self) {
        self.live.clear();
        self.queue.clear();
    }

    /// Pop the next event due at or before `until`, moving the clock to its due time.
    /// Intervals re-arm at `due + period` so they never drift.
    pub fn pop_due(&mut self, until: u64) -> Option<SimEvent> {
        loop {
            if self.queue.peek()?.0.due > until {
                return None;
            }
            let Reverse(p) = self.queue.pop()?;
            if let Some((handle, period)) = p.every {
                if !self.live.contains(&handle) {
                    continue;
                }
                self.push(p.event.clone(), p.due + period, p.every);
            }
            self.now = self.now.max(p.due);
            return Some(p.event);
        }
    }

    /// Move the clock forward once everything up to `until` has been drained.
    pub fn settle(&mut self, until: u64) {
        self.now = self.now.max(until);
    }
}

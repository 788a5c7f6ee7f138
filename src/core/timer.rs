//! Delayed Calls
//!
//! Cooperative one-shot timers serviced from the owner's update.
//! Nothing runs on its own; the owner drains what is due each tick.

/// A payload waiting for its due time.
#[derive(Debug)]
struct Pending<T> {
    due_ms: f64,
    seq: u64,
    payload: T,
}

/// Queue of one-shot timers keyed by game time in milliseconds.
///
/// Dropping the queue cancels everything still pending.
#[derive(Debug)]
pub struct DelayedCalls<T> {
    pending: Vec<Pending<T>>,
    next_seq: u64,
}

impl<T> DelayedCalls<T> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_seq: 0,
        }
    }

    /// Schedules `payload` to become due `delay_ms` after `now_ms`.
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, payload: T) {
        self.pending.push(Pending {
            due_ms: now_ms + delay_ms,
            seq: self.next_seq,
            payload,
        });
        self.next_seq += 1;
    }

    /// Removes and returns every payload due at `now_ms`, earliest first.
    /// Ties keep scheduling order.
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<T> {
        let (mut due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| p.due_ms <= now_ms);
        self.pending = rest;

        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|p| p.payload).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T> Default for DelayedCalls<T> {
    fn default() -> Self {
        Self::new()
    }
}

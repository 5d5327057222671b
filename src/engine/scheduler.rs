//! One-shot timers for the countdown and the reveal delay.
//!
//! A scheduler never calls back into the engine. It hands a `Fired` value to
//! the host, which feeds it to `QuizEngine::fire` on the same serialized
//! event loop as user input.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// One second of the countdown elapsed.
    Tick,
    /// The reveal delay elapsed.
    RevealElapsed,
}

/// A timer that came due, tagged with the session that armed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub id: TimerId,
    pub session: Uuid,
    pub kind: TimerKind,
}

pub trait Scheduler {
    /// Arm a one-shot timer delivering `Fired` after `delay`.
    fn schedule(&mut self, delay: Duration, session: Uuid, kind: TimerKind) -> TimerId;

    /// Disarm a timer. Unknown or already delivered ids are ignored.
    fn cancel(&mut self, id: TimerId);
}

/// Spawns a tokio task per timer and delivers through an unbounded channel.
///
/// Must be used from within a tokio runtime.
pub struct TokioScheduler {
    sender: mpsc::UnboundedSender<Fired>,
    tasks: HashMap<TimerId, AbortHandle>,
    next_id: u64,
}

impl TokioScheduler {
    pub fn new(sender: mpsc::UnboundedSender<Fired>) -> Self {
        Self {
            sender,
            tasks: HashMap::new(),
            next_id: 0,
        }
    }

    /// Number of timers that have not been cancelled or reaped yet.
    pub fn armed_count(&self) -> usize {
        self.tasks.values().filter(|task| !task.is_finished()).count()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, delay: Duration, session: Uuid, kind: TimerKind) -> TimerId {
        // Finished tasks have already delivered; drop their handles.
        self.tasks.retain(|_, task| !task.is_finished());

        let id = TimerId(self.next_id);
        self.next_id += 1;

        let sender = self.sender.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = sender.send(Fired { id, session, kind });
        });
        self.tasks.insert(id, handle.abort_handle());
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(task) = self.tasks.remove(&id) {
            task.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

struct ManualEntry {
    due: Duration,
    fired: Fired,
}

/// A virtual clock. Time only moves when the owner advances it.
#[derive(Default)]
pub struct ManualScheduler {
    now: Duration,
    queue: Vec<ManualEntry>,
    next_id: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Remove the earliest timer due at or before `deadline` and move the
    /// clock to its due time. Timers due together come out in arming order.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<Fired> {
        let position = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= deadline)
            .min_by_key(|(_, entry)| (entry.due, entry.fired.id))
            .map(|(position, _)| position)?;

        let entry = self.queue.remove(position);
        self.now = self.now.max(entry.due);
        Some(entry.fired)
    }

    /// Move the clock forward without delivering anything.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration, session: Uuid, kind: TimerKind) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.queue.push(ManualEntry {
            due: self.now + delay,
            fired: Fired { id, session, kind },
        });
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.queue.retain(|entry| entry.fired.id != id);
    }
}

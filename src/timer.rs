use std::time::Duration;

/// Handle to a task registered with a [`Scheduler`]. Cancelling it
/// guarantees the task never fires again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug)]
struct Entry<A> {
    handle: TaskHandle,
    due: Duration,
    period: Option<Duration>,
    action: A,
}

/// Virtual-clock task scheduler.
///
/// The owner advances time explicitly and pulls due tasks one at a time
/// with [`Scheduler::pop_due`], so a task that cancels another task due at
/// the same instant prevents it from firing.
#[derive(Debug)]
pub struct Scheduler<A> {
    now: Duration,
    next_id: u64,
    entries: Vec<Entry<A>>,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Run `action` once, `delay` from now.
    pub fn after(&mut self, delay: Duration, action: A) -> TaskHandle {
        self.push(delay, None, action)
    }

    /// Run `action` every `period`, first firing one period from now.
    pub fn every(&mut self, period: Duration, action: A) -> TaskHandle {
        let period = period.max(Duration::from_millis(1));
        self.push(period, Some(period), action)
    }

    fn push(&mut self, delay: Duration, period: Option<Duration>, action: A) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            handle,
            due: self.now + delay,
            period,
            action,
        });
        handle
    }

    /// Returns true if the task was still pending.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Move the clock forward to `until` without firing anything.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

impl<A: Clone> Scheduler<A> {
    /// Take the earliest task due at or before `until`, moving the clock to
    /// its due time. Ties fire in registration order. Periodic tasks are
    /// re-armed before they are returned.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TaskHandle, A)> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= until)
            .min_by_key(|(_, e)| (e.due, e.handle.0))
            .map(|(i, _)| i)?;

        let entry = &mut self.entries[idx];
        self.now = self.now.max(entry.due);
        let fired = (entry.handle, entry.action.clone());

        match entry.period {
            Some(period) => entry.due += period,
            None => {
                self.entries.remove(idx);
            }
        }

        Some(fired)
    }
}

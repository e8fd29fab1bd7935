use std::collections::BTreeMap;
use std::time::Duration;

/// Handle to a scheduled task, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle {
    deadline: Duration,
    seq: u64,
}

impl TaskHandle {
    pub fn deadline(&self) -> Duration {
        self.deadline
    }
}

/// Single-threaded timer queue.
///
/// Time is whatever monotonic clock the caller feeds into [`Scheduler::take_due`];
/// in the Bevy app that is `Time<Real>::elapsed()`. Tasks with equal deadlines
/// fire in scheduling order.
#[derive(Debug)]
pub struct Scheduler<T> {
    tasks: BTreeMap<(Duration, u64), T>,
    next_seq: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            tasks: BTreeMap::new(),
            next_seq: 0,
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_at(&mut self, deadline: Duration, task: T) -> TaskHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.tasks.insert((deadline, seq), task);
        TaskHandle { deadline, seq }
    }

    /// Remove a pending task. Returns it if it had not fired yet.
    pub fn cancel(&mut self, handle: TaskHandle) -> Option<T> {
        self.tasks.remove(&(handle.deadline, handle.seq))
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.tasks.contains_key(&(handle.deadline, handle.seq))
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.tasks.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Remove and return every task whose deadline is at or before `now`,
    /// earliest first.
    pub fn take_due(&mut self, now: Duration) -> Vec<(TaskHandle, T)> {
        let later = self.tasks.split_off(&(now, u64::MAX));
        let due = std::mem::replace(&mut self.tasks, later);
        due.into_iter()
            .map(|((deadline, seq), task)| (TaskHandle { deadline, seq }, task))
            .collect()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

//! Deferred continuations on virtual time.

use std::time::Duration;

use tracing::debug;

/// Identifies a scheduled task; pass back to [`Scheduler::cancel`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

type Continuation<W> = Box<dyn FnOnce(&mut W, &mut Scheduler<W>)>;

struct Deferred<W> {
    id: TaskId,
    due: Duration,
    seq: u64,
    run: Continuation<W>,
}

/// Single-threaded timer queue over a world `W`.
///
/// "Waiting" means parking a continuation here and resuming it when the
/// frame loop advances virtual time past its deadline. Continuations get
/// exclusive world access plus the scheduler itself, so they can chain
/// further deferred work. Tasks with equal deadlines run in scheduling
/// order.
pub struct Scheduler<W> {
    tasks: Vec<Deferred<W>>,
    now: Duration,
    next_id: u64,
    next_seq: u64,
}

impl<W> Scheduler<W> {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            now: Duration::ZERO,
            next_id: 0,
            next_seq: 0,
        }
    }

    /// Current virtual time (the latest `advance` reading).
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Park `run` to execute once `delay` has elapsed from now.
    pub fn schedule_in<F>(&mut self, delay: Duration, run: F) -> TaskId
    where
        F: FnOnce(&mut W, &mut Scheduler<W>) + 'static,
    {
        self.next_id += 1;
        self.next_seq += 1;
        let id = TaskId(self.next_id);
        debug!(?id, ?delay, "scheduled deferred task");
        self.tasks.push(Deferred {
            id,
            due: self.now + delay,
            seq: self.next_seq,
            run: Box::new(run),
        });
        id
    }

    /// Cancel a task that has not run yet. Returns whether it was found.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        before != self.tasks.len()
    }

    /// Drop every pending task (teardown path).
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    fn pop_due(&mut self) -> Option<Deferred<W>> {
        let index = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= self.now)
            .min_by_key(|(_, t)| (t.due, t.seq))
            .map(|(i, _)| i)?;
        Some(self.tasks.swap_remove(index))
    }

    /// Move virtual time to `now` and run everything that came due, in
    /// deadline order. Continuations may schedule more work; tasks that
    /// become due during the same advance run too.
    pub fn advance(&mut self, now: Duration, world: &mut W) {
        if now > self.now {
            self.now = now;
        }
        while let Some(task) = self.pop_due() {
            (task.run)(world, self);
        }
    }
}

impl<W> Default for Scheduler<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> core::fmt::Debug for Scheduler<W> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scheduler")
            .field("now", &self.now)
            .field("pending", &self.tasks.len())
            .finish()
    }
}

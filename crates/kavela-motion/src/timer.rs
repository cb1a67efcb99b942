//! Deferred callbacks keyed by due time.
//!
//! Timers fire in `(due, scheduling order)` order, so two timers due at the
//! same instant run in the order they were scheduled. Dropping a
//! [`TimerHandle`] cancels its timer.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::warn;

use crate::context::HostContext;

type TimerCallback = Box<dyn FnOnce(&mut HostContext<'_>)>;

#[derive(Debug, Clone, Copy)]
struct Due(f64);

impl PartialEq for Due {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0).is_eq()
    }
}

impl Eq for Due {}

impl PartialOrd for Due {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Due {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

type TimerKey = (Due, u64);

#[derive(Default)]
pub(crate) struct TimerQueue {
    entries: BTreeMap<TimerKey, TimerCallback>,
    next_seq: u64,
}

impl fmt::Debug for TimerQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerQueue")
            .field("pending", &self.entries.len())
            .field("next_due", &self.next_due())
            .finish()
    }
}

impl TimerQueue {
    fn insert(&mut self, due_ms: f64, callback: TimerCallback) -> TimerKey {
        let key = (Due(due_ms), self.next_seq);
        self.next_seq += 1;
        self.entries.insert(key, callback);
        key
    }

    fn cancel(&mut self, key: &TimerKey) -> bool {
        self.entries.remove(key).is_some()
    }

    pub(crate) fn next_due(&self) -> Option<f64> {
        self.entries.first_key_value().map(|((due, _), _)| due.0)
    }

    /// Remove and return the earliest callback due at or before `now_ms`.
    pub(crate) fn pop_due(&mut self, now_ms: f64) -> Option<TimerCallback> {
        if self.next_due()? > now_ms {
            return None;
        }
        self.entries.pop_first().map(|(_, callback)| callback)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Scheduling access to a page's timer queue.
///
/// Holds the queue weakly: once the page is gone, scheduling is a no-op.
#[derive(Debug, Clone)]
pub struct Timers {
    queue: Weak<RefCell<TimerQueue>>,
}

impl Timers {
    pub(crate) fn new(queue: &Rc<RefCell<TimerQueue>>) -> Self {
        Self {
            queue: Rc::downgrade(queue),
        }
    }

    /// Run `callback` once the page clock reaches `due_ms`.
    pub fn schedule_at(
        &self,
        due_ms: f64,
        callback: impl FnOnce(&mut HostContext<'_>) + 'static,
    ) -> TimerHandle {
        let key = self
            .queue
            .upgrade()
            .map(|queue| queue.borrow_mut().insert(due_ms, Box::new(callback)));
        TimerHandle {
            queue: self.queue.clone(),
            key,
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.upgrade().map_or(0, |queue| queue.borrow().len())
    }
}

/// Owner of one scheduled timer; cancels it on drop.
#[derive(Debug)]
#[must_use = "dropping a TimerHandle cancels the timer"]
pub struct TimerHandle {
    queue: Weak<RefCell<TimerQueue>>,
    key: Option<TimerKey>,
}

impl TimerHandle {
    /// Cancel the timer if it has not fired. Idempotent.
    pub fn cancel(&mut self) {
        let Some(key) = self.key.take() else {
            return;
        };
        let Some(queue) = self.queue.upgrade() else {
            return;
        };
        match queue.try_borrow_mut() {
            Ok(mut queue) => {
                queue.cancel(&key);
            }
            Err(_) => warn!("timer queue busy; cancelled timer left to expire"),
        };
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kavela_dom::Document;

    fn fire_all(queue: &Rc<RefCell<TimerQueue>>, now_ms: f64) -> usize {
        let mut doc = Document::default();
        let mut effects = Vec::new();
        let mut fired = 0;
        loop {
            let next = queue.borrow_mut().pop_due(now_ms);
            let Some(callback) = next else { break };
            let mut ctx = HostContext::new(
                &mut doc,
                now_ms,
                crate::viewport::Viewport::new(100.0, 100.0),
                &mut effects,
            );
            callback(&mut ctx);
            fired += 1;
        }
        fired
    }

    #[test]
    fn fires_in_due_then_schedule_order() {
        let queue = Rc::new(RefCell::new(TimerQueue::default()));
        let timers = Timers::new(&queue);
        let log = Rc::new(RefCell::new(Vec::new()));

        let mut handles = Vec::new();
        for (label, due) in [("late", 20.0), ("first", 10.0), ("second", 10.0)] {
            let log = Rc::clone(&log);
            handles.push(timers.schedule_at(due, move |_| log.borrow_mut().push(label)));
        }

        assert_eq!(fire_all(&queue, 5.0), 0);
        assert_eq!(fire_all(&queue, 20.0), 3);
        assert_eq!(*log.borrow(), vec!["first", "second", "late"]);
    }

    #[test]
    fn dropping_handle_cancels() {
        let queue = Rc::new(RefCell::new(TimerQueue::default()));
        let timers = Timers::new(&queue);
        let fired = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&fired);
        let handle = timers.schedule_at(1.0, move |_| *flag.borrow_mut() = true);
        assert_eq!(timers.pending(), 1);
        drop(handle);
        assert_eq!(timers.pending(), 0);
        assert_eq!(fire_all(&queue, 10.0), 0);
        assert!(!*fired.borrow());
    }

    #[test]
    fn scheduling_after_queue_is_gone_is_inert() {
        let queue = Rc::new(RefCell::new(TimerQueue::default()));
        let timers = Timers::new(&queue);
        drop(queue);
        let mut handle = timers.schedule_at(1.0, |_| {});
        handle.cancel();
        assert_eq!(timers.pending(), 0);
    }
}

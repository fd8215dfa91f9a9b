// src/collect/clock.rs
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::time::Duration;

/// Time source for the rate-limit wait.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
    fn sleep(&self, dur: Duration);
}

/// Wall clock; `sleep` blocks the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, dur: Duration) {
        std::thread::sleep(dur);
    }
}

/// Test clock: `sleep` returns immediately and advances `now` by the requested amount.
#[derive(Debug)]
pub struct ManualClock {
    now: RefCell<DateTime<Utc>>,
    sleeps: RefCell<Vec<Duration>>,
}

impl ManualClock {
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            now: RefCell::new(now),
            sleeps: RefCell::new(Vec::new()),
        }
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.borrow()
    }

    fn sleep(&self, dur: Duration) {
        self.sleeps.borrow_mut().push(dur);
        let step = chrono::Duration::from_std(dur).unwrap_or(chrono::Duration::zero());
        let mut now = self.now.borrow_mut();
        *now += step;
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn sleep(&self, dur: Duration) {
        (**self).sleep(dur)
    }
}

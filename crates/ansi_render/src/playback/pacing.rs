use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

pub trait Clock {
    fn now(&mut self) -> Instant;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&mut self) -> Instant {
        Instant::now()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pacing {
    Continue,
    Interrupted,
}

pub trait Sleeper {
    /// Blocks for up to `duration`, returning early on interruption.
    fn sleep(&mut self, duration: Duration) -> Pacing;
}

const DEFAULT_SLICE: Duration = Duration::from_millis(10);

/// Sleeps in short slices, polling a shared flag set from a signal handler.
#[derive(Clone, Debug)]
pub struct InterruptibleSleeper {
    flag: Arc<AtomicBool>,
    slice: Duration,
}

impl InterruptibleSleeper {
    pub fn new(flag: Arc<AtomicBool>) -> Self {
        Self { flag, slice: DEFAULT_SLICE }
    }

    pub fn with_slice(mut self, slice: Duration) -> Self {
        self.slice = slice.max(Duration::from_millis(1));
        self
    }

    fn interrupted(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

impl Sleeper for InterruptibleSleeper {
    fn sleep(&mut self, duration: Duration) -> Pacing {
        let deadline = Instant::now() + duration;
        loop {
            if self.interrupted() {
                return Pacing::Interrupted;
            }
            let now = Instant::now();
            if now >= deadline {
                return Pacing::Continue;
            }
            thread::sleep(self.slice.min(deadline - now));
        }
    }
}

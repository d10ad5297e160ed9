use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cooperative stop flag shared between the scheduler and whoever drives it.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Interval of `hours` hours, `None` when negative, not finite or too large
/// for a `Duration`.
pub fn interval_from_hours(hours: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(hours * 3600.0).ok()
}

/// Repeats a cycle every `interval` until stopped or `max_cycles` is reached.
pub struct Scheduler {
    interval: Duration,
    tick: Duration,
    max_cycles: Option<u32>,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            tick: Duration::from_secs(1),
            max_cycles: None,
        }
    }

    pub fn with_max_cycles(mut self, max_cycles: Option<u32>) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Runs `cycle` with its 1-based index. Returns the number of cycles run.
    pub fn run(&self, stop: &StopSignal, mut cycle: impl FnMut(u32)) -> u32 {
        let mut done = 0;
        loop {
            if stop.is_stopped() {
                break;
            }
            done += 1;
            cycle(done);

            if self.max_cycles.is_some_and(|max| done >= max) {
                break;
            }
            let next = chrono::Duration::from_std(self.interval)
                .ok()
                .and_then(|d| chrono::Local::now().checked_add_signed(d));
            match next {
                Some(next) => log::info!("Prochain cycle prévu le {}", next.format("%Y-%m-%d %H:%M")),
                None => log::info!("Prochain cycle dans {:?}", self.interval),
            }
            if !self.sleep(stop) {
                break;
            }
        }
        done
    }

    /// Sleeps for `interval` in `tick` slices. `false` when interrupted.
    ///
    /// An interval past the clock's range has no deadline: only `stop` ends it.
    fn sleep(&self, stop: &StopSignal) -> bool {
        let deadline = Instant::now().checked_add(self.interval);
        loop {
            if stop.is_stopped() {
                return false;
            }
            let now = Instant::now();
            let slice = match deadline {
                Some(deadline) if now >= deadline => return true,
                Some(deadline) => self.tick.min(deadline - now),
                None => self.tick,
            };
            std::thread::sleep(slice);
        }
    }
}

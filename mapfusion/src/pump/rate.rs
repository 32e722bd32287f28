//! Fixed-rate loop pacing.

use std::thread;
use std::time::{Duration, Instant};

/// Sleeps the calling thread so successive [`Rate::sleep`] calls are spaced
/// one period apart.
///
/// When the caller falls behind, the schedule restarts from the current
/// instant instead of firing a burst of catch-up ticks.
#[derive(Debug, Clone)]
pub struct Rate {
    period: Option<Duration>,
    last: Instant,
}

impl Rate {
    /// Pace at `hz` ticks per second. Zero, negative or non-finite rates
    /// disable pacing.
    pub fn new(hz: f64) -> Self {
        let period = (hz.is_finite() && hz > 0.0).then(|| Duration::from_secs_f64(1.0 / hz));
        Self {
            period,
            last: Instant::now(),
        }
    }

    /// Interval between ticks, `None` when unthrottled.
    pub fn period(&self) -> Option<Duration> {
        self.period
    }

    /// Block until the next tick.
    pub fn sleep(&mut self) {
        let Some(period) = self.period else {
            return;
        };

        let next = self.last + period;
        let now = Instant::now();
        if next > now {
            thread::sleep(next - now);
            self.last = next;
        } else {
            self.last = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_rate_is_unthrottled() {
        let mut rate = Rate::new(0.0);
        assert_eq!(rate.period(), None);

        let start = Instant::now();
        for _ in 0..1000 {
            rate.sleep();
        }
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn test_invalid_rates_are_unthrottled() {
        assert_eq!(Rate::new(-5.0).period(), None);
        assert_eq!(Rate::new(f64::NAN).period(), None);
        assert_eq!(Rate::new(f64::INFINITY).period(), None);
    }

    #[test]
    fn test_period_from_rate() {
        assert_eq!(Rate::new(100.0).period(), Some(Duration::from_millis(10)));
    }

    #[test]
    fn test_ticks_are_spaced() {
        let mut rate = Rate::new(200.0);
        let start = Instant::now();
        for _ in 0..5 {
            rate.sleep();
        }
        assert!(start.elapsed() >= Duration::from_millis(24));
    }

    #[test]
    fn test_falling_behind_does_not_burst() {
        let mut rate = Rate::new(100.0);
        thread::sleep(Duration::from_millis(50));

        // Behind schedule: returns immediately once, then paces again
        rate.sleep();
        let start = Instant::now();
        rate.sleep();
        rate.sleep();
        assert!(start.elapsed() >= Duration::from_millis(18));
    }
}

use crate::common::*;

/// Measures the rate of accumulated counts over a fixed interval.
#[derive(Debug)]
pub struct RateCounter {
    count: f64,
    instant: Instant,
    interval: Duration,
}

impl RateCounter {
    pub fn new(interval: Duration) -> Self {
        Self {
            count: 0.0,
            instant: Instant::now(),
            interval,
        }
    }

    pub fn with_second_interval() -> Self {
        Self::new(Duration::from_secs(1))
    }

    pub fn add(&mut self, addition: f64) {
        self.count += addition;
    }

    /// Returns the rate per second once the interval has elapsed, and restarts counting.
    pub fn rate(&mut self) -> Option<f64> {
        let elapsed = self.instant.elapsed();
        (elapsed >= self.interval).then(|| self.reset(elapsed))
    }

    /// Returns the rate per second since the last reset, and restarts counting.
    pub fn flush(&mut self) -> f64 {
        let elapsed = self.instant.elapsed();
        self.reset(elapsed)
    }

    fn reset(&mut self, elapsed: Duration) -> f64 {
        let secs = elapsed.as_secs_f64();
        let rate = if secs > 0.0 { self.count / secs } else { 0.0 };
        self.count = 0.0;
        self.instant = Instant::now();
        rate
    }
}

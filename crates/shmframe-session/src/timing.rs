use std::time::Duration;

/// Frames per second for a single frame taking `elapsed_ms`.
///
/// Defined as `0.0` when no time elapsed.
pub fn fps(elapsed_ms: f64) -> f64 {
    if elapsed_ms > 0.0 {
        1000.0 / elapsed_ms
    } else {
        0.0
    }
}

/// Duration of one frame copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferMeasurement {
    elapsed: Duration,
}

impl TransferMeasurement {
    pub fn new(elapsed: Duration) -> Self {
        Self { elapsed }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Elapsed time in fractional milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    /// Single-sample frame rate.
    pub fn fps(&self) -> f64 {
        fps(self.elapsed_ms())
    }
}

/// Timings of repeated processing passes over one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingStats {
    passes: Vec<Duration>,
}

impl ProcessingStats {
    pub fn with_capacity(passes: usize) -> Self {
        Self {
            passes: Vec::with_capacity(passes),
        }
    }

    pub fn record(&mut self, elapsed: Duration) {
        self.passes.push(elapsed);
    }

    pub fn passes(&self) -> &[Duration] {
        &self.passes
    }

    pub fn count(&self) -> usize {
        self.passes.len()
    }

    pub fn total(&self) -> Duration {
        self.passes.iter().sum()
    }

    pub fn total_ms(&self) -> f64 {
        self.total().as_secs_f64() * 1000.0
    }

    /// `count * 1000 / total_ms`, or `0.0` if the passes took no time.
    pub fn average_fps(&self) -> f64 {
        let total_ms = self.total_ms();
        if total_ms > 0.0 {
            self.count() as f64 * 1000.0 / total_ms
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_of_zero_elapsed_is_zero() {
        assert_eq!(fps(0.0), 0.0);
        assert_eq!(TransferMeasurement::new(Duration::ZERO).fps(), 0.0);
    }

    #[test]
    fn fps_of_half_second_is_two() {
        let m = TransferMeasurement::new(Duration::from_millis(500));
        assert_eq!(m.elapsed_ms(), 500.0);
        assert_eq!(m.fps(), 2.0);
    }

    #[test]
    fn average_fps_over_passes() {
        let mut stats = ProcessingStats::with_capacity(4);
        for _ in 0..4 {
            stats.record(Duration::from_millis(250));
        }
        assert_eq!(stats.count(), 4);
        assert_eq!(stats.total(), Duration::from_secs(1));
        assert_eq!(stats.average_fps(), 4.0);
    }

    #[test]
    fn average_fps_without_time_is_zero() {
        let mut stats = ProcessingStats::default();
        assert_eq!(stats.average_fps(), 0.0);
        stats.record(Duration::ZERO);
        assert_eq!(stats.average_fps(), 0.0);
    }
}

//! Frame timing metrics for the render loop.

use std::collections::VecDeque;
use std::time::Instant;

/// Number of frame intervals kept in the rolling window (~1s at 60 FPS).
const SAMPLE_COUNT: usize = 60;
/// Reported FPS ceiling; tiny intervals would otherwise produce absurd rates.
const FPS_CAP: f64 = 120.0;

/// Snapshot of recent frame timing. Times are in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PerfMetrics {
    pub fps: f64,
    pub avg_frame_time: f64,
    pub min_frame_time: f64,
    pub max_frame_time: f64,
}

/// Tracks the interval between successive frames over a rolling window.
///
/// The interval is measured between `begin_frame` calls (the real frame
/// cadence), not the duration of the draw work, so FPS reflects the display
/// rate rather than how fast the scene builds.
#[derive(Debug, Default)]
pub struct PerformanceMonitor {
    frame_times: VecDeque<f64>,
    last_frame: Option<Instant>,
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call at the top of every frame.
    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        if let Some(last) = self.last_frame {
            let interval_ms = now.duration_since(last).as_secs_f64() * 1000.0;
            self.frame_times.push_back(interval_ms);
            if self.frame_times.len() > SAMPLE_COUNT {
                self.frame_times.pop_front();
            }
        }
        self.last_frame = Some(now);
    }

    /// Current metrics; all zeros until two frames have been seen.
    pub fn metrics(&self) -> PerfMetrics {
        if self.frame_times.is_empty() {
            return PerfMetrics::default();
        }
        let sum: f64 = self.frame_times.iter().sum();
        let avg = sum / self.frame_times.len() as f64;
        let min = self.frame_times.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.frame_times.iter().copied().fold(0.0, f64::max);
        let fps = if avg > 0.0 {
            (1000.0 / avg).min(FPS_CAP)
        } else {
            0.0
        };
        PerfMetrics {
            fps,
            avg_frame_time: avg,
            min_frame_time: min,
            max_frame_time: max,
        }
    }

    /// Drop all samples (e.g. after a long pause that would skew the window).
    pub fn reset(&mut self) {
        self.frame_times.clear();
        self.last_frame = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_empty_monitor_reports_zeros() {
        let monitor = PerformanceMonitor::new();
        assert_eq!(monitor.metrics(), PerfMetrics::default());
    }

    #[test]
    fn test_single_frame_has_no_interval() {
        let mut monitor = PerformanceMonitor::new();
        monitor.begin_frame();
        assert_eq!(monitor.metrics(), PerfMetrics::default());
    }

    #[test]
    fn test_intervals_are_recorded() {
        let mut monitor = PerformanceMonitor::new();
        monitor.begin_frame();
        sleep(Duration::from_millis(5));
        monitor.begin_frame();
        sleep(Duration::from_millis(5));
        monitor.begin_frame();

        let metrics = monitor.metrics();
        assert!(metrics.avg_frame_time >= 5.0);
        assert!(metrics.min_frame_time > 0.0);
        assert!(metrics.max_frame_time >= metrics.min_frame_time);
        assert!(metrics.fps > 0.0);
    }

    #[test]
    fn test_fps_is_capped() {
        let mut monitor = PerformanceMonitor::new();
        for _ in 0..10 {
            monitor.begin_frame();
        }
        assert!(monitor.metrics().fps <= FPS_CAP);
    }

    #[test]
    fn test_window_is_bounded() {
        let mut monitor = PerformanceMonitor::new();
        for _ in 0..(SAMPLE_COUNT * 2) {
            monitor.begin_frame();
        }
        assert!(monitor.frame_times.len() <= SAMPLE_COUNT);
    }

    #[test]
    fn test_reset() {
        let mut monitor = PerformanceMonitor::new();
        monitor.begin_frame();
        monitor.begin_frame();
        monitor.reset();
        assert_eq!(monitor.metrics(), PerfMetrics::default());
    }
}

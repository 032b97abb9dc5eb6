//! Request statistics for the serving handler.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Prediction latency statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct LatencyStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Metrics collector for handler calls
pub struct HandlerMetrics {
    /// Total prediction requests served
    pub requests_served: AtomicU64,
    /// Total instance rows scored
    pub rows_scored: AtomicU64,
    /// Requests rejected with an error
    pub requests_failed: AtomicU64,
    /// Prediction latencies (in microseconds)
    latencies: RwLock<Vec<u64>>,
    /// Start time for throughput calculation
    start_time: Instant,
}

impl HandlerMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            requests_served: AtomicU64::new(0),
            rows_scored: AtomicU64::new(0),
            requests_failed: AtomicU64::new(0),
            latencies: RwLock::new(Vec::with_capacity(1000)),
            start_time: Instant::now(),
        }
    }

    /// Record a served prediction request
    pub fn record_request(&self, latency: Duration, rows: usize) {
        self.requests_served.fetch_add(1, Ordering::Relaxed);
        self.rows_scored.fetch_add(rows as u64, Ordering::Relaxed);

        if let Ok(mut latencies) = self.latencies.write() {
            latencies.push(latency.as_micros() as u64);
            // Keep only the most recent window
            if latencies.len() > 10000 {
                latencies.drain(0..5000);
            }
        }
    }

    /// Record a rejected request
    pub fn record_failure(&self) {
        self.requests_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get prediction latency statistics
    pub fn latency_stats(&self) -> LatencyStats {
        let latencies = match self.latencies.read() {
            Ok(latencies) => latencies,
            Err(_) => return LatencyStats::default(),
        };
        if latencies.is_empty() {
            return LatencyStats::default();
        }

        let mut sorted: Vec<u64> = latencies.clone();
        sorted.sort_unstable();

        let count = sorted.len();
        LatencyStats {
            count: count as u64,
            mean_us: sorted.iter().sum::<u64>() / count as u64,
            p50_us: sorted[count / 2],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: *sorted.last().unwrap_or(&0),
        }
    }

    /// Get current throughput (requests per second)
    pub fn throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.requests_served.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Log summary statistics
    pub fn log_summary(&self) {
        let stats = self.latency_stats();

        info!(
            requests = self.requests_served.load(Ordering::Relaxed),
            rows = self.rows_scored.load(Ordering::Relaxed),
            failed = self.requests_failed.load(Ordering::Relaxed),
            mean_us = stats.mean_us,
            p50_us = stats.p50_us,
            p99_us = stats.p99_us,
            throughput = format!("{:.1}/s", self.throughput()),
            "Serving summary"
        );
    }
}

impl Default for HandlerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_request_counts() {
        let metrics = HandlerMetrics::new();

        metrics.record_request(Duration::from_micros(100), 3);
        metrics.record_request(Duration::from_micros(300), 1);
        metrics.record_failure();

        assert_eq!(metrics.requests_served.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.rows_scored.load(Ordering::Relaxed), 4);
        assert_eq!(metrics.requests_failed.load(Ordering::Relaxed), 1);

        let stats = metrics.latency_stats();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean_us, 200);
        assert_eq!(stats.max_us, 300);
    }

    #[test]
    fn test_empty_latency_stats() {
        let stats = HandlerMetrics::new().latency_stats();
        assert_eq!(stats.count, 0);
        assert_eq!(stats.p99_us, 0);
    }
}

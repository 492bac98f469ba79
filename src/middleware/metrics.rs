use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;

use super::Middleware;
use crate::server::{Request, Response};

// Start time stashed in request extensions by `before`.
#[derive(Clone, Copy)]
struct RequestStart(Instant);

// Saturates instead of truncating the `u128` nanosecond count.
fn saturating_nanos(latency: Duration) -> u64 {
    u64::try_from(latency.as_nanos()).unwrap_or(u64::MAX)
}

/// Lock-free request counters.
///
/// Counts completed requests, accumulates latency and keeps a per-status
/// breakdown. Requests whose error propagates past this link are not counted,
/// since post-hooks only run on success; install it outside the point where
/// errors are converted to responses if those should be included.
pub struct MetricsMiddleware {
    request_count: AtomicUsize,
    total_latency_ns: AtomicU64,
    status_counts: DashMap<u16, AtomicU64>,
}

impl Default for MetricsMiddleware {
    fn default() -> Self {
        Self {
            request_count: AtomicUsize::new(0),
            total_latency_ns: AtomicU64::new(0),
            status_counts: DashMap::new(),
        }
    }
}

impl MetricsMiddleware {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of requests that completed with a response.
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Mean latency across completed requests; zero before the first one.
    pub fn average_latency(&self) -> Duration {
        let count = u64::try_from(self.request_count.load(Ordering::Relaxed)).unwrap_or(u64::MAX);
        if count == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos(self.total_latency_ns.load(Ordering::Relaxed) / count)
        }
    }

    /// Number of responses sent with `status`.
    pub fn status_count(&self, status: u16) -> u64 {
        self.status_counts
            .get(&status)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Prometheus text exposition of the counters.
    pub fn render_prometheus(&self) -> String {
        let mut out = String::new();
        out.push_str("# HELP waypost_requests_total Total number of handled requests\n");
        out.push_str("# TYPE waypost_requests_total counter\n");
        let _ = writeln!(out, "waypost_requests_total {}", self.request_count());
        out.push_str("# HELP waypost_request_latency_seconds Average request latency in seconds\n");
        out.push_str("# TYPE waypost_request_latency_seconds gauge\n");
        let _ = writeln!(
            out,
            "waypost_request_latency_seconds {}",
            self.average_latency().as_secs_f64()
        );
        out.push_str("# HELP waypost_responses_total Responses by status code\n");
        out.push_str("# TYPE waypost_responses_total counter\n");

        let mut statuses: Vec<(u16, u64)> = self
            .status_counts
            .iter()
            .map(|e| (*e.key(), e.value().load(Ordering::Relaxed)))
            .collect();
        statuses.sort_unstable();
        for (status, count) in statuses {
            let _ = writeln!(out, "waypost_responses_total{{status=\"{status}\"}} {count}");
        }
        out
    }
}

impl Middleware for MetricsMiddleware {
    fn before(&self, req: &mut Request) {
        req.extensions.insert(RequestStart(Instant::now()));
    }

    fn after(&self, req: &Request, res: &mut Response) {
        let latency = req
            .extensions
            .get::<RequestStart>()
            .map(|s| s.0.elapsed())
            .unwrap_or_default();

        self.request_count.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ns
            .fetch_add(saturating_nanos(latency), Ordering::Relaxed);
        self.status_counts
            .entry(res.status.as_u16())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }
}

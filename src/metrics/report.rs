use std::time::Duration;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

use crate::error::MetricsError;
use crate::http::HttpResponse;

use super::LatencyHistogram;

/// Status code counted as a successful attempt.
pub const SUCCESS_STATUS: u16 = 200;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LatencySummary {
    pub min_ms: u64,
    pub max_ms: u64,
    pub avg_ms: u64,
    pub p50_ms: u64,
    pub p90_ms: u64,
    pub p99_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub elapsed_millis: u64,
    pub success_count: u64,
    pub total_count: u64,
    /// Successful response bodies by first-seen order.
    pub response_histogram: IndexMap<String, u64>,
    pub latency: LatencySummary,
}

impl RunReport {
    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("  time  costs : {} ms", self.elapsed_millis),
            format!("success/total: {}/{}", self.success_count, self.total_count),
            format!(
                "latency (ms) : min {} / avg {} / p50 {} / p90 {} / p99 {} / max {}",
                self.latency.min_ms,
                self.latency.avg_ms,
                self.latency.p50_ms,
                self.latency.p90_ms,
                self.latency.p99_ms,
                self.latency.max_ms
            ),
            "    detail   :".to_owned(),
        ];
        for (body, count) in &self.response_histogram {
            lines.push(format!(
                "\t\tresp len: {}  num: {}",
                body.chars().count(),
                count
            ));
        }
        lines
    }
}

/// Running totals for one batch run.
///
/// Not shared between tasks: the runner's driver loop owns it and records
/// every completion, so updates are serialized without a lock.
#[derive(Debug)]
pub struct ReportAggregator {
    success_count: u64,
    total_count: u64,
    histogram: IndexMap<String, u64>,
    latency: LatencyHistogram,
    latency_sum_ms: u128,
}

impl ReportAggregator {
    /// # Errors
    ///
    /// Returns an error if the latency histogram cannot be created.
    pub fn new() -> Result<Self, MetricsError> {
        Ok(Self {
            success_count: 0,
            total_count: 0,
            histogram: IndexMap::new(),
            latency: LatencyHistogram::new()?,
            latency_sum_ms: 0,
        })
    }

    pub fn record(&mut self, response: &HttpResponse, latency: Duration) {
        self.total_count = self.total_count.saturating_add(1);
        let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.latency_sum_ms = self.latency_sum_ms.saturating_add(u128::from(latency_ms));
        if let Err(err) = self.latency.record(latency_ms) {
            warn!("{}", err);
        }

        if response.status == SUCCESS_STATUS {
            self.success_count = self.success_count.saturating_add(1);
            let bucket = self.histogram.entry(response.data.clone()).or_insert(0);
            *bucket = bucket.saturating_add(1);
        }
    }

    #[must_use]
    pub const fn total_count(&self) -> u64 {
        self.total_count
    }

    #[must_use]
    pub fn finish(self, elapsed: Duration) -> RunReport {
        let (p50_ms, p90_ms, p99_ms) = self.latency.percentiles();
        let avg_ms = self
            .latency_sum_ms
            .checked_div(u128::from(self.total_count))
            .and_then(|avg| u64::try_from(avg).ok())
            .unwrap_or(0);
        RunReport {
            elapsed_millis: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            success_count: self.success_count,
            total_count: self.total_count,
            response_histogram: self.histogram,
            latency: LatencySummary {
                min_ms: self.latency.min(),
                max_ms: self.latency.max(),
                avg_ms,
                p50_ms,
                p90_ms,
                p99_ms,
            },
        }
    }
}

//! Aggregation of attempt outcomes into a run report.
mod histogram;
mod report;

#[cfg(test)]
mod tests;

pub use histogram::LatencyHistogram;
pub use report::{LatencySummary, ReportAggregator, RunReport, SUCCESS_STATUS};

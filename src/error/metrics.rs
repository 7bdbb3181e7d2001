use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Failed to create latency histogram: {source}")]
    CreateHistogram {
        #[source]
        source: hdrhistogram::CreationError,
    },
    #[error("Failed to record latency: {source}")]
    RecordLatency {
        #[source]
        source: hdrhistogram::RecordError,
    },
}

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
    #[error("Invalid header name '{name}'.")]
    InvalidHeaderName { name: String },
    #[error("Invalid header value for '{name}'.")]
    InvalidHeaderValue { name: String },
    #[error("Failed to read upload file '{path}': {source}")]
    ReadUploadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Request failed: {source}")]
    RequestFailed {
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to read response body: {source}")]
    ReadBody {
        #[source]
        source: reqwest::Error,
    },
    #[error("Attempt did not complete: {source}")]
    AttemptAborted {
        #[source]
        source: tokio::task::JoinError,
    },
    #[error("Concurrency limiter closed unexpectedly.")]
    LimiterClosed,
    #[error("Run finished without a response.")]
    NoResponse,
}

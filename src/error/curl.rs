use thiserror::Error;

#[derive(Debug, Error)]
pub enum CurlError {
    #[error("Curl command has unbalanced quotes or escapes.")]
    Tokenize,
    #[error("Curl command does not contain a URL.")]
    MissingUrl,
    #[error("Unknown request method '{value}'.")]
    UnknownMethod { value: String },
    #[error("Flag '{flag}' requires a value.")]
    MissingValue { flag: String },
}

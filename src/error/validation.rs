use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("URL must not be empty.")]
    EmptyUrl,
    #[error("Invalid URL '{url}'. Expected an http(s) URL.")]
    ImplausibleUrl { url: String },
    #[error("Invalid header format: '{value}'. Expected 'Key: Value'")]
    InvalidHeaderFormat { value: String },
    #[error("Invalid parameter format: '{value}'. Expected 'key=value'")]
    InvalidParamFormat { value: String },
    #[error("Invalid duration '{value}': {message}")]
    InvalidDuration { value: String, message: String },
    #[error("Invalid HTTP method '{value}'.")]
    InvalidMethod { value: String },
    #[error("Invalid body type '{value}'. Use json, form-data, or raw.")]
    InvalidBodyType { value: String },
    #[error("Missing request: pass --url, --curl, or --curl-file.")]
    MissingRequest,
    #[error("Curl file '{path}' was rejected by the import policy.")]
    ImportRejected { path: String },
}

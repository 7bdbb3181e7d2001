use tracing::debug;

use crate::curl;
use crate::error::{AppError, AppResult, ValidationError};
use crate::import::{ImportPolicy, read_curl_file};
use crate::request::{BodyEncoding, Request, split_file_paths};

use super::cli::RequestArgs;

impl RequestArgs {
    /// Builds the request these flags describe, starting from the curl
    /// command when one was given.
    ///
    /// # Errors
    ///
    /// Returns an error when no URL source was given, the curl file was
    /// refused by `policy`, or the curl text does not decode.
    pub fn build_request(&self, policy: &ImportPolicy) -> AppResult<Request> {
        let from_curl = match self.curl_text(policy)? {
            Some(text) => Some(curl::decode(&text)?),
            None => None,
        };
        let has_curl = from_curl.is_some();
        if !has_curl && self.url.is_none() {
            return Err(AppError::validation(ValidationError::MissingRequest));
        }
        let mut request = from_curl.unwrap_or_default();

        if let Some(url) = &self.url {
            request.url = url.clone();
        }
        if let Some(method) = self.method {
            request.method = method;
        }
        for (key, value) in &self.headers {
            request
                .headers
                .retain(|existing, _| !existing.eq_ignore_ascii_case(key));
            request.headers.insert(key.clone(), value.clone());
        }
        for (key, value) in &self.params {
            request.set_text_param(key.clone(), value.clone());
        }
        if let Some((key, paths)) = &self.file_param {
            request.set_upload(key.clone(), split_file_paths(paths));
        }
        if let Some(body) = &self.body {
            request.raw_body = body.clone();
        }

        if let Some(encoding) = self.body_type {
            request.body_encoding = encoding;
        } else if !has_curl && (!self.params.is_empty() || self.file_param.is_some()) {
            request.body_encoding = BodyEncoding::FormData;
        }
        debug!(
            "Built {} {} ({:?}, {} params)",
            request.method,
            request.url,
            request.body_encoding,
            request.params().len()
        );
        Ok(request)
    }

    fn curl_text(&self, policy: &ImportPolicy) -> AppResult<Option<String>> {
        if let Some(text) = &self.curl {
            return Ok(Some(text.clone()));
        }
        let Some(path) = &self.curl_file else {
            return Ok(None);
        };
        match read_curl_file(path, policy)? {
            Some(text) => Ok(Some(text)),
            None => Err(AppError::validation(ValidationError::ImportRejected {
                path: path.display().to_string(),
            })),
        }
    }
}

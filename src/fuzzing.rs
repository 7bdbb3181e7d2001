//! Entry points for the fuzz targets under `fuzz/`.
use std::time::Duration;

use crate::config::types::ConfigFile;
use crate::config::{CliOverrides, Settings, parse_duration_value, resolve_settings};
use crate::curl;
use crate::error::{AppError, AppResult};
use crate::http::HttpResponse;
use crate::request::{Request, parse_header};
use crate::response::{ProcessOptions, process};

/// Parses a header string in `Key: Value` format.
///
/// # Errors
///
/// Returns an error when the header is malformed.
pub fn parse_header_input(input: &str) -> AppResult<(String, String)> {
    parse_header(input).map_err(AppError::from)
}

/// Parses a config duration value (e.g. `250`, `10s`).
///
/// # Errors
///
/// Returns an error when the duration is invalid.
pub fn parse_duration_input(input: &str) -> Result<Duration, String> {
    parse_duration_value(input)
}

/// Decodes curl text and, on success, re-encodes the request.
///
/// # Errors
///
/// Returns an error when the curl text does not decode.
pub fn curl_decode_encode(input: &str) -> AppResult<(Request, String)> {
    let request = curl::decode(input)?;
    let encoded = curl::encode(&request);
    Ok((request, encoded))
}

/// Applies a JSON path to a body the way `run --json-path` does.
#[must_use]
pub fn json_path_input(body: &str, path: &str) -> String {
    let response = HttpResponse {
        status: 200,
        status_info: String::new(),
        header_info: String::new(),
        data: body.to_owned(),
        length: body.len(),
    };
    let options = ProcessOptions {
        json_path: Some(path.to_owned()),
        ..ProcessOptions::default()
    };
    process(&response, &options)
}

/// Parses TOML config text and resolves it into settings.
///
/// # Errors
///
/// Returns an error when the TOML is invalid or a value is rejected.
pub fn settings_from_toml(input: &str) -> Result<Settings, String> {
    let config: ConfigFile = toml::from_str(input).map_err(|err| err.to_string())?;
    resolve_settings(Some(&config), &CliOverrides::default()).map_err(|err| err.to_string())
}

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::ValidationError;

/// Parses one `Key: Value` header, trimming both sides.
///
/// # Errors
///
/// Returns an error when the line has no `:` separator.
pub fn parse_header(s: &str) -> Result<(String, String), ValidationError> {
    match s.split_once(':') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_owned(), value.trim().to_owned()))
        }
        Some(_) | None => Err(ValidationError::InvalidHeaderFormat {
            value: s.to_owned(),
        }),
    }
}

/// Parses a multi-line header block. Blank and malformed lines are skipped;
/// later duplicates overwrite earlier ones.
#[must_use]
pub fn parse_header_text(text: &str) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        match parse_header(line) {
            Ok((key, value)) => {
                headers.insert(key, value);
            }
            Err(err) => debug!("Skipping header line: {}", err),
        }
    }
    headers
}

#[must_use]
pub fn has_header(headers: &BTreeMap<String, String>, name: &str) -> bool {
    headers.keys().any(|key| key.eq_ignore_ascii_case(name))
}

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::http::HttpResponse;

use super::{decode_unicode_escapes, extract};

/// Bodies above this many bytes (or chars) are not rendered.
pub const MAX_SHOW_LENGTH: usize = 1_000_000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProcessOptions {
    pub pretty: bool,
    pub hex: bool,
    pub json_path: Option<String>,
}

/// Renders a response body for display.
///
/// Oversized bodies collapse to a `Data is Too Large!` marker whatever the
/// options. Hex bodies are shown as is. Otherwise the optional JSON path is
/// applied, JSON is indented when `pretty` is set, and escaped unicode is
/// decoded last. Indenting comes first so an escaped quote inside a JSON
/// string cannot break parsing; serde already decodes escapes it reads.
/// Failures at any step leave the text as it was.
#[must_use]
pub fn process(response: &HttpResponse, options: &ProcessOptions) -> String {
    let data = response.data.as_str();
    if response.length > MAX_SHOW_LENGTH
        || (data.len() > MAX_SHOW_LENGTH && data.chars().count() > MAX_SHOW_LENGTH)
    {
        return format!("Data is Too Large! {}", response.length);
    }
    if options.hex {
        return data.to_owned();
    }

    let selected = match options
        .json_path
        .as_deref()
        .map(str::trim)
        .filter(|path| !path.is_empty())
    {
        Some(path) => extract(data, path).unwrap_or_else(|| {
            debug!("JSON path {} did not match, showing full body", path);
            data.to_owned()
        }),
        None => data.to_owned(),
    };

    let shaped = if options.pretty {
        prettify(&selected).unwrap_or(selected)
    } else {
        selected
    };
    decode_unicode_escapes(&shaped).into_owned()
}

fn prettify(text: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    serde_json::to_string_pretty(&value).ok()
}

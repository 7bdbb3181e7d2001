use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub timeout: Option<DurationValue>,
    pub connect_timeout: Option<DurationValue>,
    pub redirect: Option<u32>,
    pub insecure: Option<bool>,
    pub user_agent: Option<String>,
    pub unsupported_extensions: Option<Vec<String>>,
    pub max_import_bytes: Option<u64>,
    pub pretty: Option<bool>,
    pub hex: Option<bool>,
}

/// A bare number is milliseconds; text accepts `ms`/`s`/`m` suffixes.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Millis(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, String> {
        match self {
            DurationValue::Millis(0) => Err("Duration must be > 0.".to_owned()),
            DurationValue::Millis(millis) => Ok(Duration::from_millis(*millis)),
            DurationValue::Text(text) => super::parse_duration_value(text),
        }
    }
}

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_REPEAT: u64 = 1;
const DEFAULT_CONCURRENCY: usize = 1;
const DEFAULT_DELAY_MS: u64 = 0;

/// Repeat/concurrency/delay settings for one batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RunConfig {
    pub repeat_count: u64,
    pub concurrency: usize,
    pub delay_millis: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            repeat_count: DEFAULT_REPEAT,
            concurrency: DEFAULT_CONCURRENCY,
            delay_millis: DEFAULT_DELAY_MS,
        }
    }
}

impl RunConfig {
    /// Builds a config, raising a zero repeat count or concurrency to 1.
    #[must_use]
    pub fn new(repeat_count: u64, concurrency: usize, delay_millis: u64) -> Self {
        Self {
            repeat_count: repeat_count.max(1),
            concurrency: concurrency.max(1),
            delay_millis,
        }
    }

    /// Parses free-text fields as typed by a user. Each field falls back to
    /// its default independently; invalid text never fails the run.
    #[must_use]
    pub fn from_text(repeat: &str, concurrency: &str, delay: &str) -> Self {
        let repeat_count = parse_field::<i64>("repeat", repeat)
            .and_then(|value| u64::try_from(value).ok())
            .unwrap_or(DEFAULT_REPEAT);
        let concurrency = parse_field::<i64>("concurrency", concurrency)
            .and_then(|value| usize::try_from(value).ok())
            .unwrap_or(DEFAULT_CONCURRENCY);
        let delay_millis = parse_field::<i64>("delay", delay)
            .map_or(DEFAULT_DELAY_MS, |value| u64::try_from(value).unwrap_or(0));
        Self::new(repeat_count, concurrency, delay_millis)
    }
}

fn parse_field<T>(name: &str, text: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<T>() {
        Ok(value) => Some(value),
        Err(err) => {
            debug!("Using default {}: '{}' is not a number ({})", name, trimmed, err);
            None
        }
    }
}

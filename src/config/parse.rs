use std::time::Duration;

/// Parses `250`, `250ms`, `30s` or `2m`. Unsuffixed numbers are milliseconds.
pub(crate) fn parse_duration_value(value: &str) -> Result<Duration, String> {
    let value = value.trim();
    let split = value
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(value.len());
    let (digits, unit) = value.split_at(split);
    if digits.is_empty() {
        return Err(format!("Invalid duration '{}'.", value));
    }
    let number: u64 = digits
        .parse()
        .map_err(|err| format!("Invalid duration '{}': {}", value, err))?;

    let duration = match unit.trim() {
        "" | "ms" => Duration::from_millis(number),
        "s" => Duration::from_secs(number),
        "m" => Duration::from_secs(
            number
                .checked_mul(60)
                .ok_or_else(|| "Duration overflow.".to_owned())?,
        ),
        other => return Err(format!("Invalid duration unit '{}'.", other)),
    };
    if duration.is_zero() {
        return Err("Duration must be > 0.".to_owned());
    }
    Ok(duration)
}

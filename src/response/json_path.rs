use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Parses `$.data.items[0].name`, `data.items[0]` or `$['a b'].c`.
/// Returns `None` for malformed paths.
#[must_use]
pub fn parse_path(path: &str) -> Option<Vec<PathSegment>> {
    let trimmed = path.trim();
    let rest = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let mut segments = Vec::new();
    let mut chars = rest.chars().peekable();
    let mut key = String::new();

    while let Some(ch) = chars.next() {
        match ch {
            '.' => {
                if !key.is_empty() {
                    segments.push(PathSegment::Key(std::mem::take(&mut key)));
                }
            }
            '[' => {
                if !key.is_empty() {
                    segments.push(PathSegment::Key(std::mem::take(&mut key)));
                }
                let mut inner = String::new();
                let mut closed = false;
                for next in chars.by_ref() {
                    if next == ']' {
                        closed = true;
                        break;
                    }
                    inner.push(next);
                }
                if !closed {
                    return None;
                }
                segments.push(bracket_segment(inner.trim())?);
            }
            _ => key.push(ch),
        }
    }
    if !key.is_empty() {
        segments.push(PathSegment::Key(key));
    }
    Some(segments)
}

fn bracket_segment(inner: &str) -> Option<PathSegment> {
    for quote in ['\'', '"'] {
        if let Some(quoted) = inner
            .strip_prefix(quote)
            .and_then(|value| value.strip_suffix(quote))
        {
            return Some(PathSegment::Key(quoted.to_owned()));
        }
    }
    inner.parse::<usize>().ok().map(PathSegment::Index)
}

/// Extracts the value at `path` from a JSON body. Strings come back without
/// quotes; everything else is compact JSON.
#[must_use]
pub fn extract(body: &str, path: &str) -> Option<String> {
    let segments = parse_path(path)?;
    let root: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(err) => {
            debug!("Body is not JSON, skipping path {}: {}", path, err);
            return None;
        }
    };
    let mut current = &root;
    for segment in &segments {
        current = match (segment, current) {
            (PathSegment::Key(key), Value::Object(map)) => map.get(key)?,
            (PathSegment::Index(index), Value::Array(items)) => items.get(*index)?,
            (PathSegment::Key(key), Value::Array(items)) => items.get(key.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    match current {
        Value::String(text) => Some(text.clone()),
        other => serde_json::to_string(other).ok(),
    }
}

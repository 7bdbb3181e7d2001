use crate::error::ValidationError;

/// Schemeless URLs shorter than this are rejected as implausible.
pub const MIN_SCHEMELESS_URL_LEN: usize = 11;

/// Cheap plausibility check run before any network activity. This is not a
/// full URL parse: anything starting with `http` or long enough passes.
///
/// # Errors
///
/// Returns an error for empty or implausibly short schemeless URLs.
pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    if url.is_empty() {
        return Err(ValidationError::EmptyUrl);
    }
    let has_scheme = url
        .get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("http"));
    if !has_scheme && url.chars().count() < MIN_SCHEMELESS_URL_LEN {
        return Err(ValidationError::ImplausibleUrl {
            url: url.to_owned(),
        });
    }
    Ok(())
}

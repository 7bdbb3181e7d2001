use std::borrow::Cow;

/// Replaces literal `\uXXXX` escapes with the characters they name. Surrogate
/// pairs are joined; lone surrogates and malformed escapes stay as written.
#[must_use]
pub fn decode_unicode_escapes(text: &str) -> Cow<'_, str> {
    if !text.contains("\\u") {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("\\u") {
        let (before, escaped) = rest.split_at(start);
        out.push_str(before);
        match decode_at(escaped) {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = escaped.get(consumed..).unwrap_or_default();
            }
            None => {
                out.push_str("\\u");
                rest = escaped.get(2..).unwrap_or_default();
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Decodes the escape at the start of `text`, returning the char and the
/// number of bytes consumed.
fn decode_at(text: &str) -> Option<(char, usize)> {
    let unit = hex_unit(text)?;
    match unit {
        0xD800..=0xDBFF => {
            let low = text.get(6..).and_then(hex_unit)?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return None;
            }
            let code = 0x1_0000_u32
                .saturating_add(unit.saturating_sub(0xD800).checked_shl(10)?)
                .saturating_add(low.saturating_sub(0xDC00));
            char::from_u32(code).map(|ch| (ch, 12))
        }
        0xDC00..=0xDFFF => None,
        _ => char::from_u32(unit).map(|ch| (ch, 6)),
    }
}

fn hex_unit(text: &str) -> Option<u32> {
    let digits = text.strip_prefix("\\u")?.get(..4)?;
    if !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

use crate::request::{BodyEncoding, FILE_PARAM_KEYS, Request};

use super::tokens::looks_like_url;

/// Wraps a value in single quotes for a POSIX shell.
#[must_use]
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Renders a [`Request`] as a single-line curl command.
///
/// The output always carries `-X`, one `-H` per header in key order, and the
/// body flag matching the body encoding. A URL the decoder would not pick out
/// as a bare word is written with `--url`. Decoding the result yields the same
/// request for anything [`decode`](super::decode) produced.
#[must_use]
pub fn encode(request: &Request) -> String {
    let mut parts = vec!["curl".to_owned(), "-X".to_owned(), request.method.to_string()];
    if looks_like_url(&request.url) {
        parts.push(quote(&request.url));
    } else {
        parts.push("--url".to_owned());
        parts.push(quote(&request.url));
    }
    for (key, value) in &request.headers {
        parts.push("-H".to_owned());
        parts.push(quote(&format!("{}: {}", key, value)));
    }

    match request.body_encoding {
        BodyEncoding::Json | BodyEncoding::Raw => {
            if let Some(payload) = body_payload(request) {
                parts.push("-d".to_owned());
                parts.push(quote(&payload));
            }
        }
        BodyEncoding::FormData => {
            if let Some((field, paths)) = request.upload() {
                for path in paths {
                    parts.push("-F".to_owned());
                    parts.push(quote(&format!("{}=@{}", field, path)));
                }
            }
            for (key, value) in request.text_params() {
                let flag = if reads_as_file(&key, &value) {
                    "--form-string"
                } else {
                    "-F"
                };
                parts.push(flag.to_owned());
                parts.push(quote(&format!("{}={}", key, value)));
            }
        }
    }
    parts.join(" ")
}

fn body_payload(request: &Request) -> Option<String> {
    if !request.raw_body.is_empty() {
        return Some(request.raw_body.clone());
    }
    let params = request.text_params();
    if request.body_encoding != BodyEncoding::Json || params.is_empty() {
        return None;
    }
    serde_json::to_string(&params).ok()
}

/// Text values curl's `-F` would treat as file references.
fn reads_as_file(key: &str, value: &str) -> bool {
    value.starts_with(['@', '<']) || FILE_PARAM_KEYS.contains(&key)
}

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::request::{BodyEncoding, HttpMethod, Request, has_header};

pub const APPLICATION_URL_ENCODE: &str = "application/x-www-form-urlencoded";
const APPLICATION_JSON: &str = "application/json";

/// The shape of one exchange, chosen once per run from method and body
/// encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpCall {
    /// Any non-POST method; params travel as query pairs.
    Generic {
        method: HttpMethod,
        url: String,
        params: BTreeMap<String, String>,
        headers: BTreeMap<String, String>,
    },
    /// Multipart POST with one or more files under `field`.
    Upload {
        url: String,
        field: String,
        files: Vec<PathBuf>,
        fields: BTreeMap<String, String>,
        headers: BTreeMap<String, String>,
    },
    /// POST of params as a JSON object or an urlencoded form.
    Post {
        url: String,
        params: BTreeMap<String, String>,
        headers: BTreeMap<String, String>,
        json: bool,
    },
    /// POST of a literal payload.
    RawPost {
        url: String,
        body: String,
        headers: BTreeMap<String, String>,
    },
}

impl HttpCall {
    /// Selects the call shape for `request`, sending `headers` (the request
    /// headers after overrides and form content-type injection).
    #[must_use]
    pub fn from_request(request: &Request, mut headers: BTreeMap<String, String>) -> Self {
        let url = request.url.clone();
        if request.method != HttpMethod::Post {
            return HttpCall::Generic {
                method: request.method,
                url,
                params: request.text_params(),
                headers,
            };
        }

        match request.body_encoding {
            BodyEncoding::Json | BodyEncoding::FormData => {
                if let Some((field, paths)) = request.upload() {
                    // The transport writes the multipart boundary header itself.
                    headers.retain(|key, value| {
                        !(key.eq_ignore_ascii_case("content-type")
                            && value.eq_ignore_ascii_case(APPLICATION_URL_ENCODE))
                    });
                    return HttpCall::Upload {
                        url,
                        field: field.to_owned(),
                        files: paths.iter().map(PathBuf::from).collect(),
                        fields: request.text_params(),
                        headers,
                    };
                }
                let json = request.body_encoding == BodyEncoding::Json;
                if json && !request.raw_body.trim().is_empty() {
                    if !has_header(&headers, "content-type") {
                        headers.insert("Content-Type".to_owned(), APPLICATION_JSON.to_owned());
                    }
                    return HttpCall::RawPost {
                        url,
                        body: request.raw_body.clone(),
                        headers,
                    };
                }
                HttpCall::Post {
                    url,
                    params: request.text_params(),
                    headers,
                    json,
                }
            }
            BodyEncoding::Raw => HttpCall::RawPost {
                url,
                body: request.raw_body.clone(),
                headers,
            },
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            HttpCall::Generic { .. } => "generic",
            HttpCall::Upload { .. } => "upload",
            HttpCall::Post { json: true, .. } => "post-json",
            HttpCall::Post { json: false, .. } => "post-form",
            HttpCall::RawPost { .. } => "post-raw",
        }
    }
}

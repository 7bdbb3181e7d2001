use std::collections::BTreeMap;

use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use tracing::{debug, warn};

use crate::error::{AppResult, CurlError};
use crate::request::{
    BodyEncoding, FILE_PARAM_KEYS, HttpMethod, Request, parse_header, split_file_paths,
};

use super::tokens::{Flag, Token, classify, looks_like_url, lookup, tokenize};

/// `-F` value suffixes curl reads as part metadata rather than the path.
const FORM_MODIFIERS: [&str; 4] = [";type=", ";filename=", ";headers=", ";encoder="];

#[derive(Debug)]
enum FormEntry {
    Field { key: String, value: String },
    Literal { key: String, value: String },
}

#[derive(Debug, Default)]
struct DecodeState {
    method: Option<HttpMethod>,
    head: bool,
    get: bool,
    url: Option<String>,
    headers: BTreeMap<String, String>,
    data: Vec<String>,
    forms: Vec<FormEntry>,
}

/// Parses curl command text into a [`Request`].
///
/// Flags may appear in any order; flags that have no meaning for a request
/// description are ignored.
///
/// # Errors
///
/// Returns an error when quoting is unbalanced, a flag is missing its value,
/// the method is unknown, or no URL token is present.
pub fn decode(text: &str) -> AppResult<Request> {
    let tokens = tokenize(text)?;
    let mut words = tokens.iter().map(String::as_str).peekable();
    if words
        .peek()
        .is_some_and(|first| first.eq_ignore_ascii_case("curl"))
    {
        words.next();
    }

    let mut state = DecodeState::default();
    while let Some(token) = words.next() {
        match classify(token) {
            Token::Bare(word) => state.bare(word),
            Token::Flag { name, inline } => {
                let Some(flag) = lookup(name) else {
                    debug!("Ignoring unsupported curl flag {}", name);
                    continue;
                };
                if !flag.takes_value() {
                    state.switch(flag);
                    continue;
                }
                let value = match inline {
                    Some(value) => value,
                    None => words.next().ok_or_else(|| CurlError::MissingValue {
                        flag: name.to_owned(),
                    })?,
                };
                state.apply(flag, value)?;
            }
        }
    }
    Ok(state.finish()?)
}

impl DecodeState {
    fn bare(&mut self, word: &str) {
        if self.url.is_none() && looks_like_url(word) {
            self.url = Some(word.to_owned());
        } else {
            debug!("Ignoring curl argument '{}'", word);
        }
    }

    const fn switch(&mut self, flag: Flag) {
        match flag {
            Flag::Head => self.head = true,
            Flag::Get => self.get = true,
            Flag::Method
            | Flag::Header
            | Flag::Data
            | Flag::DataUrlencode
            | Flag::Form
            | Flag::FormString
            | Flag::User
            | Flag::UserAgent
            | Flag::Referer
            | Flag::Cookie
            | Flag::Url
            | Flag::Skip => {}
        }
    }

    fn apply(&mut self, flag: Flag, value: &str) -> Result<(), CurlError> {
        match flag {
            Flag::Method => {
                let method = value
                    .parse::<HttpMethod>()
                    .ok()
                    .ok_or_else(|| CurlError::UnknownMethod {
                        value: value.to_owned(),
                    })?;
                self.method = Some(method);
            }
            Flag::Header => match parse_header(value) {
                Ok((key, header_value)) => {
                    self.headers.insert(key, header_value);
                }
                Err(err) => debug!("Skipping curl header: {}", err),
            },
            Flag::Data => self.data.push(value.to_owned()),
            Flag::DataUrlencode => self.data.push(urlencode_data(value)),
            Flag::Form | Flag::FormString => match value.split_once('=') {
                Some(("", _)) | None => warn!("Skipping form entry without a key: {}", value),
                Some((key, field)) => {
                    let (key, value) = (key.to_owned(), field.to_owned());
                    self.forms.push(if flag == Flag::Form {
                        FormEntry::Field { key, value }
                    } else {
                        FormEntry::Literal { key, value }
                    });
                }
            },
            Flag::User => {
                self.headers.insert(
                    "Authorization".to_owned(),
                    format!("Basic {}", B64.encode(value)),
                );
            }
            Flag::UserAgent => {
                self.headers
                    .insert("User-Agent".to_owned(), value.to_owned());
            }
            Flag::Referer => {
                self.headers.insert("Referer".to_owned(), value.to_owned());
            }
            Flag::Cookie => {
                self.headers.insert("Cookie".to_owned(), value.to_owned());
            }
            Flag::Url => {
                if self.url.is_none() {
                    self.url = Some(value.to_owned());
                }
            }
            Flag::Head | Flag::Get | Flag::Skip => {}
        }
        Ok(())
    }

    fn finish(self) -> Result<Request, CurlError> {
        let url = self.url.ok_or(CurlError::MissingUrl)?;
        let has_body = !self.data.is_empty() || !self.forms.is_empty();
        let method = self.method.unwrap_or(match (self.head, self.get, has_body) {
            (true, _, _) => HttpMethod::Head,
            (false, false, true) => HttpMethod::Post,
            (false, true, _) | (false, false, false) => HttpMethod::Get,
        });

        let mut request = Request::new(method, url);
        request.headers = self.headers;

        if !self.forms.is_empty() {
            if !self.data.is_empty() {
                warn!("Ignoring -d payload: curl cannot combine it with -F.");
            }
            request.body_encoding = BodyEncoding::FormData;
            for entry in self.forms {
                match entry {
                    FormEntry::Field { key, value } => apply_form_field(&mut request, key, value),
                    FormEntry::Literal { key, value } => request.set_text_param(key, value),
                }
            }
        } else if !self.data.is_empty() {
            apply_data(&mut request, self.data.join("&"));
        }
        Ok(request)
    }
}

fn apply_data(request: &mut Request, payload: String) {
    if serde_json::from_str::<serde_json::Value>(&payload).is_ok() {
        request.body_encoding = BodyEncoding::Json;
        request.raw_body = payload;
    } else if !declares_json(&request.headers) && is_form_pairs(&payload) {
        request.body_encoding = BodyEncoding::FormData;
        for (key, value) in url::form_urlencoded::parse(payload.as_bytes()) {
            request.set_text_param(key, value);
        }
    } else {
        request.body_encoding = BodyEncoding::Raw;
        request.raw_body = payload;
    }
}

fn apply_form_field(request: &mut Request, key: String, value: String) {
    let paths = if let Some(path) = value.strip_prefix('@') {
        let path = strip_form_modifiers(path);
        if path.is_empty() {
            Vec::new()
        } else {
            vec![path.to_owned()]
        }
    } else if FILE_PARAM_KEYS.contains(&key.as_str()) {
        split_file_paths(&value)
    } else {
        Vec::new()
    };
    if paths.is_empty() {
        request.set_text_param(key, value);
        return;
    }

    match request.upload_field() {
        None => request.set_upload(key, paths),
        Some(current) if current == key => {
            for path in paths {
                request.push_upload_path(&key, path);
            }
        }
        Some(current) => {
            warn!(
                "Only one upload field is supported; keeping '{}' and treating '{}' as text.",
                current, key
            );
            request.set_text_param(key, value);
        }
    }
}

fn strip_form_modifiers(path: &str) -> &str {
    let cut = FORM_MODIFIERS
        .iter()
        .filter_map(|modifier| path.find(modifier))
        .min()
        .unwrap_or(path.len());
    path.get(..cut).unwrap_or(path)
}

fn urlencode_data(value: &str) -> String {
    let encode = |content: &str| -> String {
        url::form_urlencoded::byte_serialize(content.as_bytes()).collect()
    };
    match value.split_once('=') {
        Some(("", content)) => encode(content),
        Some((name, content)) => format!("{}={}", name, encode(content)),
        None => encode(value),
    }
}

fn declares_json(headers: &BTreeMap<String, String>) -> bool {
    headers.iter().any(|(key, value)| {
        key.eq_ignore_ascii_case("content-type")
            && value.to_ascii_lowercase().contains("application/json")
    })
}

/// `k=v&k2=v2` whose keys stay free of `=` once percent-decoded, so each
/// pair can be written back as a `-F key=value` entry.
fn is_form_pairs(payload: &str) -> bool {
    !payload.is_empty()
        && payload
            .split('&')
            .all(|pair| pair.split_once('=').is_some_and(|(key, _)| !key.is_empty()))
        && url::form_urlencoded::parse(payload.as_bytes()).all(|(key, _)| !key.contains('='))
}

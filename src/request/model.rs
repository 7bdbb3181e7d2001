use std::collections::BTreeMap;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, ValidationError};

/// Param keys that mark an entry as a file upload even without `@`.
pub const FILE_PARAM_KEYS: [&str; 4] = ["file", "files", "image", "images"];

#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Head,
    Delete,
    Options,
    Trace,
    Connect,
}

impl HttpMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
            HttpMethod::Connect => "CONNECT",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HttpMethod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "HEAD" => Ok(HttpMethod::Head),
            "DELETE" => Ok(HttpMethod::Delete),
            "OPTIONS" => Ok(HttpMethod::Options),
            "TRACE" => Ok(HttpMethod::Trace),
            "CONNECT" => Ok(HttpMethod::Connect),
            _ => Err(AppError::validation(ValidationError::InvalidMethod {
                value: s.to_owned(),
            })),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BodyEncoding {
    Json,
    FormData,
    #[default]
    Raw,
}

impl std::str::FromStr for BodyEncoding {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(BodyEncoding::Json),
            "form-data" | "form_data" | "form" => Ok(BodyEncoding::FormData),
            "raw" => Ok(BodyEncoding::Raw),
            _ => Err(AppError::validation(ValidationError::InvalidBodyType {
                value: s.to_owned(),
            })),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum ParamValue {
    Text(String),
    FileRefs(Vec<String>),
}

impl ParamValue {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(value) => Some(value),
            ParamValue::FileRefs(_) => None,
        }
    }

    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self, ParamValue::FileRefs(_))
    }
}

/// One editable parameter row as a caller would display it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamRow {
    pub key: String,
    pub value: String,
    pub is_file: bool,
}

/// Splits a delimited list of upload paths on `,` and `;`.
#[must_use]
pub fn split_file_paths(value: &str) -> Vec<String> {
    value
        .split([',', ';'])
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .map(str::to_owned)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Request {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    params: BTreeMap<String, ParamValue>,
    pub raw_body: String,
    pub body_encoding: BodyEncoding,
    upload_field: Option<String>,
}

impl Request {
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn params(&self) -> &BTreeMap<String, ParamValue> {
        &self.params
    }

    #[must_use]
    pub fn upload_field(&self) -> Option<&str> {
        self.upload_field.as_deref()
    }

    /// Sets a text param. Overwriting the upload field turns it back into
    /// plain text and clears the upload marker.
    pub fn set_text_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        if self.upload_field.as_deref() == Some(key.as_str()) {
            self.upload_field = None;
        }
        self.params.insert(key, ParamValue::Text(value.into()));
    }

    /// Marks `key` as the single file source of this request. A previous file
    /// source under another key is removed.
    pub fn set_upload(&mut self, key: impl Into<String>, paths: Vec<String>) {
        let key = key.into();
        if let Some(previous) = self.upload_field.take()
            && previous != key
        {
            self.params.remove(&previous);
        }
        self.params.insert(key.clone(), ParamValue::FileRefs(paths));
        self.upload_field = Some(key);
    }

    /// Appends a path to the current upload field, creating it when absent.
    pub fn push_upload_path(&mut self, key: &str, path: String) {
        if self.upload_field.as_deref() == Some(key)
            && let Some(ParamValue::FileRefs(paths)) = self.params.get_mut(key)
        {
            paths.push(path);
            return;
        }
        self.set_upload(key, vec![path]);
    }

    #[must_use]
    pub fn text_params(&self) -> BTreeMap<String, String> {
        self.params
            .iter()
            .filter(|(key, _)| !key.is_empty())
            .filter_map(|(key, value)| value.as_text().map(|text| (key.clone(), text.to_owned())))
            .collect()
    }

    /// Returns the upload field name and its paths when a file param is set.
    #[must_use]
    pub fn upload(&self) -> Option<(&str, &[String])> {
        let key = self.upload_field.as_deref()?;
        match self.params.get(key) {
            Some(ParamValue::FileRefs(paths)) => Some((key, paths.as_slice())),
            Some(ParamValue::Text(_)) | None => None,
        }
    }

    /// Param rows with structurally identical entries collapsed.
    #[must_use]
    pub fn param_rows(&self) -> Vec<ParamRow> {
        let mut rows: Vec<ParamRow> = Vec::with_capacity(self.params.len());
        for (key, value) in &self.params {
            let row = match value {
                ParamValue::Text(text) => ParamRow {
                    key: key.clone(),
                    value: text.clone(),
                    is_file: false,
                },
                ParamValue::FileRefs(paths) => ParamRow {
                    key: key.clone(),
                    value: paths.join(";"),
                    is_file: true,
                },
            };
            if !rows.contains(&row) {
                rows.push(row);
            }
        }
        rows
    }
}

use std::collections::BTreeMap;
use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{
    Client, Method, RequestBuilder,
    header::{HeaderMap, HeaderName, HeaderValue},
    redirect,
};
use tracing::debug;

use crate::error::{AppError, AppResult, HttpError};
use crate::request::HttpMethod;

use super::call::HttpCall;

/// How response bytes become `HttpResponse::data`. Chosen per call rather
/// than through any process-wide switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyDecoding {
    #[default]
    Text,
    Hex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_info: String,
    pub header_info: String,
    pub data: String,
    /// Byte length of the raw body; differs from `data` for multi-byte or
    /// hex-decoded content.
    pub length: usize,
}

/// Executes one HTTP exchange. Implementations must tolerate concurrent
/// calls; connection pooling is their concern.
#[async_trait]
pub trait HttpCapability: Send + Sync {
    async fn execute(&self, call: &HttpCall, decoding: BodyDecoding) -> AppResult<HttpResponse>;
}

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub redirect_limit: u32,
    pub insecure: bool,
    pub user_agent: Option<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            redirect_limit: 10,
            insecure: false,
            user_agent: Some(format!("apipost/{}", env!("CARGO_PKG_VERSION"))),
        }
    }
}

/// [`HttpCapability`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestCapability {
    client: Client,
}

impl ReqwestCapability {
    /// Builds the underlying client.
    ///
    /// # Errors
    ///
    /// Returns an error when the TLS backend or client cannot be initialized.
    pub fn new(settings: &ClientSettings) -> AppResult<Self> {
        let mut client_builder = Client::builder()
            .timeout(settings.timeout)
            .connect_timeout(settings.connect_timeout);

        if let Some(agent) = settings.user_agent.as_ref() {
            client_builder = client_builder.user_agent(agent.clone());
        }

        if settings.redirect_limit == 0 {
            client_builder = client_builder.redirect(redirect::Policy::none());
        } else {
            client_builder = client_builder.redirect(redirect::Policy::limited(
                usize::try_from(settings.redirect_limit).unwrap_or(10),
            ));
        }

        if settings.insecure {
            client_builder = client_builder
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true);
        }

        let client = client_builder
            .build()
            .map_err(|err| AppError::http(HttpError::BuildClientFailed { source: err }))?;
        Ok(Self { client })
    }

    async fn build(&self, call: &HttpCall) -> AppResult<RequestBuilder> {
        let request_builder = match call {
            HttpCall::Generic {
                method,
                url,
                params,
                headers,
            } => {
                let mut request_builder = self.client.request(to_reqwest_method(*method), url);
                if !params.is_empty() {
                    request_builder = request_builder.query(params);
                }
                request_builder.headers(build_headers(headers)?)
            }
            HttpCall::Upload {
                url,
                field,
                files,
                fields,
                headers,
            } => {
                let mut form = reqwest::multipart::Form::new();
                for (name, value) in fields {
                    form = form.text(name.clone(), value.clone());
                }
                for path in files {
                    form = form.part(field.clone(), file_part(path).await?);
                }
                self.client
                    .post(url)
                    .headers(build_headers(headers)?)
                    .multipart(form)
            }
            HttpCall::Post {
                url,
                params,
                headers,
                json,
            } => {
                let request_builder = self.client.post(url).headers(build_headers(headers)?);
                if *json {
                    request_builder.json(params)
                } else {
                    request_builder.form(params)
                }
            }
            HttpCall::RawPost { url, body, headers } => self
                .client
                .post(url)
                .headers(build_headers(headers)?)
                .body(body.clone()),
        };
        Ok(request_builder)
    }
}

#[async_trait]
impl HttpCapability for ReqwestCapability {
    async fn execute(&self, call: &HttpCall, decoding: BodyDecoding) -> AppResult<HttpResponse> {
        let request_builder = self.build(call).await?;
        let started = Instant::now();
        let response = request_builder
            .send()
            .await
            .map_err(|err| AppError::http(HttpError::RequestFailed { source: err }))?;

        let status = response.status();
        let version = response.version();
        let mut header_info = String::new();
        for (name, value) in response.headers() {
            header_info.push_str(name.as_str());
            header_info.push_str(": ");
            header_info.push_str(&String::from_utf8_lossy(value.as_bytes()));
            header_info.push('\n');
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|err| AppError::http(HttpError::ReadBody { source: err }))?;
        let cost_ms = started.elapsed().as_millis();
        debug!(
            "{} -> {} {} ({} bytes, {} ms)",
            call.label(),
            version_label(version),
            status,
            bytes.len(),
            cost_ms
        );

        let data = match decoding {
            BodyDecoding::Text => String::from_utf8_lossy(&bytes).into_owned(),
            BodyDecoding::Hex => hex::encode(&bytes),
        };
        Ok(HttpResponse {
            status: status.as_u16(),
            status_info: format!("{} {}  cost: {} ms", version_label(version), status, cost_ms),
            header_info,
            data,
            length: bytes.len(),
        })
    }
}

fn version_label(version: reqwest::Version) -> &'static str {
    match version {
        reqwest::Version::HTTP_09 => "HTTP/0.9",
        reqwest::Version::HTTP_10 => "HTTP/1.0",
        reqwest::Version::HTTP_2 => "HTTP/2",
        reqwest::Version::HTTP_3 => "HTTP/3",
        _ => "HTTP/1.1",
    }
}

const fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Head => Method::HEAD,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Options => Method::OPTIONS,
        HttpMethod::Trace => Method::TRACE,
        HttpMethod::Connect => Method::CONNECT,
    }
}

fn build_headers(headers: &BTreeMap<String, String>) -> AppResult<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|err| {
            debug!("Rejected header name '{}': {}", key, err);
            AppError::http(HttpError::InvalidHeaderName { name: key.clone() })
        })?;
        let val = HeaderValue::from_str(value).map_err(|err| {
            debug!("Rejected header value for '{}': {}", key, err);
            AppError::http(HttpError::InvalidHeaderValue { name: key.clone() })
        })?;
        map.insert(name, val);
    }
    Ok(map)
}

async fn file_part(path: &Path) -> AppResult<reqwest::multipart::Part> {
    let bytes = tokio::fs::read(path).await.map_err(|err| {
        AppError::http(HttpError::ReadUploadFile {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    let file_name = path
        .file_name()
        .and_then(|value| value.to_str())
        .unwrap_or("file")
        .to_owned();
    Ok(reqwest::multipart::Part::bytes(bytes).file_name(file_name))
}

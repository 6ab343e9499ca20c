//! Transports
//!
//! A transport moves one [`ApiRequest`] over the wire and hands back the raw
//! [`ApiResponse`], whatever its status. Status handling and interception
//! belong to the client.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use url::Url;

use crate::error::ClientError;
use crate::request::{ApiRequest, ApiResponse, FormPart, PartValue, RequestBody};
use crate::Result;

#[async_trait]
pub trait Transport: Send + Sync {
    /// Base URL the request paths are resolved against
    fn base_url(&self) -> &Url;

    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

/// Resolve an API path against the base, keeping any path prefix the base
/// carries (`http://host/api` + `/documents` -> `http://host/api/documents`).
pub fn join_api_path(base: &Url, path: &str) -> Result<Url> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    Ok(base.join(path.trim_start_matches('/'))?)
}

pub fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidUrl(raw.to_string()));
    }
    Ok(url)
}

/// Largest response body read into memory
pub const MAX_RESPONSE_BYTES: u64 = 10 * 1024 * 1024;

pub struct ReqwestTransport {
    http: reqwest::Client,
    base_url: Url,
    max_body_bytes: u64,
}

impl ReqwestTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = parse_base_url(base_url)?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("docsentry/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            max_body_bytes: MAX_RESPONSE_BYTES,
        })
    }

    pub fn with_max_body_bytes(mut self, limit: u64) -> Self {
        self.max_body_bytes = limit;
        self
    }
}

/// Read the body chunk by chunk, giving up once it passes `limit`
async fn read_body(mut response: reqwest::Response, limit: u64) -> Result<Vec<u8>> {
    if response.content_length().is_some_and(|len| len > limit) {
        return Err(ClientError::ResponseTooLarge { limit });
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if (body.len() + chunk.len()) as u64 > limit {
            return Err(ClientError::ResponseTooLarge { limit });
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

#[async_trait]
impl Transport for ReqwestTransport {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = join_api_path(&self.base_url, &request.path)?;

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .headers(request.headers.clone());

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(parts) => builder.multipart(build_form(parts)?),
        };

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = match read_body(response, self.max_body_bytes).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(
                    method = %request.method,
                    path = %request.path,
                    status = status.as_u16(),
                    error = %e,
                    "Response body rejected"
                );
                return Err(e);
            }
        };

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            status = status.as_u16(),
            bytes = body.len(),
            "HTTP exchange"
        );

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

fn build_form(parts: &[FormPart]) -> Result<Form> {
    let mut form = Form::new();
    for part in parts {
        form = match &part.value {
            PartValue::Text(value) => form.text(part.name.clone(), value.clone()),
            PartValue::File {
                file_name,
                mime_type,
                bytes,
            } => {
                let file = Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str(mime_type)?;
                form.part(part.name.clone(), file)
            }
        };
    }
    Ok(form)
}

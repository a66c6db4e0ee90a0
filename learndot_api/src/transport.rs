//! Single-request HTTP transport.
//!
//! A [`Transport`] sends exactly one request and reports what came back. It
//! does not interpret status codes; the client decides what counts as a
//! failure.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::Error;

/// Per-request network timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A fully-resolved request.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    /// Sent verbatim.
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    /// Encoded as JSON text when present.
    pub body: Option<Value>,
}

/// What the backend answered.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Canonical reason phrase for `status` (e.g. "Not Found"), or the bare
    /// code when the status has none.
    pub message: String,
    pub body: ResponseBody,
}

impl ApiResponse {
    /// The backend only ever signals success with exactly 200.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Response payload, decoded when the content type is JSON.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Raw(Vec<u8>),
}

impl ResponseBody {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Raw(_) => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Raw(_) => None,
        }
    }
}

/// Executes one HTTP request.
pub trait Transport: Send + Sync {
    fn request(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, Error>> + Send;
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport with the default request timeout.
    pub fn new() -> Result<Self, Error> {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::from(e)
            })?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn request(&self, request: ApiRequest) -> Result<ApiResponse, Error> {
        tracing::debug!("{}: {}", request.method, request.url);
        tracing::debug!("  * Query params: {:?}", request.query);
        if let Some(body) = &request.body {
            tracing::debug!("  * Body: {}", body);
        }

        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers)
            .query(&request.query);
        if let Some(body) = request.body {
            builder = builder.body(body.to_string());
        }

        let resp = builder.send().await.map_err(|e| {
            tracing::error!("Failed to send request: {}", e);
            Error::from(e)
        })?;

        let status = resp.status();
        let is_json = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("json"));
        let bytes = resp.bytes().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::from(e)
        })?;

        let body = if is_json {
            match serde_json::from_slice::<Value>(&bytes) {
                Ok(value) => ResponseBody::Json(value),
                Err(e) => {
                    if !bytes.is_empty() {
                        tracing::warn!("Response claimed JSON but did not parse: {}", e);
                    }
                    ResponseBody::Raw(bytes.to_vec())
                }
            }
        } else {
            ResponseBody::Raw(bytes.to_vec())
        };

        let message = status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.as_str().to_string());
        tracing::debug!("{}: {}", status.as_u16(), message);

        Ok(ApiResponse {
            status: status.as_u16(),
            message,
            body,
        })
    }
}

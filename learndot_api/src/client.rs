//! HTTP client for the Learndot REST v2 API.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::instrument::WithSubscriber;
use tracing::Dispatch;
use url::Url;

use crate::{
    credentials,
    pagination::paginate,
    query::SearchQuery,
    transport::{ApiRequest, ApiResponse, HttpTransport, ResponseBody, Transport, REQUEST_TIMEOUT},
    types::{AggregatedResult, PageResponse, RecordId},
    Error, Stage, Throttle,
};

/// Current authorization header.
pub const AUTH_HEADER: &str = "TrainingRocket-Authorization";
/// Legacy authorization header, still sent with the same token.
pub const LEGACY_AUTH_HEADER: &str = "Learndot-Enterprise-Authorization";

/// Outcome of [`Client::search`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SearchResult {
    /// A single page requested explicitly, returned as the backend sent it.
    Page(PageResponse),
    /// Every page, folded by record id.
    Aggregated(AggregatedResult),
}

impl SearchResult {
    /// Folds a single page into an id-keyed map; aggregated results pass through.
    pub fn into_aggregated(self) -> AggregatedResult {
        match self {
            SearchResult::Page(page) => page.results.into_iter().collect(),
            SearchResult::Aggregated(result) => result,
        }
    }
}

/// Builder for [`Client`].
///
/// Everything that can be wrong with the configuration (missing token,
/// unknown stage, malformed base URL) is reported by [`build`](Self::build)
/// rather than on the first request.
#[derive(Default)]
pub struct ClientBuilder {
    token: Option<String>,
    stage: Stage,
    base_url: Option<String>,
    throttle: Throttle,
    request_timeout: Option<Duration>,
    operation_timeout: Option<Duration>,
    dispatch: Option<Dispatch>,
}

impl ClientBuilder {
    /// Uses this token instead of `LEARNDOT_TOKEN` or the token file.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.stage = stage;
        self
    }

    /// Overrides the stage's base URL. Used for testing with wiremock.
    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(base_url.to_string());
        self
    }

    /// Sets the pause applied after every backend response.
    pub fn throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    /// Network timeout for each individual request. Defaults to 30 seconds.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Deadline for a whole operation, including every page of a search.
    pub fn operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = Some(timeout);
        self
    }

    /// Routes the client's log events to `dispatch` instead of the default subscriber.
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// Builds a client that talks HTTP through `reqwest`.
    pub fn build(self) -> Result<Client, Error> {
        let transport =
            HttpTransport::with_timeout(self.request_timeout.unwrap_or(REQUEST_TIMEOUT))?;
        self.build_with_transport(transport)
    }

    /// Builds a client over a custom [`Transport`].
    pub fn build_with_transport<T: Transport>(self, transport: T) -> Result<Client<T>, Error> {
        let base_url = parse_base_url(self.base_url.as_deref().unwrap_or(self.stage.base_url()))?;
        let token = match self.token {
            Some(token) if !token.trim().is_empty() => token.trim().to_string(),
            Some(_) => return Err(Error::Credential("API token is empty".to_string())),
            None => credentials::resolve_token()?,
        };
        let headers = default_headers(&token)?;

        Ok(Client {
            transport,
            base_url,
            headers,
            throttle: self.throttle,
            operation_timeout: self.operation_timeout,
            dispatch: self.dispatch,
        })
    }
}

fn parse_base_url(base_url: &str) -> Result<Url, Error> {
    let url = Url::parse(base_url).map_err(|e| {
        Error::Configuration(format!("invalid base URL '{}': {}", base_url, e))
    })?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(Error::Configuration(format!(
            "base URL '{}' is not an http(s) URL",
            base_url
        )));
    }
    Ok(url)
}

fn default_headers(token: &str) -> Result<HeaderMap, Error> {
    let mut auth = HeaderValue::from_str(token).map_err(|_| {
        Error::Credential("API token contains characters not allowed in a header".to_string())
    })?;
    auth.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTH_HEADER, auth.clone());
    headers.insert(LEGACY_AUTH_HEADER, auth);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/json; charset=utf-8"),
    );
    Ok(headers)
}

/// Client for the Learndot REST v2 API.
///
/// Every request carries the authorization headers and is followed by the
/// configured [`Throttle`]. Any status other than 200 fails the operation;
/// nothing is retried.
pub struct Client<T = HttpTransport> {
    transport: T,
    base_url: Url,
    headers: HeaderMap,
    throttle: Throttle,
    operation_timeout: Option<Duration>,
    dispatch: Option<Dispatch>,
}

impl Client {
    /// Creates a production client, reading the token from the environment
    /// or `~/.learndot_token`.
    pub fn new() -> Result<Self, Error> {
        Self::builder().build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }
}

impl<T: Transport> Client<T> {
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Searches `entity` with `conditions` as the request body.
    ///
    /// With `query.page` set, exactly one request is made and that page is
    /// returned unaggregated. Otherwise every page is fetched in order and
    /// folded by record id.
    pub async fn search(
        &self,
        entity: &str,
        conditions: &Value,
        query: &SearchQuery,
    ) -> Result<SearchResult, Error> {
        if query.page.is_some() {
            Ok(SearchResult::Page(
                self.search_page(entity, conditions, query).await?,
            ))
        } else {
            Ok(SearchResult::Aggregated(
                self.search_all(entity, conditions, query).await?,
            ))
        }
    }

    /// Fetches a single search page as the backend returns it.
    pub async fn search_page(
        &self,
        entity: &str,
        conditions: &Value,
        query: &SearchQuery,
    ) -> Result<PageResponse, Error> {
        self.run(self.post_search(entity, conditions, query)).await
    }

    /// Fetches every search page and folds the records by id.
    pub async fn search_all(
        &self,
        entity: &str,
        conditions: &Value,
        query: &SearchQuery,
    ) -> Result<AggregatedResult, Error> {
        self.run(paginate(|page| {
            let query = query.for_page(page);
            async move { self.post_search(entity, conditions, &query).await }
        }))
        .await
    }

    /// Number of records matching `conditions`, or 0 when the backend does
    /// not report an integer `size`.
    pub async fn count(&self, entity: &str, conditions: &Value) -> Result<i64, Error> {
        self.run(async {
            let url = self.endpoint(&["manage", entity_segment(entity)?, "search"])?;
            let response = self
                .send(Method::POST, url, Vec::new(), Some(conditions.clone()))
                .await?;
            Ok(response
                .body
                .as_json()
                .and_then(|body| body.get("size"))
                .and_then(Value::as_i64)
                .unwrap_or(0))
        })
        .await
    }

    /// Creates a record in `entity`.
    pub async fn create(&self, entity: &str, conditions: &Value) -> Result<ApiResponse, Error> {
        self.run(async {
            let url = self.endpoint(&["manage", entity_segment(entity)?])?;
            self.send(Method::POST, url, Vec::new(), Some(conditions.clone()))
                .await
        })
        .await
    }

    /// Updates record `id` in `entity`.
    ///
    /// Kept apart from [`create`](Self::create): a blank id is rejected so an
    /// update can never land on the creation endpoint.
    pub async fn update(
        &self,
        entity: &str,
        conditions: &Value,
        id: impl Into<RecordId>,
    ) -> Result<ApiResponse, Error> {
        let id = id.into();
        self.run(async {
            let url = self.record_endpoint(entity, &id)?;
            self.send(Method::POST, url, Vec::new(), Some(conditions.clone()))
                .await
        })
        .await
    }

    /// Fetches a single record by id.
    pub async fn get(&self, entity: &str, id: impl Into<RecordId>) -> Result<ApiResponse, Error> {
        let id = id.into();
        self.run(async {
            let url = self.record_endpoint(entity, &id)?;
            self.send(Method::GET, url, Vec::new(), None).await
        })
        .await
    }

    async fn post_search(
        &self,
        entity: &str,
        conditions: &Value,
        query: &SearchQuery,
    ) -> Result<PageResponse, Error> {
        let url = self.endpoint(&["manage", entity_segment(entity)?, "search"])?;
        let response = self
            .send(
                Method::POST,
                url,
                query.to_query_pairs(),
                Some(conditions.clone()),
            )
            .await?;
        decode_page(response.body)
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        query: Vec<(String, String)>,
        body: Option<Value>,
    ) -> Result<ApiResponse, Error> {
        let request = ApiRequest {
            method,
            url,
            headers: self.headers.clone(),
            query,
            body,
        };
        let response = self.transport.request(request).await;
        // A transport error may still follow a status line the backend counted.
        self.throttle.pause().await;
        let response = response?;

        if !response.is_ok() {
            let snippet = match &response.body {
                ResponseBody::Json(value) => truncate_body(&value.to_string()),
                ResponseBody::Raw(bytes) => truncate_body(&String::from_utf8_lossy(bytes)),
            };
            tracing::error!(
                "Request failed with status {}: {} | body: {}",
                response.status,
                response.message,
                snippet
            );
            return Err(Error::Backend {
                status: response.status,
                message: response.message,
            });
        }
        Ok(response)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Configuration(format!("cannot extend base URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn record_endpoint(&self, entity: &str, id: &RecordId) -> Result<Url, Error> {
        let id = id.to_string();
        if id.trim().is_empty() {
            return Err(Error::InvalidInput("record id must not be empty".to_string()));
        }
        self.endpoint(&["manage", entity_segment(entity)?, id.as_str()])
    }

    /// Applies the operation deadline and the injected log dispatcher.
    async fn run<R, F>(&self, operation: F) -> Result<R, Error>
    where
        F: Future<Output = Result<R, Error>>,
    {
        let limit = self.operation_timeout;
        let bounded = async move {
            match limit {
                Some(limit) => tokio::time::timeout(limit, operation)
                    .await
                    .unwrap_or_else(|_| {
                        tracing::error!("Operation exceeded its {:?} deadline", limit);
                        Err(Error::Timeout(limit))
                    }),
                None => operation.await,
            }
        };
        match &self.dispatch {
            Some(dispatch) => bounded.with_subscriber(dispatch.clone()).await,
            None => bounded.await,
        }
    }
}

fn entity_segment(entity: &str) -> Result<&str, Error> {
    let entity = entity.trim();
    if entity.is_empty() {
        return Err(Error::InvalidInput("entity name must not be empty".to_string()));
    }
    Ok(entity)
}

fn decode_page(body: ResponseBody) -> Result<PageResponse, Error> {
    match body {
        ResponseBody::Json(value @ Value::Object(_)) => serde_json::from_value(value).map_err(|e| {
            tracing::error!("Failed to parse search page: {}", e);
            Error::Decode(e.to_string())
        }),
        ResponseBody::Json(other) => Err(Error::Decode(format!(
            "expected a JSON object, got {}",
            truncate_body(&other.to_string())
        ))),
        ResponseBody::Raw(bytes) => Err(Error::Decode(format!(
            "expected a JSON response, got {}",
            truncate_body(&String::from_utf8_lossy(&bytes))
        ))),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}

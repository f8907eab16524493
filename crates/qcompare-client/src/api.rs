//! REST client for the inventory service.
//!
//! Covers the backend (system), provider, helper and job endpoints. Every
//! request carries `Authorization: Bearer <token>` when a token is set.

use std::time::Duration;

use qcompare_core::{Provider, System};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::{ClientError, ClientResult};
use crate::jobs::{ApiKeys, CreateJobBody, JobRequest, KeysBody};

/// Default API base URL for a local deployment.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Provider fields requested for listings.
pub const PROVIDER_LISTING_FIELDS: [&str; 6] = [
    "name",
    "description",
    "website",
    "from_third_party",
    "third_party",
    "backends_ids",
];

/// Inventory service client.
pub struct ApiClient {
    client: Client,
    /// API base URL (without trailing slash).
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Mongo-style filter and projection sent with query requests.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Query {
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub filter: Map<String, Value>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub projection: Map<String, Value>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match documents whose `field` equals `value`.
    pub fn filter_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter.insert(field.into(), value.into());
        self
    }

    /// Only return `fields` (plus the id).
    pub fn project<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for field in fields {
            self.projection.insert(field.into(), json!(1));
        }
        self
    }
}

#[derive(Serialize)]
struct RefreshBody<'a> {
    filter: &'a Map<String, Value>,
}

#[derive(Serialize)]
struct AggregateBody<'a> {
    collection: &'a str,
    pipeline: &'a [Value],
}

#[derive(Deserialize)]
struct CountResponse {
    count: u64,
}

/// FastAPI error payload.
#[derive(Deserialize)]
struct ErrorBody {
    detail: Value,
}

impl ApiClient {
    /// Create a client for the default local endpoint without a token.
    pub fn new() -> ClientResult<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, None)
    }

    /// Create a client targeting `base_url`.
    pub fn with_base_url(base_url: impl Into<String>, token: Option<String>) -> ClientResult<Self> {
        Self::with_timeout(base_url, token, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> ClientResult<Self> {
        let base_url = base_url.into();
        let parsed = Url::parse(&base_url).map_err(|_| ClientError::InvalidBaseUrl(base_url.clone()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl(base_url));
        }

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token {
            Some(ref token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Perform a GET request, returning the deserialized JSON body.
    async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> ClientResult<T> {
        let url = self.url(path);
        debug!("GET {}", url);

        let resp = self.authorize(self.client.get(&url)).send().await?;
        Self::handle_response(resp).await
    }

    /// Perform a POST request with a JSON body, returning the deserialized JSON body.
    async fn post<T: for<'de> Deserialize<'de>>(&self, path: &str, body: &impl Serialize) -> ClientResult<T> {
        let url = self.url(path);
        debug!("POST {}", url);

        let resp = self.authorize(self.client.post(&url)).json(body).send().await?;
        Self::handle_response(resp).await
    }

    /// Perform a POST request whose success response has no body worth reading.
    async fn post_unit(&self, path: &str, body: &impl Serialize) -> ClientResult<()> {
        let url = self.url(path);
        debug!("POST {}", url);

        let resp = self.authorize(self.client.post(&url)).json(body).send().await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_from(resp).await)
        }
    }

    async fn handle_response<T: for<'de> Deserialize<'de>>(response: reqwest::Response) -> ClientResult<T> {
        if response.status().is_success() {
            let bytes = response.bytes().await?;
            Ok(serde_json::from_slice(&bytes)?)
        } else {
            Err(Self::error_from(response).await)
        }
    }

    async fn error_from(response: reqwest::Response) -> ClientError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let message = error_message(&text);
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Unauthorized(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            _ => ClientError::ApiError {
                status: status.as_u16(),
                message,
            },
        }
    }

    // -----------------------------------------------------------------------
    // Systems
    // -----------------------------------------------------------------------

    /// List every system.
    #[instrument(skip(self))]
    pub async fn list_systems(&self) -> ClientResult<Vec<System>> {
        self.get("backends").await
    }

    /// List systems matching a filter, optionally projected.
    #[instrument(skip(self))]
    pub async fn query_systems(&self, query: &Query) -> ClientResult<Vec<System>> {
        self.post("backends", query).await
    }

    /// Fetch one system by its `bid`.
    #[instrument(skip(self))]
    pub async fn get_system(&self, bid: &str) -> ClientResult<System> {
        self.get(&format!("backends/{bid}")).await
    }

    /// Ask the service to re-scrape systems matching `filter`.
    #[instrument(skip(self))]
    pub async fn refresh_systems(&self, filter: &Map<String, Value>) -> ClientResult<Value> {
        self.post("backends/refresh", &RefreshBody { filter }).await
    }

    /// Re-scrape every system of one provider.
    pub async fn refresh_provider(&self, provider_id: &str) -> ClientResult<Value> {
        let query = Query::new().filter_eq("_id", provider_id);
        self.refresh_systems(&query.filter).await
    }

    // -----------------------------------------------------------------------
    // Providers
    // -----------------------------------------------------------------------

    /// List providers with the listing projection.
    #[instrument(skip(self))]
    pub async fn list_providers(&self) -> ClientResult<Vec<Provider>> {
        self.query_providers(&Query::new().project(PROVIDER_LISTING_FIELDS))
            .await
    }

    #[instrument(skip(self))]
    pub async fn query_providers(&self, query: &Query) -> ClientResult<Vec<Provider>> {
        self.post("providers", query).await
    }

    /// Fetch one provider by its `pid`.
    #[instrument(skip(self))]
    pub async fn get_provider(&self, pid: &str) -> ClientResult<Provider> {
        self.get(&format!("providers/{pid}")).await
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Run an aggregation pipeline against `collection`.
    #[instrument(skip(self, pipeline))]
    pub async fn aggregate(&self, collection: &str, pipeline: &[Value]) -> ClientResult<Vec<Value>> {
        self.post("helpers/aggregate", &AggregateBody { collection, pipeline })
            .await
    }

    #[instrument(skip(self))]
    pub async fn count_documents(&self, collection: &str) -> ClientResult<u64> {
        let resp: CountResponse = self
            .get(&format!("helpers/count-documents/{collection}"))
            .await?;
        Ok(resp.count)
    }

    // -----------------------------------------------------------------------
    // Jobs
    // -----------------------------------------------------------------------

    /// List jobs visible to `api_keys`.
    #[instrument(skip(self, api_keys))]
    pub async fn list_jobs(&self, api_keys: &ApiKeys) -> ClientResult<Vec<Value>> {
        self.post("jobs/get", &KeysBody { api_keys }).await
    }

    #[instrument(skip(self, api_keys))]
    pub async fn get_job(&self, id: Uuid, api_keys: &ApiKeys) -> ClientResult<Value> {
        self.post(&format!("jobs/get/{id}"), &KeysBody { api_keys })
            .await
    }

    #[instrument(skip(self, api_keys))]
    pub async fn get_job_results(&self, id: Uuid, api_keys: &ApiKeys) -> ClientResult<Value> {
        self.post(&format!("jobs/results/{id}"), &KeysBody { api_keys })
            .await
    }

    /// Submit a job. The service answers 201 with no body.
    #[instrument(skip(self, job, api_keys), fields(target = %job.target))]
    pub async fn create_job(&self, job: &JobRequest, api_keys: &ApiKeys) -> ClientResult<()> {
        self.post_unit("jobs/create", &CreateJobBody { job, api_keys })
            .await
    }

    #[instrument(skip(self, api_keys))]
    pub async fn delete_job(&self, id: Uuid, api_keys: &ApiKeys) -> ClientResult<()> {
        self.post_unit(&format!("jobs/delete/{id}"), &KeysBody { api_keys })
            .await
    }
}

/// Pull a readable message out of an error body.
///
/// FastAPI puts it in `detail`, either as a string or as a list of
/// validation errors each carrying a `msg`.
fn error_message(body: &str) -> String {
    let Ok(ErrorBody { detail }) = serde_json::from_str::<ErrorBody>(body) else {
        return body.trim().to_string();
    };
    match detail {
        Value::String(s) => s,
        Value::Array(items) => items
            .iter()
            .map(|item| match item.get("msg").and_then(Value::as_str) {
                Some(msg) => msg.to_string(),
                None => item.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}

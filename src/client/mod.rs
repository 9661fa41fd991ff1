//! HTTP client for the Productive.io API.
//!
//! One [`ProductiveClient`] is built at startup and shared by every tool call.
//! It owns the connection pool, applies the default headers, and retries
//! transient failures (429, 5xx, transport errors) with exponential backoff.

mod error;
mod query;

use std::time::Duration;

use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde_json::Value;

pub use error::ApiError;
pub use query::QueryParams;

use crate::config::Config;

/// Media type Productive expects on every request.
pub const JSON_API: &str = "application/vnd.api+json";

/// Backoff settings for transient failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each subsequent one.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after the failed attempt with index `attempt` (0-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor)
    }
}

/// HTTP client for the Productive API.
#[derive(Debug, Clone)]
pub struct ProductiveClient {
    base_url: String,
    client: Client,
    retry: RetryPolicy,
}

impl ProductiveClient {
    /// Build the long-lived client from configuration.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_API));
        headers.insert(
            HeaderName::from_static("x-auth-token"),
            HeaderValue::from_str(&config.api_key)
                .context("API token is not a valid header value")?,
        );
        headers.insert(
            HeaderName::from_static("x-organization-id"),
            HeaderValue::from_str(&config.organization)
                .context("organization id is not a valid header value")?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            retry: RetryPolicy::default(),
        })
    }

    /// Replace the backoff settings.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform one logical request, retrying transient failures.
    ///
    /// Any 2xx response is parsed as JSON (an empty body yields `null`).
    /// 401 and 404 fail immediately. 429 and 5xx are retried up to
    /// `max_retries` times, sleeping `base_delay * 2^attempt` between
    /// attempts. Other statuses fail immediately with the parsed error body.
    /// Dropping the future abandons the in-flight request or backoff sleep.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: Option<&QueryParams>,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let payload = body.map(serde_json::to_vec).transpose()?;
        let mut attempt: u32 = 0;

        loop {
            let can_retry = attempt < self.retry.max_retries;

            let (status, bytes) = match self
                .send_once(method.clone(), &url, query, payload.as_deref())
                .await
            {
                Ok(parts) => parts,
                Err(e) if can_retry => {
                    let delay = self.retry.delay_for_attempt(attempt);
                    tracing::warn!(
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        "{} {} failed: {}; retrying",
                        method,
                        path,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    continue;
                }
                Err(e) => {
                    tracing::debug!(
                        "{} {} failed after {} attempts: {}",
                        method,
                        path,
                        attempt + 1,
                        e
                    );
                    return Err(ApiError::Transport(e));
                }
            };

            match status {
                200..=299 => {
                    if bytes.is_empty() {
                        return Ok(Value::Null);
                    }
                    return Ok(serde_json::from_slice(&bytes)?);
                }
                401 => return Err(ApiError::Unauthorized),
                404 => return Err(ApiError::NotFound),
                s if is_transient(s) && can_retry => {
                    let delay = self.retry.delay_for_attempt(attempt);
                    tracing::warn!(
                        status = s,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        "{} {} returned {}; retrying",
                        method,
                        path,
                        s
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                s => {
                    // Literal fallback: any non-429 failure reports "Server error".
                    let default = if s == 429 { "Rate limit exceeded" } else { "Server error" };
                    let (message, error_code) = parse_error_body(s, &bytes, default);
                    tracing::debug!("{} {} failed with {}: {}", method, path, s, message);
                    return Err(ApiError::from_status(s, message, error_code));
                }
            }
        }
    }

    async fn send_once(
        &self,
        method: Method,
        url: &str,
        query: Option<&QueryParams>,
        payload: Option<&[u8]>,
    ) -> Result<(u16, Vec<u8>), reqwest::Error> {
        let mut req = self.client.request(method, url);
        if let Some(query) = query {
            req = req.query(query);
        }
        if let Some(payload) = payload {
            req = req.body(payload.to_vec());
        }
        let response = req.send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        Ok((status, bytes.to_vec()))
    }

    async fn get(&self, path: &str, query: Option<&QueryParams>) -> Result<Value, ApiError> {
        self.request(Method::GET, path, query, None).await
    }

    // ============================================================
    // Projects
    // ============================================================

    pub async fn get_projects(&self, params: &QueryParams) -> Result<Value, ApiError> {
        self.get("/projects", Some(params)).await
    }

    // ============================================================
    // Tasks
    // ============================================================

    /// List tasks. The workflow status is always side-loaded.
    pub async fn get_tasks(&self, params: &QueryParams) -> Result<Value, ApiError> {
        let params = params.clone().with("include", "workflow_status");
        self.get("/tasks", Some(&params)).await
    }

    /// Get a task by ID. The workflow status is always side-loaded.
    pub async fn get_task(&self, task_id: u64) -> Result<Value, ApiError> {
        let params = QueryParams::new().with("include", "workflow_status");
        self.get(&format!("/tasks/{}", task_id), Some(&params)).await
    }

    // ============================================================
    // Comments and todos
    // ============================================================

    pub async fn get_comments(&self, params: &QueryParams) -> Result<Value, ApiError> {
        self.get("/comments", Some(params)).await
    }

    pub async fn get_comment(&self, comment_id: u64) -> Result<Value, ApiError> {
        self.get(&format!("/comments/{}", comment_id), None).await
    }

    pub async fn get_todos(&self, params: &QueryParams) -> Result<Value, ApiError> {
        self.get("/todos", Some(params)).await
    }

    pub async fn get_todo(&self, todo_id: u64) -> Result<Value, ApiError> {
        self.get(&format!("/todos/{}", todo_id), None).await
    }

    // ============================================================
    // Activities
    // ============================================================

    pub async fn get_activities(&self, params: &QueryParams) -> Result<Value, ApiError> {
        self.get("/activities", Some(params)).await
    }

    // ============================================================
    // Pages
    // ============================================================

    pub async fn get_pages(&self, params: &QueryParams) -> Result<Value, ApiError> {
        self.get("/pages", Some(params)).await
    }

    pub async fn get_page(&self, page_id: u64) -> Result<Value, ApiError> {
        self.get(&format!("/pages/{}", page_id), None).await
    }

    /// Create a page from a JSON:API payload.
    pub async fn create_page(&self, payload: &Value) -> Result<Value, ApiError> {
        self.request(Method::POST, "/pages", None, Some(payload)).await
    }

    /// Update a page from a (partial) JSON:API payload.
    pub async fn update_page(&self, page_id: u64, payload: &Value) -> Result<Value, ApiError> {
        self.request(
            Method::PATCH,
            &format!("/pages/{}", page_id),
            None,
            Some(payload),
        )
        .await
    }

    // ============================================================
    // Attachments and people
    // ============================================================

    pub async fn get_attachments(&self, params: &QueryParams) -> Result<Value, ApiError> {
        self.get("/attachments", Some(params)).await
    }

    pub async fn get_attachment(&self, attachment_id: u64) -> Result<Value, ApiError> {
        self.get(&format!("/attachments/{}", attachment_id), None).await
    }

    pub async fn get_people(&self, params: &QueryParams) -> Result<Value, ApiError> {
        self.get("/people", Some(params)).await
    }

    pub async fn get_person(&self, person_id: u64) -> Result<Value, ApiError> {
        self.get(&format!("/people/{}", person_id), None).await
    }

    // ============================================================
    // Search
    // ============================================================

    /// Quick search across projects, tasks, pages and actions.
    pub async fn quick_search(
        &self,
        query: &str,
        search_types: &[String],
        deep_search: bool,
        page: u32,
        per_page: u32,
    ) -> Result<Value, ApiError> {
        let params = QueryParams::new()
            .with("filter[query]", query)
            .with("filter[type]", search_types.join(","))
            .with("filter[status]", "all")
            .with("filter[deep_search]", deep_search)
            .with("page", page)
            .with("per_page", per_page);
        self.get("/search/quick", Some(&params)).await
    }

    /// Release the connection pool held by this handle.
    pub fn close(self) {
        tracing::debug!("Closing Productive client for {}", self.base_url);
        drop(self.client);
    }
}

fn is_transient(status: u16) -> bool {
    status == 429 || status >= 500
}

/// Extract `(message, errorCode)` from an error response body.
///
/// Falls back to `HTTP {status}: {body}` / `UNKNOWN` when the body is not a
/// JSON object.
fn parse_error_body(status: u16, body: &[u8], default_message: &str) -> (String, String) {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => {
            let message = map
                .get("message")
                .and_then(scalar_text)
                .unwrap_or_else(|| default_message.to_string());
            let error_code = map
                .get("errorCode")
                .and_then(scalar_text)
                .unwrap_or_else(|| "UNKNOWN".to_string());
            (message, error_code)
        }
        _ => (
            format!("HTTP {}: {}", status, String::from_utf8_lossy(body)),
            "UNKNOWN".to_string(),
        ),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

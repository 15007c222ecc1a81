//! HTTP product fetcher.
//!
//! One GET per attempt against the catalog API; transient failures are
//! retried according to the configured [`RetryPolicy`](crate::RetryPolicy),
//! everything else is surfaced immediately as a [`FetchError`].

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use url::Url;

use catalog_core::{Product, ProductId};

use crate::config::{ConfigError, FetcherConfig};
use crate::error::FetchError;

/// Anything that can produce the product collection for a view.
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn fetch_products(&self) -> Result<Vec<Product>, FetchError>;
}

/// Fetches products from the catalog REST API.
#[derive(Debug, Clone)]
pub struct HttpProductFetcher {
    client: reqwest::Client,
    products_url: Url,
    config: FetcherConfig,
}

impl HttpProductFetcher {
    pub fn new(config: FetcherConfig) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            products_url: config.products_url()?,
            config,
        })
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// GET `{products_url}` and validate every element.
    pub async fn fetch_products(&self) -> Result<Vec<Product>, FetchError> {
        tracing::info!(url = %self.products_url, "fetching products");

        let body = self.get_json(&self.products_url).await?;
        let products = decode_products(body)?;

        tracing::info!(count = products.len(), "fetched products");
        Ok(products)
    }

    /// GET `{products_url}/{id}`.
    pub async fn fetch_product(&self, id: &ProductId) -> Result<Product, FetchError> {
        let mut url = self.products_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id.as_str());
        }

        let body = self.get_json(&url).await?;
        if !body.is_object() {
            return Err(FetchError::malformed(format!(
                "expected product object, got {}",
                json_kind(&body)
            )));
        }
        Product::from_json(body)
            .map_err(|e| FetchError::malformed(format!("invalid product data: {e}")))
    }

    /// Runs the retry loop around [`get_once`](Self::get_once).
    async fn get_json(&self, url: &Url) -> Result<Value, FetchError> {
        let policy = &self.config.retry;
        let mut attempt = 1;

        loop {
            match self.get_once(url).await {
                Ok(body) => {
                    if attempt > 1 {
                        tracing::info!(%url, attempt, "request succeeded after retry");
                    }
                    return Ok(body);
                }
                Err(err) if policy.should_retry(attempt, &err) => {
                    let delay = policy.delay_for_attempt(attempt);
                    tracing::warn!(
                        %url,
                        attempt,
                        max_attempts = policy.max_attempts,
                        kind = err.kind(),
                        error = %err,
                        "request failed, retrying"
                    );
                    tracing::debug!(?delay, "backing off");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    tracing::error!(
                        %url,
                        attempt,
                        kind = err.kind(),
                        error = %err,
                        "request failed"
                    );
                    return Err(err);
                }
            }
        }
    }

    /// Exactly one request; classifies the outcome.
    async fn get_once(&self, url: &Url) -> Result<Value, FetchError> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        if status.is_server_error() || status.is_client_error() {
            let message = error_message(resp).await;
            return Err(if status.is_server_error() {
                FetchError::Server {
                    status: status.as_u16(),
                    message,
                }
            } else {
                FetchError::Client {
                    status: status.as_u16(),
                    message,
                }
            });
        }
        if !status.is_success() {
            return Err(FetchError::malformed(format!("unexpected status {status}")));
        }

        resp.json::<Value>().await.map_err(|e| self.classify(e))
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_decode() {
            FetchError::malformed(format!("response is not valid JSON: {}", error_chain(&err)))
        } else if err.is_timeout() {
            FetchError::Timeout(self.config.timeout)
        } else {
            FetchError::Network(error_chain(&err))
        }
    }
}

#[async_trait]
impl ProductSource for HttpProductFetcher {
    async fn fetch_products(&self) -> Result<Vec<Product>, FetchError> {
        HttpProductFetcher::fetch_products(self).await
    }
}

/// The body must be a JSON array whose every element is a valid product.
fn decode_products(body: Value) -> Result<Vec<Product>, FetchError> {
    let Value::Array(items) = body else {
        return Err(FetchError::malformed(format!(
            "expected array of products, got {}",
            json_kind(&body)
        )));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            Product::from_json(item).map_err(|e| {
                FetchError::malformed(format!("invalid product data at index {index}: {e}"))
            })
        })
        .collect()
}

/// Prefers the server's `message`/`error`/`details` field, then the raw body,
/// then the canonical reason phrase.
async fn error_message(resp: reqwest::Response) -> String {
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();

    let from_json = serde_json::from_str::<Value>(&text).ok().and_then(|v| {
        ["message", "error", "details"]
            .into_iter()
            .find_map(|key| v.get(key).and_then(Value::as_str).map(str::to_string))
    });

    from_json
        .or_else(|| (!text.trim().is_empty()).then(|| text.trim().to_string()))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string())
}

fn error_chain(err: &reqwest::Error) -> String {
    let mut msg = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

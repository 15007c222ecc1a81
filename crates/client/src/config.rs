//! Fetcher configuration.
//!
//! Passed explicitly to [`HttpProductFetcher::new`](crate::HttpProductFetcher::new)
//! so tests and embedders can point it at any endpoint.

use std::time::Duration;

use url::Url;

use crate::retry::RetryPolicy;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5182";
pub const DEFAULT_PRODUCTS_PATH: &str = "/api/products";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const ENV_BASE_URL: &str = "CATALOG_API_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "CATALOG_API_TIMEOUT_MS";
pub const ENV_RETRY_ATTEMPTS: &str = "CATALOG_API_RETRY_ATTEMPTS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

#[derive(Debug, Clone)]
pub struct FetcherConfig {
    base_url: Url,
    products_path: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            products_path: DEFAULT_PRODUCTS_PATH.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

impl FetcherConfig {
    /// Default configuration pointed at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            ..Self::default()
        })
    }

    /// Reads `CATALOG_API_*` variables over the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        match lookup(ENV_BASE_URL) {
            Some(url) => config.base_url = parse_base_url(&url)?,
            None => tracing::debug!("{ENV_BASE_URL} not set; using {DEFAULT_BASE_URL}"),
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            config.timeout = Duration::from_millis(parse_positive(ENV_TIMEOUT_MS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_RETRY_ATTEMPTS) {
            let attempts = parse_positive(ENV_RETRY_ATTEMPTS, &raw)?;
            config.retry.max_attempts = u32::try_from(attempts).map_err(|_| {
                ConfigError::InvalidNumber {
                    var: ENV_RETRY_ATTEMPTS,
                    value: raw.clone(),
                }
            })?;
        }

        Ok(config)
    }

    pub fn with_products_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.products_path = if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        };
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base_url}{products_path}`, concatenated so a base URL with a path
    /// prefix (e.g. `https://host/shop`) keeps it.
    pub fn products_url(&self) -> Result<Url, ConfigError> {
        let raw = format!(
            "{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            self.products_path
        );
        Url::parse(&raw).map_err(|e| ConfigError::InvalidBaseUrl {
            url: raw,
            reason: e.to_string(),
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {:?}", url.scheme()),
        });
    }
    Ok(url)
}

fn parse_positive(var: &'static str, raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidNumber {
            var,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_catalog_api() {
        let config = FetcherConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(
            config.products_url().unwrap().as_str(),
            "http://localhost:5182/api/products"
        );
    }

    #[test]
    fn env_overrides_defaults() {
        let config = FetcherConfig::from_lookup(lookup(&[
            (ENV_BASE_URL, "https://catalog.example.com/"),
            (ENV_TIMEOUT_MS, "2500"),
            (ENV_RETRY_ATTEMPTS, "5"),
        ]))
        .unwrap();

        assert_eq!(config.timeout, Duration::from_millis(2500));
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(
            config.products_url().unwrap().as_str(),
            "https://catalog.example.com/api/products"
        );
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let config = FetcherConfig::new("https://host.example/shop").unwrap();
        assert_eq!(
            config.products_url().unwrap().as_str(),
            "https://host.example/shop/api/products"
        );

        let config = config.with_products_path("v2/items");
        assert_eq!(
            config.products_url().unwrap().as_str(),
            "https://host.example/shop/v2/items"
        );
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            FetcherConfig::new("ftp://files.example"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            FetcherConfig::new("not a url"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            FetcherConfig::from_lookup(lookup(&[(ENV_RETRY_ATTEMPTS, "0")])),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            FetcherConfig::from_lookup(lookup(&[(ENV_TIMEOUT_MS, "soon")])),
            Err(ConfigError::InvalidNumber { .. })
        ));
    }
}

//! Client configuration
//!
//! Values come from command-line flags first, then environment variables,
//! then built-in defaults.

use crate::error::{Error, Result};
use std::env;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default marketplace API base
pub const DEFAULT_API_URL: &str = "https://api.bidline.app/v1/";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding the API base
pub const API_URL_VAR: &str = "BIDLINE_API_URL";

/// Environment variable overriding the request timeout
pub const TIMEOUT_VAR: &str = "BIDLINE_TIMEOUT_SECS";

/// Where and how to reach the marketplace API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base; always ends with `/` so relative joins append
    pub api_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    /// Build a config from explicit values
    pub fn new(api_url: &str, timeout_secs: u64) -> Result<Self> {
        let mut api_url =
            Url::parse(api_url).map_err(|e| Error::Config(format!("invalid API URL '{api_url}': {e}")))?;
        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "API URL must use http or https, got '{}'",
                api_url.scheme()
            )));
        }
        if !api_url.path().ends_with('/') {
            let path = format!("{}/", api_url.path());
            api_url.set_path(&path);
        }
        if timeout_secs == 0 {
            return Err(Error::Config("timeout must be at least 1 second".to_string()));
        }

        Ok(Self {
            api_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Resolve from an optional flag and the process environment
    pub fn load(api_url_flag: Option<&str>) -> Result<Self> {
        Self::resolve(api_url_flag, |key| env::var(key).ok())
    }

    /// Resolve with a custom variable lookup
    pub fn resolve<F>(api_url_flag: Option<&str>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = api_url_flag
            .map(String::from)
            .or_else(|| lookup(API_URL_VAR))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout_secs = match lookup(TIMEOUT_VAR) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| Error::Config(format!("invalid {TIMEOUT_VAR} '{raw}': {e}")))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        debug!("Using API {api_url} with {timeout_secs}s timeout");
        Self::new(&api_url, timeout_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).unwrap_or_else(|_| unreachable!()),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

//! Marketplace token authentication

use crate::auth::AuthSource;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use reqwest::Client;
use serde::Deserialize;
use std::env;
use tracing::debug;

/// Primary token variable
pub const TOKEN_VAR: &str = "BIDLINE_TOKEN";

/// Fallback token variable
pub const FALLBACK_TOKEN_VAR: &str = "MARKETPLACE_TOKEN";

/// Marketplace authentication configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// Bearer token
    pub token: String,
    /// Where the token was obtained from
    pub source: AuthSource,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// Get marketplace authentication
///
/// Priority:
/// 1. `--token` flag
/// 2. `BIDLINE_TOKEN` environment variable
/// 3. `MARKETPLACE_TOKEN` environment variable
pub fn get_auth(token_flag: Option<&str>) -> Result<AuthConfig> {
    resolve_auth(token_flag, |key| env::var(key).ok())
}

/// Same as [`get_auth`] with a custom variable lookup
pub fn resolve_auth<F>(token_flag: Option<&str>, lookup: F) -> Result<AuthConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let usable = |token: &str| {
        let token = token.trim();
        (!token.is_empty()).then(|| token.to_string())
    };

    if let Some(token) = token_flag.and_then(usable) {
        return Ok(AuthConfig {
            token,
            source: AuthSource::Flag,
        });
    }

    for var in [TOKEN_VAR, FALLBACK_TOKEN_VAR] {
        if let Some(token) = lookup(var).as_deref().and_then(usable) {
            debug!("Using token from {var}");
            return Ok(AuthConfig {
                token,
                source: AuthSource::EnvVar,
            });
        }
    }

    Err(Error::Auth(format!(
        "No marketplace token found. Pass --token or set {TOKEN_VAR}"
    )))
}

#[derive(Deserialize)]
struct Account {
    #[serde(alias = "username", alias = "email")]
    name: String,
}

/// Test marketplace authentication
///
/// Returns the account name the token belongs to.
pub async fn test_auth(auth: &AuthConfig, config: &ClientConfig) -> Result<String> {
    let url = config
        .api_url
        .join("me")
        .map_err(|e| Error::Config(format!("invalid account endpoint: {e}")))?;

    let client = Client::builder().timeout(config.timeout).build()?;
    let response = client.get(url).bearer_auth(&auth.token).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Auth(format!("Invalid token (HTTP {})", status.as_u16())));
    }

    let account: Account = response
        .json()
        .await
        .map_err(|e| Error::Auth(format!("Unexpected account response: {e}")))?;
    Ok(account.name)
}

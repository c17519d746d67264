//! Authentication for the marketplace API
//!
//! Supports an explicit token flag and environment variables.

mod marketplace;

pub use marketplace::{get_auth, resolve_auth, test_auth, AuthConfig};

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token passed on the command line
    Flag,
    /// Token from environment variable
    EnvVar,
}

//! Client configuration and credentials

use std::fmt;

use crate::error::{Result, VeriduError};

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.veridu.com";

/// Default protocol version
pub const DEFAULT_VERSION: &str = "0.3";

/// Value sent in the `User-Agent` header
pub const USER_AGENT: &str = concat!("Veridu-Rust/", env!("CARGO_PKG_VERSION"));

/// Client configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Scheme and host of the API, without a path
    pub base_url: String,
    /// Protocol version, used as the first path segment and signed
    pub version: String,
    /// Client identification string
    pub user_agent: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            version: DEFAULT_VERSION.to_string(),
            user_agent: USER_AGENT.to_string(),
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    /// Load configuration from the environment.
    ///
    /// Reads `VERIDU_API_URL`, `VERIDU_API_VERSION` and `VERIDU_TIMEOUT_SECS`.
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(base_url) = lookup("VERIDU_API_URL") {
            config.base_url = base_url;
        }
        if let Some(version) = lookup("VERIDU_API_VERSION") {
            config.version = version;
        }
        if let Some(timeout) = lookup("VERIDU_TIMEOUT_SECS") {
            config.timeout_secs = timeout.parse().map_err(|_| {
                VeriduError::Config(format!("VERIDU_TIMEOUT_SECS is not a number: {}", timeout))
            })?;
        }
        Ok(config)
    }

    /// Set the protocol version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Absolute URL of a resource: `{base}/{version}/{resource}`.
    pub fn resource_url(&self, resource: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.version,
            resource.trim_start_matches('/')
        )
    }
}

/// API credentials
///
/// The secret is only ever used as the HMAC key. `Debug` output redacts it.
#[derive(Clone)]
pub struct Credentials {
    key: String,
    secret: String,
}

impl Credentials {
    /// Create credentials from a client key and shared secret.
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// Read credentials from `VERIDU_CLIENT` and `VERIDU_SECRET`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let key = lookup("VERIDU_CLIENT")
            .ok_or_else(|| VeriduError::Config("VERIDU_CLIENT is not set".to_string()))?;
        let secret = lookup("VERIDU_SECRET")
            .ok_or_else(|| VeriduError::Config("VERIDU_SECRET is not set".to_string()))?;
        Ok(Self::new(key, secret))
    }

    /// Public client identifier.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub(crate) fn secret(&self) -> &[u8] {
        self.secret.as_bytes()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

use std::env;
use std::time::Duration;

use reqwest::header::HeaderValue;

use crate::error::TrgHttpError;
use crate::url::{normalize_rpc_url, DEFAULT_RPC_URL};

pub const ENV_URL: &str = "TRG_RPC_URL";
pub const ENV_USERNAME: &str = "TRG_RPC_USERNAME";
pub const ENV_PASSWORD: &str = "TRG_RPC_PASSWORD";
pub const ENV_SSL: &str = "TRG_RPC_SSL";
pub const ENV_PROXY: &str = "TRG_RPC_PROXY";
pub const ENV_TIMEOUT_SECS: &str = "TRG_RPC_TIMEOUT_SECS";

/// Connection settings for one Transmission RPC endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// RPC endpoint, e.g. `http://localhost:9091/transmission/rpc`.
    pub url: String,
    /// HTTP Basic user name.
    pub username: String,
    /// HTTP Basic password.
    pub password: String,
    /// Skip TLS peer verification. User-configured endpoints are trusted
    /// over certificate checks, which is a deliberate weakening.
    pub ssl: bool,
    /// Optional HTTP proxy address.
    pub proxy: Option<String>,
    /// Optional `User-Agent` override.
    pub user_agent: Option<String>,
    /// Optional whole-request timeout.
    pub timeout: Option<Duration>,
    /// Optional cap on buffered response bytes.
    pub max_response_bytes: Option<usize>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_RPC_URL.to_string(),
            username: String::new(),
            password: String::new(),
            ssl: false,
            proxy: None,
            user_agent: None,
            timeout: None,
            max_response_bytes: None,
        }
    }
}

impl ClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: normalize_rpc_url(&url.into()),
            ..Self::default()
        }
    }

    /// Default configuration overlaid with the `TRG_RPC_*` environment.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|key| env::var(key).ok())
    }

    /// Overlays values returned by `lookup`; blank values are ignored.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| {
            lookup(key).and_then(|value| {
                if value.trim().is_empty() {
                    None
                } else {
                    Some(value)
                }
            })
        };

        if let Some(url) = value(ENV_URL) {
            self.url = normalize_rpc_url(&url);
        }
        if let Some(username) = value(ENV_USERNAME) {
            self.username = username;
        }
        if let Some(password) = value(ENV_PASSWORD) {
            self.password = password;
        }
        if let Some(ssl) = value(ENV_SSL) {
            self.ssl = ssl.trim() == "1";
        }
        if let Some(proxy) = value(ENV_PROXY) {
            self.proxy = Some(proxy.trim().to_string());
        }
        if let Some(secs) = value(ENV_TIMEOUT_SECS).and_then(|value| value.trim().parse().ok()) {
            self.timeout = Some(Duration::from_secs(secs));
        }
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = normalize_rpc_url(&url.into());
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    pub fn with_ssl(mut self, ssl: bool) -> Self {
        self.ssl = ssl;
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_max_response_bytes(mut self, limit: usize) -> Self {
        self.max_response_bytes = Some(limit);
        self
    }

    /// Checks everything that can be rejected before a request is sent.
    pub fn validate(&self) -> Result<(), TrgHttpError> {
        let parsed = url::Url::parse(&self.url)
            .map_err(|source| TrgHttpError::invalid_url(&self.url, source))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(TrgHttpError::UnsupportedScheme {
                url: self.url.clone(),
                scheme: parsed.scheme().to_string(),
            });
        }

        if let Some(proxy) = self.proxy.as_deref() {
            reqwest::Proxy::all(proxy).map_err(|source| TrgHttpError::InvalidProxy {
                proxy: proxy.to_string(),
                source,
            })?;
        }

        if let Some(user_agent) = self.user_agent.as_deref() {
            HeaderValue::from_str(user_agent.trim())
                .map_err(|_| TrgHttpError::invalid_header("User-Agent"))?;
        }

        if self.max_response_bytes == Some(0) {
            return Err(TrgHttpError::ZeroResponseLimit);
        }

        Ok(())
    }
}

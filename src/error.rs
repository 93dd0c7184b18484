use thiserror::Error;

/// Configuration problems detected before any request is sent.
///
/// Failures of an actual call are never reported through this type; they are
/// carried as data in [`crate::HttpResponse::status`].
#[derive(Debug, Error)]
pub enum TrgHttpError {
    #[error("invalid RPC endpoint '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported RPC endpoint scheme '{scheme}' in '{url}'")]
    UnsupportedScheme { url: String, scheme: String },

    #[error("invalid proxy '{proxy}': {source}")]
    InvalidProxy {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid value for header {name}")]
    InvalidHeaderValue { name: String },

    #[error("response size limit must be greater than zero")]
    ZeroResponseLimit,
}

impl TrgHttpError {
    #[must_use]
    pub fn invalid_url(url: impl Into<String>, source: url::ParseError) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            source,
        }
    }

    #[must_use]
    pub fn invalid_header(name: impl Into<String>) -> Self {
        Self::InvalidHeaderValue { name: name.into() }
    }
}

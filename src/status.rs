//! Normalized outcome of one RPC call.
//!
//! Every call ends in exactly one of three disjoint families: success, an
//! HTTP-level failure, or a transport-level failure. The legacy integer
//! encoding of that outcome is available through [`ResponseStatus::code`] and
//! [`ResponseStatus::from_code`]:
//!
//! - `0` is success and nothing else
//! - values below `-100` are HTTP failures, recoverable as `-(value) - 100`
//! - positive values are transport failure codes
//!
//! Transport codes are numbered after libcurl's `CURLcode` so that existing
//! consumers of the integer contract keep their meaning.

use std::error::Error as StdError;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use reqwest::StatusCode;

use crate::buffer::BufferError;

/// Offset applied below the negated HTTP status in the integer encoding.
pub const HTTP_CODE_OFFSET: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseStatus {
    Success,
    Transport(TransportError),
    Http(StatusCode),
}

impl ResponseStatus {
    /// Maps a completed HTTP exchange. Only `200 OK` is a success.
    pub fn from_http(status: StatusCode) -> Self {
        if status == StatusCode::OK {
            Self::Success
        } else {
            Self::Http(status)
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn http_status(&self) -> Option<StatusCode> {
        match self {
            Self::Http(status) => Some(*status),
            _ => None,
        }
    }

    pub fn transport_error(&self) -> Option<&TransportError> {
        match self {
            Self::Transport(error) => Some(error),
            _ => None,
        }
    }

    /// Legacy integer encoding of this status.
    pub fn code(&self) -> i64 {
        match self {
            Self::Success => 0,
            Self::Transport(error) => error.kind.code(),
            Self::Http(status) => encode_http_status(*status),
        }
    }

    /// Inverse of [`code`](Self::code).
    ///
    /// Returns `None` for values that belong to no family (`-100..=-1`) and
    /// for unknown transport codes. Decoded transport errors carry no message.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Success),
            code if code < -HTTP_CODE_OFFSET => http_status_from_code(code).map(Self::Http),
            code if code > 0 => TransportErrorKind::from_code(code).map(|kind| {
                Self::Transport(TransportError {
                    kind,
                    message: String::new(),
                })
            }),
            _ => None,
        }
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Transport(error) => write!(f, "transport error: {error}"),
            Self::Http(status) => write!(f, "HTTP {status}"),
        }
    }
}

/// `-(status) - 100`.
pub fn encode_http_status(status: StatusCode) -> i64 {
    -i64::from(status.as_u16()) - HTTP_CODE_OFFSET
}

/// Recovers the HTTP status from an encoded value below `-100`.
pub fn http_status_from_code(code: i64) -> Option<StatusCode> {
    if code >= -HTTP_CODE_OFFSET {
        return None;
    }
    let raw = u16::try_from(-code - HTTP_CODE_OFFSET).ok()?;
    StatusCode::from_u16(raw).ok()
}

/// Transport failure classes, each with a stable positive code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    FailedInit,
    UrlMalformat,
    CouldntResolveHost,
    CouldntConnect,
    WriteError,
    OperationTimedOut,
    SslConnectError,
    TooManyRedirects,
    SendError,
    RecvError,
    FilesizeExceeded,
}

impl TransportErrorKind {
    const ALL: [Self; 11] = [
        Self::FailedInit,
        Self::UrlMalformat,
        Self::CouldntResolveHost,
        Self::CouldntConnect,
        Self::WriteError,
        Self::OperationTimedOut,
        Self::SslConnectError,
        Self::TooManyRedirects,
        Self::SendError,
        Self::RecvError,
        Self::FilesizeExceeded,
    ];

    pub fn code(self) -> i64 {
        match self {
            Self::FailedInit => 2,
            Self::UrlMalformat => 3,
            Self::CouldntResolveHost => 6,
            Self::CouldntConnect => 7,
            Self::WriteError => 23,
            Self::OperationTimedOut => 28,
            Self::SslConnectError => 35,
            Self::TooManyRedirects => 47,
            Self::SendError => 55,
            Self::RecvError => 56,
            Self::FilesizeExceeded => 63,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FailedInit => "failed_init",
            Self::UrlMalformat => "url_malformat",
            Self::CouldntResolveHost => "couldnt_resolve_host",
            Self::CouldntConnect => "couldnt_connect",
            Self::WriteError => "write_error",
            Self::OperationTimedOut => "operation_timed_out",
            Self::SslConnectError => "ssl_connect_error",
            Self::TooManyRedirects => "too_many_redirects",
            Self::SendError => "send_error",
            Self::RecvError => "recv_error",
            Self::FilesizeExceeded => "filesize_exceeded",
        }
    }
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure that happened before a complete HTTP response was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Classifies an error raised by the HTTP stack.
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        let message = error_chain_text(error);
        let kind = if error.is_timeout() {
            TransportErrorKind::OperationTimedOut
        } else if error.is_connect() {
            classify_connect_failure(&message)
        } else if error.is_builder() {
            TransportErrorKind::UrlMalformat
        } else if error.is_redirect() {
            TransportErrorKind::TooManyRedirects
        } else if error.is_body() || error.is_decode() {
            TransportErrorKind::RecvError
        } else {
            TransportErrorKind::SendError
        };
        Self { kind, message }
    }

    /// Maps a refused body chunk to the failure that aborted the transfer.
    pub fn from_buffer(error: BufferError) -> Self {
        let kind = match error {
            BufferError::AllocationFailed => TransportErrorKind::WriteError,
            BufferError::LimitExceeded { .. } => TransportErrorKind::FilesizeExceeded,
        };
        Self::new(kind, error.to_string())
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{} ({})", self.kind, self.kind.code())
        } else {
            write!(f, "{} ({}): {}", self.kind, self.kind.code(), self.message)
        }
    }
}

impl StdError for TransportError {}

fn dns_failure_regex() -> &'static Regex {
    static CACHED: OnceLock<Regex> = OnceLock::new();
    CACHED.get_or_init(|| {
        Regex::new(r"(?i)dns error|failed to lookup|name or service not known|no such host|nodename nor servname")
            .expect("dns regex must compile")
    })
}

fn tls_failure_regex() -> &'static Regex {
    static CACHED: OnceLock<Regex> = OnceLock::new();
    CACHED.get_or_init(|| {
        Regex::new(r"(?i)certificate|\btls\b|\bssl\b|handshake")
            .expect("tls regex must compile")
    })
}

/// Splits connect failures into DNS, TLS and plain connection errors.
pub fn classify_connect_failure(message: &str) -> TransportErrorKind {
    if dns_failure_regex().is_match(message) {
        TransportErrorKind::CouldntResolveHost
    } else if tls_failure_regex().is_match(message) {
        TransportErrorKind::SslConnectError
    } else {
        TransportErrorKind::CouldntConnect
    }
}

fn error_chain_text(error: &reqwest::Error) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_codes_are_unique_and_positive() {
        for kind in TransportErrorKind::ALL {
            assert!(kind.code() > 0);
            assert_eq!(TransportErrorKind::from_code(kind.code()), Some(kind));
        }
    }

    #[test]
    fn connect_failures_are_split_by_cause() {
        assert_eq!(
            classify_connect_failure("error sending request: client error (Connect): dns error: failed to lookup address information"),
            TransportErrorKind::CouldntResolveHost
        );
        assert_eq!(
            classify_connect_failure("client error (Connect): invalid peer certificate: UnknownIssuer"),
            TransportErrorKind::SslConnectError
        );
        assert_eq!(
            classify_connect_failure("client error (Connect): tcp connect error: Connection refused (os error 111)"),
            TransportErrorKind::CouldntConnect
        );
    }
}

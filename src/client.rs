use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{redirect, Client, Proxy, StatusCode};
use tracing::{debug, warn};

use crate::buffer::ResponseBuffer;
use crate::config::ClientConfig;
use crate::context::ClientContext;
use crate::headers::{build_headers, header_lines};
use crate::status::{ResponseStatus, TransportError, TransportErrorKind};

/// Extra attempts allowed after the server rejects the session id with 409.
pub const SESSION_RETRIES: u32 = 1;

/// Result of one [`perform`] call. Owned by the caller; dropping it releases
/// the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Response body bytes. `None` when no response was received at all.
    pub payload: Option<Vec<u8>>,
    pub status: ResponseStatus,
}

impl HttpResponse {
    /// Number of payload bytes received.
    pub fn len(&self) -> usize {
        self.payload.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Legacy integer encoding of [`status`](Self::status).
    pub fn code(&self) -> i64 {
        self.status.code()
    }

    pub fn into_payload(self) -> Option<Vec<u8>> {
        self.payload
    }
}

/// Outcome of a single HTTP exchange, before normalization.
#[derive(Debug)]
enum Attempt {
    Completed {
        status: StatusCode,
        payload: Vec<u8>,
    },
    Failed {
        error: TransportError,
        payload: Option<Vec<u8>>,
    },
}

impl Attempt {
    fn failed(error: TransportError) -> Self {
        Self::Failed {
            error,
            payload: None,
        }
    }

    fn is_session_conflict(&self) -> bool {
        matches!(self, Self::Completed { status, .. } if *status == StatusCode::CONFLICT)
    }

    fn into_response(self) -> HttpResponse {
        match self {
            Self::Completed { status, payload } => HttpResponse {
                payload: Some(payload),
                status: ResponseStatus::from_http(status),
            },
            Self::Failed { error, payload } => HttpResponse {
                payload,
                status: ResponseStatus::Transport(error),
            },
        }
    }
}

/// Performs one RPC call, blocking the calling thread.
///
/// The call runs on a private current-thread runtime. When the caller is
/// already inside a tokio runtime, that runtime is left alone and the call
/// moves to a scoped thread that owns its own runtime. Prefer
/// [`perform_async`] from async code.
pub fn perform(context: &ClientContext, body: &[u8]) -> HttpResponse {
    if tokio::runtime::Handle::try_current().is_err() {
        return block_on_private_runtime(context, body);
    }

    debug!("perform called inside an async runtime, using a dedicated thread");
    std::thread::scope(|scope| {
        scope
            .spawn(|| block_on_private_runtime(context, body))
            .join()
    })
    .unwrap_or_else(|_| {
        warn!("RPC worker thread panicked");
        Attempt::failed(TransportError::new(
            TransportErrorKind::FailedInit,
            "RPC worker thread panicked",
        ))
        .into_response()
    })
}

fn block_on_private_runtime(context: &ClientContext, body: &[u8]) -> HttpResponse {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => {
            warn!(%error, "failed to initialize tokio runtime");
            return Attempt::failed(TransportError::new(
                TransportErrorKind::FailedInit,
                format!("failed to initialize tokio runtime: {error}"),
            ))
            .into_response();
        }
    };

    runtime.block_on(perform_async(context, body))
}

/// Performs one RPC call, retrying once when the server rejects the session
/// id with `409 Conflict`.
///
/// The retried attempt picks up the token stored while the rejected
/// attempt's headers were inspected. A conflict on the last attempt is
/// reported as `Http(409)`.
pub async fn perform_async(context: &ClientContext, body: &[u8]) -> HttpResponse {
    let mut retries = 0;

    loop {
        let attempt = execute(context, body, retries + 1).await;

        if attempt.is_session_conflict() && retries < SESSION_RETRIES {
            retries += 1;
            debug!(retries, "session id rejected, retrying with refreshed token");
            continue;
        }

        return attempt.into_response();
    }
}

async fn execute(context: &ClientContext, body: &[u8], attempt: u32) -> Attempt {
    let config = context.config();
    let session_id = context.session_id();

    debug!(
        attempt,
        url = %config.url,
        session_id_attached = session_id.is_some(),
        "sending RPC request"
    );

    let http = match build_http_client(&config) {
        Ok(http) => http,
        Err(error) => {
            warn!(%error, "failed to build HTTP client");
            return Attempt::failed(TransportError::new(
                TransportErrorKind::FailedInit,
                error.to_string(),
            ));
        }
    };
    let headers = match build_header_map(&config, session_id.as_deref()) {
        Ok(headers) => headers,
        Err(error) => return Attempt::failed(error),
    };

    let response = match http
        .post(&config.url)
        .headers(headers)
        .body(body.to_vec())
        .send()
        .await
    {
        Ok(response) => response,
        Err(error) => {
            let error = TransportError::from_reqwest(&error);
            warn!(attempt, kind = %error.kind, message = %error.message, "RPC transport failure");
            return Attempt::failed(error);
        }
    };

    let status = response.status();
    for line in header_lines(response.headers()) {
        if context.session().inspect_header_line(&line) {
            debug!(attempt, "session id refreshed from response");
        }
    }

    let mut buffer = match config.max_response_bytes {
        Some(limit) => ResponseBuffer::with_limit(limit),
        None => ResponseBuffer::new(),
    };
    let mut chunks = response.bytes_stream();
    while let Some(chunk) = chunks.next().await {
        let refused = match chunk {
            Ok(chunk) => match buffer.try_append(&chunk) {
                Ok(()) => continue,
                Err(error) => TransportError::from_buffer(error),
            },
            Err(error) => TransportError::from_reqwest(&error),
        };
        warn!(
            attempt,
            kind = %refused.kind,
            received = buffer.len(),
            "RPC response body aborted"
        );
        return Attempt::Failed {
            error: refused,
            payload: Some(buffer.into_bytes()),
        };
    }

    debug!(
        attempt,
        status = status.as_u16(),
        bytes = buffer.len(),
        "RPC response received"
    );
    Attempt::Completed {
        status,
        payload: buffer.into_bytes(),
    }
}

fn build_http_client(config: &ClientConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder().redirect(redirect::Policy::none());
    if config.ssl {
        builder = builder.danger_accept_invalid_certs(true);
    }
    builder = match config.proxy.as_deref() {
        Some(proxy) => builder.proxy(Proxy::all(proxy)?),
        None => builder.no_proxy(),
    };
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

fn build_header_map(
    config: &ClientConfig,
    session_id: Option<&str>,
) -> Result<HeaderMap, TransportError> {
    let mut out = HeaderMap::new();
    for (key, value) in build_headers(config, session_id) {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
            TransportError::new(
                TransportErrorKind::FailedInit,
                format!("invalid header key: {key}"),
            )
        })?;
        let value = HeaderValue::from_str(&value).map_err(|_| {
            TransportError::new(
                TransportErrorKind::FailedInit,
                format!("invalid header value for {key}"),
            )
        })?;
        out.insert(name, value);
    }
    Ok(out)
}

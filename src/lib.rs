//! HTTP transport for the Transmission RPC protocol.
//!
//! The daemon protects its RPC endpoint with a rotating session id. A request
//! without the current id is answered with `409 Conflict` and the fresh id in
//! the `X-Transmission-Session-Id` response header. [`perform`] sends one
//! request, stores any id the server hands out, retries once on conflict and
//! reports every outcome as an [`HttpResponse`] whose [`ResponseStatus`] is one
//! of success, HTTP failure or transport failure.
//!
//! Request bodies and response payloads are opaque bytes; building and parsing
//! the JSON is left to the caller.

pub mod buffer;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod headers;
pub mod session;
pub mod status;
pub mod url;

pub use buffer::{BufferError, ResponseBuffer};
pub use client::{perform, perform_async, HttpResponse, SESSION_RETRIES};
pub use config::ClientConfig;
pub use context::ClientContext;
pub use error::TrgHttpError;
pub use session::{extract_session_id, SessionStore, SESSION_ID_MARKER};
pub use status::{ResponseStatus, TransportError, TransportErrorKind};
pub use url::{build_rpc_url, normalize_rpc_url, DEFAULT_RPC_URL};

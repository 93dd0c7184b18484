use std::collections::BTreeMap;

use base64::{engine::general_purpose, Engine as _};
use reqwest::header::HeaderMap;

use crate::config::ClientConfig;

pub const HEADER_SESSION_ID: &str = "X-Transmission-Session-Id";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const HEADER_USER_AGENT: &str = "User-Agent";

/// Default `User-Agent` sent when the config does not override it.
pub const DEFAULT_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Build a deterministic header map for one RPC attempt.
///
/// `session_id` is the snapshot of the context's current token; the session
/// header is attached whenever a token is stored, even an empty one, so the
/// request always mirrors the store. Credentials are only sent when a user
/// name or password is configured.
pub fn build_headers(
    config: &ClientConfig,
    session_id: Option<&str>,
) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();

    if !config.username.is_empty() || !config.password.is_empty() {
        headers.insert(
            HEADER_AUTHORIZATION.to_owned(),
            basic_auth_value(&config.username, &config.password),
        );
    }
    headers.insert(
        HEADER_CONTENT_TYPE.to_owned(),
        "application/json".to_owned(),
    );

    let ua = config
        .user_agent
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_USER_AGENT);
    headers.insert(HEADER_USER_AGENT.to_owned(), ua.to_owned());

    if let Some(session_id) = session_id {
        headers.insert(HEADER_SESSION_ID.to_owned(), session_id.to_owned());
    }

    headers
}

/// `Authorization` value for HTTP Basic credentials.
pub fn basic_auth_value(username: &str, password: &str) -> String {
    let encoded = general_purpose::STANDARD.encode(format!("{username}:{password}"));
    format!("Basic {encoded}")
}

/// Render received headers back into raw `Name: value\r\n` lines.
///
/// Header names come back lowercased from the HTTP stack, so they are restored
/// to canonical title case. Values that are not visible ASCII are skipped.
pub fn header_lines(headers: &HeaderMap) -> Vec<String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            let value = value.to_str().ok()?;
            Some(format!("{}: {value}\r\n", canonical_header_name(name.as_str())))
        })
        .collect()
}

/// Title-case each `-`-separated segment: `x-transmission-session-id` becomes
/// `X-Transmission-Session-Id`.
pub fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

//! Current Transmission session id, refreshed from response headers.

use std::sync::{Mutex, MutexGuard};

/// Exact prefix of the response header line that carries a fresh session id.
pub const SESSION_ID_MARKER: &str = "X-Transmission-Session-Id: ";

/// Extracts the session id from a raw response header line.
///
/// Returns `None` unless `line` starts with [`SESSION_ID_MARKER`]. The value
/// ends at the first carriage return, so `"X-Transmission-Session-Id: abc\r\n"`
/// yields `"abc"`.
pub fn extract_session_id(line: &str) -> Option<&str> {
    let value = line.strip_prefix(SESSION_ID_MARKER)?;
    Some(match value.find('\r') {
        Some(end) => &value[..end],
        None => value,
    })
}

/// Mutex-guarded slot holding the most recently observed session id.
#[derive(Debug, Default)]
pub struct SessionStore {
    current: Mutex<Option<String>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current session id.
    pub fn current(&self) -> Option<String> {
        lock_unpoisoned(&self.current).clone()
    }

    /// Replaces the current session id, dropping the previous one.
    pub fn replace(&self, session_id: impl Into<String>) {
        *lock_unpoisoned(&self.current) = Some(session_id.into());
    }

    pub fn clear(&self) {
        *lock_unpoisoned(&self.current) = None;
    }

    /// Stores the session id carried by `line`, if any.
    ///
    /// Returns `true` when the line was a session header and the store was
    /// updated. Lines without the marker leave the store untouched.
    pub fn inspect_header_line(&self, line: &str) -> bool {
        let Some(session_id) = extract_session_id(line) else {
            return false;
        };
        self.replace(session_id);
        true
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::ClientConfig;
use crate::error::TrgHttpError;
use crate::session::SessionStore;

/// Long-lived state shared by every call against one RPC endpoint.
///
/// The context is `Sync`; share it with `Arc` across threads. The session
/// token is read as a snapshot before each attempt and replaced wholesale
/// whenever a response carries a new one. Concurrent calls may race on the
/// token; the conflict retry absorbs a stale read.
#[derive(Debug)]
pub struct ClientContext {
    config: RwLock<ClientConfig>,
    session: SessionStore,
}

impl ClientContext {
    pub fn new(config: ClientConfig) -> Result<Self, TrgHttpError> {
        config.validate()?;
        Ok(Self {
            config: RwLock::new(config),
            session: SessionStore::new(),
        })
    }

    /// Snapshot of the current connection settings.
    pub fn config(&self) -> ClientConfig {
        read_unpoisoned(&self.config).clone()
    }

    /// Swaps in new connection settings and forgets the session token, which
    /// belongs to the previous endpoint.
    pub fn reconfigure(&self, config: ClientConfig) -> Result<(), TrgHttpError> {
        config.validate()?;
        *write_unpoisoned(&self.config) = config;
        self.session.clear();
        Ok(())
    }

    pub fn url(&self) -> String {
        read_unpoisoned(&self.config).url.clone()
    }

    pub fn username(&self) -> String {
        read_unpoisoned(&self.config).username.clone()
    }

    pub fn password(&self) -> String {
        read_unpoisoned(&self.config).password.clone()
    }

    pub fn ssl(&self) -> bool {
        read_unpoisoned(&self.config).ssl
    }

    pub fn proxy(&self) -> Option<String> {
        read_unpoisoned(&self.config).proxy.clone()
    }

    pub fn session_id(&self) -> Option<String> {
        self.session.current()
    }

    pub fn set_session_id(&self, session_id: impl Into<String>) {
        self.session.replace(session_id);
    }

    pub fn clear_session_id(&self) {
        self.session.clear();
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }
}

fn read_unpoisoned<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    match lock.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn write_unpoisoned<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    match lock.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

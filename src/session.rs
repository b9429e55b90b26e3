//! Session management for the notifier
//!
//! Provides:
//! - File-based session locking to prevent parallel execution
//! - The `Connector`/`SelfMessenger` seam over the messaging backend
//! - `Session`, the single owner of an authenticated client

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs2::FileExt;
use tracing::{debug, info, warn};

use crate::error::{Error, LoginError, Result, SendError};

/// Session lock guard that ensures exclusive access to the session cache.
pub struct SessionLock {
    lock_file: Option<File>,
    lock_path: PathBuf,
}

impl SessionLock {
    /// Acquire an exclusive lock at `lock_path`.
    pub fn acquire(lock_path: impl AsRef<Path>) -> Result<Self> {
        let lock_path = lock_path.as_ref().to_path_buf();
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| Error::LockError(format!("Failed to open lock file: {}", e)))?;

        match lock_file.try_lock_exclusive() {
            Ok(()) => Ok(Self {
                lock_file: Some(lock_file),
                lock_path,
            }),
            Err(_) => {
                warn!(path = %lock_path.display(), "Session is already in use by another process");
                Err(Error::SessionLocked)
            }
        }
    }

    /// Release the lock manually
    pub fn release(&mut self) {
        if let Some(ref file) = self.lock_file {
            let _ = file.unlock();
            let _ = std::fs::remove_file(&self.lock_path);
        }
        self.lock_file = None;
    }
}

impl Drop for SessionLock {
    fn drop(&mut self) {
        self.release();
    }
}

/// An authenticated connection able to message the account's own chat.
#[async_trait]
pub trait SelfMessenger: Send {
    /// Deliver `text` to the self-chat.
    async fn send_to_self(&mut self, text: &str) -> Result<()>;

    /// Close the connection. Never signs the account out.
    async fn disconnect(self);
}

/// Produces authenticated clients from a session cache.
#[async_trait]
pub trait Connector: Send + Sync {
    type Client: SelfMessenger;

    /// Authenticate, restoring from (and persisting to) the session cache.
    async fn login(&self) -> Result<Self::Client>;
}

/// Façade owning at most one authenticated client.
pub struct Session<C: Connector> {
    connector: C,
    client: Option<C::Client>,
}

impl<C: Connector> Session<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            client: None,
        }
    }

    pub fn connected(&self) -> bool {
        self.client.is_some()
    }

    /// Log in through the connector. A connected session stays as is.
    pub async fn login(&mut self) -> std::result::Result<(), LoginError> {
        if self.connected() {
            debug!("Login requested on a connected session");
            return Ok(());
        }

        let client = self.connector.login().await.map_err(LoginError::from)?;
        self.client = Some(client);
        info!("Logged in");
        Ok(())
    }

    /// Send `text` to the self-chat. Single attempt, no retry.
    pub async fn send(&mut self, text: &str) -> std::result::Result<(), SendError> {
        let client = self.client.as_mut().ok_or(SendError::NotConnected)?;
        client.send_to_self(text).await?;
        info!(chars = text.chars().count(), "Message delivered");
        Ok(())
    }

    /// Best-effort disconnect; the session cache is left untouched.
    pub async fn logout(&mut self) {
        if let Some(client) = self.client.take() {
            client.disconnect().await;
            debug!("Disconnected");
        }
    }
}

//! Telegram backend for [`Session`](crate::session::Session)
//!
//! Connects through grammers with a SQLite session cache and messages the
//! account's own "Saved Messages" chat.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use grammers_client::types::peer::Peer;
use grammers_client::{Client, SignInError};
use grammers_mtsender::{SenderPool, SenderPoolHandle};
use grammers_session::storages::SqliteSession;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::session::{Connector, SelfMessenger, SessionLock};

/// Open (or create) the session cache at `path`.
pub fn open_session(path: &Path) -> Result<Arc<SqliteSession>> {
    let session = SqliteSession::open(path)
        .map_err(|e| Error::SessionOpen(format!("{}: {}", path.display(), e)))?;
    Ok(Arc::new(session))
}

/// Holder for SenderPool components and Client
pub struct TelegramClient {
    pub client: Client,
    // Keeps the pool's request channel open while the client is in use
    _handle: SenderPoolHandle,
    me: Option<Peer>,
    _lock: SessionLock,
    runner_handle: tokio::task::JoinHandle<()>,
}

impl TelegramClient {
    /// Create a new TelegramClient from session
    async fn connect(session: Arc<SqliteSession>, api_id: i32, lock: SessionLock) -> Self {
        let pool = SenderPool::new(session, api_id);

        // Create client from pool (need reference to whole pool)
        let client = Client::new(&pool);

        // Updates are not consumed; the receiver is dropped with the pool
        let SenderPool { runner, handle, .. } = pool;

        let runner_handle = tokio::spawn(async move {
            runner.run().await;
        });

        Self {
            client,
            _handle: handle,
            me: None,
            _lock: lock,
            runner_handle,
        }
    }

    /// Resolve the logged-in user once per connection.
    async fn self_peer(&mut self) -> Result<&Peer> {
        if self.me.is_none() {
            let me = self.client.get_me().await?;
            debug!(user_id = me.raw.id(), "Resolved self user");
            self.me = Some(Peer::User(me));
        }
        self.me
            .as_ref()
            .ok_or_else(|| Error::TelegramError("Self user unavailable".to_string()))
    }
}

// Implement Deref to allow using TelegramClient as &Client
impl std::ops::Deref for TelegramClient {
    type Target = Client;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

#[async_trait]
impl SelfMessenger for TelegramClient {
    async fn send_to_self(&mut self, text: &str) -> Result<()> {
        let me = self.self_peer().await?.clone();
        self.client
            .send_message(&me, text)
            .await
            .map_err(|e| Error::TelegramError(e.to_string()))?;
        Ok(())
    }

    async fn disconnect(self) {
        self.runner_handle.abort();
        // The session lock is released when `self` drops here
    }
}

/// Production connector: session cache on disk, interactive sign-in when needed.
pub struct TelegramConnector {
    config: Config,
}

impl TelegramConnector {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    async fn sign_in(&self, client: &Client) -> Result<()> {
        if self.config.api_hash.is_empty() {
            return Err(Error::MissingCredential("api_hash"));
        }
        if self.config.phone.is_empty() {
            return Err(Error::MissingCredential("phone"));
        }

        info!(phone = %self.config.phone, "No cached authorization, requesting login code");
        let token = client
            .request_login_code(&self.config.phone, &self.config.api_hash)
            .await
            .map_err(|e| Error::TelegramError(format!("Failed to request code: {}", e)))?;

        let code = prompt("Enter the code Telegram sent you: ").await?;

        let user = match client.sign_in(&token, &code).await {
            Ok(user) => user,
            Err(SignInError::PasswordRequired(password_token)) => {
                let password = match &self.config.password {
                    Some(password) => password.clone(),
                    None => prompt("Enter your two-step verification password: ").await?,
                };
                client
                    .check_password(password_token, password.trim())
                    .await
                    .map_err(|e| Error::TelegramError(format!("Failed to check password: {}", e)))?
            }
            Err(e) => return Err(Error::TelegramError(format!("Failed to sign in: {}", e))),
        };

        info!(user_id = user.raw.id(), "Signed in");
        Ok(())
    }
}

#[async_trait]
impl Connector for TelegramConnector {
    type Client = TelegramClient;

    async fn login(&self) -> Result<TelegramClient> {
        if self.config.api_id == 0 {
            return Err(Error::MissingCredential("api_id"));
        }

        let lock = SessionLock::acquire(self.config.lock_path())?;
        let session_path = self.config.session_path();
        debug!(path = %session_path.display(), "Opening session cache");
        let session = open_session(&session_path)?;

        let client = TelegramClient::connect(session, self.config.api_id, lock).await;

        let authorized = match client.is_authorized().await {
            Ok(authorized) => authorized,
            Err(e) => {
                client.disconnect().await;
                return Err(e.into());
            }
        };

        if !authorized {
            if let Err(e) = self.sign_in(&client).await {
                warn!("Sign-in failed: {}", e);
                client.disconnect().await;
                return Err(e);
            }
        } else {
            debug!("Restored authorization from session cache");
        }

        Ok(client)
    }
}

/// Ask for one line on the terminal. Prompts go to stderr; stdout carries
/// status markers only.
async fn prompt(message: &'static str) -> Result<String> {
    let line = tokio::task::spawn_blocking(move || -> io::Result<String> {
        let mut stderr = io::stderr();
        write!(stderr, "{}", message)?;
        stderr.flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(input)
    })
    .await
    .map_err(|e| Error::IoError(io::Error::other(e)))??;

    let line = line.trim().to_string();
    if line.is_empty() {
        return Err(Error::IoError(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "no input provided",
        )));
    }
    Ok(line)
}

//! Error types for the notifier

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to open session cache: {0}")]
    SessionOpen(String),

    #[error("Session is locked by another process")]
    SessionLocked,

    #[error("Failed to acquire session lock: {0}")]
    LockError(String),

    #[error("Telegram API error: {0}")]
    TelegramError(String),

    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<grammers_client::InvocationError> for Error {
    fn from(err: grammers_client::InvocationError) -> Self {
        Error::TelegramError(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}

/// Login failure surfaced by [`crate::session::Session::login`].
///
/// Carries the backend's message text unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct LoginError(pub String);

impl From<Error> for LoginError {
    fn from(err: Error) -> Self {
        LoginError(err.to_string())
    }
}

/// Send failure surfaced by [`crate::session::Session::send`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    #[error("Not logged in")]
    NotConnected,

    #[error("{0}")]
    Delivery(String),
}

impl From<Error> for SendError {
    fn from(err: Error) -> Self {
        SendError::Delivery(err.to_string())
    }
}

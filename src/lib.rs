//! Telegram Saved Messages notifier
//!
//! This library provides tools to:
//! - Log into Telegram once and reuse the cached session on later runs
//! - Send a text message to the account's own "Saved Messages" chat
//! - Report the result to a calling process as stdout markers and exit codes
//! - Expose command metrics for Prometheus

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod report;
pub mod session;
pub mod telegram;

// Re-export common types
pub use config::Config;
pub use error::{Error, LoginError, Result, SendError};
pub use session::{Connector, SelfMessenger, Session, SessionLock};
pub use telegram::TelegramConnector;

// Commands module uses re-exported types, so it must be declared after the re-exports
pub mod commands;

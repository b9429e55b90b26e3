//! Command implementations
//!
//! Every command logs in first; `test` and `send` then deliver one message
//! to the account's own chat. Each module corresponds to a CLI subcommand.

pub mod init_session;
pub mod send_message;

#[cfg(test)]
pub(crate) mod fake;

use std::io::Write;

use tracing::warn;

use crate::config::Config;
use crate::report;
use crate::session::{Connector, Session};
use crate::telegram::TelegramConnector;

/// One parsed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Init,
    Test,
    Send(String),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Init => "init",
            Command::Test => "test",
            Command::Send(_) => "send",
        }
    }
}

/// Terminal state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    LoggedIn,
    Sent,
    LoginFailed,
    SendFailed,
}

impl Outcome {
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::LoggedIn | Outcome::Sent => 0,
            Outcome::LoginFailed | Outcome::SendFailed => 1,
        }
    }

    pub fn is_success(self) -> bool {
        self.exit_code() == 0
    }
}

/// Run `command` against `session`, writing status markers to `out`.
pub async fn run<C, W>(
    command: &Command,
    session: &mut Session<C>,
    config: &Config,
    out: &mut W,
) -> Outcome
where
    C: Connector,
    W: Write,
{
    let outcome = match command {
        Command::Init => init_session::run(session, config.init_grace, out).await,
        Command::Test => {
            send_message::run(
                session,
                &config.test_message,
                &config.test_success_text,
                out,
            )
            .await
        }
        Command::Send(text) => {
            send_message::run(session, text, &config.send_success_text, out).await
        }
    };

    session.logout().await;
    outcome
}

/// Run `command` against Telegram, reporting to stdout.
pub async fn run_with_telegram(command: &Command, config: &Config) -> Outcome {
    let mut session = Session::new(TelegramConnector::new(config.clone()));
    let mut out = std::io::stdout();
    run(command, &mut session, config, &mut out).await
}

/// Shared first step: log in and report the result.
async fn login<C: Connector, W: Write>(
    session: &mut Session<C>,
    out: &mut W,
) -> Result<(), Outcome> {
    match session.login().await {
        Ok(()) => {
            report::login_success(out);
            Ok(())
        }
        Err(e) => {
            warn!("Login failed: {}", e);
            report::login_failed(out, &e);
            Err(Outcome::LoginFailed)
        }
    }
}

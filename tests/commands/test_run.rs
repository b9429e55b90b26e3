//! Tests for the command runner through the public API

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use saved_notifier::commands::{run, Command, Outcome};
use saved_notifier::{Config, Connector, Error, Result, SelfMessenger, Session};

#[derive(Default)]
struct Backend {
    fail_login: bool,
    fail_send: bool,
    sent: Mutex<Vec<String>>,
}

struct Connection(Arc<Backend>);

#[async_trait]
impl SelfMessenger for Connection {
    async fn send_to_self(&mut self, text: &str) -> Result<()> {
        if self.0.fail_send {
            return Err(Error::TelegramError("CHAT_WRITE_FORBIDDEN".into()));
        }
        self.0.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn disconnect(self) {}
}

struct Scripted(Arc<Backend>);

#[async_trait]
impl Connector for Scripted {
    type Client = Connection;

    async fn login(&self) -> Result<Connection> {
        if self.0.fail_login {
            return Err(Error::MissingCredential("phone"));
        }
        Ok(Connection(self.0.clone()))
    }
}

fn config() -> Config {
    let mut config = Config::from_yaml_str("").unwrap();
    config.init_grace = Duration::ZERO;
    config
}

async fn execute(command: Command, backend: Backend) -> (Outcome, Vec<String>, Arc<Backend>) {
    let backend = Arc::new(backend);
    let mut session = Session::new(Scripted(backend.clone()));
    let mut out = Vec::new();
    let outcome = run(&command, &mut session, &config(), &mut out).await;
    let lines = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();
    (outcome, lines, backend)
}

#[tokio::test]
async fn test_success_yields_json_status_line() {
    for command in [Command::Test, Command::Send("hi".into())] {
        let (outcome, lines, _) = execute(command, Backend::default()).await;
        assert_eq!(outcome.exit_code(), 0);

        let json = lines.last().expect("json line");
        let value: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(value["status"], "success");
    }
}

#[tokio::test]
async fn test_login_failure_reports_and_skips_send() {
    let backend = Backend {
        fail_login: true,
        ..Default::default()
    };
    let (outcome, lines, backend) = execute(Command::Send("hi".into()), backend).await;

    assert_eq!(outcome, Outcome::LoginFailed);
    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(lines, vec!["LOGIN_FAILED: Missing credential: phone"]);
    assert!(backend.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_send_failure_exits_one_without_json() {
    let backend = Backend {
        fail_send: true,
        ..Default::default()
    };
    let (outcome, lines, _) = execute(Command::Test, backend).await;

    assert_eq!(outcome.exit_code(), 1);
    assert!(lines
        .iter()
        .all(|line| serde_json::from_str::<serde_json::Value>(line).is_err()));
    assert_eq!(lines.last().unwrap(), "ERROR: CHAT_WRITE_FORBIDDEN");
}

#[tokio::test]
async fn test_init_prints_exactly_login_success() {
    let (outcome, lines, backend) = execute(Command::Init, Backend::default()).await;
    assert_eq!(outcome, Outcome::LoggedIn);
    assert_eq!(lines, vec!["LOGIN_SUCCESS"]);
    assert!(backend.sent.lock().unwrap().is_empty());
}

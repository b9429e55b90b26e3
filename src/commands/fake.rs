//! Scripted connector for command tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::session::{Connector, SelfMessenger};

#[derive(Debug, Default, Clone)]
pub struct Script {
    pub login_error: Option<String>,
    pub send_error: Option<String>,
}

impl Script {
    pub fn login_fails(msg: &str) -> Self {
        Self {
            login_error: Some(msg.to_string()),
            ..Default::default()
        }
    }

    pub fn send_fails(msg: &str) -> Self {
        Self {
            send_error: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

#[derive(Default)]
struct Log {
    logins: usize,
    disconnects: usize,
    sent: Vec<String>,
}

/// Shared view of what the fake backend saw.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Log>>);

impl CallLog {
    pub fn logins(&self) -> usize {
        self.0.lock().unwrap().logins
    }

    pub fn disconnects(&self) -> usize {
        self.0.lock().unwrap().disconnects
    }

    pub fn sent(&self) -> Vec<String> {
        self.0.lock().unwrap().sent.clone()
    }
}

pub struct FakeConnector {
    script: Script,
    log: CallLog,
}

impl FakeConnector {
    pub fn new(script: Script) -> (Self, CallLog) {
        let log = CallLog::default();
        (
            Self {
                script,
                log: log.clone(),
            },
            log,
        )
    }
}

pub struct FakeClient {
    send_error: Option<String>,
    log: CallLog,
}

#[async_trait]
impl SelfMessenger for FakeClient {
    async fn send_to_self(&mut self, text: &str) -> Result<()> {
        if let Some(msg) = &self.send_error {
            return Err(Error::TelegramError(msg.clone()));
        }
        self.log.0.lock().unwrap().sent.push(text.to_string());
        Ok(())
    }

    async fn disconnect(self) {
        self.log.0.lock().unwrap().disconnects += 1;
    }
}

#[async_trait]
impl Connector for FakeConnector {
    type Client = FakeClient;

    async fn login(&self) -> Result<FakeClient> {
        self.log.0.lock().unwrap().logins += 1;
        match &self.script.login_error {
            Some(msg) => Err(Error::TelegramError(msg.clone())),
            None => Ok(FakeClient {
                send_error: self.script.send_error.clone(),
                log: self.log.clone(),
            }),
        }
    }
}

//! Status markers written to stdout for the calling process.
//!
//! Each marker is one line, flushed immediately. Write failures (e.g. a
//! closed pipe) are logged and otherwise ignored; the exit code still
//! carries the outcome.

use std::io::Write;

use serde::Serialize;
use tracing::warn;

use crate::error::{LoginError, Result, SendError};

pub const LOGIN_SUCCESS: &str = "LOGIN_SUCCESS";
pub const LOGIN_FAILED_PREFIX: &str = "LOGIN_FAILED: ";
pub const SEND_FAILED_PREFIX: &str = "ERROR: ";

/// JSON line printed after a successful send.
#[derive(Debug, Serialize)]
pub struct SendReport<'a> {
    pub status: &'static str,
    pub message: &'a str,
}

impl<'a> SendReport<'a> {
    pub fn success(message: &'a str) -> Self {
        Self {
            status: "success",
            message,
        }
    }

    pub fn to_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn emit(out: &mut impl Write, line: &str) {
    if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
        warn!("Failed to write status line: {}", e);
    }
}

pub fn login_success(out: &mut impl Write) {
    emit(out, LOGIN_SUCCESS);
}

pub fn login_failed(out: &mut impl Write, err: &LoginError) {
    emit(out, &format!("{}{}", LOGIN_FAILED_PREFIX, err));
}

pub fn send_failed(out: &mut impl Write, err: &SendError) {
    emit(out, &format!("{}{}", SEND_FAILED_PREFIX, err));
}

pub fn send_success(out: &mut impl Write, message: &str) {
    match SendReport::success(message).to_line() {
        Ok(line) => emit(out, &line),
        Err(e) => warn!("Failed to encode send report: {}", e),
    }
}

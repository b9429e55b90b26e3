//! Send a message to the account's own chat
//!
//! Backs both `test` (fixed text) and `send <text>`.

use std::io::Write;

use tracing::warn;

use super::{login, Outcome};
use crate::report;
use crate::session::{Connector, Session};

/// Log in, deliver `text`, and report `success_text` on success.
pub async fn run<C: Connector, W: Write>(
    session: &mut Session<C>,
    text: &str,
    success_text: &str,
    out: &mut W,
) -> Outcome {
    if let Err(outcome) = login(session, out).await {
        return outcome;
    }

    match session.send(text).await {
        Ok(()) => {
            report::send_success(out, success_text);
            Outcome::Sent
        }
        Err(e) => {
            warn!("Send failed: {}", e);
            report::send_failed(out, &e);
            Outcome::SendFailed
        }
    }
}

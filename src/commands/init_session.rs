//! Session initialization command
//!
//! Logs in (interactively if the cache has no authorization), reports
//! `LOGIN_SUCCESS`, then waits so the session cache is fully persisted
//! before the process exits.

use std::io::Write;
use std::time::Duration;

use tracing::info;

use super::{login, Outcome};
use crate::session::{Connector, Session};

pub async fn run<C: Connector, W: Write>(
    session: &mut Session<C>,
    grace: Duration,
    out: &mut W,
) -> Outcome {
    if let Err(outcome) = login(session, out).await {
        return outcome;
    }

    if !grace.is_zero() {
        info!(secs = grace.as_secs_f32(), "Waiting for session cache to settle");
        tokio::time::sleep(grace).await;
    }

    Outcome::LoggedIn
}

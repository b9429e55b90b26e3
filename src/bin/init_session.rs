//! Session initialization binary.
//!
//! Same as `notifier init`: log in once (interactively if needed) so later
//! `test`/`send` runs reuse the cached session.

use std::process::ExitCode;

use saved_notifier::commands::{self, Command};
use saved_notifier::{logging, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    logging::init_tracing();

    let config = Config::new();
    let outcome = commands::run_with_telegram(&Command::Init, &config).await;
    ExitCode::from(outcome.exit_code())
}

//! Notifier CLI - main entry point
//!
//! Logs into Telegram with a cached session and posts to the account's own
//! Saved Messages chat. stdout carries one status marker per line for the
//! calling process; logs go to stderr.

use std::ffi::OsString;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::time::Instant;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use tracing::{debug, warn};

use saved_notifier::commands::{self, Command};
use saved_notifier::{logging, metrics, Config};

/// Exit code for missing, unknown or malformed commands.
const USAGE_EXIT_CODE: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "notifier")]
#[command(about = "Send notifications to your Telegram Saved Messages", long_about = None)]
#[command(version)]
#[command(disable_help_subcommand = true)]
struct Cli {
    /// Address to expose Prometheus metrics (e.g., 0.0.0.0:9898)
    #[arg(long, env = "METRICS_ADDR")]
    metrics_addr: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

// Subcommands take no flags of their own: anything after the command word is
// message text or ignored trailing input, never `--help`.
#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Log in and cache the session (interactive on first run)
    #[command(disable_help_flag = true)]
    Init {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
        _rest: Vec<String>,
    },

    /// Log in and send the configured test message
    #[command(disable_help_flag = true)]
    Test {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
        _rest: Vec<String>,
    },

    /// Log in and send TEXT
    #[command(disable_help_flag = true)]
    Send {
        /// Message text, sent verbatim
        #[arg(allow_hyphen_values = true)]
        text: String,

        #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
        _rest: Vec<String>,
    },
}

impl From<Commands> for Command {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Init { .. } => Command::Init,
            Commands::Test { .. } => Command::Test,
            Commands::Send { text, .. } => Command::Send(text),
        }
    }
}

/// `--help` and `--version` are the only parse "errors" allowed to print.
fn is_informational(err: &clap::Error) -> bool {
    matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
}

/// clap reads a bare `--` as the end of options. Right after `send` it is the
/// message text, so escape it with a second `--`.
fn escape_send_separator(mut args: Vec<OsString>) -> Vec<OsString> {
    let mut i = 1;
    while i < args.len() {
        match args[i].to_str() {
            Some("--metrics-addr") => i += 2,
            Some(arg) if arg.starts_with("--metrics-addr=") => i += 1,
            Some("send") => {
                if args.get(i + 1).and_then(|arg| arg.to_str()) == Some("--") {
                    args.insert(i + 1, OsString::from("--"));
                }
                break;
            }
            _ => break,
        }
    }
    args
}

async fn start_metrics(addr: &str) {
    match addr.parse::<SocketAddr>() {
        Ok(socket) => {
            if let Err(err) = metrics::spawn_metrics_server(socket).await {
                warn!(%addr, "Metrics endpoint unavailable: {}", err);
            }
        }
        Err(err) => warn!(%addr, "Invalid metrics address: {}", err),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env for local development
    let _ = dotenvy::dotenv();

    logging::init_tracing();

    let cli = match Cli::try_parse_from(escape_send_separator(std::env::args_os().collect())) {
        Ok(cli) => cli,
        Err(err) if is_informational(&err) => {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            // Nothing on stdout: the caller only sees the exit code
            debug!("Usage error: {}", err);
            return ExitCode::from(USAGE_EXIT_CODE);
        }
    };

    if let Some(addr) = cli.metrics_addr.as_deref() {
        start_metrics(addr).await;
    }

    let command = Command::from(cli.command);
    let command_name = command.name();
    metrics::record_command_start(command_name);
    let start = Instant::now();

    let config = Config::new();
    let outcome = commands::run_with_telegram(&command, &config).await;

    metrics::record_command_result(command_name, start.elapsed(), outcome);

    ExitCode::from(outcome.exit_code())
}

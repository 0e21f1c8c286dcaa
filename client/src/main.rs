//! `amep` entry-point: loads settings, wires adapters and runs one command.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use amep_client::domain::{RequestError, RequestExecutor, SessionHandle};
use amep_client::inbound::cli::{self, Cli, CliContext, CliError, TerminalNavigator};
use amep_client::outbound::http::ReqwestTransport;
use amep_client::outbound::storage::FileTokenStore;
use amep_client::settings::{ClientSettings, SettingsError};
use clap::Parser;
use thiserror::Error;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// Exit status for a command that ran but did not succeed.
const EXIT_FAILURE: u8 = 1;
/// Exit status for configuration and start-up problems.
const EXIT_SETUP: u8 = 2;
/// Exit status when the session is missing, expired or lacks the role.
const EXIT_SESSION: u8 = 3;

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Store(#[from] amep_client::domain::ports::TokenStoreError),
    #[error("HTTP client could not be built: {0}")]
    Client(#[from] reqwest::Error),
    #[error("Tokio runtime could not be created: {0}")]
    Runtime(#[source] io::Error),
    #[error(transparent)]
    Command(#[from] CliError),
}

impl AppError {
    const fn exit_code(&self) -> u8 {
        match self {
            Self::Command(
                CliError::AccessDenied { .. } | CliError::Request(RequestError::Unauthorized),
            ) => EXIT_SESSION,
            Self::Command(_) => EXIT_FAILURE,
            Self::Settings(_) | Self::Store(_) | Self::Client(_) | Self::Runtime(_) => EXIT_SETUP,
        }
    }
}

fn main() -> ExitCode {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = Cli::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            // Nothing more can be reported if stderr itself is gone.
            writeln!(io::stderr(), "error: {error}").ok();
            ExitCode::from(error.exit_code())
        }
    }
}

fn run(args: Cli) -> Result<(), AppError> {
    let settings = ClientSettings::load_layered()?.with_overrides(args.overrides());
    let base_url = settings.base_url()?;
    let store = FileTokenStore::open(&settings.session_dir(), &settings.session_file())?;
    let transport = ReqwestTransport::new()?;
    let executor = RequestExecutor::new(
        base_url,
        Arc::new(transport),
        SessionHandle::new(Arc::new(store)),
        Arc::new(TerminalNavigator::stderr()),
    );
    let ctx = CliContext::new(executor);

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(AppError::Runtime)?;
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();
    runtime.block_on(cli::run(args.command, &ctx, &mut input, &mut out))?;
    Ok(())
}

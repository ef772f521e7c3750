//! `selfcheck` entry-point: submits the daily health check for every student
//! in the roster.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io;
use std::path::Path;
use std::sync::Arc;

use ortho_config::OrthoConfig;
use roster::{Roster, RosterError};
use selfcheck::config::SelfCheckSettings;
use selfcheck::domain::ports::SubmissionLog;
use selfcheck::domain::{BatchRecord, SelfCheckPorts, SelfCheckRunner};
use selfcheck::outbound::crypto::RsaIdentityEncoder;
use selfcheck::outbound::hcs::HcsHttpClient;
use selfcheck::outbound::log_file::{FileSubmissionLog, TracingSubmissionLog};
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let settings = SelfCheckSettings::load_from_iter(env::args_os())
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    let config = settings.runner_config().map_err(invalid_input)?;
    let timeout = settings.request_timeout().map_err(invalid_input)?;
    let endpoints = settings.endpoints().map_err(invalid_input)?;

    let encoder = RsaIdentityEncoder::from_embedded()
        .map_err(|error| io::Error::other(format!("initialise identity encoder: {error}")))?;
    let log = open_submission_log(settings.log_path())?;
    let client = Arc::new(
        HcsHttpClient::new(endpoints, timeout)
            .map_err(|error| io::Error::other(format!("create HTTP client: {error}")))?,
    );

    let ports = SelfCheckPorts::new(
        Arc::new(encoder),
        client.clone(),
        client.clone(),
        client,
        log,
    );
    let runner = SelfCheckRunner::new(ports, config);
    let records = load_records_or_report(&runner, &settings.list_path(), settings.shuffle())?;

    info!(
        region = %config.region,
        level = %config.level,
        records = records.len(),
        "starting self-check run"
    );
    let summary = runner.run(&records).await;
    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "self-check run complete"
    );
    Ok(())
}

/// Load the roster, writing a failure to the submission log before returning it.
fn load_records_or_report(
    runner: &SelfCheckRunner,
    path: &Path,
    shuffle: bool,
) -> io::Result<Vec<BatchRecord>> {
    load_records(path, shuffle).map_err(|error| {
        runner.report_roster_failure(&error);
        invalid_input(error)
    })
}

fn load_records(path: &Path, shuffle: bool) -> Result<Vec<BatchRecord>, RosterError> {
    let mut roster = Roster::load(path)?;
    if shuffle {
        roster.shuffle(&mut rand::thread_rng());
    }
    Ok(roster
        .into_records()
        .into_iter()
        .map(BatchRecord::from)
        .collect())
}

fn open_submission_log(path: Option<&Path>) -> io::Result<Arc<dyn SubmissionLog>> {
    match path {
        Some(path) => {
            let log = FileSubmissionLog::open(path).map_err(io::Error::other)?;
            Ok(Arc::new(log))
        }
        None => Ok(Arc::new(TracingSubmissionLog)),
    }
}

fn invalid_input(error: impl std::error::Error + Send + Sync + 'static) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, error)
}

//! Flux Reconcile
//!
//! Wraps `flux reconcile` with live feedback:
//! - streams the Flux events of the reconciled object while flux runs,
//! - then waits for the object's `Ready` condition.
//!
//! Monitoring is best effort. Without cluster access the reconcile still
//! runs; only the live feedback is lost.

mod cli;
mod command;
mod error;
mod output;
mod shutdown;

use crate::cli::Args;
use crate::command::{FluxCommand, exit_code};
use crate::error::CliError;
use crate::output::ConsoleSink;
use clap::Parser;
use reconcile_monitor::{Monitor, MonitorConfig, MonitorError, ResourceKind};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    // kube's rustls stack needs a process-wide crypto provider
    if rustls::crypto::ring::default_provider().install_default().is_err() {
        debug!("rustls crypto provider already installed");
    }

    let args = Args::parse();
    info!("Reconciling {} {}/{}", args.kind, args.namespace, args.name);

    match run(&args).await {
        Ok(code) => code,
        Err(e) => {
            output::print_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<ExitCode, CliError> {
    let started = Instant::now();
    let scope = CancellationToken::new();
    shutdown::cancel_on_signal(scope.clone());
    shutdown::cancel_after(scope.clone(), args.timeout);

    let monitor = start_monitor(
        args,
        || {
            Monitor::connect(
                &scope,
                &args.kind,
                &args.name,
                &args.namespace,
                Arc::new(ConsoleSink),
                MonitorConfig::default(),
            )
        },
        output::print_warning,
    )
    .await;
    let events = monitor.as_ref().map(Monitor::spawn);

    let result = reconcile(&scope, args, monitor.as_ref()).await;

    if let Some(monitor) = &monitor {
        monitor.stop();
    }
    if let Some(events) = events {
        if let Err(e) = events.await {
            warn!("Event monitor task failed: {}", e);
        }
    }
    // Releases the signal and deadline listeners
    scope.cancel();

    match result {
        Err(CliError::Cancelled | CliError::Monitor(MonitorError::Cancelled))
            if started.elapsed() >= args.timeout =>
        {
            Err(CliError::DeadlineExceeded(args.timeout))
        }
        other => other,
    }
}

/// Starts event monitoring for supported kinds; `None` when unsupported,
/// when the cluster cannot be reached, or when the run is cancelled during
/// setup. A failed setup is passed to `report` exactly once.
async fn start_monitor<C, F>(args: &Args, connect: C, mut report: impl FnMut(&str)) -> Option<Monitor>
where
    C: FnOnce() -> F,
    F: Future<Output = Result<Monitor, MonitorError>>,
{
    if args.kind.parse::<ResourceKind>().is_err() {
        debug!("No event monitoring for kind {}", args.kind);
        return None;
    }

    match connect().await {
        Ok(monitor) => Some(monitor),
        Err(MonitorError::Cancelled) => {
            debug!("Monitor setup cancelled");
            None
        }
        Err(e) => {
            report(&e.to_string());
            None
        }
    }
}

async fn reconcile(
    scope: &CancellationToken,
    args: &Args,
    monitor: Option<&Monitor>,
) -> Result<ExitCode, CliError> {
    let command = FluxCommand::reconcile(&args.flux_bin, &args.kind, &args.name, &args.namespace);
    if scope.is_cancelled() {
        return Err(CliError::Cancelled);
    }
    output::print_command(&command.argv());

    let status = command.run(scope).await?;
    if !status.success() {
        return Ok(ExitCode::from(exit_code(status)));
    }

    if args.wait {
        if let Some(monitor) = monitor {
            output::print_waiting(&args.kind, &args.name);
            monitor.wait_for_ready(args.timeout).await?;
            output::print_success(&args.kind, &args.name);
        }
    }

    Ok(ExitCode::SUCCESS)
}

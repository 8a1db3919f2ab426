//! The external `flux reconcile` invocation.

use crate::error::CliError;
use reconcile_monitor::ResourceKind;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// A command line to run with inherited stdout/stderr.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FluxCommand {
    program: String,
    args: Vec<String>,
}

impl FluxCommand {
    /// Creates an arbitrary command
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Builds `flux reconcile` for the given target.
    ///
    /// Sources reconcile as `source git <name>`. Kustomizations and
    /// HelmReleases also pull their source first (`--with-source`). Unknown
    /// kinds are passed through untouched.
    pub fn reconcile(flux_bin: &str, kind: &str, name: &str, namespace: &str) -> Self {
        let known = kind.parse::<ResourceKind>().ok();

        let mut args = vec!["reconcile".to_string()];
        match known {
            Some(ResourceKind::Source) => {
                args.push("source".to_string());
                args.push("git".to_string());
            }
            Some(other) => args.push(other.as_str().to_string()),
            None => args.push(kind.to_string()),
        }
        args.push(name.to_string());
        args.push("-n".to_string());
        args.push(namespace.to_string());
        if matches!(known, Some(ResourceKind::Kustomization | ResourceKind::HelmRelease)) {
            args.push("--with-source".to_string());
        }

        Self::new(flux_bin, args)
    }

    /// Program followed by its arguments
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }

    /// Runs the command to completion, streaming its output to ours.
    ///
    /// The child is killed if `cancel` fires first.
    ///
    /// # Errors
    /// * `CliError::Command` - spawning or waiting failed
    /// * `CliError::Cancelled` - `cancel` fired while the command ran
    pub async fn run(&self, cancel: &CancellationToken) -> Result<ExitStatus, CliError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()?;
        debug!("Started {} (pid {:?})", self.program, child.id());

        tokio::select! {
            status = child.wait() => return Ok(status?),
            () = cancel.cancelled() => {}
        }

        warn!("Cancelled, killing {}", self.program);
        child.kill().await?;
        Err(CliError::Cancelled)
    }
}

/// Exit code to mirror for a finished command.
///
/// Signals and out-of-range codes map to 1.
pub fn exit_code(status: ExitStatus) -> u8 {
    status
        .code()
        .and_then(|code| u8::try_from(code).ok())
        .unwrap_or(1)
}

//! Command-line arguments.

use clap::builder::NonEmptyStringValueParser;
use clap::{ArgAction, Parser};
use std::time::Duration;

/// Run `flux reconcile` and follow the reconciliation live
#[derive(Debug, Parser)]
#[command(name = "flux-reconcile", version)]
pub struct Args {
    /// Resource kind (kustomization, helmrelease, source)
    #[arg(long, env = "FLUX_RECONCILE_KIND", value_parser = NonEmptyStringValueParser::new())]
    pub kind: String,

    /// Resource name
    #[arg(long, env = "FLUX_RECONCILE_NAME", value_parser = NonEmptyStringValueParser::new())]
    pub name: String,

    /// Namespace
    #[arg(short = 'n', long, env = "FLUX_RECONCILE_NAMESPACE", default_value = "flux-system")]
    pub namespace: String,

    /// Wait for reconciliation to complete (`--wait=false` to skip)
    #[arg(
        long,
        env = "FLUX_RECONCILE_WAIT",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = true,
        default_missing_value = "true"
    )]
    pub wait: bool,

    /// Overall timeout, e.g. 90s, 5m, 1h30m
    #[arg(long, env = "FLUX_RECONCILE_TIMEOUT", default_value = "5m", value_parser = parse_duration)]
    pub timeout: Duration,

    /// flux executable to run
    #[arg(long, env = "FLUX_BIN", default_value = "flux")]
    pub flux_bin: String,
}

/// Parses `90`, `90s`, `500ms`, `5m`, `1h30m` style durations.
///
/// A bare number is seconds.
pub fn parse_duration(raw: &str) -> Result<Duration, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("duration must not be empty".to_string());
    }
    if let Ok(seconds) = raw.parse::<u64>() {
        return Ok(Duration::from_secs(seconds));
    }

    let mut total = Duration::ZERO;
    let mut rest = raw;
    while !rest.is_empty() {
        let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        if digits == 0 {
            return Err(format!("invalid duration {raw:?}: expected a number"));
        }
        let value: u64 = rest[..digits]
            .parse()
            .map_err(|e| format!("invalid duration {raw:?}: {e}"))?;
        rest = &rest[digits..];

        let unit_len = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
        let part = match &rest[..unit_len] {
            "ms" => Duration::from_millis(value),
            "s" => Duration::from_secs(value),
            "m" => Duration::from_secs(value.saturating_mul(60)),
            "h" => Duration::from_secs(value.saturating_mul(3600)),
            "" => return Err(format!("invalid duration {raw:?}: missing unit")),
            unit => return Err(format!("invalid duration {raw:?}: unknown unit {unit:?}")),
        };
        total = total.saturating_add(part);
        rest = &rest[unit_len..];
    }
    Ok(total)
}

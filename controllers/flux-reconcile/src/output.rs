//! Operator-facing output.
//!
//! Progress goes to stdout, warnings and errors to stderr. Diagnostic
//! logging is separate and goes through `tracing`.

use reconcile_monitor::{EventNotification, NotificationSink};

/// Prints notifications as they arrive from the event loop
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn notify(&self, notification: EventNotification) {
        print_event(&notification.reason, &notification.message, notification.is_warning);
    }
}

/// `► flux reconcile ...`
pub fn format_command(argv: &[&str]) -> String {
    format!("► {}", argv.join(" "))
}

/// One event line; warnings get a distinct marker
pub fn format_event(reason: &str, message: &str, is_warning: bool) -> String {
    let marker = if is_warning { "⚠" } else { "•" };
    format!("  {marker} {reason}: {message}")
}

/// Echo the command about to run
pub fn print_command(argv: &[&str]) {
    println!("{}", format_command(argv));
}

/// Show an event from the cluster
pub fn print_event(reason: &str, message: &str, is_warning: bool) {
    let line = format_event(reason, message, is_warning);
    if is_warning {
        eprintln!("{line}");
    } else {
        println!("{line}");
    }
}

/// Announce the readiness wait
pub fn print_waiting(kind: &str, name: &str) {
    println!("◎ Waiting for {kind} {name} to become ready...");
}

/// Announce a successful reconciliation
pub fn print_success(kind: &str, name: &str) {
    println!("✔ {kind} {name} reconciled successfully");
}

/// Report a non-fatal problem
pub fn print_warning(message: &str) {
    eprintln!("Warning: {message}");
}

/// Report a fatal problem
pub fn print_error(message: &str) {
    eprintln!("✗ {message}");
}

//! kitegen command-line library
//!
//! The binary is a thin wrapper around [`run`]; everything else lives here so
//! it can be tested in-process.

pub mod cli;
pub mod commands;
pub mod tracing;

use cli::{Cli, EXIT_OK, exit_code_for, render_error};
use std::io::Write;

/// Execute a parsed command line and return the process exit code
///
/// Tracing must already be initialized by the caller.
pub fn run(cli: &Cli, out: &mut dyn Write) -> i32 {
    let _span = ::tracing::info_span!(
        "kitegen",
        correlation_id = %tracing::correlation_id(),
    )
    .entered();

    match commands::execute(&cli.command, out) {
        Ok(()) => EXIT_OK,
        Err(err) => {
            ::tracing::debug!(error = %err, "Command failed");
            if let Some(diff) = err.diff().filter(|_| !cli.json) {
                let _ = out.write_all(diff.as_bytes()).and_then(|()| out.flush());
            }
            render_error(&err, cli.json);
            exit_code_for(&err)
        }
    }
}

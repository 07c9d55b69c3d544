//! `kitegen env`

use super::write_out;
use crate::cli::CliError;
use kitegen_buildkite::ExecutionEnvironment;
use std::fmt::Write as _;
use std::io::Write;

/// Print the execution environment every step runs in
///
/// # Errors
/// Returns an other error when the output cannot be written.
pub fn execute(image: Option<&str>, out: &mut dyn Write) -> Result<(), CliError> {
    let mut environment = ExecutionEnvironment::default();
    if let Some(image) = image {
        environment = environment.with_image(image);
    }

    let mut text = String::new();
    let _ = writeln!(text, "plugin: {}", environment.plugin);
    let _ = writeln!(text, "image: {}", environment.image);
    let _ = writeln!(text, "workdir: {}", environment.workdir);
    let _ = writeln!(text, "propagate-uid-gid: {}", environment.propagate_uid_gid);
    let _ = writeln!(text, "environment:");
    for name in environment.propagated_env {
        let _ = writeln!(text, "  {name}");
    }
    write_out(out, &text)
}

//! `kitegen compile`

use super::{render_definition, write_out};
use crate::cli::CliError;
use std::io::Write;
use std::path::Path;
use tracing::instrument;

/// Compile `definition` and write the pipeline to `output` or `out`
///
/// # Errors
/// Returns a config error for invalid definitions and an other error when
/// the output cannot be written.
#[instrument(skip(out))]
pub fn execute(
    definition: &Path,
    output: Option<&Path>,
    image: Option<&str>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let yaml = render_definition(definition, image)?;

    match output {
        Some(path) => {
            std::fs::write(path, &yaml).map_err(|e| {
                CliError::other_with_help(
                    format!("Failed to write {}: {e}", path.display()),
                    "Check that the output directory exists and is writable",
                )
            })?;
            tracing::info!(output = %path.display(), bytes = yaml.len(), "Wrote pipeline");
            Ok(())
        }
        None => write_out(out, &yaml),
    }
}

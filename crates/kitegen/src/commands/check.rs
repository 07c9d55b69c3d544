//! `kitegen check`

use super::render_definition;
use crate::cli::CliError;
use similar::TextDiff;
use std::path::Path;
use tracing::instrument;

/// Compare a generated pipeline file with a fresh compile of its definition
///
/// On mismatch the returned stale error carries the unified diff from the
/// file on disk to the fresh output.
///
/// # Errors
/// Returns a stale error when the file differs, a config error for invalid
/// definitions, and an other error when the pipeline file cannot be read.
#[instrument]
pub fn execute(definition: &Path, pipeline: &Path, image: Option<&str>) -> Result<(), CliError> {
    let expected = render_definition(definition, image)?;
    let current = std::fs::read_to_string(pipeline).map_err(|e| {
        CliError::other_with_help(
            format!("Failed to read {}: {e}", pipeline.display()),
            format!(
                "Generate it with `kitegen compile {} -o {}`",
                definition.display(),
                pipeline.display()
            ),
        )
    })?;

    if current == expected {
        tracing::info!(pipeline = %pipeline.display(), "Pipeline is up to date");
        return Ok(());
    }

    let label = pipeline.display().to_string();
    Err(CliError::stale(
        format!("{label} does not match {}", definition.display()),
        format!(
            "Regenerate it with `kitegen compile {} -o {label}`",
            definition.display()
        ),
        format_diff(&current, &expected, &label),
    ))
}

fn format_diff(current: &str, expected: &str, path: &str) -> String {
    let relative = path.trim_start_matches('/');
    let from = format!("a/{relative}");
    let to = format!("b/{relative}");
    TextDiff::from_lines(current, expected)
        .unified_diff()
        .header(&from, &to)
        .to_string()
}

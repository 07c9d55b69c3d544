//! Subcommand implementations
//!
//! Commands write their primary output to the supplied writer so they can be
//! exercised without spawning the binary.

pub mod check;
pub mod compile;
pub mod env;
pub mod validate;

use crate::cli::{CliError, Commands};
use kitegen_buildkite::BuildkiteEmitter;
use kitegen_ci::emitter::Emitter;
use kitegen_ci::load_definition;
use std::io::Write;
use std::path::Path;

/// Run a parsed subcommand
///
/// # Errors
/// Returns the command's `CliError`; the caller maps it to an exit code.
pub fn execute(command: &Commands, out: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Commands::Compile {
            definition,
            output,
            image,
        } => compile::execute(definition, output.as_deref(), image.as_deref(), out),
        Commands::Check {
            definition,
            pipeline,
            image,
        } => check::execute(definition, pipeline, image.as_deref()),
        Commands::Validate { definition } => validate::execute(definition, out),
        Commands::Env { image } => env::execute(image.as_deref(), out),
    }
}

/// Load a definition, apply the CLI image override and emit the pipeline
///
/// A CLI image takes precedence over the definition's own override.
pub(crate) fn render_definition(definition: &Path, image: Option<&str>) -> Result<String, CliError> {
    let mut spec = load_definition(definition)?;
    if let Some(image) = image {
        tracing::debug!(image, "Overriding container image from command line");
        spec.environment.image = Some(image.to_string());
    }

    let emitter = BuildkiteEmitter::new();
    let yaml = emitter.emit(&spec)?;
    tracing::info!(
        definition = %definition.display(),
        groups = spec.groups.len(),
        steps = spec.step_count(),
        format = emitter.format_name(),
        "Compiled pipeline"
    );
    Ok(yaml)
}

pub(crate) fn write_out(out: &mut dyn Write, text: &str) -> Result<(), CliError> {
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|e| CliError::other(format!("Failed to write output: {e}")))
}

//! `kitegen validate`

use super::write_out;
use crate::cli::CliError;
use kitegen_ci::definition::has_errors;
use kitegen_ci::{Severity, load_definition, validate_definition};
use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

/// Print every issue found in a definition
///
/// # Errors
/// Returns a config error when any issue has error severity.
pub fn execute(definition: &Path, out: &mut dyn Write) -> Result<(), CliError> {
    let spec = load_definition(definition)?;
    let issues = validate_definition(&spec);

    let mut report = String::new();
    for issue in &issues {
        let _ = writeln!(report, "{issue}");
    }

    let errors = issues
        .iter()
        .filter(|issue| issue.severity == Severity::Error)
        .count();
    let warnings = issues.len() - errors;
    let _ = writeln!(
        report,
        "{}: {} groups, {} steps, {errors} errors, {warnings} warnings",
        definition.display(),
        spec.groups.len(),
        spec.step_count(),
    );
    write_out(out, &report)?;

    if has_errors(&issues) {
        return Err(CliError::config(format!(
            "{} has {errors} error(s)",
            definition.display()
        )));
    }
    Ok(())
}

//! Pipeline definition files
//!
//! Definitions are YAML or JSON documents deserializing into
//! [`PipelineSpec`]. This module loads them and reports every problem in a
//! definition at once, which compiling alone cannot do since compilation
//! stops at the first error.

use crate::model::{PipelineSpec, StepSpec};
use miette::Diagnostic;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading a definition
#[derive(Debug, Error, Diagnostic)]
pub enum DefinitionError {
    /// The file could not be read
    #[error("Failed to read definition {}: {source}", path.display())]
    #[diagnostic(code(kitegen::definition::io))]
    Io {
        /// Path of the definition
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The YAML content is malformed or does not match the model
    #[error("Invalid YAML definition {}: {source}", path.display())]
    #[diagnostic(
        code(kitegen::definition::yaml),
        help("definitions are a mapping with a `groups` list; see pipelines/stable.yml")
    )]
    Yaml {
        /// Path of the definition
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: serde_yaml::Error,
    },

    /// The JSON content is malformed or does not match the model
    #[error("Invalid JSON definition {}: {source}", path.display())]
    #[diagnostic(code(kitegen::definition::json))]
    Json {
        /// Path of the definition
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for definition loading
pub type Result<T> = std::result::Result<T, DefinitionError>;

/// Serialization format of a definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionFormat {
    /// YAML document
    Yaml,
    /// JSON document
    Json,
}

impl DefinitionFormat {
    /// Guess the format from a file extension, defaulting to YAML
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Parse a definition from in-memory text
///
/// `origin` names the document in error messages; it is not read.
///
/// # Errors
/// Returns `DefinitionError::Yaml` or `DefinitionError::Json` when the text
/// does not deserialize into a [`PipelineSpec`].
pub fn parse_definition(
    text: &str,
    format: DefinitionFormat,
    origin: &Path,
) -> Result<PipelineSpec> {
    match format {
        DefinitionFormat::Yaml => {
            serde_yaml::from_str(text).map_err(|source| DefinitionError::Yaml {
                path: origin.to_path_buf(),
                source,
            })
        }
        DefinitionFormat::Json => {
            serde_json::from_str(text).map_err(|source| DefinitionError::Json {
                path: origin.to_path_buf(),
                source,
            })
        }
    }
}

/// Load a definition file, picking the format from its extension
///
/// # Errors
/// Returns `DefinitionError::Io` if the file cannot be read, or a parse error
/// if its content is invalid.
pub fn load_definition(path: &Path) -> Result<PipelineSpec> {
    let text = std::fs::read_to_string(path).map_err(|source| DefinitionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let format = DefinitionFormat::from_path(path);
    tracing::debug!(path = %path.display(), ?format, "Loading pipeline definition");
    parse_definition(&text, format, path)
}

/// How serious a definition issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Allowed by the compiler but probably a mistake
    Warning,
    /// Compiling the definition will fail
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single problem found in a definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// How serious the problem is
    pub severity: Severity,
    /// Where it was found, e.g. `groups[0].steps[1]`
    pub location: String,
    /// Human-readable description
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.location, self.message)
    }
}

/// Check a definition and collect every issue instead of stopping at the first
#[must_use]
pub fn validate_definition(spec: &PipelineSpec) -> Vec<Issue> {
    let mut issues = Vec::new();

    if spec.groups.is_empty() {
        issues.push(Issue {
            severity: Severity::Error,
            location: "groups".to_string(),
            message: "pipeline has no groups".to_string(),
        });
    }

    if spec
        .environment
        .image
        .as_deref()
        .is_some_and(|image| image.trim().is_empty())
    {
        issues.push(Issue {
            severity: Severity::Error,
            location: "environment.image".to_string(),
            message: "image override is empty".to_string(),
        });
    }

    for (group_index, group) in spec.groups.iter().enumerate() {
        let group_location = format!("groups[{group_index}]");

        if group.name.is_empty() {
            issues.push(Issue {
                severity: Severity::Warning,
                location: group_location.clone(),
                message: "group has an empty name".to_string(),
            });
        }

        if group.steps.is_empty() {
            issues.push(Issue {
                severity: Severity::Error,
                location: group_location.clone(),
                message: format!("group '{}' has no steps", group.name),
            });
        }

        let mut seen = HashSet::new();
        for (step_index, step) in group.steps.iter().enumerate() {
            let location = format!("{group_location}.steps[{step_index}]");
            check_step(step, &location, &mut issues);

            let name = step.name.as_deref().filter(|n| !n.is_empty());
            if let Some(name) = name.filter(|n| !seen.insert(*n)) {
                issues.push(Issue {
                    severity: Severity::Warning,
                    location,
                    message: format!("duplicate step name '{name}' in group '{}'", group.name),
                });
            }
        }
    }

    issues
}

fn check_step(step: &StepSpec, location: &str, issues: &mut Vec<Issue>) {
    let mut error = |message: String| {
        issues.push(Issue {
            severity: Severity::Error,
            location: location.to_string(),
            message,
        });
    };

    let missing_text = |value: &Option<String>| value.as_deref().is_none_or(str::is_empty);

    if missing_text(&step.name) {
        error("missing required field 'name'".to_string());
    }
    if missing_text(&step.command) {
        error("missing required field 'command'".to_string());
    }
    match step.timeout_in_minutes {
        None => error("missing required field 'timeout_in_minutes'".to_string()),
        Some(0) => error("'timeout_in_minutes' must be positive".to_string()),
        Some(_) => {}
    }
    if missing_text(&step.agent_queue) {
        error("missing required field 'agent_queue'".to_string());
    }
    if step.parallelism == Some(0) {
        error("'parallelism' must be positive".to_string());
    }
}

/// Whether any issue prevents compilation
#[must_use]
pub fn has_errors(issues: &[Issue]) -> bool {
    issues.iter().any(|issue| issue.severity == Severity::Error)
}

//! Command-line interface definition and error handling

use crate::tracing::{LogLevel, TracingFormat};
use clap::{Parser, Subcommand};
use kitegen_ci::DefinitionError;
use kitegen_ci::emitter::EmitterError;
use miette::{Diagnostic, Report};
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application
pub const EXIT_OK: i32 = 0;
/// Generated file is out of date
pub const EXIT_STALE: i32 = 1;
/// Definition or compile error exit code
pub const EXIT_CLI: i32 = 2;
/// I/O or other unexpected error exit code
pub const EXIT_OTHER: i32 = 3;

/// CLI-specific error types with proper exit code mapping
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum CliError {
    /// Definition or compile error (exit code 2)
    #[error("Definition error: {message}")]
    #[diagnostic(code(kitegen::cli::config))]
    Config {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// A checked-in pipeline does not match its definition (exit code 1)
    #[error("Pipeline is out of date: {message}")]
    #[diagnostic(code(kitegen::cli::stale))]
    Stale {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
        /// Unified diff from the file on disk to the fresh output
        diff: String,
    },
    /// Other unexpected error (exit code 3)
    #[error("Unexpected error: {message}")]
    #[diagnostic(code(kitegen::cli::other))]
    Other {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
}

impl CliError {
    /// Create a new configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// Create a new configuration error with help text
    #[must_use]
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a new stale-output error carrying the diff to apply
    #[must_use]
    pub fn stale(
        message: impl Into<String>,
        help: impl Into<String>,
        diff: impl Into<String>,
    ) -> Self {
        Self::Stale {
            message: message.into(),
            help: Some(help.into()),
            diff: diff.into(),
        }
    }

    /// Create a new other error with help text
    #[must_use]
    pub fn other_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a new other error
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            help: None,
        }
    }
}

impl CliError {
    /// The diff attached to a stale-output error
    #[must_use]
    pub fn diff(&self) -> Option<&str> {
        match self {
            Self::Stale { diff, .. } => Some(diff.as_str()),
            Self::Config { .. } | Self::Other { .. } => None,
        }
    }
}

impl From<DefinitionError> for CliError {
    fn from(err: DefinitionError) -> Self {
        match err {
            DefinitionError::Io { .. } => Self::other_with_help(
                err.to_string(),
                "Check that the definition path exists and is readable",
            ),
            DefinitionError::Yaml { .. } | DefinitionError::Json { .. } => {
                Self::config_with_help(
                    err.to_string(),
                    "Run `kitegen validate <DEFINITION>` for a full report",
                )
            }
        }
    }
}

impl From<EmitterError> for CliError {
    fn from(err: EmitterError) -> Self {
        match err {
            EmitterError::Compile(compile) => {
                let mut message = compile.to_string();
                let mut source = std::error::Error::source(&compile);
                while let Some(inner) = source {
                    message.push_str(": ");
                    message.push_str(&inner.to_string());
                    source = inner.source();
                }
                Self::config_with_help(
                    message,
                    "Run `kitegen validate <DEFINITION>` to list every problem at once",
                )
            }
            EmitterError::InvalidSpec(message) => Self::config(message),
        }
    }
}

/// Map CLI error to appropriate exit code
#[must_use]
pub const fn exit_code_for(err: &CliError) -> i32 {
    match err {
        CliError::Stale { .. } => EXIT_STALE,
        CliError::Config { .. } => EXIT_CLI,
        CliError::Other { .. } => EXIT_OTHER,
    }
}

/// Build the JSON error envelope printed in `--json` mode
#[must_use]
pub fn error_envelope(err: &CliError) -> serde_json::Value {
    let mut error = serde_json::json!({
        "code": match err {
            CliError::Config { .. } => "config",
            CliError::Stale { .. } => "stale",
            CliError::Other { .. } => "other",
        },
        "message": err.to_string(),
    });
    if let Some(diff) = err.diff() {
        error["diff"] = serde_json::Value::from(diff);
    }
    serde_json::json!({ "status": "error", "error": error })
}

/// Render error appropriately based on JSON flag
///
/// In JSON mode the envelope is the only thing written to stdout.
#[allow(clippy::print_stdout, clippy::print_stderr)]
pub fn render_error(err: &CliError, json_mode: bool) {
    if json_mode {
        println!("{}", error_envelope(err));
    } else {
        let report = Report::new(err.clone());
        eprintln!("{report:?}");
        let _ = io::stderr().flush();
    }
}

/// Compile declarative job definitions into Buildkite pipeline YAML.
#[derive(Parser, Debug)]
#[command(name = "kitegen")]
#[command(about = "Compile declarative job definitions into Buildkite pipeline YAML")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Logging verbosity level.
    #[arg(
        short = 'L',
        long,
        alias = "level",
        global = true,
        env = "KITEGEN_LOG_LEVEL",
        default_value = "warn",
        value_enum
    )]
    pub log_level: LogLevel,

    /// Log output format.
    #[arg(
        long,
        global = true,
        env = "KITEGEN_LOG_FORMAT",
        default_value = "compact",
        value_enum
    )]
    pub log_format: TracingFormat,

    /// Emit errors as a JSON envelope on stdout.
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Compile a definition into pipeline YAML
    Compile {
        /// Pipeline definition file (YAML or JSON)
        definition: PathBuf,

        /// Write the pipeline to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Override the container image of every step
        #[arg(long, env = "KITEGEN_IMAGE")]
        image: Option<String>,
    },

    /// Verify a generated pipeline file is up to date with its definition
    Check {
        /// Pipeline definition file (YAML or JSON)
        definition: PathBuf,

        /// Previously generated pipeline file
        pipeline: PathBuf,

        /// Override the container image of every step
        #[arg(long, env = "KITEGEN_IMAGE")]
        image: Option<String>,
    },

    /// Report every problem in a definition without compiling it
    Validate {
        /// Pipeline definition file (YAML or JSON)
        definition: PathBuf,
    },

    /// Show the execution environment steps run in
    Env {
        /// Override the container image
        #[arg(long, env = "KITEGEN_IMAGE")]
        image: Option<String>,
    },
}

/// Parse command-line arguments
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

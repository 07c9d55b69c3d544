//! Compile error types
//!
//! Every failure the compiler can report is local to a single compile call and
//! is surfaced synchronously. A failed compile never produces a document.

use miette::Diagnostic;
use thiserror::Error;

/// Errors produced while compiling steps, groups and pipelines
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum CompileError {
    /// A required step field is absent (or an empty string)
    #[error("Missing required field '{field}'")]
    #[diagnostic(
        code(kitegen::compile::missing_field),
        help("every step needs name, command, timeout_in_minutes and agent_queue")
    )]
    MissingField {
        /// Name of the missing field
        field: &'static str,
    },

    /// A step field is present but has an unusable value
    #[error("Invalid value for field '{field}': {reason}")]
    #[diagnostic(code(kitegen::compile::invalid_field))]
    InvalidField {
        /// Name of the offending field
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// A group was declared without any steps
    #[error("Group '{group}' has no steps")]
    #[diagnostic(
        code(kitegen::compile::empty_group),
        help("remove the group or add at least one step to it")
    )]
    EmptyGroup {
        /// Name of the empty group
        group: String,
    },

    /// A pipeline was declared without any groups
    #[error("Pipeline has no groups")]
    #[diagnostic(code(kitegen::compile::empty_pipeline))]
    EmptyPipeline,

    /// A step inside a group failed to compile
    #[error("Step #{index} of group '{group}' failed to compile")]
    #[diagnostic(code(kitegen::compile::step))]
    Step {
        /// Name of the enclosing group
        group: String,
        /// Zero-based position of the step within the group
        index: usize,
        /// The originating error
        #[source]
        source: Box<CompileError>,
    },

    /// A group inside a pipeline failed to compile
    #[error("Group #{index} failed to compile")]
    #[diagnostic(code(kitegen::compile::group))]
    Group {
        /// Zero-based position of the group within the pipeline
        index: usize,
        /// The originating error
        #[source]
        source: Box<CompileError>,
    },
}

impl CompileError {
    /// Create a missing field error
    #[must_use]
    pub const fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// Create an invalid field error
    #[must_use]
    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// Create an empty group error
    #[must_use]
    pub fn empty_group(group: impl Into<String>) -> Self {
        Self::EmptyGroup {
            group: group.into(),
        }
    }

    /// Wrap a step failure with the position it occurred at
    #[must_use]
    pub fn in_step(self, group: impl Into<String>, index: usize) -> Self {
        Self::Step {
            group: group.into(),
            index,
            source: Box::new(self),
        }
    }

    /// Wrap a group failure with the position it occurred at
    #[must_use]
    pub fn in_group(self, index: usize) -> Self {
        Self::Group {
            index,
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping `Step` and `Group` wrappers
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Step { source, .. } | Self::Group { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Result type for compile operations
pub type Result<T> = std::result::Result<T, CompileError>;

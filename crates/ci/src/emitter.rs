//! CI Pipeline Emitter Trait
//!
//! Defines the interface for emitting orchestrator-native CI configuration
//! from a [`PipelineSpec`].

use crate::error::CompileError;
use crate::model::PipelineSpec;
use thiserror::Error;

/// Error types for emitter operations
#[derive(Debug, Error)]
pub enum EmitterError {
    /// The pipeline failed to compile
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// The pipeline is structurally valid but unusable for this emitter
    #[error("Invalid pipeline: {0}")]
    InvalidSpec(String),
}

/// Result type for emitter operations
pub type EmitterResult<T> = std::result::Result<T, EmitterError>;

/// Trait for CI configuration emitters
///
/// # Example
///
/// ```ignore
/// use kitegen_ci::emitter::{Emitter, EmitterResult};
/// use kitegen_ci::PipelineSpec;
///
/// struct CommentEmitter;
///
/// impl Emitter for CommentEmitter {
///     fn emit(&self, spec: &PipelineSpec) -> EmitterResult<String> {
///         Ok(format!("# {} groups\n", spec.groups.len()))
///     }
///
///     fn format_name(&self) -> &'static str {
///         "comment"
///     }
///
///     fn file_extension(&self) -> &'static str {
///         "txt"
///     }
/// }
/// ```
pub trait Emitter: Send + Sync {
    /// Emit a CI configuration document
    ///
    /// # Errors
    /// Returns `EmitterError` if the pipeline cannot be compiled
    fn emit(&self, spec: &PipelineSpec) -> EmitterResult<String>;

    /// Format identifier, used for CLI flag matching
    fn format_name(&self) -> &'static str;

    /// File extension for output files
    fn file_extension(&self) -> &'static str;

    /// Human-readable description of this emitter
    fn description(&self) -> &'static str {
        "CI configuration emitter"
    }

    /// Emitter-specific validation run before emission
    ///
    /// # Errors
    /// Returns `EmitterError::InvalidSpec` if validation fails
    fn validate(&self, spec: &PipelineSpec) -> EmitterResult<()> {
        let _ = spec;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GroupSpec;

    struct CountingEmitter;

    impl Emitter for CountingEmitter {
        fn emit(&self, spec: &PipelineSpec) -> EmitterResult<String> {
            if spec.groups.is_empty() {
                return Err(CompileError::EmptyPipeline.into());
            }
            Ok(format!("# {} groups", spec.groups.len()))
        }

        fn format_name(&self) -> &'static str {
            "counting"
        }

        fn file_extension(&self) -> &'static str {
            "txt"
        }
    }

    #[test]
    fn test_emitter_trait() {
        let emitter = CountingEmitter;
        let spec = PipelineSpec::new(vec![GroupSpec::new("g", vec![])]);

        assert_eq!(emitter.emit(&spec).unwrap(), "# 1 groups");
        assert_eq!(emitter.format_name(), "counting");
        assert_eq!(emitter.file_extension(), "txt");
        assert_eq!(emitter.description(), "CI configuration emitter");
        assert!(emitter.validate(&spec).is_ok());
    }

    #[test]
    fn test_compile_error_is_transparent() {
        let err = CountingEmitter.emit(&PipelineSpec::default()).unwrap_err();
        assert!(matches!(err, EmitterError::Compile(CompileError::EmptyPipeline)));
        assert_eq!(err.to_string(), "Pipeline has no groups");
    }
}

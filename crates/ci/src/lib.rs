//! Pipeline definitions for kitegen
//!
//! This crate holds the input side of the compiler: the step/group/pipeline
//! model, the errors compilation can raise, definition file loading, and the
//! [`emitter::Emitter`] interface that orchestrator-specific crates implement.

pub mod definition;
pub mod emitter;
pub mod error;
pub mod model;

pub use definition::{
    DefinitionError, DefinitionFormat, Issue, Severity, load_definition, parse_definition,
    validate_definition,
};
pub use error::{CompileError, Result};
pub use model::{EnvironmentOverride, GroupSpec, PipelineSpec, StepSpec};

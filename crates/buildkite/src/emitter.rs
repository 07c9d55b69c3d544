//! Buildkite Pipeline Emitter
//!
//! Wraps the pipeline compiler behind the [`Emitter`] interface.

use crate::environment::ExecutionEnvironment;
use crate::indent::render;
use crate::step::Compiler;
use kitegen_ci::PipelineSpec;
use kitegen_ci::emitter::{Emitter, EmitterError, EmitterResult};

/// Buildkite pipeline emitter
///
/// Produces YAML that can be uploaded with `buildkite-agent pipeline upload`.
#[derive(Debug, Clone, Default)]
pub struct BuildkiteEmitter {
    compiler: Compiler,
}

impl BuildkiteEmitter {
    /// Create an emitter using the default execution environment
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different execution environment
    #[must_use]
    pub fn with_environment(mut self, environment: ExecutionEnvironment) -> Self {
        self.compiler = Compiler::new(environment);
        self
    }

    /// The compiler backing this emitter
    #[must_use]
    pub const fn compiler(&self) -> &Compiler {
        &self.compiler
    }
}

impl Emitter for BuildkiteEmitter {
    fn emit(&self, spec: &PipelineSpec) -> EmitterResult<String> {
        self.validate(spec)?;
        let lines = self.compiler.compile_pipeline(spec)?;
        Ok(render(&lines))
    }

    fn format_name(&self) -> &'static str {
        "buildkite"
    }

    fn file_extension(&self) -> &'static str {
        "yml"
    }

    fn description(&self) -> &'static str {
        "Buildkite pipeline YAML emitter"
    }

    fn validate(&self, spec: &PipelineSpec) -> EmitterResult<()> {
        if spec
            .environment
            .image
            .as_deref()
            .is_some_and(|image| image.trim().is_empty())
        {
            return Err(EmitterError::InvalidSpec(
                "environment.image must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

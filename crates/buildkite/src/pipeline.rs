//! Pipeline compilation
//!
//! A pipeline is the top-level `steps:` key holding every group.

use crate::indent::{Lines, line};
use crate::step::Compiler;
use kitegen_ci::{CompileError, PipelineSpec, Result};
use std::borrow::Cow;
use tracing::instrument;

impl Compiler {
    /// Compile a whole pipeline document
    ///
    /// Groups are emitted one unit below the top-level `steps:` key, in input
    /// order. Environment overrides declared by the pipeline take precedence
    /// over this compiler's environment.
    ///
    /// # Errors
    /// Returns `CompileError::EmptyPipeline` when there are no groups, or
    /// `CompileError::Group` wrapping the first failing group's error.
    #[instrument(level = "debug", skip_all, fields(groups = spec.groups.len()))]
    pub fn compile_pipeline(&self, spec: &PipelineSpec) -> Result<Lines> {
        if spec.groups.is_empty() {
            return Err(CompileError::EmptyPipeline);
        }

        let compiler = if spec.environment.is_empty() {
            Cow::Borrowed(self)
        } else {
            Cow::Owned(Self::new(self.environment().clone().apply(&spec.environment)))
        };

        let mut lines = vec![line(0, "steps:")];
        for (index, group) in spec.groups.iter().enumerate() {
            let block = compiler
                .compile_group(group, 1)
                .map_err(|e| e.in_group(index))?;
            lines.extend(block);
        }

        tracing::debug!(
            steps = spec.step_count(),
            lines = lines.len(),
            "Compiled pipeline"
        );
        Ok(lines)
    }
}

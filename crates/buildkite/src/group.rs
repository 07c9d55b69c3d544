//! Group compilation
//!
//! ```text
//! - group: "<name>"
//!   steps:
//!     <step blocks>
//! ```

use crate::indent::{Lines, line, quote};
use crate::step::Compiler;
use kitegen_ci::{CompileError, GroupSpec, Result, StepSpec};
use tracing::instrument;

impl Compiler {
    /// Compile a bare list of steps at the given level, without a group header
    ///
    /// Steps are emitted in input order. The first failing step aborts
    /// compilation and its error is returned unchanged.
    ///
    /// # Errors
    /// Returns the first step's `CompileError`.
    pub fn compile_steps(&self, steps: &[StepSpec], level: usize) -> Result<Lines> {
        let mut lines = Vec::new();
        for step in steps {
            lines.extend(self.compile_step(step, level)?);
        }
        Ok(lines)
    }

    /// Compile a named group of steps at the given level
    ///
    /// Step blocks sit one unit deeper than the group's `steps:` line.
    ///
    /// # Errors
    /// Returns `CompileError::EmptyGroup` when the group has no steps, or
    /// `CompileError::Step` wrapping the first failing step's error.
    #[instrument(level = "debug", skip(self, spec), fields(group = %spec.name, steps = spec.steps.len()))]
    pub fn compile_group(&self, spec: &GroupSpec, level: usize) -> Result<Lines> {
        if spec.steps.is_empty() {
            return Err(CompileError::empty_group(&spec.name));
        }

        let mut body = Vec::new();
        for (index, step) in spec.steps.iter().enumerate() {
            let block = self
                .compile_step(step, level + 2)
                .map_err(|e| e.in_step(&spec.name, index))?;
            body.extend(block);
        }

        let mut lines = Vec::with_capacity(body.len() + 2);
        lines.push(line(level, &format!("- group: {}", quote(&spec.name))));
        lines.push(line(level + 1, "steps:"));
        lines.extend(body);

        tracing::debug!(lines = lines.len(), "Compiled group");
        Ok(lines)
    }
}

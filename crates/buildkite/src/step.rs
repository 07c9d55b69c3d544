//! Step compilation
//!
//! Turns a single [`StepSpec`] into a Buildkite command step block:
//!
//! ```text
//! - name: "<name>"
//!   command: "<command>"
//!   plugins:
//!     - <execution environment>
//!   timeout_in_minutes: <int>
//!   agents:
//!     queue: "<queue>"
//!   parallelism: <int>        # only when set
//!   retry:                    # only when set
//!     automatic:
//!       - limit: <int>
//! ```

use crate::environment::ExecutionEnvironment;
use crate::indent::{Lines, indent, line, quote};
use kitegen_ci::{CompileError, Result, StepSpec};

/// Compiles steps, groups and pipelines against one execution environment
///
/// The environment's plugin block is rendered once when the compiler is
/// built and reused for every step.
#[derive(Debug, Clone)]
pub struct Compiler {
    environment: ExecutionEnvironment,
    plugin_block: Lines,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(ExecutionEnvironment::default())
    }
}

impl Compiler {
    /// Create a compiler for the given execution environment
    #[must_use]
    pub fn new(environment: ExecutionEnvironment) -> Self {
        let plugin_block = environment.plugin_block();
        Self {
            environment,
            plugin_block,
        }
    }

    /// The execution environment every step runs in
    #[must_use]
    pub const fn environment(&self) -> &ExecutionEnvironment {
        &self.environment
    }

    /// Compile one step at the given nesting level
    ///
    /// # Errors
    /// Returns `CompileError::MissingField` for the first absent required
    /// field (in the order name, command, timeout, queue) and
    /// `CompileError::InvalidField` for zero timeouts or parallelism.
    pub fn compile_step(&self, spec: &StepSpec, level: usize) -> Result<Lines> {
        let name = required_text(spec.name.as_deref(), "name")?;
        let command = required_text(spec.command.as_deref(), "command")?;
        let timeout = match spec.timeout_in_minutes {
            None => return Err(CompileError::missing_field("timeout_in_minutes")),
            Some(0) => {
                return Err(CompileError::invalid_field(
                    "timeout_in_minutes",
                    "must be positive",
                ));
            }
            Some(minutes) => minutes,
        };
        let queue = required_text(spec.agent_queue.as_deref(), "agent_queue")?;
        if spec.parallelism == Some(0) {
            return Err(CompileError::invalid_field("parallelism", "must be positive"));
        }

        let mut lines = Vec::with_capacity(self.plugin_block.len() + 10);
        lines.push(line(level, &format!("- name: {}", quote(name))));
        lines.push(line(level + 1, &format!("command: {}", quote(command))));
        lines.push(line(level + 1, "plugins:"));
        lines.extend(indent(&self.plugin_block, level + 2));
        lines.push(line(level + 1, &format!("timeout_in_minutes: {timeout}")));
        lines.push(line(level + 1, "agents:"));
        lines.push(line(level + 2, &format!("queue: {}", quote(queue))));

        if let Some(parallelism) = spec.parallelism {
            lines.push(line(level + 1, &format!("parallelism: {parallelism}")));
        }

        if let Some(limit) = spec.retry_limit {
            lines.push(line(level + 1, "retry:"));
            lines.push(line(level + 2, "automatic:"));
            lines.push(line(level + 3, &format!("- limit: {limit}")));
        }

        tracing::debug!(
            step = name,
            level,
            parallelism = ?spec.parallelism,
            retry_limit = ?spec.retry_limit,
            "Compiled step"
        );

        Ok(lines)
    }
}

fn required_text<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(CompileError::missing_field(field))
}

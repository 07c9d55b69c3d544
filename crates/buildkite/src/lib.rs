//! Buildkite pipeline compiler for kitegen
//!
//! Compiles terse step definitions into schema-exact Buildkite pipeline YAML.
//! Every compile call takes its nesting level explicitly and returns the
//! emitted lines, so compilation is a pure function of its input.
//!
//! # Example
//!
//! ```
//! use kitegen_buildkite::{compile_group, render};
//! use kitegen_ci::{GroupSpec, StepSpec};
//!
//! let group = GroupSpec::new(
//!     "stable",
//!     vec![
//!         StepSpec::new("partitions", "ci/stable/run-partition.sh", 30, "solana")
//!             .with_parallelism(2)
//!             .with_retry_limit(3),
//!         StepSpec::new("localnet", "ci/stable/run-localnet.sh", 30, "solana"),
//!     ],
//! );
//!
//! let lines = compile_group(&group, 0)?;
//! assert_eq!(lines[0], "- group: \"stable\"");
//! print!("{}", render(&lines));
//! # Ok::<(), kitegen_ci::CompileError>(())
//! ```
//!
//! # Field Mapping
//!
//! | Step field | Buildkite YAML |
//! |------------|----------------|
//! | `name` | `name` |
//! | `command` | `command` |
//! | `timeout_in_minutes` | `timeout_in_minutes` |
//! | `agent_queue` | `agents: { queue }` |
//! | `parallelism` | `parallelism` (omitted when unset) |
//! | `retry_limit` | `retry.automatic[0].limit` (omitted when unset) |

pub mod emitter;
pub mod environment;
pub mod group;
pub mod indent;
pub mod pipeline;
pub mod step;

pub use emitter::BuildkiteEmitter;
pub use environment::{DEFAULT_ENVIRONMENT, ExecutionEnvironment, PROPAGATED_ENV};
pub use indent::{INDENT_UNIT, Lines, indent, quote, render};
pub use step::Compiler;

use kitegen_ci::{GroupSpec, PipelineSpec, Result, StepSpec};
use std::sync::OnceLock;

fn default_compiler() -> &'static Compiler {
    static COMPILER: OnceLock<Compiler> = OnceLock::new();
    COMPILER.get_or_init(Compiler::default)
}

/// Compile one step with the default execution environment
///
/// # Errors
/// See [`Compiler::compile_step`].
pub fn compile_step(spec: &StepSpec, level: usize) -> Result<Lines> {
    default_compiler().compile_step(spec, level)
}

/// Compile a bare list of steps with the default execution environment
///
/// # Errors
/// See [`Compiler::compile_steps`].
pub fn compile_steps(steps: &[StepSpec], level: usize) -> Result<Lines> {
    default_compiler().compile_steps(steps, level)
}

/// Compile a group with the default execution environment
///
/// # Errors
/// See [`Compiler::compile_group`].
pub fn compile_group(spec: &GroupSpec, level: usize) -> Result<Lines> {
    default_compiler().compile_group(spec, level)
}

/// Compile a whole pipeline with the default execution environment
///
/// # Errors
/// See [`Compiler::compile_pipeline`].
pub fn compile_pipeline(spec: &PipelineSpec) -> Result<Lines> {
    default_compiler().compile_pipeline(spec)
}

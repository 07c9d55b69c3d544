//! Pipeline input model
//!
//! Plain data describing what to emit. Values are constructed by callers in
//! code or deserialized from a definition file; the compiler never mutates
//! them.

use serde::{Deserialize, Serialize};

/// One schedulable unit of CI work
///
/// Required fields are optional at the type level so that definition files
/// missing them still deserialize; compiling a step is what rejects absence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StepSpec {
    /// Step name, unique within its group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Shell invocation run by the agent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Job timeout in minutes (must be positive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_in_minutes: Option<u32>,

    /// Agent queue the job is scheduled on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_queue: Option<String>,

    /// Number of parallel shards; `None` runs a single job
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<u32>,

    /// Automatic retry limit; `None` disables retries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_limit: Option<u32>,
}

impl StepSpec {
    /// Create a step with all required fields set
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        command: impl Into<String>,
        timeout_in_minutes: u32,
        agent_queue: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            command: Some(command.into()),
            timeout_in_minutes: Some(timeout_in_minutes),
            agent_queue: Some(agent_queue.into()),
            parallelism: None,
            retry_limit: None,
        }
    }

    /// Shard this step across `parallelism` jobs
    #[must_use]
    pub const fn with_parallelism(mut self, parallelism: u32) -> Self {
        self.parallelism = Some(parallelism);
        self
    }

    /// Retry this step automatically up to `limit` times
    #[must_use]
    pub const fn with_retry_limit(mut self, limit: u32) -> Self {
        self.retry_limit = Some(limit);
        self
    }

    /// Name used in logs and diagnostics, even when the name is missing
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or("<unnamed>")
    }
}

/// A named, ordered collection of steps emitted under one header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupSpec {
    /// Group label
    pub name: String,

    /// Steps in emission order
    #[serde(default)]
    pub steps: Vec<StepSpec>,
}

impl GroupSpec {
    /// Create a group from a name and its steps
    #[must_use]
    pub fn new(name: impl Into<String>, steps: Vec<StepSpec>) -> Self {
        Self {
            name: name.into(),
            steps,
        }
    }
}

/// Per-pipeline overrides of the execution environment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentOverride {
    /// Container image replacing the default one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl EnvironmentOverride {
    /// Whether this override changes nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.image.is_none()
    }
}

/// A complete pipeline: every group emitted under the top-level `steps:` key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineSpec {
    /// Environment overrides applied to every step
    #[serde(default, skip_serializing_if = "EnvironmentOverride::is_empty")]
    pub environment: EnvironmentOverride,

    /// Groups in emission order
    #[serde(default)]
    pub groups: Vec<GroupSpec>,
}

impl PipelineSpec {
    /// Create a pipeline from its groups
    #[must_use]
    pub fn new(groups: Vec<GroupSpec>) -> Self {
        Self {
            environment: EnvironmentOverride::default(),
            groups,
        }
    }

    /// Total number of steps across all groups
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.groups.iter().map(|g| g.steps.len()).sum()
    }
}

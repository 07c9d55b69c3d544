//! Execution environment table
//!
//! Every step runs inside the same container, described by the Buildkite
//! docker plugin. The table is a constant so step compilation never has to
//! know where the values come from; a future schema version only needs a new
//! table.

use crate::indent::{Lines, line, quote};
use kitegen_ci::EnvironmentOverride;
use std::borrow::Cow;

/// Environment variables forwarded from the agent into the container
pub const PROPAGATED_ENV: &[&str] = &[
    "BUILDKITE",
    "BUILDKITE_AGENT_ACCESS_TOKEN",
    "BUILDKITE_BRANCH",
    "BUILDKITE_BUILD_ID",
    "BUILDKITE_BUILD_NUMBER",
    "BUILDKITE_COMMIT",
    "BUILDKITE_JOB_ID",
    "BUILDKITE_PARALLEL_JOB",
    "BUILDKITE_PARALLEL_JOB_COUNT",
    "BUILDKITE_PULL_REQUEST",
    "BUILDKITE_RETRY_COUNT",
    "BUILDKITE_TAG",
    "CI",
    "CI_BASE_BRANCH",
    "CI_BRANCH",
    "CI_BUILD_ID",
    "CI_COMMIT",
    "CI_JOB_ID",
    "CI_PULL_REQUEST",
    "CI_REPO_SLUG",
    "CODECOV_TOKEN",
    "RUST_BACKTRACE",
    "SCCACHE_BUCKET",
    "SCCACHE_REGION",
];

/// Container and runtime every emitted step runs in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionEnvironment {
    /// Buildkite plugin reference, including its version
    pub plugin: Cow<'static, str>,
    /// Container image
    pub image: Cow<'static, str>,
    /// Working directory inside the container
    pub workdir: Cow<'static, str>,
    /// Run the container as the agent's uid/gid
    pub propagate_uid_gid: bool,
    /// Variable names forwarded verbatim from the agent
    pub propagated_env: &'static [&'static str],
}

/// The environment used when no override is given
pub const DEFAULT_ENVIRONMENT: ExecutionEnvironment = ExecutionEnvironment {
    plugin: Cow::Borrowed("docker#v5.12.0"),
    image: Cow::Borrowed("anzaxyz/ci:rust_1.84.1_nightly-2025-01-29"),
    workdir: Cow::Borrowed("/solana"),
    propagate_uid_gid: true,
    propagated_env: PROPAGATED_ENV,
};

impl Default for ExecutionEnvironment {
    fn default() -> Self {
        DEFAULT_ENVIRONMENT
    }
}

impl ExecutionEnvironment {
    /// Replace the container image
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Cow::Owned(image.into());
        self
    }

    /// Apply the overrides declared by a pipeline definition
    #[must_use]
    pub fn apply(self, overrides: &EnvironmentOverride) -> Self {
        match &overrides.image {
            Some(image) => self.with_image(image.clone()),
            None => self,
        }
    }

    /// The `plugins:` list entry, rooted at level 0
    ///
    /// ```text
    /// - docker#v5.12.0:
    ///     image: "..."
    ///     workdir: "..."
    ///     propagate-uid-gid: true
    ///     environment:
    ///       - "BUILDKITE"
    /// ```
    #[must_use]
    pub fn plugin_block(&self) -> Lines {
        let mut lines = Vec::with_capacity(self.propagated_env.len() + 5);
        lines.push(line(0, &format!("- {}:", self.plugin)));
        lines.push(line(2, &format!("image: {}", quote(&self.image))));
        lines.push(line(2, &format!("workdir: {}", quote(&self.workdir))));
        if self.propagate_uid_gid {
            lines.push(line(2, "propagate-uid-gid: true"));
        }
        if !self.propagated_env.is_empty() {
            lines.push(line(2, "environment:"));
            for name in self.propagated_env {
                lines.push(line(3, &format!("- {}", quote(name))));
            }
        }
        lines
    }
}

// src/tree/options.rs
// =============================================================================
// Knobs for a tree build: which names to skip, what to do when one directory
// cannot be listed, and how many listing requests may be in flight at once.
// =============================================================================

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONCURRENCY: usize = 8;

/// How a failed subdirectory listing affects the whole build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Abort the build and return the error
    #[default]
    Strict,
    /// Drop the failed subtree, record it, keep the rest
    Lenient,
}

/// Denylist of entry names skipped during traversal.
///
/// Matching is on the exact entry name at any depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionPolicy {
    names: Vec<String>,
}

impl Default for ExclusionPolicy {
    fn default() -> Self {
        ExclusionPolicy::new(["node_modules"])
    }
}

impl ExclusionPolicy {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ExclusionPolicy {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// A policy that keeps everything.
    pub fn none() -> Self {
        ExclusionPolicy { names: Vec::new() }
    }

    pub fn with(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.names.contains(&name) {
            self.names.push(name);
        }
        self
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    pub exclude: ExclusionPolicy,
    pub failure: FailurePolicy,
    /// Maximum listing requests in flight across the whole build
    pub concurrency: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            exclude: ExclusionPolicy::default(),
            failure: FailurePolicy::Strict,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

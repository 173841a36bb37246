// src/tree/entry.rs
// =============================================================================
// The in-memory tree produced by TreeBuilder.
//
// A TreeSnapshot is built in one call and never modified afterwards; loading
// another branch or repository produces a brand new snapshot.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, FetchError};
use crate::github::RepoRef;

/// One node of the reconstructed hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// Last path segment, used as the display label
    pub name: String,
    /// Full path from the repository root; unique within a snapshot
    pub path: String,
    #[serde(flatten)]
    pub kind: EntryKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntryKind {
    /// Children in remote listing order
    Directory { children: Vec<TreeEntry> },
    /// `download_ref` fetches the raw bytes without going through the
    /// contents endpoint again
    File {
        #[serde(skip_serializing_if = "Option::is_none", default)]
        download_ref: Option<String>,
    },
}

impl TreeEntry {
    pub fn directory(name: impl Into<String>, path: impl Into<String>, children: Vec<TreeEntry>) -> Self {
        TreeEntry {
            name: name.into(),
            path: path.into(),
            kind: EntryKind::Directory { children },
        }
    }

    pub fn file(name: impl Into<String>, path: impl Into<String>, download_ref: Option<String>) -> Self {
        TreeEntry {
            name: name.into(),
            path: path.into(),
            kind: EntryKind::File { download_ref },
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, EntryKind::Directory { .. })
    }

    /// Children of a directory; empty for files.
    pub fn children(&self) -> &[TreeEntry] {
        match &self.kind {
            EntryKind::Directory { children } => children,
            EntryKind::File { .. } => &[],
        }
    }

    pub fn download_ref(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::File { download_ref } => download_ref.as_deref(),
            EntryKind::Directory { .. } => None,
        }
    }
}

/// A subtree left out of a lenient build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtreeFailure {
    pub path: String,
    pub kind: ErrorKind,
    pub message: String,
}

impl SubtreeFailure {
    pub fn new(path: impl Into<String>, error: &FetchError) -> Self {
        SubtreeFailure {
            path: path.into(),
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// The result of one tree build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    pub repo: RepoRef,
    /// Path the build started from; empty for the repository root
    pub root: String,
    pub entries: Vec<TreeEntry>,
    /// Always empty under the strict failure policy
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<SubtreeFailure>,
}

impl TreeSnapshot {
    /// Visits every entry depth-first in listing order, with its depth
    /// (0 for top-level entries).
    pub fn visit<F: FnMut(&TreeEntry, usize)>(&self, mut f: F) {
        fn walk<F: FnMut(&TreeEntry, usize)>(entries: &[TreeEntry], depth: usize, f: &mut F) {
            for entry in entries {
                f(entry, depth);
                walk(entry.children(), depth + 1, f);
            }
        }
        walk(&self.entries, 0, &mut f);
    }

    pub fn find(&self, path: &str) -> Option<&TreeEntry> {
        let mut level = self.entries.as_slice();
        loop {
            let next = level
                .iter()
                .find(|e| e.path == path || path.starts_with(&format!("{}/", e.path)))?;
            if next.path == path {
                return Some(next);
            }
            level = next.children();
        }
    }

    pub fn file_count(&self) -> usize {
        let mut count = 0;
        self.visit(|e, _| {
            if !e.is_dir() {
                count += 1;
            }
        });
        count
    }

    pub fn dir_count(&self) -> usize {
        let mut count = 0;
        self.visit(|e, _| {
            if e.is_dir() {
                count += 1;
            }
        });
        count
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

// src/tree/session.rs
// =============================================================================
// Holds the tree for the current (owner, repo, branch) selection.
//
// Every build is tagged with a generation number handed out by `begin`.
// Starting a new build bumps the generation and drops the old tree; a build
// that finishes after it has been superseded is discarded instead of being
// installed, so a slow request for an old selection can never overwrite the
// tree of the new one.
// =============================================================================

use std::sync::{Arc, Mutex, MutexGuard};

use log::debug;

use super::builder::TreeBuilder;
use super::entry::TreeSnapshot;
use crate::error::Result;
use crate::github::{ContentsApi, RepoRef};

/// Identifies one in-flight build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTicket {
    pub generation: u64,
    pub repo: RepoRef,
}

#[derive(Debug, Default)]
struct State {
    generation: u64,
    selection: Option<RepoRef>,
    current: Option<Arc<TreeSnapshot>>,
}

#[derive(Debug, Default)]
pub struct TreeSession {
    state: Mutex<State>,
}

impl TreeSession {
    pub fn new() -> Self {
        TreeSession::default()
    }

    // State is replaced wholesale under the lock, so a poisoned guard is still valid
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Starts a build for `repo`, superseding any build in flight.
    pub fn begin(&self, repo: RepoRef) -> BuildTicket {
        let mut state = self.lock();
        state.generation += 1;
        state.selection = Some(repo.clone());
        state.current = None;
        BuildTicket {
            generation: state.generation,
            repo,
        }
    }

    pub fn is_current(&self, ticket: &BuildTicket) -> bool {
        self.lock().generation == ticket.generation
    }

    /// Installs `snapshot` if `ticket` is still the latest build.
    ///
    /// Returns `None` when the result is stale and was dropped.
    pub fn commit(&self, ticket: &BuildTicket, snapshot: TreeSnapshot) -> Option<Arc<TreeSnapshot>> {
        let mut state = self.lock();
        if state.generation != ticket.generation {
            debug!(
                "discarding stale tree for {} (generation {}, current {})",
                ticket.repo, ticket.generation, state.generation
            );
            return None;
        }

        let snapshot = Arc::new(snapshot);
        state.current = Some(Arc::clone(&snapshot));
        Some(snapshot)
    }

    pub fn current(&self) -> Option<Arc<TreeSnapshot>> {
        self.lock().current.clone()
    }

    pub fn selection(&self) -> Option<RepoRef> {
        self.lock().selection.clone()
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Begins, runs and commits a build in one call.
    ///
    /// `Ok(None)` means the build was superseded while running; its result
    /// (or its error) was thrown away.
    pub async fn load<A: ContentsApi>(
        &self,
        builder: &TreeBuilder<A>,
        repo: RepoRef,
        root: &str,
    ) -> Result<Option<Arc<TreeSnapshot>>> {
        let ticket = self.begin(repo);

        match builder.build_tree(&ticket.repo, root).await {
            Ok(snapshot) => Ok(self.commit(&ticket, snapshot)),
            Err(e) if !self.is_current(&ticket) => {
                debug!("ignoring error from superseded build of {}: {}", ticket.repo, e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::github::fake::{file, FakeApi};
    use crate::tree::options::BuildOptions;

    fn snapshot_for(repo: &RepoRef) -> TreeSnapshot {
        TreeSnapshot {
            repo: repo.clone(),
            root: String::new(),
            entries: vec![],
            failures: vec![],
        }
    }

    #[test]
    fn test_stale_commit_is_discarded() {
        let session = TreeSession::new();
        let s1 = RepoRef::new("o", "r", "main");
        let s2 = RepoRef::new("o", "r", "dev");

        let t1 = session.begin(s1.clone());
        let t2 = session.begin(s2.clone());
        assert!(!session.is_current(&t1));

        let installed = session.commit(&t2, snapshot_for(&s2)).unwrap();
        assert_eq!(installed.repo, s2);

        assert!(session.commit(&t1, snapshot_for(&s1)).is_none());
        assert_eq!(session.current().unwrap().repo, s2);
        assert_eq!(session.selection(), Some(s2));
        assert_eq!(session.generation(), 2);
    }

    #[test]
    fn test_begin_drops_previous_tree() {
        let session = TreeSession::new();
        let s1 = RepoRef::new("o", "r", "main");
        let t1 = session.begin(s1.clone());
        session.commit(&t1, snapshot_for(&s1)).unwrap();
        assert!(session.current().is_some());

        session.begin(RepoRef::new("o", "other", "main"));
        assert!(session.current().is_none());
    }

    #[tokio::test]
    async fn test_superseded_load_does_not_touch_new_selection() {
        let slow = TreeBuilder::new(
            Arc::new(FakeApi::new().with_dir("", vec![file("old.txt")]).with_delay("", 50)),
            BuildOptions::default(),
        );
        let fast = TreeBuilder::new(
            Arc::new(FakeApi::new().with_dir("", vec![file("new.txt")])),
            BuildOptions::default(),
        );
        let session = TreeSession::new();
        let s1 = RepoRef::new("o", "r", "main");
        let s2 = RepoRef::new("o", "r", "dev");

        let (old, new) = tokio::join!(
            session.load(&slow, s1, ""),
            session.load(&fast, s2.clone(), "")
        );

        assert!(old.unwrap().is_none());
        assert_eq!(new.unwrap().unwrap().repo, s2);

        let current = session.current().unwrap();
        assert_eq!(current.repo, s2);
        assert_eq!(current.entries[0].name, "new.txt");
    }

    #[tokio::test]
    async fn test_superseded_error_is_swallowed() {
        let failing = TreeBuilder::new(
            Arc::new(FakeApi::new().with_failure("", ErrorKind::NetworkFailure).with_delay("", 30)),
            BuildOptions::default(),
        );
        let ok = TreeBuilder::new(
            Arc::new(FakeApi::new().with_dir("", vec![])),
            BuildOptions::default(),
        );
        let session = TreeSession::new();

        let (old, new) = tokio::join!(
            session.load(&failing, RepoRef::new("o", "r", "a"), ""),
            session.load(&ok, RepoRef::new("o", "r", "b"), "")
        );
        assert!(matches!(old, Ok(None)));
        assert!(new.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_current_build_error_is_returned() {
        let failing = TreeBuilder::new(
            Arc::new(FakeApi::new().with_failure("", ErrorKind::NotFound)),
            BuildOptions::default(),
        );
        let session = TreeSession::new();
        let result = session.load(&failing, RepoRef::new("o", "r", "main"), "").await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
        assert!(session.current().is_none());
    }
}

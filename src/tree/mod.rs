// src/tree/mod.rs
// =============================================================================
// Repository tree reconstruction.
//
// Submodules:
// - entry: TreeEntry / TreeSnapshot, the immutable result of a build
// - options: exclusion denylist, failure policy, fan-out limit
// - builder: the concurrent recursive walk over the contents API
// - session: generation-tagged holder of the current snapshot
// =============================================================================

mod builder;
mod entry;
mod options;
mod session;

pub use builder::TreeBuilder;
pub use entry::{EntryKind, SubtreeFailure, TreeEntry, TreeSnapshot};
pub use options::{BuildOptions, ExclusionPolicy, FailurePolicy, DEFAULT_CONCURRENCY};
pub use session::{BuildTicket, TreeSession};

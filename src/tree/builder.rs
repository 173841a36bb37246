// src/tree/builder.rs
// =============================================================================
// Rebuilds a repository's hierarchy from a directory-at-a-time API.
//
// How it works:
// 1. List the starting directory
// 2. Drop entries whose name is on the exclusion denylist
// 3. Files become leaves, directories recurse
// 4. All sibling recursions of one directory run concurrently and are joined
//    in listing order, so wall-clock time follows the depth of the tree
//    rather than its size
//
// A semaphore caps the listing requests in flight across the whole build.
// It is held only while a request is outstanding, never while waiting on
// children, so nested directories cannot starve each other.
// =============================================================================

use std::sync::Arc;

use futures::future::{join_all, try_join_all, BoxFuture, FutureExt};
use log::{debug, info, warn};
use tokio::sync::Semaphore;

use super::entry::{SubtreeFailure, TreeEntry, TreeSnapshot};
use super::options::{BuildOptions, FailurePolicy};
use crate::error::{FetchError, Result};
use crate::github::{ContentItem, ContentsApi, ItemKind, RepoRef};

// Entries of one directory plus the subtrees a lenient build dropped below it
type Level = (Vec<TreeEntry>, Vec<SubtreeFailure>);

struct BuildContext<'a> {
    repo: &'a RepoRef,
    limiter: Semaphore,
}

pub struct TreeBuilder<A> {
    api: Arc<A>,
    options: BuildOptions,
}

impl<A: ContentsApi> TreeBuilder<A> {
    pub fn new(api: Arc<A>, options: BuildOptions) -> Self {
        TreeBuilder { api, options }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Builds the tree below `root` (empty string for the repository root).
    ///
    /// Fails if `root` itself cannot be listed, under either failure policy,
    /// so an error is never confused with an empty directory.
    pub async fn build_tree(&self, repo: &RepoRef, root: &str) -> Result<TreeSnapshot> {
        let root = root.trim_matches('/').to_string();
        let ctx = BuildContext {
            repo,
            limiter: Semaphore::new(self.options.concurrency.max(1)),
        };

        info!("building tree for {} from '{}'", repo, root);
        let (entries, failures) = self.build_dir(&ctx, root.clone()).await?;

        let snapshot = TreeSnapshot {
            repo: repo.clone(),
            root,
            entries,
            failures,
        };
        info!(
            "tree for {} ready: {} directories, {} files, {} skipped subtrees",
            repo,
            snapshot.dir_count(),
            snapshot.file_count(),
            snapshot.failures.len()
        );
        Ok(snapshot)
    }

    fn build_dir<'a>(&'a self, ctx: &'a BuildContext<'a>, path: String) -> BoxFuture<'a, Result<Level>> {
        async move {
            let items = {
                let _permit = ctx.limiter.acquire().await;
                self.api.list_dir(ctx.repo, &path).await?
            };
            check_listing(&path, &items)?;

            let items: Vec<ContentItem> = items
                .into_iter()
                .filter(|item| {
                    let excluded = self.options.exclude.is_excluded(&item.name);
                    if excluded {
                        debug!("skipping excluded entry {}", item.path);
                    }
                    !excluded
                })
                .collect();

            let paths: Vec<String> = items.iter().map(|item| item.path.clone()).collect();
            let children = items.into_iter().map(|item| self.build_item(ctx, item));

            let mut entries = Vec::with_capacity(paths.len());
            let mut failures = Vec::new();

            match self.options.failure {
                FailurePolicy::Strict => {
                    // Fails fast: the first error drops the other pending siblings
                    for (entry, nested) in try_join_all(children).await? {
                        entries.push(entry);
                        failures.extend(nested);
                    }
                }
                FailurePolicy::Lenient => {
                    for (path, result) in paths.into_iter().zip(join_all(children).await) {
                        match result {
                            Ok((entry, nested)) => {
                                entries.push(entry);
                                failures.extend(nested);
                            }
                            Err(e) => {
                                warn!("omitting {} from the tree: {}", path, e);
                                failures.push(SubtreeFailure::new(path, &e));
                            }
                        }
                    }
                }
            }

            Ok((entries, failures))
        }
        .boxed()
    }

    async fn build_item<'a>(&'a self, ctx: &'a BuildContext<'a>, item: ContentItem) -> Result<(TreeEntry, Vec<SubtreeFailure>)> {
        match item.kind {
            ItemKind::Dir => {
                let (children, failures) = self.build_dir(ctx, item.path.clone()).await?;
                Ok((TreeEntry::directory(item.name, item.path, children), failures))
            }
            // Symlinks and submodules are shown as leaves, like files
            ItemKind::File | ItemKind::Symlink | ItemKind::Submodule => Ok((
                TreeEntry::file(item.name, item.path, item.download_url),
                Vec::new(),
            )),
        }
    }
}

// Every child path must extend its parent's path by at least one segment
fn check_listing(parent: &str, items: &[ContentItem]) -> Result<()> {
    let prefix = if parent.is_empty() {
        String::new()
    } else {
        format!("{}/", parent)
    };

    for item in items {
        let valid = item.path.len() > prefix.len() && item.path.starts_with(&prefix);
        if !valid {
            return Err(FetchError::encoding(
                parent,
                format!("listing returned '{}' which is not below '{}'", item.path, parent),
            ));
        }
    }
    Ok(())
}

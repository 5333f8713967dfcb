//! Local inventory: every regular file below the local root
//!
//! Traversal uses an explicit worklist of pending directories and a cursor
//! rather than recursion, so depth never grows the call stack.
//! Symlinks to files are inventoried with their target's metadata;
//! symlinked directories are only traversed when `follow_symlinks` is set.


use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::fs;

use crate::config::PatternMatcher;
use crate::error::{Result, SyncError};
use crate::inventory::{FileDescriptor, Inventory};

/// A directory waiting to be read
#[derive(Debug)]
struct PendingDir {
    path: PathBuf,
    identity_prefix: String,
}

/// Local directory scanner
pub struct Scanner<'a> {
    matcher: &'a PatternMatcher,
    follow_symlinks: bool,
}

impl<'a> Scanner<'a> {
    /// Create a scanner filtering through `matcher`
    #[must_use]
    pub const fn new(matcher: &'a PatternMatcher, follow_symlinks: bool) -> Self {
        Self {
            matcher,
            follow_symlinks,
        }
    }

    /// Build the inventory of `root`.
    ///
    /// # Errors
    ///
    /// Returns a filesystem error if the root or any descendant cannot be
    /// read; no partial inventory is returned.
    pub async fn scan(&self, root: &Path) -> Result<Inventory> {
        let root_meta = fs::metadata(root)
            .await
            .map_err(|e| SyncError::filesystem("Failed to read local directory", root, e))?;
        if !root_meta.is_dir() {
            return Err(SyncError::local("Local root is not a directory", root));
        }

        let mut inventory = Inventory::new();
        let mut pending = vec![PendingDir {
            path: root.to_path_buf(),
            identity_prefix: String::new(),
        }];
        let mut followed: HashSet<PathBuf> = HashSet::new();
        let mut cursor = 0;

        while cursor < pending.len() {
            let dir = pending[cursor].path.clone();
            let prefix = pending[cursor].identity_prefix.clone();
            cursor += 1;

            let mut entries = fs::read_dir(&dir)
                .await
                .map_err(|e| SyncError::filesystem("Failed to read directory", &dir, e))?;

            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| SyncError::filesystem("Failed to read directory", &dir, e))?
            {
                let path = entry.path();
                let identity_path = Self::identity_path(&prefix, &path)?;
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| SyncError::filesystem("Failed to read file type", &path, e))?;

                if file_type.is_dir() {
                    pending.push(PendingDir {
                        path,
                        identity_prefix: identity_path,
                    });
                    continue;
                }

                // Follows symlinks; a dangling link fails here
                let metadata = fs::metadata(&path)
                    .await
                    .map_err(|e| SyncError::filesystem("Failed to read metadata", &path, e))?;

                if metadata.is_dir() {
                    if let Some(target) = self
                        .follow_directory_link(&dir, &path, &mut followed)
                        .await?
                    {
                        pending.push(PendingDir {
                            path: target,
                            identity_prefix: identity_path,
                        });
                    }
                    continue;
                }

                if !metadata.is_file() {
                    tracing::debug!(path = %path.display(), "skipping special file");
                    continue;
                }

                if !self.matcher.should_include(&identity_path) {
                    tracing::debug!(identity_path = %identity_path, "ignored local file");
                    continue;
                }

                let modified = metadata.modified().map_err(|e| {
                    SyncError::filesystem("Failed to get modification time", &path, e)
                })?;

                inventory.push(FileDescriptor::local(
                    identity_path,
                    path,
                    DateTime::<Utc>::from(modified),
                ));
            }
        }

        tracing::info!(
            files = inventory.len(),
            root = %root.display(),
            "collected local inventory"
        );
        Ok(inventory)
    }

    /// Decide whether a symlinked directory is traversed; returns its
    /// canonical target when it is
    async fn follow_directory_link(
        &self,
        parent: &Path,
        link: &Path,
        followed: &mut HashSet<PathBuf>,
    ) -> Result<Option<PathBuf>> {
        if !self.follow_symlinks {
            tracing::warn!(path = %link.display(), "skipping symlinked directory");
            return Ok(None);
        }

        let target = fs::canonicalize(link)
            .await
            .map_err(|e| SyncError::filesystem("Failed to resolve symlink", link, e))?;
        let parent = fs::canonicalize(parent)
            .await
            .map_err(|e| SyncError::filesystem("Failed to resolve directory", parent, e))?;

        if parent.starts_with(&target) {
            tracing::warn!(path = %link.display(), "skipping symlink loop");
            return Ok(None);
        }

        if !followed.insert(target.clone()) {
            tracing::warn!(path = %link.display(), "symlinked directory already traversed");
            return Ok(None);
        }

        Ok(Some(target))
    }

    fn identity_path(prefix: &str, path: &Path) -> Result<String> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| SyncError::local("File name is not valid UTF-8", path))?;

        Ok(if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}/{name}")
        })
    }
}

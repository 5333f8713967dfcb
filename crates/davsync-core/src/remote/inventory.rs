//! Remote inventory: the file set currently on the server

use chrono::{DateTime, Utc};

use super::path::strip_root;
use super::{EntryKind, RemoteStore};
use crate::config::PatternMatcher;
use crate::error::{Result, SyncError};
use crate::inventory::{FileDescriptor, Inventory};

/// Builds an [`Inventory`] from a recursive remote listing
pub struct RemoteInventory<'a> {
    matcher: &'a PatternMatcher,
}

impl<'a> RemoteInventory<'a> {
    /// Remote inventory that drops paths the matcher excludes
    #[must_use]
    pub const fn new(matcher: &'a PatternMatcher) -> Self {
        Self { matcher }
    }

    /// List every file below `root`.
    ///
    /// A root that does not exist yet yields an empty inventory; the
    /// executor creates it before uploading anything.
    ///
    /// # Errors
    ///
    /// Returns a protocol error if the listing fails, an entry lies outside
    /// `root`, or a last-modified value cannot be parsed.
    pub async fn collect<S>(&self, store: &S, root: &str) -> Result<Inventory>
    where
        S: RemoteStore + ?Sized,
    {
        if !store.exists(root).await? {
            tracing::info!(root, "remote root does not exist yet");
            return Ok(Inventory::new());
        }

        let mut inventory = Inventory::new();
        for entry in store.list_recursive(root).await? {
            if entry.kind != EntryKind::File {
                continue;
            }

            let identity_path = strip_root(root, &entry.full_path).ok_or_else(|| {
                SyncError::protocol(format!(
                    "Listed file {} is outside of {root}",
                    entry.full_path
                ))
            })?;

            if !self.matcher.should_include(identity_path) {
                tracing::debug!(identity_path, "ignored remote file");
                continue;
            }

            let modified_at = parse_last_modified(&entry.last_modified).ok_or_else(|| {
                SyncError::protocol(format!(
                    "Invalid last-modified value '{}' for {}",
                    entry.last_modified, entry.full_path
                ))
            })?;

            inventory.push(FileDescriptor::remote(
                identity_path,
                entry.full_path.clone(),
                modified_at,
            ));
        }

        tracing::info!(files = inventory.len(), root, "collected remote inventory");
        Ok(inventory)
    }
}

/// Parse an HTTP date (`Tue, 15 Nov 1994 08:12:31 GMT`), falling back to RFC 3339
#[must_use]
pub fn parse_last_modified(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .map(|t| t.with_timezone(&Utc))
        .ok()
}

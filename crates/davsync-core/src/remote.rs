//! Remote store contract and its WebDAV implementation
//!
//! The engine only ever talks to the remote side through [`RemoteStore`],
//! one awaited call at a time.

mod inventory;
mod multistatus;
pub mod path;
mod webdav;

#[cfg(test)]
pub(crate) mod memory;

use async_trait::async_trait;
use tokio::io::AsyncRead;

pub use inventory::RemoteInventory;
pub use webdav::WebDavStore;

use crate::error::Result;

/// Streamed file content handed to [`RemoteStore::put_file`]
pub type ContentStream = Box<dyn AsyncRead + Send + Sync + Unpin>;

/// Kind of a listed remote entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Terminal file
    File,
    /// Collection
    Directory,
}

/// One entry of a recursive remote listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    /// Full remote path
    pub full_path: String,
    /// File or directory
    pub kind: EntryKind,
    /// Last-modified value exactly as the store reported it
    pub last_modified: String,
}

/// Capabilities the sync engine needs from a remote file store
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Whether anything exists at `path`
    async fn exists(&self, path: &str) -> Result<bool>;

    /// Create a directory; the parent must already exist
    async fn create_directory(&self, path: &str) -> Result<()>;

    /// List every entry below `root`, at any depth
    async fn list_recursive(&self, root: &str) -> Result<Vec<RemoteEntry>>;

    /// Upload `content` to `path`.
    ///
    /// With `overwrite` unset, an existing target fails with
    /// [`SyncError::UnexpectedRemoteState`](crate::error::SyncError::UnexpectedRemoteState).
    async fn put_file(&self, path: &str, content: ContentStream, overwrite: bool) -> Result<()>;

    /// Delete the file at `path`
    async fn delete_file(&self, path: &str) -> Result<()>;
}

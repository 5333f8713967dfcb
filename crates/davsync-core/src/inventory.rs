use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

/// Where the content of a file lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    /// Absolute path on the local filesystem
    Local(PathBuf),
    /// Full path on the remote store
    Remote(String),
}

/// A single file in an inventory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// `/`-separated path relative to the synchronization root; the sole
    /// key used to match local and remote files
    pub identity_path: String,
    /// Location used for I/O, never for matching
    pub storage_location: StorageLocation,
    /// Last modification time
    pub modified_at: DateTime<Utc>,
}

impl FileDescriptor {
    /// Descriptor for a file on the local filesystem
    pub fn local(
        identity_path: impl Into<String>,
        path: impl Into<PathBuf>,
        modified_at: DateTime<Utc>,
    ) -> Self {
        Self {
            identity_path: identity_path.into(),
            storage_location: StorageLocation::Local(path.into()),
            modified_at,
        }
    }

    /// Descriptor for a file on the remote store
    pub fn remote(
        identity_path: impl Into<String>,
        path: impl Into<String>,
        modified_at: DateTime<Utc>,
    ) -> Self {
        Self {
            identity_path: identity_path.into(),
            storage_location: StorageLocation::Remote(path.into()),
            modified_at,
        }
    }

    /// Local path, if this describes a local file
    #[must_use]
    pub fn local_path(&self) -> Option<&Path> {
        match &self.storage_location {
            StorageLocation::Local(p) => Some(p),
            StorageLocation::Remote(_) => None,
        }
    }

    /// Remote path, if this describes a remote file
    #[must_use]
    pub fn remote_path(&self) -> Option<&str> {
        match &self.storage_location {
            StorageLocation::Remote(p) => Some(p),
            StorageLocation::Local(_) => None,
        }
    }
}

/// Unordered collection of file descriptors.
///
/// Identity paths are expected to be unique; the reconciler checks this
/// rather than the collection itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    files: Vec<FileDescriptor>,
}

impl Inventory {
    /// Create an empty inventory
    #[must_use]
    pub const fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Add a descriptor
    pub fn push(&mut self, file: FileDescriptor) {
        self.files.push(file);
    }

    /// Number of files
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the inventory holds no files
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate over the descriptors
    pub fn iter(&self) -> std::slice::Iter<'_, FileDescriptor> {
        self.files.iter()
    }

    /// Look up a descriptor by identity path (linear)
    #[must_use]
    pub fn get(&self, identity_path: &str) -> Option<&FileDescriptor> {
        self.files.iter().find(|f| f.identity_path == identity_path)
    }
}

impl FromIterator<FileDescriptor> for Inventory {
    fn from_iter<I: IntoIterator<Item = FileDescriptor>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Inventory {
    type Item = FileDescriptor;
    type IntoIter = std::vec::IntoIter<FileDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

impl<'a> IntoIterator for &'a Inventory {
    type Item = &'a FileDescriptor;
    type IntoIter = std::slice::Iter<'a, FileDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

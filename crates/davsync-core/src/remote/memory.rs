//! In-memory [`RemoteStore`] that records every call, for tests

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::io::AsyncReadExt;

use super::path::strip_root;
use super::{ContentStream, EntryKind, RemoteEntry, RemoteStore};
use crate::error::{Result, SyncError};

/// A call made against the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreCall {
    Exists(String),
    CreateDirectory(String),
    List(String),
    Put { path: String, overwrite: bool },
    Delete(String),
}

impl StoreCall {
    /// Whether the call changes the store
    pub(crate) const fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::CreateDirectory(_) | Self::Put { .. } | Self::Delete(_)
        )
    }
}

#[derive(Debug, Clone)]
pub(crate) struct StoredFile {
    pub(crate) content: Vec<u8>,
    pub(crate) modified_at: DateTime<Utc>,
}

#[derive(Default)]
struct State {
    dirs: BTreeSet<String>,
    files: BTreeMap<String, StoredFile>,
    calls: Vec<StoreCall>,
    fail_put: Option<String>,
    raw_last_modified: BTreeMap<String, String>,
}

pub(crate) struct MemoryStore {
    state: Mutex<State>,
    clock: DateTime<Utc>,
}

impl MemoryStore {
    /// Empty store stamping every upload with `clock`
    pub(crate) fn new(clock: DateTime<Utc>) -> Self {
        let mut state = State::default();
        state.dirs.insert("/".to_string());
        Self {
            state: Mutex::new(state),
            clock,
        }
    }

    /// Add a file, creating its parent directories
    pub(crate) fn seed_file(&self, path: &str, content: &[u8], modified_at: DateTime<Utc>) {
        let mut state = self.state.lock().unwrap();
        let mut so_far = String::new();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        for segment in &segments[..segments.len() - 1] {
            so_far.push('/');
            so_far.push_str(segment);
            state.dirs.insert(so_far.clone());
        }
        state.files.insert(
            path.to_string(),
            StoredFile {
                content: content.to_vec(),
                modified_at,
            },
        );
    }

    /// Add an empty directory
    pub(crate) fn seed_dir(&self, path: &str) {
        self.state.lock().unwrap().dirs.insert(path.to_string());
    }

    /// Report `raw` as the last-modified value of `path` instead of its timestamp
    pub(crate) fn set_raw_last_modified(&self, path: &str, raw: &str) {
        self.state
            .lock()
            .unwrap()
            .raw_last_modified
            .insert(path.to_string(), raw.to_string());
    }

    /// Make uploads to `path` fail with a protocol error
    pub(crate) fn fail_put(&self, path: &str) {
        self.state.lock().unwrap().fail_put = Some(path.to_string());
    }

    pub(crate) fn calls(&self) -> Vec<StoreCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub(crate) fn file(&self, path: &str) -> Option<StoredFile> {
        self.state.lock().unwrap().files.get(path).cloned()
    }

    pub(crate) fn has_dir(&self, path: &str) -> bool {
        self.state.lock().unwrap().dirs.contains(path)
    }

    pub(crate) fn file_paths(&self) -> Vec<String> {
        self.state.lock().unwrap().files.keys().cloned().collect()
    }

    fn record(&self, call: StoreCall) {
        self.state.lock().unwrap().calls.push(call);
    }
}

fn parent_of(path: &str) -> String {
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => path[..idx].to_string(),
    }
}

fn http_date(time: DateTime<Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn exists(&self, path: &str) -> Result<bool> {
        self.record(StoreCall::Exists(path.to_string()));
        let state = self.state.lock().unwrap();
        Ok(state.dirs.contains(path) || state.files.contains_key(path))
    }

    async fn create_directory(&self, path: &str) -> Result<()> {
        self.record(StoreCall::CreateDirectory(path.to_string()));
        let mut state = self.state.lock().unwrap();
        if !state.dirs.contains(&parent_of(path)) {
            return Err(SyncError::protocol(format!("MKCOL {path}: parent missing")));
        }
        if state.dirs.contains(path) || state.files.contains_key(path) {
            return Err(SyncError::protocol(format!("MKCOL {path}: already exists")));
        }
        state.dirs.insert(path.to_string());
        Ok(())
    }

    async fn list_recursive(&self, root: &str) -> Result<Vec<RemoteEntry>> {
        self.record(StoreCall::List(root.to_string()));
        let state = self.state.lock().unwrap();
        if !state.dirs.contains(root) {
            return Err(SyncError::protocol(format!("PROPFIND {root}: not found")));
        }

        let mut entries: Vec<RemoteEntry> = state
            .dirs
            .iter()
            .filter(|d| strip_root(root, d).is_some())
            .map(|d| RemoteEntry {
                full_path: d.clone(),
                kind: EntryKind::Directory,
                last_modified: http_date(self.clock),
            })
            .collect();

        entries.extend(
            state
                .files
                .iter()
                .filter(|(p, _)| strip_root(root, p).is_some())
                .map(|(p, f)| RemoteEntry {
                    full_path: p.clone(),
                    kind: EntryKind::File,
                    last_modified: state
                        .raw_last_modified
                        .get(p)
                        .cloned()
                        .unwrap_or_else(|| http_date(f.modified_at)),
                }),
        );

        Ok(entries)
    }

    async fn put_file(
        &self,
        path: &str,
        mut content: ContentStream,
        overwrite: bool,
    ) -> Result<()> {
        self.record(StoreCall::Put {
            path: path.to_string(),
            overwrite,
        });

        let mut bytes = Vec::new();
        content
            .read_to_end(&mut bytes)
            .await
            .map_err(SyncError::protocol)?;

        let mut state = self.state.lock().unwrap();
        if state.fail_put.as_deref() == Some(path) {
            return Err(SyncError::protocol(format!("PUT {path}: 500 Internal Server Error")));
        }
        if !state.dirs.contains(&parent_of(path)) {
            return Err(SyncError::protocol(format!("PUT {path}: 409 Conflict")));
        }
        if !overwrite && state.files.contains_key(path) {
            return Err(SyncError::UnexpectedRemoteState {
                path: path.to_string(),
            });
        }
        state.files.insert(
            path.to_string(),
            StoredFile {
                content: bytes,
                modified_at: self.clock,
            },
        );
        Ok(())
    }

    async fn delete_file(&self, path: &str) -> Result<()> {
        self.record(StoreCall::Delete(path.to_string()));
        let mut state = self.state.lock().unwrap();
        if state.files.remove(path).is_none() {
            return Err(SyncError::protocol(format!("DELETE {path}: 404 Not Found")));
        }
        Ok(())
    }
}

//! Plan execution against a remote store

use std::collections::HashSet;
use std::path::Path;

use tokio::fs::File;

use super::{ProgressCallback, SyncEvent, SyncPhase, SyncResult};
use crate::error::{Result, SyncError};
use crate::inventory::FileDescriptor;
use crate::reconcile::ReconciliationPlan;
use crate::remote::{ContentStream, RemoteStore};
use crate::remote::path::{ancestors, join, root_chain};

/// Applies a reconciliation plan, one remote call at a time
pub struct SyncExecutor<'s, S: RemoteStore + ?Sized> {
    store: &'s S,
    remote_root: String,
    dry_run: bool,
    progress: Option<ProgressCallback>,
    /// Directories known to exist during this run
    known_dirs: HashSet<String>,
}

impl<'s, S: RemoteStore + ?Sized> SyncExecutor<'s, S> {
    /// Create an executor writing below the normalized `remote_root`
    pub fn new(store: &'s S, remote_root: impl Into<String>, dry_run: bool) -> Self {
        Self {
            store,
            remote_root: remote_root.into(),
            dry_run,
            progress: None,
            known_dirs: HashSet::new(),
        }
    }

    /// Receive progress events
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Apply `plan`: prepare the root, then additions, updates and
    /// deletions in that order.
    ///
    /// # Errors
    ///
    /// Returns the first failure; operations after it are not attempted and
    /// operations before it stay applied.
    pub async fn execute(mut self, plan: ReconciliationPlan) -> Result<SyncResult> {
        let mut result = SyncResult {
            unchanged: plan.unchanged,
            dry_run: self.dry_run,
            ..SyncResult::default()
        };

        self.prepare_root(&mut result).await?;

        self.begin_phase(SyncPhase::Add, plan.to_add.len());
        for file in &plan.to_add {
            self.begin_file(SyncPhase::Add, file);
            self.add(file, &mut result).await?;
            result.created += 1;
        }
        self.emit(SyncEvent::PhaseFinished {
            phase: SyncPhase::Add,
        });

        self.begin_phase(SyncPhase::Update, plan.to_update.len());
        for file in &plan.to_update {
            self.begin_file(SyncPhase::Update, file);
            self.update(file).await?;
            result.updated += 1;
        }
        self.emit(SyncEvent::PhaseFinished {
            phase: SyncPhase::Update,
        });

        self.begin_phase(SyncPhase::Delete, plan.to_delete.len());
        for file in &plan.to_delete {
            self.begin_file(SyncPhase::Delete, file);
            self.delete(file).await?;
            result.deleted += 1;
        }
        self.emit(SyncEvent::PhaseFinished {
            phase: SyncPhase::Delete,
        });

        tracing::info!(
            created = result.created,
            updated = result.updated,
            deleted = result.deleted,
            dry_run = self.dry_run,
            "sync finished"
        );
        Ok(result)
    }

    /// Create the remote root (and any missing ancestor) if needed
    async fn prepare_root(&mut self, result: &mut SyncResult) -> Result<()> {
        for dir in root_chain(&self.remote_root) {
            self.ensure_directory(dir, result).await?;
        }
        Ok(())
    }

    async fn add(&mut self, file: &FileDescriptor, result: &mut SyncResult) -> Result<()> {
        let remote_path = join(&self.remote_root, &file.identity_path);

        for dir in ancestors(&self.remote_root, &file.identity_path) {
            self.ensure_directory(dir, result).await?;
        }

        if self.dry_run {
            tracing::info!(path = %remote_path, "[dry run] would upload");
            return Ok(());
        }

        let content = Self::open(file).await?;
        self.store.put_file(&remote_path, content, false).await
    }

    async fn update(&mut self, file: &FileDescriptor) -> Result<()> {
        let remote_path = join(&self.remote_root, &file.identity_path);

        if self.dry_run {
            tracing::info!(path = %remote_path, "[dry run] would overwrite");
            return Ok(());
        }

        let content = Self::open(file).await?;
        self.store.put_file(&remote_path, content, true).await
    }

    async fn delete(&mut self, file: &FileDescriptor) -> Result<()> {
        let remote_path = file.remote_path().ok_or_else(|| {
            SyncError::InvariantViolation(format!(
                "deletion of '{}' has no remote location",
                file.identity_path
            ))
        })?;

        if self.dry_run {
            tracing::info!(path = remote_path, "[dry run] would delete");
            return Ok(());
        }

        self.store.delete_file(remote_path).await
    }

    /// Create `dir` unless it already exists; parents must be handled first
    async fn ensure_directory(&mut self, dir: String, result: &mut SyncResult) -> Result<()> {
        if self.known_dirs.contains(&dir) {
            return Ok(());
        }

        if !self.store.exists(&dir).await? {
            if self.dry_run {
                tracing::info!(path = %dir, "[dry run] would create directory");
            } else {
                self.store.create_directory(&dir).await?;
            }
            result.directories_created += 1;
            self.emit(SyncEvent::DirectoryCreated { path: dir.clone() });
        }

        self.known_dirs.insert(dir);
        Ok(())
    }

    async fn open(file: &FileDescriptor) -> Result<ContentStream> {
        let path: &Path = file.local_path().ok_or_else(|| {
            SyncError::InvariantViolation(format!(
                "upload of '{}' has no local source",
                file.identity_path
            ))
        })?;

        let handle = File::open(path)
            .await
            .map_err(|e| SyncError::filesystem("Failed to open file for upload", path, e))?;
        Ok(Box::new(handle))
    }

    fn begin_phase(&mut self, phase: SyncPhase, count: usize) {
        tracing::info!(%phase, count, "starting phase");
        self.emit(SyncEvent::PhaseStarted { phase, count });
    }

    fn begin_file(&mut self, phase: SyncPhase, file: &FileDescriptor) {
        tracing::debug!(%phase, identity_path = %file.identity_path, "processing");
        self.emit(SyncEvent::FileStarted {
            phase,
            identity_path: file.identity_path.clone(),
        });
    }

    fn emit(&mut self, event: SyncEvent) {
        if let Some(progress) = self.progress.as_mut() {
            progress(&event);
        }
    }
}

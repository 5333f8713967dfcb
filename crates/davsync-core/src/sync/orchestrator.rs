//! Sync orchestration - coordinates the sync workflow

use super::executor::SyncExecutor;
use super::{ProgressCallback, SyncResult};
use crate::config::{DeploySettings, PatternMatcher};
use crate::error::Result;
use crate::reconcile::{ReconciliationPlan, Reconciler};
use crate::remote::{RemoteInventory, RemoteStore};
use crate::scanner::Scanner;

/// Main sync engine
pub struct SyncEngine {
    settings: DeploySettings,
    pattern_matcher: PatternMatcher,
}

impl SyncEngine {
    /// Create a new sync engine
    ///
    /// # Errors
    ///
    /// Returns an error if pattern compilation fails.
    pub fn new(settings: DeploySettings) -> Result<Self> {
        // Compile pattern matcher once during construction
        let pattern_matcher = PatternMatcher::with_patterns(&settings.ignore, &settings.include)?;

        Ok(Self {
            settings,
            pattern_matcher,
        })
    }

    /// Settings this engine runs with
    #[must_use]
    pub const fn settings(&self) -> &DeploySettings {
        &self.settings
    }

    /// Collect both inventories and reconcile them without touching the
    /// remote tree
    ///
    /// # Errors
    ///
    /// Returns a filesystem, protocol, or invariant error.
    pub async fn plan<S>(&self, store: &S) -> Result<ReconciliationPlan>
    where
        S: RemoteStore + ?Sized,
    {
        let local = Scanner::new(&self.pattern_matcher, self.settings.follow_symlinks)
            .scan(&self.settings.local_dir)
            .await?;

        let remote = RemoteInventory::new(&self.pattern_matcher)
            .collect(store, &self.settings.remote_dir)
            .await?;

        Reconciler::reconcile(&local, &remote)
    }

    /// Execute the sync operation
    ///
    /// # Errors
    ///
    /// Returns the first error of the run.
    pub async fn sync<S>(&self, store: &S) -> Result<SyncResult>
    where
        S: RemoteStore + ?Sized,
    {
        self.sync_with_progress(store, None).await
    }

    /// Execute the sync operation, reporting progress to `progress`
    ///
    /// # Errors
    ///
    /// Returns the first error of the run.
    pub async fn sync_with_progress<S>(
        &self,
        store: &S,
        progress: Option<ProgressCallback>,
    ) -> Result<SyncResult>
    where
        S: RemoteStore + ?Sized,
    {
        let plan = self.plan(store).await?;

        let mut executor =
            SyncExecutor::new(store, self.settings.remote_dir.clone(), self.settings.dry_run);
        if let Some(progress) = progress {
            executor = executor.with_progress(progress);
        }

        executor.execute(plan).await
    }
}

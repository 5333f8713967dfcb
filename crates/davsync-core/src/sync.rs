//! One-way synchronization engine
//!
//! [`SyncEngine`] collects both inventories and reconciles them;
//! [`SyncExecutor`] applies the resulting plan to the remote store in three
//! fixed phases: additions, then updates, then deletions. The first failed
//! operation ends the run; nothing already applied is rolled back.

mod executor;
mod orchestrator;
mod reporting;


use std::fmt;

pub use executor::SyncExecutor;
pub use orchestrator::SyncEngine;
pub use reporting::SyncReporter;

/// Callback receiving progress events as the executor works
pub type ProgressCallback = Box<dyn FnMut(&SyncEvent) + Send>;

/// Execution phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// Uploading files missing remotely
    Add,
    /// Overwriting remote files older than their local counterpart
    Update,
    /// Deleting remote files missing locally
    Delete,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

/// Progress narration emitted by the executor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// A remote directory was (or in a dry run, would be) created
    DirectoryCreated {
        /// Full remote path
        path: String,
    },
    /// A phase is about to process `count` files
    PhaseStarted {
        /// Phase
        phase: SyncPhase,
        /// Files in the phase
        count: usize,
    },
    /// A file is about to be processed
    FileStarted {
        /// Phase
        phase: SyncPhase,
        /// Identity path of the file
        identity_path: String,
    },
    /// Every file of the phase was processed
    PhaseFinished {
        /// Phase
        phase: SyncPhase,
    },
}

/// Synchronization result with statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncResult {
    /// Files uploaded as new
    pub created: usize,
    /// Files overwritten
    pub updated: usize,
    /// Files deleted
    pub deleted: usize,
    /// Files left alone
    pub unchanged: usize,
    /// Remote directories created
    pub directories_created: usize,
    /// Whether this was a dry run (counts are what would have happened)
    pub dry_run: bool,
}

impl SyncResult {
    /// Total file operations performed
    #[must_use]
    pub const fn total_operations(&self) -> usize {
        self.created + self.updated + self.deleted
    }
}

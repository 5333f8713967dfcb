//! # davsync-core
//!
//! Core library for one-way deployment of a local directory tree onto a
//! WebDAV server.
//!
//! A run builds two inventories (local and remote), reconciles them into a
//! plan of additions, updates and deletions, checks the plan's partition
//! invariant, and then applies it to the remote store one operation at a
//! time.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Error types for the davsync library
pub mod error;

/// File descriptors and inventories shared by both sides of a run
pub mod inventory;

/// Local directory traversal
pub mod scanner;

/// Remote store contract, WebDAV client and remote inventory
pub mod remote;

/// Inventory reconciliation
pub mod reconcile;

/// Plan execution and run orchestration
pub mod sync;

/// Configuration file parsing, merging and validation
pub mod config;

/// Tracing subscriber setup
pub mod logging;

pub use error::{ErrorKind, Result, SyncError};
pub use inventory::{FileDescriptor, Inventory};
pub use reconcile::{ReconciliationPlan, Reconciler};
pub use remote::{EntryKind, RemoteEntry, RemoteStore, WebDavStore};
pub use sync::{
    ProgressCallback, SyncEngine, SyncEvent, SyncExecutor, SyncPhase, SyncReporter, SyncResult,
};

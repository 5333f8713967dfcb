//! Inventory reconciliation
//!
//! Compares the local and remote inventories by identity path and splits
//! the difference into additions, updates and deletions. Local wins when
//! its modification time is strictly newer; equal times count as unchanged.
//! Pure: no filesystem or network access happens here.

use std::collections::HashMap;

use crate::error::{Result, SyncError};
use crate::inventory::{FileDescriptor, Inventory};

/// The operations needed to make the remote tree match the local one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationPlan {
    /// Local files missing remotely
    pub to_add: Vec<FileDescriptor>,
    /// Local files newer than their remote counterpart
    pub to_update: Vec<FileDescriptor>,
    /// Remote files missing locally
    pub to_delete: Vec<FileDescriptor>,
    /// Files present on both sides that need nothing
    pub unchanged: usize,
}

impl ReconciliationPlan {
    /// Whether applying the plan would change nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }

    /// Number of mutating file operations in the plan
    #[must_use]
    pub fn total_operations(&self) -> usize {
        self.to_add.len() + self.to_update.len() + self.to_delete.len()
    }
}

/// Inventory reconciler
pub struct Reconciler;

impl Reconciler {
    /// Build and validate the plan for `local` against `remote`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvariantViolation`] if the plan does not
    /// partition the two inventories, which happens when an identity path
    /// is duplicated within either of them.
    pub fn reconcile(local: &Inventory, remote: &Inventory) -> Result<ReconciliationPlan> {
        let (local_index, local_duplicate) = Self::index(local);
        let (remote_index, remote_duplicate) = Self::index(remote);

        let mut plan = ReconciliationPlan::default();

        for file in local {
            match remote_index.get(file.identity_path.as_str()) {
                None => plan.to_add.push(file.clone()),
                Some(theirs) if file.modified_at > theirs.modified_at => {
                    plan.to_update.push(file.clone());
                }
                Some(_) => plan.unchanged += 1,
            }
        }

        plan.to_delete = remote
            .iter()
            .filter(|f| !local_index.contains_key(f.identity_path.as_str()))
            .cloned()
            .collect();

        let expected = remote.len() + plan.to_add.len();
        if expected < plan.to_delete.len() || expected - plan.to_delete.len() != local.len() {
            return Err(SyncError::InvariantViolation(format!(
                "the server file count after deployment would not match the local file count \
                 ({} remote + {} added - {} deleted != {} local)",
                remote.len(),
                plan.to_add.len(),
                plan.to_delete.len(),
                local.len()
            )));
        }

        if let Some(path) = local_duplicate.or(remote_duplicate) {
            return Err(SyncError::InvariantViolation(format!(
                "identity path '{path}' appears more than once in an inventory"
            )));
        }

        plan.to_add.sort_by(|a, b| a.identity_path.cmp(&b.identity_path));
        plan.to_update.sort_by(|a, b| a.identity_path.cmp(&b.identity_path));
        plan.to_delete.sort_by(|a, b| a.identity_path.cmp(&b.identity_path));

        tracing::info!(
            add = plan.to_add.len(),
            update = plan.to_update.len(),
            delete = plan.to_delete.len(),
            unchanged = plan.unchanged,
            "reconciled inventories"
        );

        Ok(plan)
    }

    /// Index by identity path, keeping the first occurrence, and report a
    /// duplicated path if there is one
    fn index(inventory: &Inventory) -> (HashMap<&str, &FileDescriptor>, Option<String>) {
        let mut index = HashMap::with_capacity(inventory.len());
        let mut duplicate = None;

        for file in inventory {
            if index.contains_key(file.identity_path.as_str()) {
                duplicate.get_or_insert_with(|| file.identity_path.clone());
            } else {
                index.insert(file.identity_path.as_str(), file);
            }
        }

        (index, duplicate)
    }
}

//! Sync operation reporting and statistics

use std::fmt::Write;

use super::{SyncEvent, SyncPhase, SyncResult};
use crate::reconcile::ReconciliationPlan;

/// Sync operation reporter
pub struct SyncReporter;

impl SyncReporter {
    /// Console line for a progress event, if it deserves one
    #[must_use]
    pub fn narrate(event: &SyncEvent) -> Option<String> {
        match event {
            SyncEvent::PhaseStarted { phase, count } => Some(match phase {
                SyncPhase::Add => format!("Writing {count} new files..."),
                SyncPhase::Update => format!("Updating {count} existing files..."),
                SyncPhase::Delete => format!("Deleting {count} files..."),
            }),
            SyncEvent::FileStarted { identity_path, .. } => Some(identity_path.clone()),
            SyncEvent::PhaseFinished { .. } => Some(String::new()),
            SyncEvent::DirectoryCreated { .. } => None,
        }
    }

    /// Human-readable listing of a plan
    #[must_use]
    pub fn describe_plan(plan: &ReconciliationPlan) -> String {
        let mut output = String::new();

        let sections = [
            ("New files", "+", &plan.to_add),
            ("Updated files", "~", &plan.to_update),
            ("Deleted files", "-", &plan.to_delete),
        ];
        for (title, marker, files) in sections {
            let _ = writeln!(output, "{title} ({}):", files.len());
            for file in files {
                let _ = writeln!(output, "  {marker} {}", file.identity_path);
            }
        }

        let _ = writeln!(output, "Unchanged: {}", plan.unchanged);
        if plan.is_empty() {
            output.push_str("Remote is up to date.\n");
        }

        output
    }

    /// Generate a summary report
    #[must_use]
    pub fn generate_summary(result: &SyncResult) -> String {
        let mut output = String::new();

        output.push_str("\n=== Sync Summary ===\n");
        if result.dry_run {
            output.push_str("(dry run: nothing was changed)\n");
        }
        let _ = writeln!(output, "Created:   {}", result.created);
        let _ = writeln!(output, "Updated:   {}", result.updated);
        let _ = writeln!(output, "Deleted:   {}", result.deleted);
        let _ = writeln!(output, "Unchanged: {}", result.unchanged);
        let _ = writeln!(output, "Directories created: {}", result.directories_created);
        let _ = writeln!(output, "\nTotal operations: {}", result.total_operations());
        output.push_str("Status: ✓ Success\n");

        output
    }
}

//! Gitignore-style pattern matching using the ignore crate

use std::path::Path;

use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::error::{Result, SyncError};

/// Pattern matcher applied to identity paths on both sides of a run
#[derive(Debug, Default)]
pub struct PatternMatcher {
    gitignore: Option<Gitignore>,
}

impl PatternMatcher {
    /// Matcher that includes everything
    #[must_use]
    pub const fn new() -> Self {
        Self { gitignore: None }
    }

    /// Build pattern matcher from ignore and include patterns
    ///
    /// # Errors
    ///
    /// Returns an error if patterns are invalid.
    pub fn with_patterns(ignore_patterns: &[String], include_patterns: &[String]) -> Result<Self> {
        if ignore_patterns.is_empty() && include_patterns.is_empty() {
            return Ok(Self::new());
        }

        let mut builder = GitignoreBuilder::new("");

        for pattern in ignore_patterns {
            builder.add_line(None, pattern).map_err(|e| {
                SyncError::Config(format!("Invalid ignore pattern '{pattern}': {e}"))
            })?;
        }

        // Include patterns are negated ignores
        for pattern in include_patterns {
            builder.add_line(None, &format!("!{pattern}")).map_err(|e| {
                SyncError::Config(format!("Invalid include pattern '{pattern}': {e}"))
            })?;
        }

        let gitignore = builder
            .build()
            .map_err(|e| SyncError::Config(format!("Invalid patterns: {e}")))?;

        Ok(Self {
            gitignore: Some(gitignore),
        })
    }

    /// Whether a root-relative identity path takes part in the sync
    #[must_use]
    pub fn should_include(&self, identity_path: &str) -> bool {
        self.gitignore.as_ref().is_none_or(|gi| {
            !gi.matched_path_or_any_parents(Path::new(identity_path), false)
                .is_ignore()
        })
    }
}

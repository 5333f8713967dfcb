//! Configuration merging with precedence rules
//!
//! # Merging Semantics
//!
//! - **Scalars** (server, username, password, local-dir, remote-dir): a value
//!   from a higher-precedence config replaces the lower one
//! - **Arrays** (ignore, include): additive
//! - **Booleans**: OR semantics, a `true` anywhere stays `true`

use std::fs;
use std::path::Path;

use super::discovery::ConfigFiles;
use super::types::Config;
use crate::error::{Result, SyncError};

/// Configuration merger
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge multiple config files with precedence rules
    ///
    /// Precedence order (highest to lowest):
    /// 1. CLI config
    /// 2. .davsync.local.toml
    /// 3. .davsync.toml
    /// 4. Global config
    ///
    /// # Errors
    ///
    /// Returns an error if config files cannot be read or parsed.
    pub fn merge(files: &ConfigFiles) -> Result<Config> {
        let mut merged = Config::default();

        for path in files.paths() {
            let config = Self::load(path)?;
            Self::overlay(&mut merged, config);
        }

        Ok(merged)
    }

    /// Apply `top` over `base`
    pub fn overlay(base: &mut Config, top: Config) {
        if top.server.is_some() {
            base.server = top.server;
        }
        if top.username.is_some() {
            base.username = top.username;
        }
        if top.password.is_some() {
            base.password = top.password;
        }
        if top.local_dir.is_some() {
            base.local_dir = top.local_dir;
        }
        if top.remote_dir.is_some() {
            base.remote_dir = top.remote_dir;
        }

        base.ignore.extend(top.ignore);
        base.include.extend(top.include);

        base.follow_symlinks |= top.follow_symlinks;
        base.dry_run |= top.dry_run;
    }

    fn load(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path)
            .map_err(|e| SyncError::filesystem("Failed to read config file", path, e))?;

        toml::from_str(&content).map_err(|e| {
            SyncError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }
}

//! Configuration file discovery from multiple locations

use std::path::{Path, PathBuf};

use crate::error::{Result, SyncError};

/// Configuration file locations in order of precedence
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigFiles {
    /// Config from CLI flag (highest precedence)
    pub cli: Option<PathBuf>,
    /// Machine-local project config (.davsync.local.toml)
    pub local: Option<PathBuf>,
    /// Project config (.davsync.toml)
    pub project: Option<PathBuf>,
    /// Global XDG config
    pub global: Option<PathBuf>,
}

impl ConfigFiles {
    /// Discovered files, lowest precedence first
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        [&self.global, &self.project, &self.local, &self.cli]
            .into_iter()
            .flatten()
            .map(PathBuf::as_path)
    }
}

/// Config file discovery
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Discover all available configuration files
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly requested config file does not exist.
    pub fn discover(cli_path: Option<&Path>) -> Result<ConfigFiles> {
        let cli = match cli_path {
            Some(p) if p.is_file() => Some(p.to_path_buf()),
            Some(p) => {
                return Err(SyncError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            None => None,
        };

        Ok(ConfigFiles {
            cli,
            local: Self::find_upward(".davsync.local.toml"),
            project: Self::find_upward(".davsync.toml"),
            global: Self::find_global_config(),
        })
    }

    /// Nearest `name` in the working directory or one of its parents
    fn find_upward(name: &str) -> Option<PathBuf> {
        let cwd = std::env::current_dir().ok()?;
        cwd.ancestors()
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.is_file())
    }

    /// `davsync/config.toml` under the platform config directory
    fn find_global_config() -> Option<PathBuf> {
        let global_config = dirs::config_dir()?.join("davsync").join("config.toml");
        global_config.is_file().then_some(global_config)
    }
}

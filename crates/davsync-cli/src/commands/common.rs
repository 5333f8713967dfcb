//! Common types and utilities for command execution

use std::path::Path;

use davsync_core::SyncError;
use davsync_core::config::{Config, ConfigManager, ConfigMerger, ConfigValidator, DeploySettings};
use url::Url;

/// Execution options shared by every command
pub struct SyncOptions<'a> {
    /// Enable verbose output
    pub verbose: bool,
    /// Path to custom config file
    pub config_path: Option<&'a Path>,
    /// Skip loading all config files
    pub no_config: bool,
    /// Settings given as flags or environment variables
    pub overrides: Config,
}

impl<'a> SyncOptions<'a> {
    /// Create new sync options
    #[must_use]
    pub const fn new(
        verbose: bool,
        config_path: Option<&'a Path>,
        no_config: bool,
        overrides: Config,
    ) -> Self {
        Self {
            verbose,
            config_path,
            no_config,
            overrides,
        }
    }

    /// Config files merged, with command-line settings on top
    pub fn effective_config(&self) -> anyhow::Result<Config> {
        let mut config = ConfigManager::load(self.config_path, self.no_config)
            .map_err(|e| reported(e, "Loading configuration"))?;
        ConfigMerger::overlay(&mut config, self.overrides.clone());
        ConfigValidator::validate(&config).map_err(|e| reported(e, "Configuration"))?;
        Ok(config)
    }

    /// Everything a run needs, or an error naming the missing setting
    pub fn settings(&self) -> anyhow::Result<DeploySettings> {
        let config = self.effective_config()?;
        let settings = ConfigValidator::resolve(&config).map_err(|e| reported(e, "Configuration"))?;

        if self.verbose {
            println!("Server: {}", display_url(&settings.server));
            println!("Local directory: {}", settings.local_dir.display());
            println!("Remote directory: {}", settings.remote_dir);
            println!("Dry run: {}", settings.dry_run);
        }

        Ok(settings)
    }
}

/// Server URL safe for console output
pub fn display_url(url: &Url) -> String {
    let mut shown = url.clone();
    // Only fails for URLs that cannot carry credentials in the first place
    let _ = shown.set_password(None);
    shown.to_string()
}

/// Attach the error category so the final report names it
pub fn reported(error: SyncError, stage: &str) -> anyhow::Error {
    let kind = error.kind();
    anyhow::Error::new(error).context(format!("{stage} failed ({kind})"))
}

//! Config command implementation

use anyhow::Context;
use davsync_core::config::ConfigDiscovery;

use super::common::SyncOptions;

pub struct Config;

impl Config {
    pub fn execute(options: &SyncOptions<'_>) -> anyhow::Result<()> {
        if options.verbose && !options.no_config {
            let files = ConfigDiscovery::discover(options.config_path)
                .context("Failed to discover config files")?;
            println!("Config files:");
            for path in files.paths() {
                println!("  {}", path.display());
            }
            println!();
        }

        let config = options.effective_config()?;
        print!("{}", config.to_redacted_toml()?);

        Ok(())
    }
}

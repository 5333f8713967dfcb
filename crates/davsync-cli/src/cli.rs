use clap::{Parser, Subcommand};
use std::path::PathBuf;

use davsync_core::config::Config;

/// One-way WebDAV deployment tool
///
/// Mirror a local directory onto a WebDAV server: new files are uploaded,
/// newer files are replaced and files gone from the local side are deleted.
#[derive(Parser, Debug)]
#[command(name = "davsync")]
#[command(about, long_about = None, version)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Preview changes without touching the server (dry-run)
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Use specific config file
    #[arg(long, global = true, value_name = "PATH", conflicts_with = "no_config")]
    pub config: Option<PathBuf>,

    /// Ignore all config files
    #[arg(long, global = true, conflicts_with = "config")]
    pub no_config: bool,

    /// WebDAV server URL
    #[arg(long, global = true, value_name = "URL", env = "DAVSYNC_SERVER")]
    pub server: Option<String>,

    /// Username for basic authentication
    #[arg(long, global = true, env = "DAVSYNC_USERNAME")]
    pub username: Option<String>,

    /// Password for basic authentication (prefer the environment variable)
    #[arg(long, global = true, env = "DAVSYNC_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Local directory to deploy
    #[arg(long, global = true, value_name = "PATH", env = "DAVSYNC_LOCAL_DIR")]
    pub local_dir: Option<PathBuf>,

    /// Remote directory to deploy into
    #[arg(long, global = true, value_name = "PATH", env = "DAVSYNC_REMOTE_DIR")]
    pub remote_dir: Option<String>,

    /// Ignore pattern (gitignore syntax, repeatable)
    #[arg(long = "ignore", global = true, value_name = "PATTERN")]
    pub ignore: Vec<String>,

    /// Traverse symlinked directories
    #[arg(long, global = true)]
    pub follow_symlinks: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Settings given on the command line, layered over the config files
    pub fn overrides(&self) -> Config {
        Config {
            server: self.server.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            local_dir: self.local_dir.clone(),
            remote_dir: self.remote_dir.clone(),
            ignore: self.ignore.clone(),
            include: Vec::new(),
            follow_symlinks: self.follow_symlinks,
            dry_run: self.dry_run,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deploy the local directory to the server
    Deploy,

    /// Show what a deployment would change without making changes
    Status,

    /// Display the effective configuration
    Config,
}

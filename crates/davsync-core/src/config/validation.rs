//! Configuration validation and error reporting

use url::Url;

use super::types::{Config, DeploySettings};
use crate::error::{Result, SyncError};
use crate::remote::path::normalize_root;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate whatever fields a configuration sets
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(server) = &config.server {
            Self::parse_server(server)?;
        }

        if config
            .username
            .as_ref()
            .is_some_and(|username| username.trim().is_empty())
        {
            return Err(SyncError::Config("Username cannot be empty".to_string()));
        }

        for pattern in &config.ignore {
            if pattern.trim().is_empty() {
                return Err(SyncError::Config(
                    "Ignore pattern cannot be empty".to_string(),
                ));
            }
        }

        for pattern in &config.include {
            if pattern.trim().is_empty() {
                return Err(SyncError::Config(
                    "Include pattern cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Validate a configuration and turn it into the settings of a run
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is missing or any field is invalid.
    pub fn resolve(config: &Config) -> Result<DeploySettings> {
        Self::validate(config)?;

        let server = Self::parse_server(Self::require(&config.server, "server")?)?;
        let username = Self::require(&config.username, "username")?.clone();
        let local_dir = Self::require(&config.local_dir, "local-dir")?.clone();
        let remote_dir = normalize_root(Self::require(&config.remote_dir, "remote-dir")?);

        Ok(DeploySettings {
            server,
            username,
            password: config.password.clone(),
            local_dir,
            remote_dir,
            ignore: config.ignore.clone(),
            include: config.include.clone(),
            follow_symlinks: config.follow_symlinks,
            dry_run: config.dry_run,
        })
    }

    fn require<'a, T>(value: &'a Option<T>, name: &str) -> Result<&'a T> {
        value
            .as_ref()
            .ok_or_else(|| SyncError::Config(format!("Missing required setting: {name}")))
    }

    fn parse_server(server: &str) -> Result<Url> {
        let url = Url::parse(server)
            .map_err(|e| SyncError::Config(format!("Invalid server URL '{server}': {e}")))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(SyncError::Config(format!(
                "Unsupported server URL scheme '{other}' (expected http or https)"
            ))),
        }
    }
}

//! Configuration types and structures

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, SyncError};

const REDACTED: &str = "********";

/// Configuration as read from a TOML file or assembled from CLI flags.
///
/// Every connection field is optional here; [`ConfigValidator::resolve`]
/// turns a complete config into [`DeploySettings`].
///
/// [`ConfigValidator::resolve`]: super::ConfigValidator::resolve
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// WebDAV server URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    /// Username for basic authentication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Password for basic authentication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Local directory to deploy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_dir: Option<PathBuf>,

    /// Remote directory to deploy into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_dir: Option<String>,

    /// Patterns to ignore on both sides
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,

    /// Patterns to explicitly include (override ignores)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,

    /// Traverse symlinked directories
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Narrate the plan without touching the server
    #[serde(default)]
    pub dry_run: bool,
}

impl Config {
    /// Render as TOML with the password masked
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized.
    pub fn to_redacted_toml(&self) -> Result<String> {
        toml::to_string_pretty(&self.redacted())
            .map_err(|e| SyncError::Config(format!("Failed to render config: {e}")))
    }

    /// Copy of this config with the password masked
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            password: self.password.as_ref().map(|_| REDACTED.to_string()),
            ..self.clone()
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server", &self.server)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| REDACTED))
            .field("local_dir", &self.local_dir)
            .field("remote_dir", &self.remote_dir)
            .field("ignore", &self.ignore)
            .field("include", &self.include)
            .field("follow_symlinks", &self.follow_symlinks)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

/// Validated settings for one deployment run
#[derive(Clone)]
pub struct DeploySettings {
    /// WebDAV server base URL
    pub server: Url,
    /// Username for basic authentication
    pub username: String,
    /// Password for basic authentication
    pub password: Option<String>,
    /// Local synchronization root
    pub local_dir: PathBuf,
    /// Remote synchronization root, normalized to `/a/b` form
    pub remote_dir: String,
    /// Ignore patterns
    pub ignore: Vec<String>,
    /// Include patterns
    pub include: Vec<String>,
    /// Traverse symlinked directories
    pub follow_symlinks: bool,
    /// Perform no mutating remote call
    pub dry_run: bool,
}

impl fmt::Debug for DeploySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeploySettings")
            .field("server", &self.server.as_str())
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| REDACTED))
            .field("local_dir", &self.local_dir)
            .field("remote_dir", &self.remote_dir)
            .field("ignore", &self.ignore)
            .field("include", &self.include)
            .field("follow_symlinks", &self.follow_symlinks)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_file() {
        let config: Config = toml::from_str(
            r#"
server = "https://dav.example.com/remote.php/webdav"
username = "deploy"
local-dir = "public"
remote-dir = "/site"
ignore = ["*.map"]
"#,
        )
        .unwrap();

        assert_eq!(config.username.as_deref(), Some("deploy"));
        assert_eq!(config.local_dir, Some(PathBuf::from("public")));
        assert_eq!(config.remote_dir.as_deref(), Some("/site"));
        assert_eq!(config.ignore, vec!["*.map".to_string()]);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = Config {
            password: Some("hunter2".to_string()),
            ..Config::default()
        };

        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains(REDACTED));
    }

    #[test]
    fn test_redacted_toml() {
        let config = Config {
            server: Some("https://dav.example.com".to_string()),
            password: Some("hunter2".to_string()),
            ..Config::default()
        };

        let rendered = config.to_redacted_toml().unwrap();
        assert!(rendered.contains("server = \"https://dav.example.com\""));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_redacted_keeps_other_fields() {
        let config = Config {
            username: Some("deploy".to_string()),
            password: Some("hunter2".to_string()),
            ..Config::default()
        };

        let redacted = config.redacted();
        assert_eq!(redacted.username.as_deref(), Some("deploy"));
        assert_eq!(redacted.password.as_deref(), Some(REDACTED));
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{NotesError, Result};
use crate::mcp::UnknownMethodPolicy;

/// Port the server listens on when nothing else is configured.
pub const DEFAULT_PORT: u16 = 3003;

/// Environment variable overriding the listen port.
pub const ENV_PORT: &str = "PORT";
/// Environment variable fixing the public base URL used in UI references.
pub const ENV_PUBLIC_URL: &str = "MCP_PUBLIC_URL";
/// Environment variable pointing at the companion UI bundle.
pub const ENV_APP_UI_DIR: &str = "APP_UI_DIR";
/// Environment variable enabling strict handling of unknown methods.
pub const ENV_STRICT_METHODS: &str = "NOTES_STRICT_METHODS";

/// Configuration for the notes MCP server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// TCP port to bind.
    pub port: u16,
    /// Public base URL. When unset, it is derived from request headers.
    pub public_url: Option<String>,
    /// Directory holding the companion UI bundle, served under `/app`.
    pub app_ui_dir: PathBuf,
    /// Whether the store starts with the two demo notes.
    pub seed_demo_notes: bool,
    /// Reject unknown methods with `-32601` instead of replying `{"ok": true}`.
    pub strict_methods: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            public_url: None,
            app_ui_dir: PathBuf::from("../apps-sdk-auxee/dist"),
            seed_demo_notes: true,
            strict_methods: false,
        }
    }
}

impl ServerConfig {
    pub fn unknown_method_policy(&self) -> UnknownMethodPolicy {
        if self.strict_methods {
            UnknownMethodPolicy::Strict
        } else {
            UnknownMethodPolicy::Permissive
        }
    }

    /// `host:port` string suitable for binding a listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Applies overrides from an environment lookup function.
    ///
    /// Takes the lookup as a parameter so tests need not touch the process
    /// environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(ENV_PORT) {
            self.port = port.trim().parse().map_err(|e| NotesError::Config {
                message: format!("invalid {} '{}': {}", ENV_PORT, port, e),
            })?;
        }
        if let Some(url) = lookup(ENV_PUBLIC_URL).filter(|u| !u.is_empty()) {
            self.public_url = Some(url);
        }
        if let Some(dir) = lookup(ENV_APP_UI_DIR).filter(|d| !d.is_empty()) {
            self.app_ui_dir = PathBuf::from(dir);
        }
        if let Some(flag) = lookup(ENV_STRICT_METHODS) {
            self.strict_methods = parse_bool(ENV_STRICT_METHODS, &flag)?;
        }
        Ok(())
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(NotesError::Config {
            message: format!("invalid {} '{}': expected a boolean", name, other),
        }),
    }
}

/// Reads a TOML configuration file. Missing keys take their defaults.
pub fn load_config_file(path: &Path) -> Result<ServerConfig> {
    let contents = fs::read_to_string(path).map_err(|e| NotesError::Config {
        message: format!("failed to read config file '{}': {}", path.display(), e),
    })?;

    toml::from_str(&contents).map_err(|e| NotesError::Config {
        message: format!("failed to parse config file '{}': {}", path.display(), e),
    })
}

/// Loads the configuration: defaults, then the optional file, then the
/// process environment.
pub fn load_config(path: Option<&Path>) -> Result<ServerConfig> {
    let mut config = match path {
        Some(p) => load_config_file(p)?,
        None => ServerConfig::default(),
    };
    config.apply_env(|key| std::env::var(key).ok())?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_variants() {
        assert!(parse_bool("X", "TRUE").unwrap());
        assert!(parse_bool("X", "1").unwrap());
        assert!(!parse_bool("X", "off").unwrap());
        assert!(parse_bool("X", "maybe").is_err());
    }

    #[test]
    fn test_policy_follows_flag() {
        let mut config = ServerConfig::default();
        assert_eq!(config.unknown_method_policy(), UnknownMethodPolicy::Permissive);
        config.strict_methods = true;
        assert_eq!(config.unknown_method_policy(), UnknownMethodPolicy::Strict);
    }
}

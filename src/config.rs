// src/config.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::api_client::DEFAULT_TIMEOUT_SECS;

pub const DEFAULT_API_URL: &str = "http://localhost:4000";
pub const DEFAULT_CONFIG_FILE: &str = "empleos.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api_base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Where the credential is persisted; defaults to the user config dir.
    #[serde(default)]
    pub session_file: Option<PathBuf>,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Where the values came from. Logged once the subscriber is up.
    #[serde(skip)]
    pub source: ConfigSource,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ConfigSource {
    File { path: PathBuf, environment: String },
    #[default]
    Environment,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File { path, environment } => {
                write!(f, "{} section of {}", environment, path.display())
            }
            ConfigSource::Environment => write!(f, "environment variables"),
        }
    }
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_log_file() -> PathBuf {
    std::env::temp_dir().join("empleos.log")
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: ClientConfig,
    production: ClientConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            timeout_seconds: default_timeout(),
            session_file: None,
            log_file: default_log_file(),
            log_level: default_log_level(),
            source: ConfigSource::Environment,
        }
    }
}

impl ClientConfig {
    /// Load `empleos.yaml` (or `$EMPLEOS_CONFIG`) for the current environment,
    /// falling back to environment variables when no file exists.
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        let config_path = std::env::var("EMPLEOS_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        if config_path.exists() {
            Self::load_from_file(&config_path, &environment)
        } else {
            Ok(Self::from_env())
        }
    }

    fn get_environment() -> String {
        std::env::var("EMPLEOS_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    pub fn load_from_file(path: &Path, environment: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut config = Self::parse(&content, environment)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.source = ConfigSource::File {
            path: path.to_path_buf(),
            environment: environment.to_string(),
        };
        Ok(config)
    }

    pub fn parse(content: &str, environment: &str) -> Result<Self> {
        let config_file: ConfigFile = serde_yaml::from_str(content)?;
        Ok(match environment {
            "production" => config_file.production,
            _ => config_file.local,
        })
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("EMPLEOS_API_URL") {
            config.api_base_url = url;
        }
        if let Some(timeout) = std::env::var("EMPLEOS_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.timeout_seconds = timeout;
        }
        if let Ok(path) = std::env::var("EMPLEOS_SESSION_FILE") {
            config.session_file = Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var("EMPLEOS_LOG_FILE") {
            config.log_file = PathBuf::from(path);
        }
        config
    }

    /// Absolute path of the session file.
    pub fn session_path(&self) -> Result<PathBuf> {
        match &self.session_file {
            Some(path) => Self::resolve_path(path),
            None => {
                let base = dirs::config_dir()
                    .ok_or_else(|| anyhow::anyhow!("No user config directory available"))?;
                Ok(base.join("empleos").join("session.json"))
            }
        }
    }

    fn resolve_path(path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            let current_dir = std::env::current_dir().context("Failed to get current directory")?;
            Ok(current_dir.join(path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
local:
  api_base_url: http://localhost:4000
  session_file: .empleos/session.json
production:
  api_base_url: https://api.empleosng.com
  timeout_seconds: 10
  log_level: warn
"#;

    #[test]
    fn test_parse_selects_environment() {
        let local = ClientConfig::parse(SAMPLE, "local").unwrap();
        assert_eq!(local.api_base_url, "http://localhost:4000");
        assert_eq!(local.timeout_seconds, DEFAULT_TIMEOUT_SECS);
        assert_eq!(
            local.session_file.as_deref(),
            Some(Path::new(".empleos/session.json"))
        );

        let production = ClientConfig::parse(SAMPLE, "production").unwrap();
        assert_eq!(production.api_base_url, "https://api.empleosng.com");
        assert_eq!(production.timeout_seconds, 10);
        assert_eq!(production.log_level, "warn");
        assert!(production.session_file.is_none());
    }

    #[test]
    fn test_unknown_environment_is_local() {
        let config = ClientConfig::parse(SAMPLE, "staging").unwrap();
        assert_eq!(config.api_base_url, "http://localhost:4000");
    }

    #[test]
    fn test_parse_requires_both_sections() {
        assert!(ClientConfig::parse("local:\n  api_base_url: x\n", "local").is_err());
    }

    #[test]
    fn test_load_from_file_and_session_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empleos.yaml");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = ClientConfig::load_from_file(&path, "local").unwrap();
        let session = config.session_path().unwrap();
        assert!(session.is_absolute());
        assert!(session.ends_with(".empleos/session.json"));
        assert_eq!(
            config.source,
            ConfigSource::File {
                path: path.clone(),
                environment: "local".to_string(),
            }
        );
        assert_eq!(
            config.source.to_string(),
            format!("local section of {}", path.display())
        );
    }

    #[test]
    fn test_source_is_recorded_for_later_logging() {
        let parsed = ClientConfig::parse(SAMPLE, "production").unwrap();
        assert_eq!(parsed.source, ConfigSource::Environment);
        assert_eq!(
            ClientConfig::default().source.to_string(),
            "environment variables"
        );
    }
}

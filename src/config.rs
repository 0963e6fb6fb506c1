//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.grammarbot.toml` files.

use crate::api::http::HttpApiConfig;
use crate::render::{OutputFormat, RenderOptions};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".grammarbot.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend connection settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base origin of the grammar API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

pub fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

pub fn default_timeout() -> u64 {
    60 // the correction model can be slow on CPU
}

pub fn default_user_agent() -> String {
    concat!("grammarbot/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Render format for both regions.
    #[serde(default)]
    pub format: OutputFormat,

    /// Show the submitted text above the correction.
    #[serde(default)]
    pub show_original: bool,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load configuration from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref url) = args.api_url {
            self.api.base_url = url.clone();
        }
        if let Some(timeout) = args.timeout {
            self.api.timeout_seconds = timeout;
        }
        if let Some(format) = args.format {
            self.output.format = format;
        }
        if args.show_original {
            self.output.show_original = true;
        }
    }

    /// Connection settings for the HTTP API.
    pub fn http_api_config(&self) -> HttpApiConfig {
        HttpApiConfig {
            base_url: self.api.base_url.clone(),
            timeout_seconds: self.api.timeout_seconds,
            user_agent: self.api.user_agent.clone(),
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            show_original: self.output.show_original,
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.timeout_seconds, 60);
        assert_eq!(config.output.format, OutputFormat::Text);
        assert!(!config.output.show_original);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[api]
base_url = "https://grammar.example.com"
timeout_seconds = 15

[output]
format = "html"
show_original = true
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.api.base_url, "https://grammar.example.com");
        assert_eq!(config.api.timeout_seconds, 15);
        assert!(config.api.user_agent.starts_with("grammarbot/"));
        assert_eq!(config.output.format, OutputFormat::Html);
        assert!(config.render_options().show_original);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[output]"));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.api.base_url, default_base_url());
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[api]\nbase_url = \"http://10.0.0.5:9000\"\n",
        )
        .unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.api.base_url, "http://10.0.0.5:9000");
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[api\n").unwrap();
        assert!(Config::load_from_dir(dir.path()).is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut config: Config = toml::from_str(
            "[api]\nbase_url = \"http://file:1\"\ntimeout_seconds = 5\n[output]\nformat = \"json\"\n",
        )
        .unwrap();

        let args = Args::try_parse_from([
            "grammarbot",
            "--api-url",
            "http://cli:2",
            "--format",
            "html",
            "feedback",
            "1",
        ])
        .unwrap();
        config.merge_with_args(&args);

        assert_eq!(config.api.base_url, "http://cli:2");
        assert_eq!(config.api.timeout_seconds, 5);
        assert_eq!(config.output.format, OutputFormat::Html);
    }
}

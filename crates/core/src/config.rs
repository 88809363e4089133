//! Configuration management for the FarmGuru CLI.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Environment variables
//! - Command-line flags
//! - Config files (.farmguru/config.yaml)
//!
//! The configuration is workspace-centric, with prompt templates and the
//! config file stored under `.farmguru/`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Default hosted model used when nothing else is configured.
pub const DEFAULT_MODEL: &str = "mistralai/Mixtral-8x7B-Instruct";

/// Default number of retrieved documents included in the prompt.
pub const DEFAULT_MAX_DOCS: usize = 3;

/// Main application configuration.
///
/// This struct holds all global configuration options that affect
/// CLI behavior across commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .farmguru/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Inference provider (e.g., "huggingface")
    pub provider: String,

    /// Hosted model identifier
    pub model: String,

    /// Custom inference endpoint override
    pub endpoint: Option<String>,

    /// API key for the inference provider
    pub api_key: Option<String>,

    /// Maximum number of retrieved documents listed in the prompt
    pub max_docs: usize,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    inference: Option<InferenceConfig>,
    synthesis: Option<SynthesisConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct InferenceConfig {
    provider: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
    #[serde(rename = "apiKeyEnv")]
    api_key_env: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SynthesisConfig {
    #[serde(rename = "maxDocs")]
    max_docs: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "huggingface".to_string(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: None,
            api_key: None,
            max_docs: DEFAULT_MAX_DOCS,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and defaults.
    ///
    /// Environment variables:
    /// - `FARMGURU_WORKSPACE`: Override workspace path
    /// - `FARMGURU_CONFIG`: Path to config file
    /// - `FARMGURU_PROVIDER`: Inference provider
    /// - `FARMGURU_MODEL`: Model identifier
    /// - `FARMGURU_ENDPOINT`: Custom inference endpoint
    /// - `HF_API_KEY`: API key for the hosted inference endpoint
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(workspace) = std::env::var("FARMGURU_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }

        if let Ok(config_file) = std::env::var("FARMGURU_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        // Validate workspace exists
        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        // Load from YAML config file if it exists
        let config_path = if let Some(ref cf) = config.config_file {
            cf.clone()
        } else {
            config.workspace.join(".farmguru/config.yaml")
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("FARMGURU_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("FARMGURU_MODEL") {
            config.model = model;
        }

        if let Ok(endpoint) = std::env::var("FARMGURU_ENDPOINT") {
            config.endpoint = Some(endpoint);
        }

        if config.api_key.is_none() {
            config.api_key = std::env::var("HF_API_KEY").ok();
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> AppResult<Self> {
        tracing::debug!("Merging config file {:?}", path);

        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(inference) = config_file.inference {
            if let Some(provider) = inference.provider {
                result.provider = provider;
            }
            if let Some(model) = inference.model {
                result.model = model;
            }
            if let Some(endpoint) = inference.endpoint {
                result.endpoint = Some(endpoint);
            }
            if let Some(env_var) = inference.api_key_env {
                if let Ok(key) = std::env::var(&env_var) {
                    result.api_key = Some(key);
                }
            }
        }

        if let Some(synthesis) = config_file.synthesis {
            if let Some(max_docs) = synthesis.max_docs {
                result.max_docs = max_docs;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// This method merges command-line flags with the loaded configuration,
    /// giving precedence to CLI flags over environment variables. A config
    /// file supplied on the command line is merged here (it was not known at
    /// `load()` time); explicit flags still win over its contents.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> AppResult<Self> {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self = self.merge_yaml(&config_file)?;
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        Ok(self)
    }

    /// Get the path to the .farmguru directory.
    pub fn farmguru_dir(&self) -> PathBuf {
        self.workspace.join(".farmguru")
    }

    /// Ensure the .farmguru directory exists.
    pub fn ensure_farmguru_dir(&self) -> AppResult<()> {
        let dir = self.farmguru_dir();
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|e| {
                AppError::Config(format!("Failed to create .farmguru directory: {}", e))
            })?;
        }
        Ok(())
    }

    /// Validate configuration for the active provider.
    pub fn validate(&self) -> AppResult<()> {
        let provider = &self.provider;
        let known_providers = ["huggingface", "hf"];

        if !known_providers.contains(&provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                provider,
                known_providers.join(", ")
            )));
        }

        if self.max_docs == 0 {
            return Err(AppError::Config(
                "maxDocs must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "huggingface");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_docs, DEFAULT_MAX_DOCS);
        assert!(!config.verbose);
        assert!(!config.no_color);
    }

    #[test]
    fn test_farmguru_dir() {
        let config = AppConfig::default();
        let dir = config.farmguru_dir();
        assert!(dir.ends_with(".farmguru"));
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default();
        let overridden = config
            .with_overrides(
                None,
                None,
                Some("hf".to_string()),
                Some("google/flan-t5-xxl".to_string()),
                None,
                true,
                false,
            )
            .unwrap();

        assert_eq!(overridden.provider, "hf");
        assert_eq!(overridden.model, "google/flan-t5-xxl");
        assert!(overridden.verbose);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut config = AppConfig::default();
        config.provider = "unknown".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_max_docs() {
        let mut config = AppConfig::default();
        config.max_docs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        fs::write(
            &config_path,
            r#"
inference:
  provider: huggingface
  model: google/flan-t5-xxl
synthesis:
  maxDocs: 5
logging:
  level: debug
"#,
        )
        .unwrap();

        let mut config = AppConfig::default();
        let merged = config.merge_yaml(&config_path).unwrap();

        assert_eq!(merged.model, "google/flan-t5-xxl");
        assert_eq!(merged.max_docs, 5);
        assert_eq!(merged.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_yaml_log_level_survives_load() {
        let temp_dir = TempDir::new().unwrap();
        let farmguru_dir = temp_dir.path().join(".farmguru");
        fs::create_dir_all(&farmguru_dir).unwrap();
        fs::write(
            farmguru_dir.join("config.yaml"),
            "logging:\n  level: debug\n",
        )
        .unwrap();

        // The env override layer must not clobber the file value when the
        // variable is absent
        std::env::remove_var("RUST_LOG");
        std::env::set_var("FARMGURU_WORKSPACE", temp_dir.path());

        let config = AppConfig::load().unwrap();
        std::env::remove_var("FARMGURU_WORKSPACE");

        assert_eq!(config.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_config_file_is_merged() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("other.yaml");
        fs::write(
            &config_path,
            r#"
inference:
  model: google/flan-t5-xxl
synthesis:
  maxDocs: 7
"#,
        )
        .unwrap();

        let config = AppConfig::default()
            .with_overrides(
                None,
                Some(config_path.clone()),
                None,
                None,
                None,
                false,
                false,
            )
            .unwrap();

        assert_eq!(config.model, "google/flan-t5-xxl");
        assert_eq!(config.max_docs, 7);
        assert_eq!(config.config_file, Some(config_path));
    }

    #[test]
    fn test_cli_flags_win_over_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("other.yaml");
        fs::write(&config_path, "inference:\n  model: from-file\n").unwrap();

        let config = AppConfig::default()
            .with_overrides(
                None,
                Some(config_path),
                None,
                Some("from-flag".to_string()),
                None,
                false,
                false,
            )
            .unwrap();

        assert_eq!(config.model, "from-flag");
    }

    #[test]
    fn test_missing_cli_config_file_is_an_error() {
        let result = AppConfig::default().with_overrides(
            None,
            Some(PathBuf::from("/nonexistent/config.yaml")),
            None,
            None,
            None,
            false,
            false,
        );

        assert!(result.is_err());
    }
}

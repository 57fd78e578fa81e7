//! Configuration loading, validation, and management for Helmsman.
//!
//! Loads configuration from `~/.helmsman/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// The root configuration structure.
///
/// Maps directly to `~/.helmsman/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the completion endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Completion endpoint base URL (OpenAI-compatible)
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Default temperature
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Maximum tool-call iterations per turn
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Context window configuration
    #[serde(default)]
    pub context: ContextConfig,

    /// Approval policy configuration
    #[serde(default)]
    pub approval: ApprovalConfig,
}

fn default_api_url() -> String {
    "https://api.groq.com/openai/v1".into()
}
fn default_model() -> String {
    "openai/gpt-oss-120b".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_iterations() -> u32 {
    10
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "api_key",
                &self.api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("max_iterations", &self.max_iterations)
            .field("context", &self.context)
            .field("approval", &self.approval)
            .finish()
    }
}

/// Context window budgets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Maximum tokens allowed in the context window
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Fraction of `max_tokens` that triggers summarization
    #[serde(default = "default_trigger_ratio")]
    pub trigger_ratio: f64,

    /// Number of recent messages preserved verbatim during compaction
    #[serde(default = "default_keep_recent")]
    pub keep_recent: usize,
}

fn default_max_tokens() -> usize {
    6000
}
fn default_trigger_ratio() -> f64 {
    0.75
}
fn default_keep_recent() -> usize {
    6
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            trigger_ratio: default_trigger_ratio(),
            keep_recent: default_keep_recent(),
        }
    }
}

/// Approval policy: which tool names require gate confirmation.
///
/// Both sets share one semantics at dispatch time; they are kept separate in
/// config so operators can loosen the merely-stateful set without touching
/// the irreversible one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalConfig {
    /// Tools with irreversible side effects
    #[serde(default = "default_dangerous")]
    pub dangerous: Vec<String>,

    /// Tools that create or edit state
    #[serde(default = "default_approval_required")]
    pub approval_required: Vec<String>,
}

fn default_dangerous() -> Vec<String> {
    vec!["delete_file".into(), "execute_command".into()]
}
fn default_approval_required() -> Vec<String> {
    vec!["create_file".into(), "edit_file".into()]
}

impl Default for ApprovalConfig {
    fn default() -> Self {
        Self {
            dangerous: default_dangerous(),
            approval_required: default_approval_required(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            max_iterations: default_max_iterations(),
            context: ContextConfig::default(),
            approval: ApprovalConfig::default(),
        }
    }
}

impl AppConfig {
    /// The configuration directory: `~/.helmsman`.
    pub fn config_dir() -> PathBuf {
        std::env::var_os("HELMSMAN_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                let home = std::env::var_os("HOME")
                    .or_else(|| std::env::var_os("USERPROFILE"))
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("."));
                home.join(".helmsman")
            })
    }

    /// Load configuration from the default location, falling back to
    /// defaults when no file exists. Environment variables override file
    /// values: `HELMSMAN_API_KEY` / `GROQ_API_KEY`, `HELMSMAN_MODEL`.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_dir().join("config.toml");
        let mut config = if path.is_file() {
            Self::load_from(&path)?
        } else {
            tracing::debug!(path = %path.display(), "No config file found, using defaults");
            Self::default()
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&text)?)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("HELMSMAN_API_KEY") {
            self.api_key = Some(key);
        } else if self.api_key.is_none() {
            if let Ok(key) = std::env::var("GROQ_API_KEY") {
                self.api_key = Some(key);
            }
        }
        if let Ok(model) = std::env::var("HELMSMAN_MODEL") {
            self.default_model = model;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.default_temperature) {
            return Err(ConfigError::Invalid(format!(
                "default_temperature must be in 0.0..=2.0, got {}",
                self.default_temperature
            )));
        }
        if !(0.0..=1.0).contains(&self.context.trigger_ratio) {
            return Err(ConfigError::Invalid(format!(
                "context.trigger_ratio must be in 0.0..=1.0, got {}",
                self.context.trigger_ratio
            )));
        }
        if self.context.max_tokens == 0 {
            return Err(ConfigError::Invalid(
                "context.max_tokens must be nonzero".into(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::Invalid("max_iterations must be nonzero".into()));
        }
        Ok(())
    }
}

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::completion::DEFAULT_ENDPOINT;
use crate::{fs as atomic, paths};

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_SYSTEM_MESSAGE: &str = "You are ChatGPT, a large language model trained by OpenAI. \
     Carefully heed the user's instructions.";

/// Environment variable consulted when no API key is configured.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Highest sampling temperature accepted by the API.
pub const MAX_TEMPERATURE: f64 = 2.0;

/// The persisted settings file.
///
/// Corresponds to `~/.chatgpt_config.json`. Fields missing from an existing
/// file take their built-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// Model name sent with every request.
    pub model: String,
    /// Upper bound on generated tokens per reply.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
    /// API key stored directly in config.
    pub api_key: Option<String>,
    /// The preamble placed before the first message.
    pub system_message: String,
    /// Base URL of an OpenAI-compatible service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            api_key: None,
            system_message: DEFAULT_SYSTEM_MESSAGE.to_string(),
            endpoint: None,
        }
    }
}

/// Settings in effect for the whole process.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub api_key: Option<String>,
    pub system_message: String,
    pub endpoint: String,
}

/// Per-invocation overrides from the command line.
///
/// Every field that is set takes precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub api_key: Option<String>,
    pub system_message: Option<String>,
    pub endpoint: Option<String>,
}

/// Merges CLI overrides with config file values and validates the result.
///
/// When neither source provides an API key, `OPENAI_API_KEY` is used.
///
/// # Errors
///
/// Returns an error if the model name is empty, `max_tokens` is zero, or the
/// temperature is outside `[0, 2]`.
pub fn resolve_settings(
    overrides: &SettingsOverrides,
    config_file: &ConfigFile,
) -> Result<Settings> {
    let model = overrides
        .model
        .clone()
        .unwrap_or_else(|| config_file.model.clone());
    if model.trim().is_empty() {
        bail!(
            "Missing required configuration: 'model'\n\n\
             Please provide it via:\n  \
             - CLI option: gpt --model <name>\n  \
             - Config file: ~/.chatgpt_config.json"
        );
    }

    let max_tokens = overrides.max_tokens.unwrap_or(config_file.max_tokens);
    if max_tokens == 0 {
        bail!("Invalid configuration: 'max_tokens' must be at least 1");
    }

    let temperature = overrides.temperature.unwrap_or(config_file.temperature);
    validate_temperature(temperature)?;

    let api_key = overrides
        .api_key
        .clone()
        .or_else(|| config_file.api_key.clone())
        .filter(|key| !key.is_empty())
        .or_else(api_key_from_env);

    let system_message = overrides
        .system_message
        .clone()
        .unwrap_or_else(|| config_file.system_message.clone());

    let endpoint = overrides
        .endpoint
        .clone()
        .or_else(|| config_file.endpoint.clone())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

    Ok(Settings {
        model,
        max_tokens,
        temperature,
        api_key,
        system_message,
        endpoint,
    })
}

/// Checks that a sampling temperature is finite and within `[0, 2]`.
pub fn validate_temperature(temperature: f64) -> Result<()> {
    if !temperature.is_finite() || !(0.0..=MAX_TEMPERATURE).contains(&temperature) {
        bail!("Invalid configuration: 'temperature' must be between 0 and {MAX_TEMPERATURE}, got {temperature}");
    }
    Ok(())
}

fn api_key_from_env() -> Option<String> {
    std::env::var(API_KEY_ENV).ok().filter(|key| !key.is_empty())
}

/// Reads and writes the settings file.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_path()?,
        })
    }

    pub const fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn exists(&self) -> bool {
        self.config_path.exists()
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile = serde_json::from_str(&contents).with_context(|| {
            format!("Failed to parse config file: {}", self.config_path.display())
        })?;

        Ok(config_file)
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents =
            serde_json::to_string_pretty(config).context("Failed to serialize config")?;

        atomic::atomic_write(&self.config_path, &contents).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;

        Ok(())
    }

    /// Loads the settings file, writing the built-in defaults first if it
    /// does not exist yet.
    ///
    /// Returns the loaded config and whether the file was just created.
    pub fn load_or_create(&self) -> Result<(ConfigFile, bool)> {
        if self.exists() {
            return Ok((self.load()?, false));
        }

        let config = ConfigFile::default();
        self.save(&config)?;
        tracing::info!(path = %self.config_path.display(), "created default config file");
        Ok((config, true))
    }
}

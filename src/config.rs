//! Configuration loading and validation

use std::path::PathBuf;

use eyre::{Result, eyre};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::outline::NormalizeOptions;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default)]
    pub slides: SlidesConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Outline generator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_api_key_env", rename = "api-key-env")]
    pub api_key_env: String,

    #[serde(default = "default_generator_base_url", rename = "base-url")]
    pub base_url: String,

    #[serde(default = "default_max_tokens", rename = "max-tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_generator_timeout_ms", rename = "timeout-ms")]
    pub timeout_ms: u64,
}

/// Authoring service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlidesConfig {
    #[serde(default = "default_slides_base_url", rename = "base-url")]
    pub base_url: String,

    #[serde(default = "default_token_env", rename = "token-env")]
    pub token_env: String,

    #[serde(default = "default_slides_timeout_ms", rename = "timeout-ms")]
    pub timeout_ms: u64,
}

/// Pipeline policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_theme", rename = "default-theme")]
    pub default_theme: String,

    #[serde(default = "default_true", rename = "keep-agenda-slides")]
    pub keep_agenda_slides: bool,

    #[serde(default, rename = "enforce-slide-count")]
    pub enforce_slide_count: bool,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_generator_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_generator_timeout_ms() -> u64 {
    120_000
}

fn default_slides_base_url() -> String {
    "https://slides.googleapis.com".to_string()
}

fn default_token_env() -> String {
    "SLIDES_ACCESS_TOKEN".to_string()
}

fn default_slides_timeout_ms() -> u64 {
    60_000
}

fn default_theme() -> String {
    "corporate".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key_env: default_api_key_env(),
            base_url: default_generator_base_url(),
            max_tokens: default_max_tokens(),
            timeout_ms: default_generator_timeout_ms(),
        }
    }
}

impl Default for SlidesConfig {
    fn default() -> Self {
        Self {
            base_url: default_slides_base_url(),
            token_env: default_token_env(),
            timeout_ms: default_slides_timeout_ms(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_theme: default_theme(),
            keep_agenda_slides: default_true(),
            enforce_slide_count: false,
        }
    }
}

impl PipelineConfig {
    /// Translate policy into normalizer options
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            keep_agenda: self.keep_agenda_slides,
            enforce_count: self.enforce_slide_count,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    ///
    /// 1. Explicit path (if provided)
    /// 2. `.slidesmith.yml` in the current directory
    /// 3. `~/.config/slidesmith/slidesmith.yml`
    /// 4. Defaults
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        debug!("load: called");

        if let Some(path) = config_path {
            if path.exists() {
                info!(path = %path.display(), "load: using explicit config");
                return Self::load_from_file(path);
            }
            warn!(path = %path.display(), "load: explicit config not found, using defaults");
            return Ok(Self::default());
        }

        let local = PathBuf::from(".slidesmith.yml");
        if local.exists() {
            info!("load: using .slidesmith.yml");
            return Self::load_from_file(&local);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user = config_dir.join("slidesmith").join("slidesmith.yml");
            if user.exists() {
                info!(path = %user.display(), "load: using user config");
                return Self::load_from_file(&user);
            }
        }

        debug!("load: no config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file(path: &PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Check that the environment carries the credentials the config names
    pub fn validate(&self) -> Result<()> {
        if std::env::var(&self.generator.api_key_env).is_err() {
            return Err(eyre!("{} environment variable is not set", self.generator.api_key_env));
        }
        if std::env::var(&self.slides.token_env).is_err() {
            return Err(eyre!("{} environment variable is not set", self.slides.token_env));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.generator.model, "gpt-4o-mini");
        assert_eq!(config.generator.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.slides.base_url, "https://slides.googleapis.com");
        assert_eq!(config.slides.token_env, "SLIDES_ACCESS_TOKEN");
        assert_eq!(config.pipeline.default_theme, "corporate");
        assert!(config.pipeline.keep_agenda_slides);
        assert!(!config.pipeline.enforce_slide_count);
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
generator:
  model: gpt-4o
  max-tokens: 8192
pipeline:
  default-theme: midnight
  keep-agenda-slides: false
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.generator.model, "gpt-4o");
        assert_eq!(config.generator.max_tokens, 8192);
        assert_eq!(config.generator.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.pipeline.default_theme, "midnight");
        assert!(!config.pipeline.keep_agenda_slides);
        assert_eq!(config.slides.timeout_ms, 60_000);
    }

    #[test]
    fn test_validate_missing_api_key() {
        let mut config = Config::default();
        config.generator.api_key_env = "NONEXISTENT_TEST_API_KEY_12345".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_normalize_options_mapping() {
        let pipeline = PipelineConfig {
            default_theme: "ocean".to_string(),
            keep_agenda_slides: false,
            enforce_slide_count: true,
        };
        let options = pipeline.normalize_options();
        assert!(!options.keep_agenda);
        assert!(options.enforce_count);
    }
}

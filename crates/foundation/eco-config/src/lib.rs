//! Eco Agent BD configuration
//!
//! Resolution order, later wins:
//!
//! 1. built-in defaults
//! 2. YAML file at `$ECO_CONFIG`, else `~/.config/eco-agent/config.yaml`
//! 3. `ECO_*` environment variables
//!
//! A missing file is not an error. A file or variable that fails to parse is.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use eco_core::{Activity, EmissionFactorTable};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Invalid value for {key}: {value}")]
    InvalidEnv { key: String, value: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcoConfig {
    /// Weather-by-city endpoint; the city name is appended
    pub weather_url: String,
    /// Instant-answer search endpoint
    pub search_url: String,
    /// Local LLM generation endpoint
    pub ollama_url: String,
    pub ollama_model: String,
    /// Text-to-speech endpoint
    pub tts_url: String,
    pub tts_lang: String,
    /// Timeout for weather, search and speech calls
    pub http_timeout_secs: u64,
    /// Timeout for LLM generation, which is much slower
    pub llm_timeout_secs: u64,
    /// Dashboard listen address
    pub bind: String,
    /// Factor rows replacing the Bangladesh defaults
    pub emission_factors: Option<BTreeMap<Activity, f64>>,
}

impl Default for EcoConfig {
    fn default() -> Self {
        Self {
            weather_url: "https://wttr.in/".to_string(),
            search_url: "https://api.duckduckgo.com/".to_string(),
            ollama_url: "http://localhost:11434/api/generate".to_string(),
            ollama_model: "mistral".to_string(),
            tts_url: "https://translate.google.com/translate_tts".to_string(),
            tts_lang: "en".to_string(),
            http_timeout_secs: 30,
            llm_timeout_secs: 120,
            bind: "127.0.0.1:8501".to_string(),
            emission_factors: None,
        }
    }
}

impl EcoConfig {
    /// Load from the default locations and the process environment
    pub fn load() -> Result<Self> {
        let path = std::env::var("ECO_CONFIG")
            .map(PathBuf::from)
            .ok()
            .or_else(Self::default_path);

        let mut config = match path {
            Some(ref p) if p.exists() => Self::from_file(p)?,
            Some(ref p) => {
                debug!("No config file at {}, using defaults", p.display());
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_with(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// `~/.config/eco-agent/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("eco-agent").join("config.yaml"))
    }

    /// Parse a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Apply `ECO_*` overrides read through `lookup`
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let strings: [(&str, &mut String); 5] = [
            ("ECO_WEATHER_URL", &mut self.weather_url),
            ("ECO_SEARCH_URL", &mut self.search_url),
            ("ECO_OLLAMA_URL", &mut self.ollama_url),
            ("ECO_OLLAMA_MODEL", &mut self.ollama_model),
            ("ECO_BIND", &mut self.bind),
        ];
        for (key, slot) in strings {
            if let Some(value) = lookup(key) {
                debug!("{key} overrides config");
                *slot = value;
            }
        }

        if let Some(value) = lookup("ECO_HTTP_TIMEOUT_SECS") {
            self.http_timeout_secs = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidEnv {
                    key: "ECO_HTTP_TIMEOUT_SECS".to_string(),
                    value,
                })?;
        }
        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }

    /// Factor table with any configured overrides applied
    pub fn factor_table(&self) -> EmissionFactorTable {
        match &self.emission_factors {
            Some(overrides) => {
                EmissionFactorTable::with_overrides(overrides.iter().map(|(a, f)| (*a, *f)))
            }
            None => EmissionFactorTable::bangladesh(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = EcoConfig::default();
        assert_eq!(config.ollama_url, "http://localhost:11434/api/generate");
        assert_eq!(config.ollama_model, "mistral");
        assert_eq!(config.weather_url, "https://wttr.in/");
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
        assert_eq!(config.factor_table(), EmissionFactorTable::bangladesh());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = EcoConfig::from_yaml("ollama_model: llama3\nhttp_timeout_secs: 5\n").unwrap();
        assert_eq!(config.ollama_model, "llama3");
        assert_eq!(config.http_timeout_secs, 5);
        assert_eq!(config.search_url, "https://api.duckduckgo.com/");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(EcoConfig::from_yaml("  \n").unwrap(), EcoConfig::default());
    }

    #[test]
    fn test_factor_overrides_from_yaml() {
        let config =
            EcoConfig::from_yaml("emission_factors:\n  Electricity: 0.5\n  CNG: 0.06\n").unwrap();
        let table = config.factor_table();
        assert_eq!(table.factor(Activity::Electricity), 0.5);
        assert_eq!(table.factor(Activity::Cng), 0.06);
        assert_eq!(table.factor(Activity::Bus), 0.028);
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(EcoConfig::from_yaml("http_timeout_secs: soon").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("ECO_OLLAMA_MODEL", "phi3"),
            ("ECO_BIND", "0.0.0.0:9000"),
            ("ECO_HTTP_TIMEOUT_SECS", "7"),
        ]
        .into_iter()
        .collect();

        let mut config = EcoConfig::default();
        config
            .apply_env_with(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.ollama_model, "phi3");
        assert_eq!(config.bind, "0.0.0.0:9000");
        assert_eq!(config.http_timeout_secs, 7);
        assert_eq!(config.weather_url, "https://wttr.in/");
    }

    #[test]
    fn test_bad_env_timeout() {
        let mut config = EcoConfig::default();
        let err = config
            .apply_env_with(|k| (k == "ECO_HTTP_TIMEOUT_SECS").then(|| "ten".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { .. }));
    }

    #[test]
    fn test_from_file() {
        let dir = std::env::temp_dir().join(format!("eco_config_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.yaml");
        std::fs::write(&path, "bind: 127.0.0.1:1234\n").unwrap();

        let config = EcoConfig::from_file(&path).unwrap();
        assert_eq!(config.bind, "127.0.0.1:1234");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = EcoConfig::from_file(Path::new("/nonexistent/eco.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}

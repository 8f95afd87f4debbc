use serde::Deserialize;
use std::fs;
use std::path::Path;

const ENV_CONFIG_PATH: &str = "HIREFAST_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const DEFAULT_EVALUATION_TIMEOUT_SECONDS: u64 = 60;

/// Evaluation pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationConfig {
    /// Generative model used for grading. Defaults to the service-level
    /// default when unset (see `service::llm`).
    #[serde(default)]
    pub model: Option<String>,
    /// Upper bound on a single model call, in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_EVALUATION_TIMEOUT_SECONDS
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            model: None,
            timeout_seconds: DEFAULT_EVALUATION_TIMEOUT_SECONDS,
        }
    }
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub evaluation: EvaluationConfig,
    pub port: u16,
    pub host: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            evaluation: EvaluationConfig::default(),
            port: 8080,
            host: "127.0.0.1".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let config_path =
            std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let evaluation = Self::load_config_file(&config_path)
            .map(|cf| cf.evaluation)
            .unwrap_or_default();

        Self {
            evaluation,
            port,
            host,
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                // Handle empty file
                let contents = contents.trim();
                if contents.is_empty() {
                    tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
                    return Some(ConfigFile::default());
                }

                match serde_yaml::from_str(contents) {
                    Ok(config) => {
                        tracing::info!(path = %path.display(), "Loaded configuration from file");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluation_config_defaults() {
        let config: ConfigFile = serde_yaml::from_str("evaluation: {}").unwrap();
        assert_eq!(config.evaluation.model, None);
        assert_eq!(config.evaluation.timeout_seconds, 60);
    }

    #[test]
    fn evaluation_config_overrides() {
        let yaml = "evaluation:\n  model: gemini-2.5-pro\n  timeout_seconds: 120\n";
        let config: ConfigFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.evaluation.model.as_deref(), Some("gemini-2.5-pro"));
        assert_eq!(config.evaluation.timeout_seconds, 120);
    }
}

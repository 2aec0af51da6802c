use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading or validating a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for a detection run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Detection rules configuration
    pub detection: DetectionConfig,
    /// Output configuration
    pub output: OutputConfig,
}

/// Detection rules configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Substring that marks a request path as a balance lookup
    pub balance_path_marker: String,
    /// Paths that only administrators may call (exact match)
    pub admin_endpoints: Vec<String>,
    /// Query parameter naming the account owner on balance lookups
    pub user_id_param: String,
    /// Response status codes treated as a denied request
    pub denied_status_codes: Vec<i64>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        DetectionConfig {
            balance_path_marker: "/balance".to_string(),
            admin_endpoints: vec!["/getusers".to_string(), "/accounts".to_string()],
            user_id_param: "user_id".to_string(),
            denied_status_codes: vec![403],
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "console", "json", or "jsonl"
    pub format: String,
    /// Output file path (standard output when unset)
    pub file_path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            format: "console".to_string(),
            file_path: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would silently disable a rule
    pub fn validate(&self) -> Result<(), ConfigError> {
        let detection = &self.detection;
        if detection.balance_path_marker.is_empty() {
            return Err(ConfigError::Invalid(
                "detection.balance_path_marker must not be empty".to_string(),
            ));
        }
        if detection.admin_endpoints.iter().any(|e| e.is_empty()) {
            return Err(ConfigError::Invalid(
                "detection.admin_endpoints must not contain empty paths".to_string(),
            ));
        }
        if detection.user_id_param.is_empty() {
            return Err(ConfigError::Invalid(
                "detection.user_id_param must not be empty".to_string(),
            ));
        }
        if detection.denied_status_codes.is_empty() {
            return Err(ConfigError::Invalid(
                "detection.denied_status_codes must list at least one status".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_builtin_rules() {
        let config = Config::default();
        assert_eq!(config.detection.balance_path_marker, "/balance");
        assert_eq!(config.detection.admin_endpoints, vec!["/getusers", "/accounts"]);
        assert_eq!(config.detection.user_id_param, "user_id");
        assert_eq!(config.detection.denied_status_codes, vec![403]);
        assert_eq!(config.output.format, "console");
        assert!(config.output.file_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[detection]\ndenied_status_codes = [401, 403]").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.detection.denied_status_codes, vec![401, 403]);
        assert_eq!(config.detection.balance_path_marker, "/balance");
        assert_eq!(config.output.format, "console");
    }

    #[test]
    fn test_missing_file() {
        let result = Config::from_file(Path::new("definitely/not/here.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[detection\nbalance_path_marker = ").unwrap();

        let result = Config::from_file(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_empty_status_list_rejected() {
        let mut config = Config::default();
        config.detection.denied_status_codes.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_empty_admin_endpoint_rejected() {
        let mut config = Config::default();
        config.detection.admin_endpoints.push(String::new());
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}

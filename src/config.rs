use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// A validation error in the configuration
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]: {}", self.field, self.message)
    }
}

/// Backend API settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000/api/v1".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Where session storage, the audit log and the account file live
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from default paths
    /// Priority: project (.taller/config.toml) > user (~/.taller/config.toml)
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".taller").join("config.toml");
            if user_config.exists() {
                let user = Self::load_from(&user_config)?;
                config.merge(user);
            }
        }

        let project_config = Path::new(".taller").join("config.toml");
        if project_config.exists() {
            let project = Self::load_from(&project_config)?;
            config.merge(project);
        }

        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Config) {
        if other.api.base_url != default_base_url() {
            self.api.base_url = other.api.base_url;
        }
        if other.api.timeout_ms != default_timeout_ms() {
            self.api.timeout_ms = other.api.timeout_ms;
        }
        if other.storage.data_dir.is_some() {
            self.storage.data_dir = other.storage.data_dir;
        }
    }

    /// Resolve the data directory: configured value, else ~/.taller
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.storage.data_dir {
            return dir.clone();
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".taller")
    }

    /// Validate configuration and return any errors found
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            errors.push(ValidationError {
                field: "api.base_url".to_string(),
                message: format!("Must be an http(s) URL, got '{}'", self.api.base_url),
            });
        }

        if self.api.timeout_ms == 0 {
            errors.push(ValidationError {
                field: "api.timeout_ms".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8000/api/v1");
        assert_eq!(config.api.timeout_ms, 10_000);
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_bad_url() {
        let mut config = Config::default();
        config.api.base_url = "localhost:8000".to_string();
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].field.contains("base_url"));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.api.timeout_ms = 0;
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].field.contains("timeout_ms"));
    }

    #[test]
    fn test_merge_overrides() {
        let mut base = Config::default();
        let other: Config = toml::from_str(
            r#"
[api]
base_url = "http://taller.example:9000/api/v1"

[storage]
data_dir = "/tmp/taller-test"
"#,
        )
        .unwrap();
        base.merge(other);
        assert_eq!(base.api.base_url, "http://taller.example:9000/api/v1");
        assert_eq!(
            base.storage.data_dir.as_deref(),
            Some(Path::new("/tmp/taller-test"))
        );
        // Unset fields keep their defaults.
        assert_eq!(base.api.timeout_ms, 10_000);
    }

    #[test]
    fn test_data_dir_override() {
        let mut config = Config::default();
        config.storage.data_dir = Some(PathBuf::from("/srv/taller"));
        assert_eq!(config.data_dir(), PathBuf::from("/srv/taller"));
    }
}

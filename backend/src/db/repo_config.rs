//! `repository.toml` support.
//!
//! ```toml
//! [repository]
//! type = "rest"
//!
//! [rest]
//! base_url = "https://planner.example.org/api"
//! api_key = "..."
//! timeout_secs = 15
//! schema = "flexwise"
//! ```
//!
//! `REPOSITORY_TYPE`, `SCHEDULER_API_URL` and `SCHEDULER_API_KEY` override the
//! file when set.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::factory::RepositoryType;
use super::repository::RepositoryError;
#[cfg(feature = "rest-repo")]
use super::repositories::RestConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub repository: RepositorySettings,
    #[serde(default)]
    pub rest: RestSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestSettings {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub schema: Option<String>,
}

impl Default for RestSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            schema: None,
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

impl RepositoryConfig {
    /// Read and parse a TOML file. Environment overrides are not applied.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// First `repository.toml` found in the current directory, `backend/` or
    /// the parent directory.
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        let search_paths = [
            PathBuf::from("repository.toml"),
            PathBuf::from("backend/repository.toml"),
            PathBuf::from("../repository.toml"),
        ];

        for path in search_paths.iter() {
            if path.exists() {
                log::debug!("Using repository config {}", path.display());
                return Self::from_file(path);
            }
        }

        Err(RepositoryError::configuration(
            "No repository.toml found in standard locations",
        ))
    }

    /// Apply `REPOSITORY_TYPE`, `SCHEDULER_API_URL` and `SCHEDULER_API_KEY`.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(repo_type) = std::env::var("REPOSITORY_TYPE") {
            if !repo_type.trim().is_empty() {
                self.repository.repo_type = repo_type;
            }
        }
        if let Ok(url) = std::env::var("SCHEDULER_API_URL") {
            if !url.trim().is_empty() {
                self.rest.base_url = url;
            }
        }
        if let Ok(key) = std::env::var("SCHEDULER_API_KEY") {
            if !key.is_empty() {
                self.rest.api_key = Some(key);
            }
        }
        self
    }

    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        self.repository.repo_type.parse()
    }

    /// REST settings when this is a REST configuration.
    #[cfg(feature = "rest-repo")]
    pub fn to_rest_config(&self) -> Result<Option<RestConfig>, RepositoryError> {
        let repo_type = self.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        if repo_type != RepositoryType::Rest {
            return Ok(None);
        }

        if self.rest.base_url.trim().is_empty() {
            return Err(RepositoryError::configuration(
                "REST repository requires 'rest.base_url' setting",
            ));
        }

        Ok(Some(RestConfig {
            base_url: self.rest.base_url.clone(),
            api_key: self.rest.api_key.clone(),
            timeout_secs: self.rest.timeout_secs,
            schema: self.rest.schema.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_config() {
        let toml = r#"
[repository]
type = "local"
"#;

        let config: RepositoryConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.repository.repo_type, "local");
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
        assert_eq!(config.rest.timeout_secs, 30);
    }

    #[test]
    fn test_parse_rest_config() {
        let toml = r#"
[repository]
type = "supabase"

[rest]
base_url = "https://planner.example.org/api"
api_key = "secret"
timeout_secs = 5
schema = "flexwise"
"#;

        let config: RepositoryConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Rest);
        assert_eq!(config.rest.api_key.as_deref(), Some("secret"));
        assert_eq!(config.rest.timeout_secs, 5);
        assert_eq!(config.rest.schema.as_deref(), Some("flexwise"));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let toml = r#"
[repository]
type = "postgres"
"#;
        let config: RepositoryConfig = toml::from_str(toml).unwrap();
        assert!(config.repository_type().is_err());
    }

    #[cfg(feature = "rest-repo")]
    #[test]
    fn test_rest_requires_base_url() {
        let toml = r#"
[repository]
type = "rest"
"#;

        let config: RepositoryConfig = toml::from_str(toml).unwrap();
        assert!(config.to_rest_config().is_err());
    }
}

//! Repository selection for the composition root.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::repo_config::RepositoryConfig;
use super::repositories::LocalRepository;
#[cfg(feature = "rest-repo")]
use super::repositories::{RestConfig, RestRepository};
use super::repository::{FullRepository, RepositoryError, RepositoryResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// In-memory local repository
    Local,
    /// Supabase-style REST backend
    Rest,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Accepts "local", and "rest", "http" or "supabase" for the REST backend.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "memory" => Ok(Self::Local),
            "rest" | "http" | "supabase" => Ok(Self::Rest),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// `REPOSITORY_TYPE` when set and valid; otherwise REST if
    /// `SCHEDULER_API_URL` is set, else Local.
    pub fn from_env() -> Self {
        if let Ok(val) = std::env::var("REPOSITORY_TYPE") {
            return val.parse().unwrap_or(Self::Local);
        }

        if std::env::var("SCHEDULER_API_URL").is_ok_and(|url| !url.trim().is_empty()) {
            Self::Rest
        } else {
            Self::Local
        }
    }
}

/// Creates repositories behind `Arc<dyn FullRepository>`.
///
/// # Example
/// ```
/// use flexwise_scheduler::db::{RepositoryFactory, RepositoryType};
///
/// let repo = RepositoryFactory::create(RepositoryType::Local).unwrap();
/// # let _ = repo;
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// REST repositories read their settings from the environment.
    pub fn create(repo_type: RepositoryType) -> RepositoryResult<Arc<dyn FullRepository>> {
        match repo_type {
            RepositoryType::Local => Ok(Self::create_local()),
            RepositoryType::Rest => {
                #[cfg(feature = "rest-repo")]
                {
                    let config = RestConfig::from_env().map_err(RepositoryError::configuration)?;
                    Self::create_rest(config)
                }
                #[cfg(not(feature = "rest-repo"))]
                {
                    Err(RepositoryError::configuration(
                        "REST repository feature not enabled",
                    ))
                }
            }
        }
    }

    pub fn create_local() -> Arc<dyn FullRepository> {
        Arc::new(LocalRepository::new())
    }

    #[cfg(feature = "rest-repo")]
    pub fn create_rest(config: RestConfig) -> RepositoryResult<Arc<dyn FullRepository>> {
        log::info!("Using REST repository at {}", config.base_url);
        Ok(Arc::new(RestRepository::new(config)?))
    }

    pub fn from_env() -> RepositoryResult<Arc<dyn FullRepository>> {
        Self::create(RepositoryType::from_env())
    }

    /// Environment overrides are applied on top of the file.
    pub fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        let config = RepositoryConfig::from_file(config_path)?.with_env_overrides();
        Self::from_repository_config(&config)
    }

    pub fn from_default_config() -> RepositoryResult<Arc<dyn FullRepository>> {
        let config = RepositoryConfig::from_default_location()?.with_env_overrides();
        Self::from_repository_config(&config)
    }

    pub fn from_repository_config(
        config: &RepositoryConfig,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        let repo_type = config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        match repo_type {
            RepositoryType::Local => Ok(Self::create_local()),
            RepositoryType::Rest => {
                #[cfg(feature = "rest-repo")]
                {
                    let rest = config.to_rest_config()?.ok_or_else(|| {
                        RepositoryError::configuration("REST repository requires [rest] settings")
                    })?;
                    Self::create_rest(rest)
                }
                #[cfg(not(feature = "rest-repo"))]
                {
                    Err(RepositoryError::configuration(
                        "REST repository feature not enabled",
                    ))
                }
            }
        }
    }
}

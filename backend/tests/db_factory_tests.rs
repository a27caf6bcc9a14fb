mod support;

use std::io::Write;

use flexwise_scheduler::db::repository::ScheduleRepository;
use flexwise_scheduler::db::{RepositoryConfig, RepositoryFactory, RepositoryType};
use support::with_scoped_env;

#[test]
fn test_repository_type_from_env_defaults_to_local() {
    with_scoped_env(
        &[("REPOSITORY_TYPE", None), ("SCHEDULER_API_URL", None)],
        || {
            assert_eq!(RepositoryType::from_env(), RepositoryType::Local);
        },
    );
}

#[test]
fn test_repository_type_from_env_explicit() {
    with_scoped_env(
        &[("REPOSITORY_TYPE", Some("rest")), ("SCHEDULER_API_URL", None)],
        || {
            assert_eq!(RepositoryType::from_env(), RepositoryType::Rest);
        },
    );
}

#[test]
fn test_repository_type_from_env_invalid_falls_back() {
    with_scoped_env(
        &[
            ("REPOSITORY_TYPE", Some("mainframe")),
            ("SCHEDULER_API_URL", Some("https://api.example.org")),
        ],
        || {
            assert_eq!(RepositoryType::from_env(), RepositoryType::Local);
        },
    );
}

#[test]
fn test_repository_type_from_api_url() {
    with_scoped_env(
        &[
            ("REPOSITORY_TYPE", None),
            ("SCHEDULER_API_URL", Some("https://api.example.org")),
        ],
        || {
            assert_eq!(RepositoryType::from_env(), RepositoryType::Rest);
        },
    );
}

#[test]
fn test_unknown_repository_type_is_rejected() {
    let err = "oracle".parse::<RepositoryType>().unwrap_err();
    assert!(err.contains("Unknown repository type"));
}

#[tokio::test]
async fn test_from_env_creates_local_repository() {
    let repo = with_scoped_env(
        &[("REPOSITORY_TYPE", Some("local")), ("SCHEDULER_API_URL", None)],
        RepositoryFactory::from_env,
    )
    .unwrap();
    assert!(repo.health_check().await.unwrap());
}

#[test]
fn test_config_file_selects_local() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[repository]\ntype = \"local\"").unwrap();

    let repo = with_scoped_env(&[("REPOSITORY_TYPE", None)], || {
        RepositoryFactory::from_config_file(file.path())
    });
    assert!(repo.is_ok());
}

#[test]
fn test_config_file_with_unknown_type_fails() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[repository]\ntype = \"cobol\"").unwrap();

    let result = with_scoped_env(&[("REPOSITORY_TYPE", None)], || {
        RepositoryFactory::from_config_file(file.path())
    });
    let err = result.err().expect("unknown type must fail");
    assert!(err.to_string().contains("Invalid repository type"));
}

#[test]
fn test_missing_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = RepositoryConfig::from_file(dir.path().join("repository.toml"));
    assert!(result.is_err());
}

#[test]
fn test_env_overrides_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[repository]\ntype = \"local\"\n\n[rest]\nbase_url = \"https://file.example.org\""
    )
    .unwrap();

    let config = with_scoped_env(
        &[
            ("REPOSITORY_TYPE", Some("rest")),
            ("SCHEDULER_API_URL", Some("https://env.example.org")),
            ("SCHEDULER_API_KEY", Some("secret")),
        ],
        || {
            RepositoryConfig::from_file(file.path())
                .unwrap()
                .with_env_overrides()
        },
    );

    assert_eq!(config.repository_type().unwrap(), RepositoryType::Rest);
    assert_eq!(config.rest.base_url, "https://env.example.org");
    assert_eq!(config.rest.api_key.as_deref(), Some("secret"));
    assert_eq!(config.rest.timeout_secs, 30);
}

//! Persistence collaborators of a draft session.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  DraftSession (services::draft_session)      │
//! └──────────────────────┬───────────────────────┘
//!                        │ Arc<dyn FullRepository>
//! ┌──────────────────────▼───────────────────────┐
//! │  ScheduleRepository + PublishRepository      │
//! └──────────┬─────────────────────────┬─────────┘
//!            │                         │
//!   ┌────────▼────────┐       ┌────────▼────────┐
//!   │ LocalRepository │       │ RestRepository  │
//!   │   (in-memory)   │       │  (rest-repo)    │
//!   └─────────────────┘       └─────────────────┘
//! ```
//!
//! The composition root picks the implementation through [`RepositoryFactory`],
//! from the environment or from `repository.toml`.

#[cfg(not(any(feature = "rest-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod checksum;
pub mod factory;
pub mod models;
pub mod repo_config;
pub mod repositories;
pub mod repository;

pub use checksum::{calculate_checksum, entries_checksum};
pub use factory::{RepositoryFactory, RepositoryType};
pub use models::{OperationOutcome, SlotCheckRequest, SlotCheckResponse};
pub use repo_config::RepositoryConfig;
pub use repositories::{LocalRepository, RepositoryCall};
#[cfg(feature = "rest-repo")]
pub use repositories::{RestConfig, RestRepository};
pub use repository::{
    ErrorContext, FullRepository, PublishRepository, RepositoryError, RepositoryResult,
    ScheduleRepository,
};

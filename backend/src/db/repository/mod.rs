//! Persistence collaborator contract.
//!
//! - [`error`]: error types for repository operations
//! - [`schedule`]: periods and draft entries
//! - [`publish`]: slot pre-checks and promotion of a draft to live
//!
//! Sessions take any [`FullRepository`]:
//!
//! ```ignore
//! async fn save<R: FullRepository + ?Sized>(repo: &R, entries: &[ScheduleEntry]) -> RepositoryResult<()> {
//!     repo.save_draft_entries(&school, &draft, entries).await?;
//!     repo.publish_draft(&school, &draft, "admin").await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod publish;
pub mod schedule;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use publish::PublishRepository;
pub use schedule::ScheduleRepository;

/// Everything a draft session needs from its backend.
///
/// Implemented automatically for any type implementing both traits.
pub trait FullRepository: ScheduleRepository + PublishRepository {}

impl<T> FullRepository for T where T: ScheduleRepository + PublishRepository {}

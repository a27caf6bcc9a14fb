//! Periods and draft entries.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::db::models::OperationOutcome;
use crate::models::{DraftId, Period, ScheduleEntry, SchoolId};

#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// - `Ok(true)` if the backend is reachable
    /// - `Ok(false)` if it answered but reports itself unhealthy
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Period grid of a school, in any order.
    async fn load_periods(&self, school_id: &SchoolId) -> RepositoryResult<Vec<Period>>;

    /// Current entries of a draft. Unknown drafts yield
    /// [`RepositoryError::NotFound`](super::RepositoryError::NotFound).
    async fn load_draft_entries(
        &self,
        school_id: &SchoolId,
        draft_id: &DraftId,
    ) -> RepositoryResult<Vec<ScheduleEntry>>;

    /// Replace the stored entries of a draft with `entries`.
    ///
    /// A backend that answers with `success = false` has not stored anything.
    async fn save_draft_entries(
        &self,
        school_id: &SchoolId,
        draft_id: &DraftId,
        entries: &[ScheduleEntry],
    ) -> RepositoryResult<OperationOutcome>;
}

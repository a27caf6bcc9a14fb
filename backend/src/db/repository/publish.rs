//! Slot pre-checks and publishing.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::db::models::{OperationOutcome, SlotCheckRequest, SlotCheckResponse};
use crate::models::{DraftId, SchoolId};

#[async_trait]
pub trait PublishRepository: Send + Sync {
    /// Server-side conflict pre-check for a candidate placement.
    ///
    /// Returns the conflicts the candidate would take part in on its slot.
    async fn check_slot(
        &self,
        school_id: &SchoolId,
        draft_id: &DraftId,
        request: &SlotCheckRequest,
    ) -> RepositoryResult<SlotCheckResponse>;

    /// Promote the stored draft to the live schedule.
    async fn publish_draft(
        &self,
        school_id: &SchoolId,
        draft_id: &DraftId,
        published_by: &str,
    ) -> RepositoryResult<OperationOutcome>;
}

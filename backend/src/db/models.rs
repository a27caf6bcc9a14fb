//! Wire types exchanged with persistence collaborators.

use serde::{Deserialize, Serialize};

use crate::models::{Conflict, PublishResult, ScheduleEntry};

/// `{ success, message }` answer of save and publish calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationOutcome {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

impl OperationOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl From<OperationOutcome> for PublishResult {
    fn from(outcome: OperationOutcome) -> Self {
        PublishResult {
            success: outcome.success,
            message: outcome.message,
        }
    }
}

/// Candidate placement sent for a server-side pre-check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotCheckRequest {
    pub entry: ScheduleEntry,
}

impl SlotCheckRequest {
    pub fn new(entry: ScheduleEntry) -> Self {
        Self { entry }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotCheckResponse {
    #[serde(default)]
    pub conflicts: Vec<Conflict>,
}

/// Save payload.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SaveDraftRequest<'a> {
    pub entries: &'a [ScheduleEntry],
}

/// Publish payload.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct PublishDraftRequest<'a> {
    pub published_by: &'a str,
}

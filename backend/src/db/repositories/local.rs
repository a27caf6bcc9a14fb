//! In-memory local repository.
//!
//! Stores periods, drafts and the live schedule of every school in memory.
//! Used by tests and local runs; the composition root injects it wherever a
//! real backend would go.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::algorithms::detect_conflicts;
use crate::db::checksum::entries_checksum;
use crate::db::models::{OperationOutcome, SlotCheckRequest, SlotCheckResponse};
use crate::db::repository::*;
use crate::models::{DraftId, Period, ReferenceData, ScheduleEntry, SchoolId};

/// One call received by the repository, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryCall {
    HealthCheck,
    LoadPeriods {
        school_id: SchoolId,
    },
    LoadDraftEntries {
        school_id: SchoolId,
        draft_id: DraftId,
    },
    SaveDraftEntries {
        school_id: SchoolId,
        draft_id: DraftId,
        entry_count: usize,
    },
    CheckSlot {
        school_id: SchoolId,
        draft_id: DraftId,
    },
    PublishDraft {
        school_id: SchoolId,
        draft_id: DraftId,
        published_by: String,
    },
}

impl RepositoryCall {
    /// Operation name, as used in error contexts.
    pub fn operation(&self) -> &'static str {
        match self {
            RepositoryCall::HealthCheck => "health_check",
            RepositoryCall::LoadPeriods { .. } => "load_periods",
            RepositoryCall::LoadDraftEntries { .. } => "load_draft_entries",
            RepositoryCall::SaveDraftEntries { .. } => "save_draft_entries",
            RepositoryCall::CheckSlot { .. } => "check_slot",
            RepositoryCall::PublishDraft { .. } => "publish_draft",
        }
    }
}

#[derive(Debug, Clone)]
struct StoredDraft {
    entries: Vec<ScheduleEntry>,
    checksum: String,
    saved_at: Option<DateTime<Utc>>,
}

/// The live schedule of a school after a publish.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveSchedule {
    pub draft_id: DraftId,
    pub entries: Vec<ScheduleEntry>,
    pub checksum: String,
    pub published_by: String,
    pub published_at: DateTime<Utc>,
}

type DraftKey = (SchoolId, DraftId);

struct LocalData {
    periods: HashMap<SchoolId, Vec<Period>>,
    references: HashMap<SchoolId, ReferenceData>,
    drafts: HashMap<DraftKey, StoredDraft>,
    live: HashMap<SchoolId, LiveSchedule>,
    calls: Vec<RepositoryCall>,

    // Failure simulation
    is_healthy: bool,
    reject_saves: bool,
    reject_publishes: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            periods: HashMap::new(),
            references: HashMap::new(),
            drafts: HashMap::new(),
            live: HashMap::new(),
            calls: Vec::new(),
            is_healthy: true,
            reject_saves: false,
            reject_publishes: false,
        }
    }
}

/// In-memory repository.
///
/// Clones share the same storage, so a test can keep one handle for
/// assertions while a session owns another.
///
/// # Example
/// ```
/// use flexwise_scheduler::db::repositories::LocalRepository;
/// use flexwise_scheduler::models::{ScheduleEntry, SchoolId};
///
/// let repo = LocalRepository::new();
/// let school = SchoolId::from("school-1");
/// let draft = repo.create_draft(&school, vec![ScheduleEntry::period_slot(1, "p1")]);
/// assert_eq!(repo.draft_entries(&school, &draft).map(|e| e.len()), Some(1));
/// ```
#[derive(Clone, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh random draft id.
    pub fn new_draft_id() -> DraftId {
        DraftId::new(Uuid::new_v4().to_string())
    }

    // ==================== Seeding ====================

    pub fn seed_periods(&self, school_id: &SchoolId, periods: Vec<Period>) {
        self.data.write().periods.insert(school_id.clone(), periods);
    }

    /// Reference data used by [`PublishRepository::check_slot`].
    pub fn seed_references(&self, school_id: &SchoolId, references: ReferenceData) {
        self.data
            .write()
            .references
            .insert(school_id.clone(), references);
    }

    /// Store a draft as if it had been saved earlier.
    pub fn seed_draft(
        &self,
        school_id: &SchoolId,
        draft_id: &DraftId,
        entries: Vec<ScheduleEntry>,
    ) {
        let checksum = entries_checksum(&entries).unwrap_or_default();
        self.data.write().drafts.insert(
            (school_id.clone(), draft_id.clone()),
            StoredDraft {
                entries,
                checksum,
                saved_at: None,
            },
        );
    }

    /// Seed a draft under a fresh id and return the id.
    pub fn create_draft(&self, school_id: &SchoolId, entries: Vec<ScheduleEntry>) -> DraftId {
        let draft_id = Self::new_draft_id();
        self.seed_draft(school_id, &draft_id, entries);
        draft_id
    }

    // ==================== Failure simulation ====================

    /// While unhealthy every call except `health_check` fails with a
    /// connection error.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Answer saves with `success = false` without storing anything.
    pub fn set_reject_saves(&self, reject: bool) {
        self.data.write().reject_saves = reject;
    }

    /// Answer publishes with `success = false` without going live.
    pub fn set_reject_publishes(&self, reject: bool) {
        self.data.write().reject_publishes = reject;
    }

    // ==================== Inspection ====================

    pub fn calls(&self) -> Vec<RepositoryCall> {
        self.data.read().calls.clone()
    }

    /// Operation names of [`calls`](Self::calls), in order.
    pub fn call_names(&self) -> Vec<&'static str> {
        self.data.read().calls.iter().map(|c| c.operation()).collect()
    }

    pub fn clear_calls(&self) {
        self.data.write().calls.clear();
    }

    pub fn draft_entries(
        &self,
        school_id: &SchoolId,
        draft_id: &DraftId,
    ) -> Option<Vec<ScheduleEntry>> {
        self.data
            .read()
            .drafts
            .get(&(school_id.clone(), draft_id.clone()))
            .map(|d| d.entries.clone())
    }

    pub fn draft_checksum(&self, school_id: &SchoolId, draft_id: &DraftId) -> Option<String> {
        self.data
            .read()
            .drafts
            .get(&(school_id.clone(), draft_id.clone()))
            .map(|d| d.checksum.clone())
    }

    /// When the draft was last written through `save_draft_entries`.
    pub fn last_saved_at(&self, school_id: &SchoolId, draft_id: &DraftId) -> Option<DateTime<Utc>> {
        self.data
            .read()
            .drafts
            .get(&(school_id.clone(), draft_id.clone()))
            .and_then(|d| d.saved_at)
    }

    pub fn live_schedule(&self, school_id: &SchoolId) -> Option<LiveSchedule> {
        self.data.read().live.get(school_id).cloned()
    }

    pub fn draft_count(&self) -> usize {
        self.data.read().drafts.len()
    }

    /// Drop all stored data and the call journal. Failure toggles are kept.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            reject_saves: data.reject_saves,
            reject_publishes: data.reject_publishes,
            ..Default::default()
        };
    }

    /// Journal the call, then fail if the repository is unhealthy.
    fn record(&self, call: RepositoryCall) -> RepositoryResult<()> {
        let mut data = self.data.write();
        let operation = call.operation();
        data.calls.push(call);
        if !data.is_healthy {
            return Err(RepositoryError::connection_with_context(
                "Backend is not healthy",
                ErrorContext::new(operation),
            ));
        }
        Ok(())
    }

    fn draft_not_found(
        operation: &str,
        school_id: &SchoolId,
        draft_id: &DraftId,
    ) -> RepositoryError {
        RepositoryError::not_found_with_context(
            format!("Draft {} not found", draft_id),
            ErrorContext::new(operation),
        )
        .for_draft(school_id, draft_id)
    }
}

#[async_trait]
impl ScheduleRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let mut data = self.data.write();
        data.calls.push(RepositoryCall::HealthCheck);
        Ok(data.is_healthy)
    }

    async fn load_periods(&self, school_id: &SchoolId) -> RepositoryResult<Vec<Period>> {
        self.record(RepositoryCall::LoadPeriods {
            school_id: school_id.clone(),
        })?;
        let data = self.data.read();
        Ok(data.periods.get(school_id).cloned().unwrap_or_default())
    }

    async fn load_draft_entries(
        &self,
        school_id: &SchoolId,
        draft_id: &DraftId,
    ) -> RepositoryResult<Vec<ScheduleEntry>> {
        self.record(RepositoryCall::LoadDraftEntries {
            school_id: school_id.clone(),
            draft_id: draft_id.clone(),
        })?;
        let data = self.data.read();
        data.drafts
            .get(&(school_id.clone(), draft_id.clone()))
            .map(|d| d.entries.clone())
            .ok_or_else(|| Self::draft_not_found("load_draft_entries", school_id, draft_id))
    }

    async fn save_draft_entries(
        &self,
        school_id: &SchoolId,
        draft_id: &DraftId,
        entries: &[ScheduleEntry],
    ) -> RepositoryResult<OperationOutcome> {
        self.record(RepositoryCall::SaveDraftEntries {
            school_id: school_id.clone(),
            draft_id: draft_id.clone(),
            entry_count: entries.len(),
        })?;

        let checksum = entries_checksum(entries)?;
        let mut data = self.data.write();
        if data.reject_saves {
            return Ok(OperationOutcome::rejected("Save rejected by backend"));
        }

        data.drafts.insert(
            (school_id.clone(), draft_id.clone()),
            StoredDraft {
                entries: entries.to_vec(),
                checksum,
                saved_at: Some(Utc::now()),
            },
        );
        Ok(OperationOutcome::ok(format!("Saved {} entries", entries.len())))
    }
}

#[async_trait]
impl PublishRepository for LocalRepository {
    async fn check_slot(
        &self,
        school_id: &SchoolId,
        draft_id: &DraftId,
        request: &SlotCheckRequest,
    ) -> RepositoryResult<SlotCheckResponse> {
        self.record(RepositoryCall::CheckSlot {
            school_id: school_id.clone(),
            draft_id: draft_id.clone(),
        })?;

        let data = self.data.read();
        let candidate = &request.entry;
        let lesson = candidate.lesson_ref();
        // A candidate with a stored lesson's reference is a move of that lesson.
        let mut entries: Vec<ScheduleEntry> = data
            .drafts
            .get(&(school_id.clone(), draft_id.clone()))
            .map(|d| d.entries.clone())
            .unwrap_or_default();
        entries.retain(|e| e.lesson_ref() != lesson);
        entries.push(candidate.clone());

        let references = data.references.get(school_id).cloned().unwrap_or_default();
        let conflicts = detect_conflicts(&entries, &references)
            .into_iter()
            .filter(|c| c.affects_lesson(&lesson))
            .collect();

        Ok(SlotCheckResponse { conflicts })
    }

    async fn publish_draft(
        &self,
        school_id: &SchoolId,
        draft_id: &DraftId,
        published_by: &str,
    ) -> RepositoryResult<OperationOutcome> {
        self.record(RepositoryCall::PublishDraft {
            school_id: school_id.clone(),
            draft_id: draft_id.clone(),
            published_by: published_by.to_string(),
        })?;

        let mut data = self.data.write();
        if data.reject_publishes {
            return Ok(OperationOutcome::rejected("Publish rejected by backend"));
        }

        let draft = data
            .drafts
            .get(&(school_id.clone(), draft_id.clone()))
            .cloned()
            .ok_or_else(|| Self::draft_not_found("publish_draft", school_id, draft_id))?;

        data.live.insert(
            school_id.clone(),
            LiveSchedule {
                draft_id: draft_id.clone(),
                entries: draft.entries,
                checksum: draft.checksum,
                published_by: published_by.to_string(),
                published_at: Utc::now(),
            },
        );
        Ok(OperationOutcome::ok(format!(
            "Draft {} published by {}",
            draft_id, published_by
        )))
    }
}

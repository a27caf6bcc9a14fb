//! Draft lifecycle of one editing session.
//!
//! `Uninitialized → Loaded → {Editing ⇄ Saving} → Published`
//!
//! The session owns the [`EntryStore`] of one school and draft and talks to an
//! injected repository for load, save, slot check and publish. Collaborator
//! failures never surface as `Err`: they are recorded in [`DraftSession::error`]
//! and reported through the boolean or [`PublishResult`] return values.
//!
//! All methods take `&self`. The state lock is never held across an await, so
//! a session shared through `Arc` can be edited while a save is in flight.

use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;

use crate::algorithms::{detect_conflicts, get_available_courses_for_slot, has_blocking_conflicts};
use crate::db::models::SlotCheckRequest;
use crate::db::repository::FullRepository;
use crate::models::{
    ClassId, Conflict, ConflictId, Course, DataUpdate, DayId, DraftId, DraftPhase, Period,
    PeriodId, PublishResult, ReferenceData, RoomId, ScheduleEntry, SchoolId, SeedData, TeacherId,
    ViewMode,
};
use crate::store::{EntryStore, FilterSelection};

#[derive(Debug, Default)]
struct SessionState {
    phase: DraftPhase,
    store: EntryStore,
    is_draft_saved: bool,
    /// Number of save/publish calls awaiting the repository.
    in_flight: usize,
    error: Option<String>,
    view_mode: ViewMode,
    /// Bumped on every entry mutation.
    revision: u64,
}

impl SessionState {
    fn mark_edited(&mut self) {
        if self.phase != DraftPhase::Published {
            self.phase = DraftPhase::Editing;
        }
        self.is_draft_saved = false;
        self.revision += 1;
    }

    fn target(&self) -> Option<(SchoolId, DraftId)> {
        Some((self.store.school_id()?.clone(), self.store.draft_id()?.clone()))
    }
}

/// Snapshot taken when a save starts.
struct PendingSave {
    school_id: SchoolId,
    draft_id: DraftId,
    entries: Vec<ScheduleEntry>,
    revision: u64,
}

const NOT_INITIALIZED: &str = "Draft session is not initialized";

pub struct DraftSession<R: FullRepository + ?Sized> {
    repo: Arc<R>,
    state: RwLock<SessionState>,
}

impl<R: FullRepository + ?Sized> DraftSession<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            state: RwLock::new(SessionState::default()),
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repo
    }

    // ==================== Lifecycle ====================

    /// Seed the session with already fetched data.
    ///
    /// A set `published_by` opens the draft as published.
    pub fn initialize(
        &self,
        school_id: SchoolId,
        draft_id: DraftId,
        published_by: Option<String>,
        seed: SeedData,
    ) {
        let mut state = self.state.write();
        state.phase = if published_by.is_some() {
            DraftPhase::Published
        } else {
            DraftPhase::Loaded
        };
        log::info!(
            "Initialized draft {} of school {} with {} entries ({})",
            draft_id,
            school_id,
            seed.entries.len(),
            state.phase.as_str()
        );
        state.store.initialize(school_id, draft_id, published_by, seed);
        state.is_draft_saved = true;
        state.error = None;
        state.revision += 1;
    }

    /// Fetch periods and draft entries, then initialize.
    ///
    /// On failure the previous state is kept and `false` is returned.
    pub async fn load(&self, school_id: SchoolId, draft_id: DraftId) -> bool {
        {
            let mut state = self.state.write();
            state.in_flight += 1;
            state.error = None;
        }

        let result = async {
            let periods = self.repo.load_periods(&school_id).await?;
            let entries = self.repo.load_draft_entries(&school_id, &draft_id).await?;
            Ok::<_, crate::db::RepositoryError>(SeedData::new(periods, entries))
        }
        .await;

        match result {
            Ok(seed) => {
                self.initialize(school_id, draft_id, None, seed);
                self.state.write().in_flight -= 1;
                true
            }
            Err(e) => {
                log::warn!("Failed to load draft {} of school {}: {}", draft_id, school_id, e);
                let mut state = self.state.write();
                state.in_flight -= 1;
                state.error = Some(format!("Failed to load draft: {}", e));
                false
            }
        }
    }

    /// Merge refreshed upstream data. Filters and the saved flag are untouched.
    pub fn update_data(&self, update: DataUpdate) {
        self.state.write().store.update_data(update);
    }

    /// Save the current entries. Returns whether the save succeeded.
    ///
    /// The entries are captured when the call starts. Edits made while the
    /// save is awaiting leave the draft unsaved.
    pub async fn persist_draft(&self) -> bool {
        let Some(pending) = self.begin_save() else {
            return false;
        };

        let result = self
            .repo
            .save_draft_entries(&pending.school_id, &pending.draft_id, &pending.entries)
            .await;

        let mut state = self.state.write();
        state.in_flight -= 1;
        if state.phase == DraftPhase::Saving {
            state.phase = DraftPhase::Editing;
        }

        match result {
            Ok(outcome) if outcome.success => {
                if state.revision == pending.revision {
                    state.is_draft_saved = true;
                }
                log::info!(
                    "Saved {} entries of draft {}",
                    pending.entries.len(),
                    pending.draft_id
                );
                true
            }
            Ok(outcome) => {
                log::warn!("Save of draft {} rejected: {}", pending.draft_id, outcome.message);
                state.error = Some(format!("Failed to save draft: {}", outcome.message));
                false
            }
            Err(e) => {
                log::warn!("Failed to save draft {}: {}", pending.draft_id, e);
                state.error = Some(format!("Failed to save draft: {}", e));
                false
            }
        }
    }

    fn begin_save(&self) -> Option<PendingSave> {
        let mut state = self.state.write();
        let Some((school_id, draft_id)) = state.target() else {
            state.error = Some(NOT_INITIALIZED.to_string());
            return None;
        };
        state.error = None;
        state.in_flight += 1;
        if state.phase != DraftPhase::Published {
            state.phase = DraftPhase::Saving;
        }
        Some(PendingSave {
            school_id,
            draft_id,
            entries: state.store.entries().to_vec(),
            revision: state.revision,
        })
    }

    /// Promote the draft to live, saving pending edits first.
    pub async fn publish(&self, published_by: &str) -> PublishResult {
        let (target, needs_save) = {
            let mut state = self.state.write();
            if state.phase == DraftPhase::Published {
                return PublishResult::failed("Draft is already published");
            }
            state.error = None;
            (state.target(), !state.is_draft_saved)
        };
        let Some((school_id, draft_id)) = target else {
            self.state.write().error = Some(NOT_INITIALIZED.to_string());
            return PublishResult::failed(NOT_INITIALIZED);
        };

        if needs_save && !self.persist_draft().await {
            let reason = self.error().unwrap_or_default();
            return PublishResult::failed(format!("Draft was not published: {}", reason));
        }

        self.state.write().in_flight += 1;
        let result = self
            .repo
            .publish_draft(&school_id, &draft_id, published_by)
            .await;

        let mut state = self.state.write();
        state.in_flight -= 1;
        match result {
            Ok(outcome) if outcome.success => {
                state.phase = DraftPhase::Published;
                state.store.set_published_by(Some(published_by.to_string()));
                log::info!(
                    "Published draft {} of school {} by {}",
                    draft_id,
                    school_id,
                    published_by
                );
                outcome.into()
            }
            Ok(outcome) => {
                log::warn!("Publish of draft {} rejected: {}", draft_id, outcome.message);
                state.error = Some(format!("Failed to publish draft: {}", outcome.message));
                PublishResult::failed(outcome.message)
            }
            Err(e) => {
                log::warn!("Failed to publish draft {}: {}", draft_id, e);
                let message = format!("Failed to publish draft: {}", e);
                state.error = Some(message.clone());
                PublishResult::failed(message)
            }
        }
    }

    /// [`publish`](Self::publish), refused while error-severity conflicts not
    /// in `ignored` remain.
    pub async fn publish_checked(
        &self,
        published_by: &str,
        refs: &ReferenceData,
        ignored: &HashSet<ConflictId>,
    ) -> PublishResult {
        let conflicts = self.conflicts(refs);
        if has_blocking_conflicts(&conflicts, ignored) {
            let blocking = conflicts
                .iter()
                .filter(|c| c.is_blocking() && !ignored.contains(&c.id))
                .count();
            log::warn!("Publish refused: {} blocking conflict(s)", blocking);
            return PublishResult::failed(format!(
                "Draft has {} blocking conflict(s)",
                blocking
            ));
        }
        self.publish(published_by).await
    }

    /// Ask the backend which conflicts a candidate placement would cause.
    ///
    /// Failures are recorded in `error` and yield no conflicts.
    pub async fn check_slot(&self, request: SlotCheckRequest) -> Vec<Conflict> {
        let target = self.state.read().target();
        let Some((school_id, draft_id)) = target else {
            self.state.write().error = Some(NOT_INITIALIZED.to_string());
            return Vec::new();
        };

        match self.repo.check_slot(&school_id, &draft_id, &request).await {
            Ok(response) => response.conflicts,
            Err(e) => {
                log::warn!("Slot check for draft {} failed: {}", draft_id, e);
                self.state.write().error = Some(format!("Slot check failed: {}", e));
                Vec::new()
            }
        }
    }

    // ==================== Editing ====================

    /// Insert or replace by `(day, period, start, end)`. Marks the draft dirty.
    pub fn upsert_entry(&self, entry: ScheduleEntry) -> usize {
        let mut state = self.state.write();
        let index = state.store.upsert_entry(entry);
        state.mark_edited();
        index
    }

    /// Remove by position. Out-of-range indices change nothing.
    pub fn remove_entry(&self, index: usize) -> Option<ScheduleEntry> {
        let mut state = self.state.write();
        let removed = state.store.remove_entry(index);
        if removed.is_some() {
            state.mark_edited();
        }
        removed
    }

    pub fn set_selected_class(&self, class_id: Option<ClassId>) {
        self.state.write().store.set_selected_class(class_id);
    }

    pub fn set_selected_room(&self, room_id: Option<RoomId>) {
        self.state.write().store.set_selected_room(room_id);
    }

    pub fn toggle_teacher(&self, teacher_id: TeacherId) {
        self.state.write().store.toggle_teacher(teacher_id);
    }

    pub fn clear_filters(&self) {
        self.state.write().store.clear_filters();
    }

    pub fn set_view_mode(&self, view_mode: ViewMode) {
        self.state.write().view_mode = view_mode;
    }

    pub fn clear_error(&self) {
        self.state.write().error = None;
    }

    // ==================== Derived views ====================

    pub fn conflicts(&self, refs: &ReferenceData) -> Vec<Conflict> {
        detect_conflicts(self.state.read().store.entries(), refs)
    }

    pub fn available_courses<'a>(
        &self,
        day_id: DayId,
        period_id: &PeriodId,
        courses: &'a [Course],
    ) -> Vec<&'a Course> {
        get_available_courses_for_slot(day_id, period_id, courses)
    }

    /// Run `f` against the store under the read lock.
    pub fn with_store<T>(&self, f: impl FnOnce(&EntryStore) -> T) -> T {
        f(&self.state.read().store)
    }

    pub fn filtered_entries(&self) -> Vec<ScheduleEntry> {
        self.with_store(|s| s.filtered_entries().into_iter().cloned().collect())
    }

    pub fn period_entries(&self) -> Vec<ScheduleEntry> {
        self.with_store(|s| s.period_entries().into_iter().cloned().collect())
    }

    pub fn adhoc_entries(&self) -> Vec<ScheduleEntry> {
        self.with_store(|s| s.adhoc_entries().into_iter().cloned().collect())
    }

    // ==================== Accessors ====================

    pub fn phase(&self) -> DraftPhase {
        self.state.read().phase
    }

    pub fn is_draft_saved(&self) -> bool {
        self.state.read().is_draft_saved
    }

    /// True while a load, save or publish is awaiting the repository.
    pub fn is_loading(&self) -> bool {
        self.state.read().in_flight > 0
    }

    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.state.read().view_mode
    }

    pub fn entries(&self) -> Vec<ScheduleEntry> {
        self.with_store(|s| s.entries().to_vec())
    }

    pub fn periods(&self) -> Vec<Period> {
        self.with_store(|s| s.periods().to_vec())
    }

    pub fn filters(&self) -> FilterSelection {
        self.with_store(|s| s.filters().clone())
    }

    pub fn school_id(&self) -> Option<SchoolId> {
        self.with_store(|s| s.school_id().cloned())
    }

    pub fn draft_id(&self) -> Option<DraftId> {
        self.with_store(|s| s.draft_id().cloned())
    }

    pub fn published_by(&self) -> Option<String> {
        self.with_store(|s| s.published_by().map(str::to_string))
    }

    pub fn is_published(&self) -> bool {
        self.phase() == DraftPhase::Published
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;

    fn session() -> (Arc<LocalRepository>, DraftSession<LocalRepository>) {
        let repo = Arc::new(LocalRepository::new());
        let seed = vec![ScheduleEntry::period_slot(1, "p1")];
        repo.seed_draft(&SchoolId::from("s1"), &DraftId::from("d1"), seed.clone());
        let session = DraftSession::new(repo.clone());
        session.initialize(
            SchoolId::from("s1"),
            DraftId::from("d1"),
            None,
            SeedData::new(vec![], seed),
        );
        (repo, session)
    }

    #[test]
    fn test_initialize_sets_loaded_and_saved() {
        let (_, session) = session();
        assert_eq!(session.phase(), DraftPhase::Loaded);
        assert!(session.is_draft_saved());
        assert!(!session.is_loading());
        assert_eq!(session.entries().len(), 1);
    }

    #[test]
    fn test_initialize_with_publisher_is_published() {
        let repo = Arc::new(LocalRepository::new());
        let session = DraftSession::new(repo);
        session.initialize(
            SchoolId::from("s1"),
            DraftId::from("d1"),
            Some("admin".to_string()),
            SeedData::default(),
        );
        assert!(session.is_published());
        assert_eq!(session.published_by().as_deref(), Some("admin"));
    }

    #[test]
    fn test_edits_mark_dirty() {
        let (_, session) = session();
        session.upsert_entry(ScheduleEntry::period_slot(1, "p2"));
        assert_eq!(session.phase(), DraftPhase::Editing);
        assert!(!session.is_draft_saved());
    }

    #[test]
    fn test_failed_remove_keeps_saved_flag() {
        let (_, session) = session();
        assert!(session.remove_entry(9).is_none());
        assert!(session.is_draft_saved());
        assert_eq!(session.phase(), DraftPhase::Loaded);
    }

    #[test]
    fn test_update_data_keeps_saved_flag() {
        let (_, session) = session();
        session.update_data(DataUpdate::entries(vec![]));
        assert!(session.is_draft_saved());
        assert!(session.entries().is_empty());
    }

    #[tokio::test]
    async fn test_persist_then_saved() {
        let (repo, session) = session();
        session.upsert_entry(ScheduleEntry::period_slot(1, "p2"));
        assert!(session.persist_draft().await);
        assert!(session.is_draft_saved());
        assert_eq!(session.phase(), DraftPhase::Editing);
        assert_eq!(
            repo.draft_entries(&SchoolId::from("s1"), &DraftId::from("d1"))
                .map(|e| e.len()),
            Some(2)
        );
    }

    #[tokio::test]
    async fn test_persist_failure_is_captured() {
        let (repo, session) = session();
        session.upsert_entry(ScheduleEntry::period_slot(1, "p2"));
        repo.set_healthy(false);
        assert!(!session.persist_draft().await);
        assert!(!session.is_draft_saved());
        assert!(session.error().unwrap().contains("Failed to save draft"));
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_uninitialized_session_reports_error() {
        let session = DraftSession::new(Arc::new(LocalRepository::new()));
        assert!(!session.persist_draft().await);
        assert_eq!(session.error().as_deref(), Some(NOT_INITIALIZED));
        let result = session.publish("admin").await;
        assert!(!result.success);
    }

    #[tokio::test]
    async fn test_publish_twice_is_refused() {
        let (_, session) = session();
        assert!(session.publish("admin").await.success);
        assert!(session.is_published());
        let second = session.publish("admin").await;
        assert!(!second.success);
        assert_eq!(session.published_by().as_deref(), Some("admin"));
    }

    #[tokio::test]
    async fn test_publish_of_unsaved_draft_is_reported() {
        let repo = Arc::new(LocalRepository::new());
        let session = DraftSession::new(repo);
        session.initialize(
            SchoolId::from("s1"),
            DraftId::from("missing"),
            None,
            SeedData::default(),
        );
        let result = session.publish("admin").await;
        assert!(!result.success);
        assert!(!session.is_published());
        assert!(session.error().unwrap().contains("Failed to publish draft"));
    }
}

//! Entry store: the canonical list of draft entries of one editing session,
//! plus the planner's filter selections.
//!
//! The store is a plain owned value. Derived views are recomputed on every
//! call, so they are always consistent with the current entries and filters.
//! Dirty tracking belongs to [`crate::services::DraftSession`]; mutating
//! methods report whether anything changed.

pub mod filters;

pub use filters::{
    apply_filters, matches_class, matches_room, matches_teachers, partition_by_schedule_type,
    FilterSelection,
};

use crate::models::{
    ClassId, DataUpdate, DraftId, Period, RoomId, ScheduleEntry, SchoolId, SeedData, TeacherId,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryStore {
    school_id: Option<SchoolId>,
    draft_id: Option<DraftId>,
    published_by: Option<String>,
    periods: Vec<Period>,
    entries: Vec<ScheduleEntry>,
    filters: FilterSelection,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set identity fields and replace periods and entries.
    ///
    /// Filter selections survive re-initialisation.
    pub fn initialize(
        &mut self,
        school_id: SchoolId,
        draft_id: DraftId,
        published_by: Option<String>,
        seed: SeedData,
    ) {
        self.school_id = Some(school_id);
        self.draft_id = Some(draft_id);
        self.published_by = published_by;
        self.periods = seed.periods;
        self.entries = seed.entries;
    }

    /// Merge upstream snapshots. Filters are untouched.
    pub fn update_data(&mut self, update: DataUpdate) {
        if let Some(periods) = update.periods {
            self.periods = periods;
        }
        if let Some(entries) = update.entries {
            self.entries = entries;
        }
    }

    /// Replace the entry with the same `(day, period, start, end)` key in
    /// place, or append. Returns the index the entry now occupies.
    pub fn upsert_entry(&mut self, entry: ScheduleEntry) -> usize {
        match self.entries.iter().position(|e| e.matches_key(&entry)) {
            Some(index) => {
                self.entries[index] = entry;
                // Collapse stale duplicates that share the key.
                let key = self.entries[index].key();
                let mut position = 0usize;
                self.entries.retain(|e| {
                    let keep = position == index || e.key() != key;
                    position += 1;
                    keep
                });
                index
            }
            None => {
                self.entries.push(entry);
                self.entries.len() - 1
            }
        }
    }

    /// Remove the entry at `index`. Out-of-range indices are ignored.
    pub fn remove_entry(&mut self, index: usize) -> Option<ScheduleEntry> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    pub fn set_selected_class(&mut self, class_id: Option<ClassId>) {
        self.filters.class_id = class_id;
    }

    pub fn set_selected_room(&mut self, room_id: Option<RoomId>) {
        self.filters.room_id = room_id;
    }

    pub fn toggle_teacher(&mut self, teacher_id: TeacherId) {
        self.filters.toggle_teacher(teacher_id);
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    pub fn set_published_by(&mut self, published_by: Option<String>) {
        self.published_by = published_by;
    }

    pub fn filtered_entries(&self) -> Vec<&ScheduleEntry> {
        apply_filters(&self.entries, &self.filters)
    }

    pub fn period_entries(&self) -> Vec<&ScheduleEntry> {
        partition_by_schedule_type(self.filtered_entries()).0
    }

    pub fn adhoc_entries(&self) -> Vec<&ScheduleEntry> {
        partition_by_schedule_type(self.filtered_entries()).1
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn filters(&self) -> &FilterSelection {
        &self.filters
    }

    pub fn school_id(&self) -> Option<&SchoolId> {
        self.school_id.as_ref()
    }

    pub fn draft_id(&self) -> Option<&DraftId> {
        self.draft_id.as_ref()
    }

    pub fn published_by(&self) -> Option<&str> {
        self.published_by.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

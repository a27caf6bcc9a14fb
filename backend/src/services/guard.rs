//! Read-only enforcement for published drafts.
//!
//! The session itself accepts edits in any phase. Callers that must not
//! touch a published draft go through [`EditGuard`] instead.

use crate::db::repository::FullRepository;
use crate::models::ScheduleEntry;

use super::draft_session::DraftSession;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Draft is read-only: published by {published_by}")]
    ReadOnly { published_by: String },
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Rejects mutations once the session's draft has a publisher.
pub struct EditGuard<'a, R: FullRepository + ?Sized> {
    session: &'a DraftSession<R>,
}

impl<'a, R: FullRepository + ?Sized> EditGuard<'a, R> {
    pub fn new(session: &'a DraftSession<R>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &'a DraftSession<R> {
        self.session
    }

    pub fn is_read_only(&self) -> bool {
        self.session.published_by().is_some()
    }

    fn ensure_writable(&self) -> SessionResult<()> {
        match self.session.published_by() {
            Some(published_by) => Err(SessionError::ReadOnly { published_by }),
            None => Ok(()),
        }
    }

    pub fn try_upsert_entry(&self, entry: ScheduleEntry) -> SessionResult<usize> {
        self.ensure_writable()?;
        Ok(self.session.upsert_entry(entry))
    }

    /// `Ok(None)` for an out-of-range index, as with the session.
    pub fn try_remove_entry(&self, index: usize) -> SessionResult<Option<ScheduleEntry>> {
        self.ensure_writable()?;
        Ok(self.session.remove_entry(index))
    }
}

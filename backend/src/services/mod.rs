//! Session layer: draft lifecycle orchestration over the entry store, the
//! conflict detector and an injected repository.

pub mod draft_session;
pub mod guard;

pub use draft_session::DraftSession;
pub use guard::{EditGuard, SessionError, SessionResult};

//! # FlexWise Scheduler
//!
//! Draft timetable state and conflict detection for the FlexWise school planner.
//!
//! ## Architecture
//!
//! - [`models`]: identifiers, reference entities, schedule entries and conflicts
//! - [`parsing`]: normalisation of heterogeneous upstream records
//! - [`store`]: the entry store of one draft plus planner filters
//! - [`algorithms`]: conflict detection and slot availability
//! - [`db`]: persistence collaborator contract with local and REST backends
//! - [`services`]: the draft lifecycle session and its read-only guard
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use flexwise_scheduler::db::LocalRepository;
//! use flexwise_scheduler::models::{DraftId, ScheduleEntry, SchoolId, SeedData};
//! use flexwise_scheduler::services::DraftSession;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let session = DraftSession::new(Arc::new(LocalRepository::new()));
//! session.initialize(SchoolId::from("s1"), DraftId::from("d1"), None, SeedData::default());
//! session.upsert_entry(ScheduleEntry::period_slot(1, "p1").with_teachers(["t1"]));
//! assert!(!session.is_draft_saved());
//! assert!(session.publish("admin").await.success);
//! # }
//! ```

// RepositoryError carries rich context
#![allow(clippy::result_large_err)]

pub mod algorithms;
pub mod db;
pub mod models;
pub mod parsing;
pub mod services;
pub mod store;

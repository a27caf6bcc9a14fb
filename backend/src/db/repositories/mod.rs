//! Repository implementations.
//!
//! - `local`: in-memory implementation for tests and local runs
//! - `rest`: HTTP implementation (feature `rest-repo`)
pub mod local;
#[cfg(feature = "rest-repo")]
pub mod rest;

pub use local::{LiveSchedule, LocalRepository, RepositoryCall};
#[cfg(feature = "rest-repo")]
pub use rest::{RestConfig, RestRepository};

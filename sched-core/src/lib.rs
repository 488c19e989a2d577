//! Scheduler Storage Library - Filesystem-backed persistence for schedule data.
//!
//! This library provides:
//! - Project store (named JSON documents under a `list/` directory)
//! - Legacy default schedule (single document with one-deep backup)
//! - Filename sanitization and local ISO-8601 timestamps

mod error;
pub mod legacy;
pub mod names;
pub mod store;
mod time;

pub use error::StoreError;
pub use legacy::DefaultSchedule;
pub use names::sanitize_name;
pub use store::{ProjectEntry, ProjectStore, SaveReceipt};
pub use time::{iso_timestamp, now_iso};

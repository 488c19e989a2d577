//! Shared application state for the server.

use std::path::PathBuf;
use std::sync::Arc;

use sched_core::{DefaultSchedule, ProjectStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Named project documents under `<data_dir>/list/`.
    pub store: Arc<ProjectStore>,
    /// The single legacy schedule document with its backup.
    pub legacy: Arc<DefaultSchedule>,
    /// Front-end bundle directory, resolved once at startup.
    pub static_dir: PathBuf,
}

//! Startup configuration.
//!
//! All directory candidates are resolved exactly once here, so the rest of
//! the daemon never probes the filesystem for paths at request time.

use std::path::{Path, PathBuf};
use tracing::warn;

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `schedule.json`, `list/` and `server_port.txt`.
    pub data_dir: PathBuf,
    /// Directory the front-end is served from.
    pub static_dir: PathBuf,
    /// Ordered candidates for one-time legacy data migration.
    pub legacy_dirs: Vec<PathBuf>,
    /// Base port; `base_port..base_port + 10` is probed at startup.
    pub base_port: u16,
}

impl Config {
    /// Resolve the configuration from CLI inputs.
    ///
    /// The static directory is picked from `static_dir_override`, else the
    /// first of `[data_dir, data_dir/web]` containing an `index.html`. If
    /// none qualifies the data dir is used anyway, with a warning - the
    /// API still works without a front-end bundle.
    pub fn resolve(
        data_dir: PathBuf,
        static_dir_override: Option<PathBuf>,
        legacy_dirs: Vec<PathBuf>,
        base_port: u16,
    ) -> Self {
        let static_dir = static_dir_override.unwrap_or_else(|| {
            let candidates = [data_dir.clone(), data_dir.join("web")];
            match candidates.iter().find(|dir| has_front_end(dir)) {
                Some(dir) => dir.clone(),
                None => {
                    warn!(
                        "No index.html found under {:?} or {:?}; serving from the data dir",
                        candidates[0], candidates[1]
                    );
                    data_dir.clone()
                }
            }
        });

        Self {
            data_dir,
            static_dir,
            legacy_dirs,
            base_port,
        }
    }

    /// Path of the side file the tray controller reads the bound port from.
    pub fn port_file(&self) -> PathBuf {
        self.data_dir.join("server_port.txt")
    }
}

fn has_front_end(dir: &Path) -> bool {
    dir.join("index.html").is_file()
}

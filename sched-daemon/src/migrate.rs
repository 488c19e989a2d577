//! One-time legacy data migration.
//!
//! Older installs kept `schedule.json` in a different folder. If the data
//! directory has no schedule yet, the first candidate that holds one is
//! copied in. Runs once at startup; any failure is logged and swallowed so
//! it can never block the server from coming up.

use std::fs;
use std::path::Path;
use tracing::{info, warn};

use sched_core::legacy::LEGACY_FILE_NAME;

/// Copy a legacy schedule file into `destination` if it is absent.
/// Returns whether a migration actually happened.
pub fn migrate_legacy_schedule(destination: &Path, candidates: &[impl AsRef<Path>]) -> bool {
    if destination.exists() {
        return false;
    }

    for candidate in candidates {
        let source = candidate.as_ref().join(LEGACY_FILE_NAME);
        if !source.is_file() {
            continue;
        }
        match fs::copy(&source, destination) {
            Ok(_) => {
                info!("Migrated existing schedule from {:?}", source);
                return true;
            }
            Err(e) => {
                warn!("Migration from {:?} failed: {}", source, e);
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn copies_from_the_first_candidate_with_data() {
        let legacy_a = tempdir().expect("Failed to create temp dir");
        let legacy_b = tempdir().expect("Failed to create temp dir");
        let data = tempdir().expect("Failed to create temp dir");

        std::fs::write(legacy_b.path().join(LEGACY_FILE_NAME), r#"{"data":[1]}"#)
            .expect("write");

        let destination = data.path().join(LEGACY_FILE_NAME);
        let migrated = migrate_legacy_schedule(
            &destination,
            &[legacy_a.path(), legacy_b.path()],
        );

        assert!(migrated);
        let content = std::fs::read_to_string(&destination).expect("read");
        assert_eq!(content, r#"{"data":[1]}"#);
    }

    #[test]
    fn does_nothing_when_destination_exists() {
        let legacy = tempdir().expect("Failed to create temp dir");
        let data = tempdir().expect("Failed to create temp dir");

        std::fs::write(legacy.path().join(LEGACY_FILE_NAME), r#"{"data":[1]}"#)
            .expect("write");
        let destination = data.path().join(LEGACY_FILE_NAME);
        std::fs::write(&destination, r#"{"data":[2]}"#).expect("write");

        assert!(!migrate_legacy_schedule(&destination, &[legacy.path()]));
        let content = std::fs::read_to_string(&destination).expect("read");
        assert_eq!(content, r#"{"data":[2]}"#);
    }

    #[test]
    fn no_candidates_is_a_quiet_no_op() {
        let data = tempdir().expect("Failed to create temp dir");
        let destination = data.path().join(LEGACY_FILE_NAME);
        let candidates: &[&Path] = &[];
        assert!(!migrate_legacy_schedule(&destination, candidates));
        assert!(!destination.exists());
    }
}

//! Legacy default schedule - the single unnamed document that predates
//! named projects. Older clients still read and write it through the
//! `/api/schedule` endpoints, so it keeps its fixed path and its one-deep
//! `.bak` copy made before every overwrite.

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

use crate::error::StoreError;
use crate::store::{effective_save_time, lock_or_recover, write_json_atomic};

/// File names inside the data directory.
pub const LEGACY_FILE_NAME: &str = "schedule.json";
pub const BACKUP_FILE_NAME: &str = "schedule.json.bak";

/// The single-document schedule kept for backward compatibility.
pub struct DefaultSchedule {
    file: PathBuf,
    backup: PathBuf,
    write_lock: Mutex<()>,
}

impl DefaultSchedule {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            file: data_dir.join(LEGACY_FILE_NAME),
            backup: data_dir.join(BACKUP_FILE_NAME),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the primary document (used by startup migration).
    pub fn path(&self) -> &Path {
        &self.file
    }

    /// Load the document, or the canonical empty structure if none exists.
    pub fn load(&self) -> Result<Value, StoreError> {
        match fs::read_to_string(&self.file) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(json!({"data": [], "holidays": [], "lastSaved": null}))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrite the document, copying the previous generation to the
    /// backup file first. Returns the effective save timestamp.
    pub fn save(&self, doc: &Value) -> Result<Value, StoreError> {
        let _guard = lock_or_recover(&self.write_lock);

        if self.file.exists() {
            fs::copy(&self.file, &self.backup)?;
        }
        write_json_atomic(&self.file, doc)?;

        info!("Schedule updated and backed up");
        Ok(effective_save_time(doc))
    }

    /// Remove the document and its backup. Returns how many files were
    /// actually removed; a missing pair is not an error.
    pub fn clear(&self) -> Result<usize, StoreError> {
        let _guard = lock_or_recover(&self.write_lock);

        let mut count = 0;
        for path in [&self.file, &self.backup] {
            match fs::remove_file(path) {
                Ok(()) => count += 1,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn load_missing_returns_empty_structure() {
        let dir = tempdir().expect("Failed to create temp dir");
        let legacy = DefaultSchedule::new(dir.path());
        assert_eq!(
            legacy.load().expect("Failed to load"),
            json!({"data": [], "holidays": [], "lastSaved": null})
        );
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().expect("Failed to create temp dir");
        let legacy = DefaultSchedule::new(dir.path());
        let doc = json!({"data": [1], "holidays": [], "saveDate": "2024-02-02T10:00:00"});

        let saved = legacy.save(&doc).expect("Failed to save");
        assert_eq!(saved, json!("2024-02-02T10:00:00"));
        assert_eq!(legacy.load().expect("Failed to load"), doc);
    }

    #[test]
    fn backup_holds_the_previous_generation() {
        let dir = tempdir().expect("Failed to create temp dir");
        let legacy = DefaultSchedule::new(dir.path());
        let d1 = json!({"data": [1]});
        let d2 = json!({"data": [2]});

        legacy.save(&d1).expect("Failed to save d1");
        // No previous generation yet, so no backup after the first save.
        assert!(!dir.path().join(BACKUP_FILE_NAME).exists());

        legacy.save(&d2).expect("Failed to save d2");
        let backup: Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join(BACKUP_FILE_NAME))
                .expect("Failed to read backup"),
        )
        .expect("Backup is not valid JSON");
        assert_eq!(backup, d1);
        assert_eq!(legacy.load().expect("Failed to load"), d2);
    }

    #[test]
    fn clear_removes_document_and_backup() {
        let dir = tempdir().expect("Failed to create temp dir");
        let legacy = DefaultSchedule::new(dir.path());

        assert_eq!(legacy.clear().expect("Failed to clear"), 0);

        legacy.save(&json!({"data": [1]})).expect("Failed to save");
        legacy.save(&json!({"data": [2]})).expect("Failed to save");
        assert_eq!(legacy.clear().expect("Failed to clear"), 2);
        assert!(!dir.path().join(LEGACY_FILE_NAME).exists());
        assert!(!dir.path().join(BACKUP_FILE_NAME).exists());
    }
}

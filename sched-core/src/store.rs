//! Project store - named JSON documents in a `list/` directory.
//!
//! Each project is one pretty-printed JSON file keyed by its sanitized
//! name. Writers to the same name are serialized by an in-process mutex
//! and every write goes to a temp file followed by an atomic rename, so a
//! concurrent reader never observes a half-written document.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::SystemTime;
use tracing::{info, warn};

use crate::error::StoreError;
use crate::names::sanitize_name;
use crate::time::{iso_timestamp, now_iso};

use crate::legacy::LEGACY_FILE_NAME;

/// File extension for stored documents.
pub(crate) const DOC_EXT: &str = "json";

/// One row of a project listing.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectEntry {
    /// Display name (file stem).
    pub name: String,
    /// On-disk file name.
    pub filename: String,
    /// Modification time, local ISO-8601.
    pub modified: String,
    /// File size in bytes.
    pub size: u64,
}

/// Outcome of a successful save.
#[derive(Debug, Clone)]
pub struct SaveReceipt {
    /// The sanitized name the document was stored under.
    pub name: String,
    /// `<name>.json`.
    pub filename: String,
    /// Effective save timestamp: the document's own `saveDate` when it
    /// carries a usable one, otherwise the current time.
    pub saved: Value,
}

/// Filesystem-backed store for named schedule documents.
pub struct ProjectStore {
    list_dir: PathBuf,
    /// Per-sanitized-name write locks. Entries are created on first write
    /// and kept for the process lifetime; the key space is tiny (one entry
    /// per project ever saved).
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ProjectStore {
    /// Open the store rooted at `data_dir`, creating `data_dir/list/`.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let list_dir = data_dir.as_ref().join("list");
        fs::create_dir_all(&list_dir)?;
        Ok(Self {
            list_dir,
            locks: Mutex::new(HashMap::new()),
        })
    }

    /// Directory holding the project files.
    pub fn list_dir(&self) -> &Path {
        &self.list_dir
    }

    fn file_path(&self, safe_name: &str) -> PathBuf {
        self.list_dir.join(format!("{safe_name}.{DOC_EXT}"))
    }

    fn write_lock(&self, safe_name: &str) -> Arc<Mutex<()>> {
        let mut locks = lock_or_recover(&self.locks);
        locks.entry(safe_name.to_string()).or_default().clone()
    }

    /// Enumerate all stored projects, newest modification first.
    ///
    /// A missing or empty directory yields an empty list, never an error.
    pub fn list(&self) -> Result<Vec<ProjectEntry>, StoreError> {
        let entries = match fs::read_dir(&self.list_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut projects: Vec<(SystemTime, ProjectEntry)> = Vec::new();
        for entry in entries {
            let entry = entry?;
            let filename = entry.file_name().to_string_lossy().into_owned();
            if !filename.ends_with(&format!(".{DOC_EXT}")) || filename == LEGACY_FILE_NAME {
                continue;
            }
            let meta = entry.metadata()?;
            if !meta.is_file() {
                continue;
            }
            let mtime = meta.modified()?;
            let name = filename
                .strip_suffix(&format!(".{DOC_EXT}"))
                .unwrap_or(&filename)
                .to_string();
            projects.push((
                mtime,
                ProjectEntry {
                    name,
                    filename,
                    modified: iso_timestamp(mtime),
                    size: meta.len(),
                },
            ));
        }

        projects.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(projects.into_iter().map(|(_, p)| p).collect())
    }

    /// Load a project's content, or `None` if no such project exists.
    pub fn load(&self, name: &str) -> Result<Option<Value>, StoreError> {
        let path = self.file_path(&sanitize_name(name));
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Save a document under `name`, replacing any previous content.
    pub fn save(&self, name: &str, doc: &Value) -> Result<SaveReceipt, StoreError> {
        let safe_name = sanitize_name(name);
        let path = self.file_path(&safe_name);

        let lock = self.write_lock(&safe_name);
        let _guard = lock_or_recover(&lock);
        write_json_atomic(&path, doc)?;

        info!("Project '{}' saved", safe_name);
        Ok(SaveReceipt {
            filename: format!("{safe_name}.{DOC_EXT}"),
            saved: effective_save_time(doc),
            name: safe_name,
        })
    }

    /// Delete a project. Returns whether a file was actually removed;
    /// deleting an absent project is not an error.
    pub fn delete(&self, name: &str) -> Result<bool, StoreError> {
        let safe_name = sanitize_name(name);
        match fs::remove_file(self.file_path(&safe_name)) {
            Ok(()) => {
                info!("Project '{}' deleted", safe_name);
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Rename a project, overwriting any project already at the new name.
    ///
    /// Returns the `(old, new)` sanitized pair, or `None` when the source
    /// does not exist (nothing is mutated in that case). An empty rename
    /// target is rejected before touching the filesystem.
    pub fn rename(
        &self,
        old_name: &str,
        new_name: &str,
    ) -> Result<Option<(String, String)>, StoreError> {
        if new_name.trim().is_empty() {
            return Err(StoreError::InvalidName("new name required".to_string()));
        }

        let safe_old = sanitize_name(old_name);
        let safe_new = sanitize_name(new_name);
        let old_path = self.file_path(&safe_old);
        let new_path = self.file_path(&safe_new);

        // Hold both names' locks so a concurrent save cannot recreate the
        // source mid-rename. Locks are taken in name order (and only once
        // when both sanitize to the same name) to rule out deadlock.
        let (first, second) = if safe_old <= safe_new {
            (&safe_old, &safe_new)
        } else {
            (&safe_new, &safe_old)
        };
        let first_lock = self.write_lock(first);
        let second_lock = (first != second).then(|| self.write_lock(second));
        let _first_guard = lock_or_recover(&first_lock);
        let _second_guard = second_lock.as_deref().map(lock_or_recover);

        if !old_path.exists() {
            return Ok(None);
        }
        fs::rename(&old_path, &new_path)?;

        info!("Project renamed: '{}' -> '{}'", safe_old, safe_new);
        Ok(Some((safe_old, safe_new)))
    }

    /// Remove every stored project. Returns the number of files removed;
    /// an empty store yields zero, never an error.
    pub fn delete_all(&self) -> Result<usize, StoreError> {
        let entries = match fs::read_dir(&self.list_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut count = 0;
        for entry in entries {
            let entry = entry?;
            let filename = entry.file_name().to_string_lossy().into_owned();
            if filename.ends_with(&format!(".{DOC_EXT}")) {
                fs::remove_file(entry.path())?;
                count += 1;
            }
        }
        info!("All {} project files deleted", count);
        Ok(count)
    }
}

/// Write a document to `path` via a temp-file-then-rename, so readers only
/// ever see a complete file. Pretty-printed UTF-8 with non-ASCII kept
/// literal, matching what the front-end stores and diffs.
pub(crate) fn write_json_atomic(path: &Path, doc: &Value) -> Result<(), StoreError> {
    let text = serde_json::to_string_pretty(doc)?;
    let tmp_path = path.with_extension(format!("{DOC_EXT}.tmp"));
    fs::write(&tmp_path, text)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// The document's declared `saveDate` when present and non-empty,
/// otherwise the current local time.
pub(crate) fn effective_save_time(doc: &Value) -> Value {
    match doc.get("saveDate") {
        Some(Value::Null) | None => Value::String(now_iso()),
        Some(Value::String(s)) if s.is_empty() => Value::String(now_iso()),
        Some(v) => v.clone(),
    }
}

/// Acquire a mutex, recovering from a poisoned lock. A previous holder
/// panicking mid-write leaves at worst an orphaned temp file.
pub(crate) fn lock_or_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!("Recovering from poisoned store mutex");
            poisoned.into_inner()
        }
    }
}

//! File-backed persistence for collection runs: the progress map of scraped
//! items and the list of discovered item URLs.
//!
//! Every write goes to a sibling `.tmp` file that is then renamed over the
//! target, so readers only ever see a complete previous or complete new file.

use reelscope_core::{
    item_id_from_url, CoreError, ErrorExt, ErrorRecovery, ProgressMap, RecoveryAction, StoreError,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[cfg(test)]
mod tests;

/// Counts reported after a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReport {
    pub new_records: usize,
    pub total_records: usize,
}

/// Work split for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingWork {
    pub pending: Vec<String>,
    pub already_done: usize,
    pub unrecognized: Vec<String>,
}

pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current on-disk map. Missing or unparsable files read as empty; any
    /// other read failure is returned.
    pub fn load(&self) -> Result<ProgressMap, CoreError> {
        let mut map: ProgressMap = read_json_or_default(&self.path)?;
        fill_ids(&mut map);
        Ok(map)
    }

    /// Strict load for consumers that cannot proceed without input.
    pub fn load_required(&self) -> Result<ProgressMap, CoreError> {
        if !self.path.exists() {
            return Err(StoreError::MissingInput {
                path: self.path.display().to_string(),
            }
            .into());
        }
        let content = fs::read_to_string(&self.path)?;
        let mut map: ProgressMap = serde_json::from_str(&content)?;
        fill_ids(&mut map);
        Ok(map)
    }

    /// Right-biased union of the on-disk map with `new_results`, written
    /// atomically.
    pub fn merge_and_save(&self, new_results: &ProgressMap) -> Result<SaveReport, CoreError> {
        let mut merged = self.load()?;
        for (id, record) in new_results {
            let mut record = record.clone();
            if record.id.is_empty() {
                record.id = id.clone();
            }
            merged.insert(id.clone(), record);
        }

        write_json_atomic(&self.path, &merged)?;

        let report = SaveReport {
            new_records: new_results.len(),
            total_records: merged.len(),
        };
        info!(
            "saved progress ({} new reels, {} total)",
            report.new_records, report.total_records
        );
        Ok(report)
    }

    /// `urls` minus the ids already persisted, in input order and without
    /// duplicates.
    pub fn pending(&self, urls: &[String]) -> Result<PendingWork, CoreError> {
        let done = self.load()?;
        let mut seen = HashSet::new();
        let mut work = PendingWork::default();

        for url in urls {
            match item_id_from_url(url) {
                Ok(id) => {
                    if !seen.insert(id.clone()) {
                        continue;
                    }
                    if done.contains_key(&id) {
                        work.already_done += 1;
                    } else {
                        work.pending.push(url.clone());
                    }
                }
                Err(e) => {
                    warn!("Skipping {}: {}", url, e);
                    work.unrecognized.push(url.clone());
                }
            }
        }
        Ok(work)
    }
}

fn fill_ids(map: &mut ProgressMap) {
    for (id, record) in map.iter_mut() {
        if record.id.is_empty() {
            record.id = id.clone();
        }
    }
}

/// Persisted list of discovered item URLs.
pub struct LinkStore {
    path: PathBuf,
}

impl LinkStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<String>, CoreError> {
        read_json_or_default(&self.path)
    }

    /// Appends links not already saved, keeping the saved order first.
    pub fn save_union(&self, links: &[String]) -> Result<Vec<String>, CoreError> {
        let mut saved = self.load()?;
        let mut known: HashSet<String> = saved.iter().cloned().collect();
        for link in links {
            if known.insert(link.clone()) {
                saved.push(link.clone());
            }
        }

        write_json_atomic(&self.path, &saved)?;
        info!("saved {} reels to {}", saved.len(), self.path.display());
        Ok(saved)
    }
}

/// Reads JSON from `path`. A missing or unparsable file yields
/// `T::default()`; other failures are returned.
pub fn read_json_or_default<T>(path: &Path) -> Result<T, CoreError>
where
    T: DeserializeOwned + Default,
{
    let error = match read_json(path) {
        Ok(value) => return Ok(value),
        Err(error) => error,
    };

    match ErrorRecovery::classify(&error) {
        RecoveryAction::TreatAsEmpty => {
            if matches!(error, CoreError::Store(StoreError::Corrupt { .. })) {
                error.log_warn();
            } else {
                debug!("{} not found, starting empty", path.display());
            }
            Ok(T::default())
        }
        _ => Err(error),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CoreError> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| {
        StoreError::Corrupt {
            path: path.display().to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Pretty-prints `value` to a temp sibling and renames it over `path`.
pub fn write_json_atomic<T>(path: &Path, value: &T) -> Result<(), CoreError>
where
    T: Serialize + ?Sized,
{
    let mut body = serde_json::to_string_pretty(value)?;
    body.push('\n');
    write_atomic(path, &body)
}

/// Writes `body` to a temp sibling of `path` and renames it into place.
pub fn write_atomic(path: &Path, body: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp_path = temp_path_for(path);
    fs::write(&temp_path, body).map_err(|e| StoreError::WriteFailed {
        path: temp_path.display().to_string(),
        reason: e.to_string(),
    })?;
    fs::rename(&temp_path, path).map_err(|e| StoreError::ReplaceFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

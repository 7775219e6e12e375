//! Status-partitioned bug store backed by a single record file.
//!
//! The store is the only writer of its backing file. Every mutating call
//! rewrites the whole file (New, then InProgress, then Resolved) before it
//! returns; a failed write is reported but never rolls back memory.

use std::cell::Cell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;

use crate::codec;
use crate::error::{BugbookError, Result};
use crate::model::{BugRecord, BugStatus, StatusCounts};
use crate::util::{DEFAULT_BUG_PREFIX, generate_id};

/// What `load` found on disk.
#[derive(Debug)]
pub enum LoadOutcome {
    /// No backing file; the store is empty.
    Missing,
    /// The file was read and this many records were loaded.
    Loaded(usize),
    /// The file could not be read or parsed; the store is empty.
    Corrupt(BugbookError),
}

impl LoadOutcome {
    #[must_use]
    pub const fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt(_))
    }
}

/// Whether an upsert added a new record or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    Inserted,
    Replaced,
}

/// Result of merging an imported record list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub inserted: usize,
    pub replaced: usize,
}

impl ImportSummary {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.inserted + self.replaced
    }
}

/// The canonical bug collection.
///
/// Records live in three ordered partitions selected by `status`. A given
/// `id` appears in at most one partition.
#[derive(Debug)]
pub struct BugStore {
    partitions: [Vec<BugRecord>; 3],
    path: PathBuf,
    prefix: String,
    /// The last load found an unreadable file that has not been backed up.
    unreadable_on_disk: Cell<bool>,
}

impl BugStore {
    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Create an empty store that persists to `path`. Nothing is read.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            partitions: [Vec::new(), Vec::new(), Vec::new()],
            path: path.into(),
            prefix: DEFAULT_BUG_PREFIX.to_string(),
            unreadable_on_disk: Cell::new(false),
        }
    }

    /// Create a store and load whatever `path` holds.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut store = Self::new(path);
        store.load();
        store
    }

    /// Backing file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Set the prefix used for generated IDs.
    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Discard memory and reload from the backing file.
    ///
    /// Never fails and never writes. A missing file leaves the store empty;
    /// an unreadable one also leaves it empty and logs a warning, and is
    /// copied aside by the next `save` before being replaced.
    pub fn load(&mut self) -> LoadOutcome {
        let result = codec::read_records::<BugRecord>(&self.path);
        self.unreadable_on_disk.set(result.is_err());
        match result {
            Ok(None) => {
                self.clear();
                tracing::debug!("No bug file at {}", self.path.display());
                LoadOutcome::Missing
            }
            Ok(Some(records)) => {
                self.load_batch(records);
                let count = self.len();
                tracing::debug!("Loaded {count} bug(s) from {}", self.path.display());
                LoadOutcome::Loaded(count)
            }
            Err(e) => {
                self.clear();
                tracing::warn!(
                    "Ignoring unreadable bug file {}: {e}",
                    self.path.display()
                );
                LoadOutcome::Corrupt(e)
            }
        }
    }

    /// Replace the whole collection without persisting anything.
    ///
    /// Records are routed by status. Duplicate IDs resolve last-wins and
    /// records without an ID get a fresh one.
    pub fn load_batch(&mut self, records: impl IntoIterator<Item = BugRecord>) {
        self.clear();
        let mut seen = HashSet::new();
        for record in records {
            let record = self.with_assigned_id(record);
            if !seen.insert(record.id.clone()) {
                tracing::warn!("Duplicate bug id {} while loading; keeping the last", record.id);
            }
            self.put(record);
        }
    }

    /// Write every partition to the backing file.
    ///
    /// # Errors
    ///
    /// Returns `Write` if the file cannot be replaced, or if an unreadable
    /// file from the last load cannot be backed up first.
    pub fn save(&self) -> Result<()> {
        if self.unreadable_on_disk.get() {
            codec::back_up_unreadable(&self.path)?;
            self.unreadable_on_disk.set(false);
        }
        self.save_to(&self.path)
    }

    /// Write the canonical record sequence to an arbitrary path.
    ///
    /// # Errors
    ///
    /// Returns `Write` if the file cannot be replaced.
    pub fn export_to(&self, path: impl AsRef<Path>) -> Result<()> {
        self.save_to(path.as_ref())
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        let records: Vec<&BugRecord> = self.all().collect();
        codec::write_records(path, &records)
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Insert a new bug, assigning an ID when `draft.id` is empty.
    ///
    /// # Errors
    ///
    /// Returns `Write` if persisting fails; the record is still stored.
    pub fn create(&mut self, draft: BugRecord) -> Result<BugRecord> {
        let record = self.with_assigned_id(draft);
        let stored = record.clone();
        self.upsert(record)?;
        Ok(stored)
    }

    /// Insert or replace a record keyed by `id`, then save.
    ///
    /// A replaced record moves to the partition named by its new status.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty ID, or `Write` if persisting fails
    /// (memory is already updated in that case).
    pub fn upsert(&mut self, record: BugRecord) -> Result<Upserted> {
        if record.id.trim().is_empty() {
            return Err(BugbookError::validation("id", "cannot be empty"));
        }
        let outcome = self.put(record);
        self.save()?;
        Ok(outcome)
    }

    /// Move a bug to `status`, then save.
    ///
    /// The record is removed from every partition before re-insertion, so a
    /// record filed under the wrong partition is repaired too. Returns
    /// `false` (and writes nothing) if the ID is unknown.
    ///
    /// # Errors
    ///
    /// Returns `Write` if persisting fails.
    pub fn move_status(&mut self, id: &str, status: BugStatus) -> Result<bool> {
        let Some(mut record) = self.take(id) else {
            return Ok(false);
        };
        record.status = status;
        self.partitions[status.index()].push(record);
        self.save()?;
        Ok(true)
    }

    /// Set the assignee email on a bug, then save.
    ///
    /// # Errors
    ///
    /// Returns `BugNotFound` for an unknown ID or `Write` if persisting fails.
    pub fn assign(&mut self, id: &str, email: &str) -> Result<()> {
        let record = self
            .find_mut(id)
            .ok_or_else(|| BugbookError::BugNotFound { id: id.to_string() })?;
        email.trim().clone_into(&mut record.assignee_email);
        self.save()
    }

    /// Delete a bug, then save. Unknown IDs are a no-op and write nothing.
    ///
    /// # Errors
    ///
    /// Returns `Write` if persisting fails.
    pub fn remove(&mut self, id: &str) -> Result<Option<BugRecord>> {
        let removed = self.take(id);
        if removed.is_some() {
            self.save()?;
        }
        Ok(removed)
    }

    /// Merge an imported list: each record is upserted by ID, then the
    /// file is saved once.
    ///
    /// # Errors
    ///
    /// Returns `Write` if persisting fails.
    pub fn import_merge(
        &mut self,
        records: impl IntoIterator<Item = BugRecord>,
    ) -> Result<ImportSummary> {
        let mut summary = ImportSummary::default();
        for record in records {
            let record = self.with_assigned_id(record);
            match self.put(record) {
                Upserted::Inserted => summary.inserted += 1,
                Upserted::Replaced => summary.replaced += 1,
            }
        }
        if summary.total() > 0 {
            self.save()?;
        }
        tracing::info!(
            "Imported {} bug(s): {} new, {} replaced",
            summary.total(),
            summary.inserted,
            summary.replaced
        );
        Ok(summary)
    }

    /// Read an external bug list (JSON or YAML) and merge it.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, `Decode` if it is neither
    /// format, or `Write` if persisting fails.
    pub fn import_file(&mut self, path: impl AsRef<Path>) -> Result<ImportSummary> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let records = codec::decode_records::<BugRecord>(&text)?;
        self.import_merge(records)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Read-only view of one partition, in insertion order.
    #[must_use]
    pub fn list_by_status(&self, status: BugStatus) -> &[BugRecord] {
        &self.partitions[status.index()]
    }

    /// Every record: New, then InProgress, then Resolved.
    pub fn all(&self) -> impl Iterator<Item = &BugRecord> {
        self.partitions.iter().flatten()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&BugRecord> {
        self.all().find(|r| r.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn counts(&self) -> StatusCounts {
        StatusCounts {
            new: self.partitions[BugStatus::New.index()].len(),
            in_progress: self.partitions[BugStatus::InProgress.index()].len(),
            resolved: self.partitions[BugStatus::Resolved.index()].len(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.partitions.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.partitions.iter().all(Vec::is_empty)
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    fn clear(&mut self) {
        for partition in &mut self.partitions {
            partition.clear();
        }
    }

    /// Insert-or-replace without saving.
    fn put(&mut self, record: BugRecord) -> Upserted {
        let target = record.status.index();
        match self.locate(&record.id) {
            Some((index, pos)) if index == target => {
                self.partitions[index][pos] = record;
                Upserted::Replaced
            }
            Some((index, pos)) => {
                self.partitions[index].remove(pos);
                self.partitions[target].push(record);
                Upserted::Replaced
            }
            None => {
                self.partitions[target].push(record);
                Upserted::Inserted
            }
        }
    }

    /// Partition index and position of a record.
    fn locate(&self, id: &str) -> Option<(usize, usize)> {
        self.partitions
            .iter()
            .enumerate()
            .find_map(|(index, p)| p.iter().position(|r| r.id == id).map(|pos| (index, pos)))
    }

    /// Remove a record from whichever partitions hold it.
    fn take(&mut self, id: &str) -> Option<BugRecord> {
        let mut taken = None;
        for partition in &mut self.partitions {
            while let Some(pos) = partition.iter().position(|r| r.id == id) {
                taken = Some(partition.remove(pos));
            }
        }
        taken
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut BugRecord> {
        self.partitions.iter_mut().flatten().find(|r| r.id == id)
    }

    fn with_assigned_id(&self, mut record: BugRecord) -> BugRecord {
        if record.id.trim().is_empty() {
            record.id = generate_id(&self.prefix, &record.title, Utc::now(), self.len(), |id| {
                self.contains(id)
            });
        }
        record
    }
}

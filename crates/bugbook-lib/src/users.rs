//! User directory backed by its own record file.
//!
//! A single ordered list keyed by email (case-insensitive). Every change
//! is written through immediately.

use std::cell::Cell;
use std::path::{Path, PathBuf};

use crate::codec;
use crate::error::Result;
use crate::model::UserRecord;
use crate::store::{LoadOutcome, Upserted};

/// Name/email directory used for bug assignment.
#[derive(Debug)]
pub struct UserStore {
    users: Vec<UserRecord>,
    path: PathBuf,
    unreadable_on_disk: Cell<bool>,
}

impl UserStore {
    /// Create an empty store that persists to `path`. Nothing is read.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            users: Vec::new(),
            path: path.into(),
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

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Discard memory and reload. Never fails and never writes; an
    /// unreadable file is copied aside by the next `save`.
    pub fn load(&mut self) -> LoadOutcome {
        self.users.clear();
        let result = codec::read_records::<UserRecord>(&self.path);
        self.unreadable_on_disk.set(result.is_err());
        match result {
            Ok(None) => LoadOutcome::Missing,
            Ok(Some(records)) => {
                for user in records {
                    self.put(user);
                }
                tracing::debug!(
                    "Loaded {} user(s) from {}",
                    self.users.len(),
                    self.path.display()
                );
                LoadOutcome::Loaded(self.users.len())
            }
            Err(e) => {
                tracing::warn!(
                    "Ignoring unreadable user file {}: {e}",
                    self.path.display()
                );
                LoadOutcome::Corrupt(e)
            }
        }
    }

    /// # Errors
    ///
    /// Returns `Write` if the file cannot be replaced.
    pub fn save(&self) -> Result<()> {
        if self.unreadable_on_disk.get() {
            codec::back_up_unreadable(&self.path)?;
            self.unreadable_on_disk.set(false);
        }
        codec::write_records(&self.path, &self.users)
    }

    /// Add a user, or update the name (and email spelling) of the user
    /// whose email matches case-insensitively. Then save.
    ///
    /// # Errors
    ///
    /// Returns `Write` if persisting fails; memory is already updated.
    pub fn add_or_update(&mut self, user: UserRecord) -> Result<Upserted> {
        let outcome = self.put(user);
        self.save()?;
        Ok(outcome)
    }

    /// Remove the user with this email. Nothing is written if no user
    /// matched.
    ///
    /// # Errors
    ///
    /// Returns `Write` if persisting fails.
    pub fn remove(&mut self, email: &str) -> Result<Option<UserRecord>> {
        let Some(pos) = self.position(email) else {
            return Ok(None);
        };
        let removed = self.users.remove(pos);
        self.save()?;
        Ok(Some(removed))
    }

    /// Case-insensitive lookup. Blank queries never match.
    #[must_use]
    pub fn find_by_email(&self, email: &str) -> Option<&UserRecord> {
        self.position(email).map(|pos| &self.users[pos])
    }

    /// Read-only view in insertion order.
    #[must_use]
    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn put(&mut self, user: UserRecord) -> Upserted {
        match self.position(&user.email) {
            Some(pos) => {
                self.users[pos] = user;
                Upserted::Replaced
            }
            None => {
                self.users.push(user);
                Upserted::Inserted
            }
        }
    }

    fn position(&self, email: &str) -> Option<usize> {
        if email.trim().is_empty() {
            return None;
        }
        self.users.iter().position(|u| u.has_email(email))
    }
}

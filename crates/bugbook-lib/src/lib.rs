//! `bugbook-lib` - file-backed bug and user stores.
//!
//! Bugs live in memory, partitioned by status, and every change is written
//! through to a single JSON file with an atomic replace.
//!
//! # Quick Start
//!
//! ```no_run
//! use bugbook_lib::{BugRecord, BugStatus, BugStore};
//!
//! // Load existing file (a missing file is just an empty store)
//! let mut store = BugStore::open("path/to/bugs.json");
//!
//! // Create
//! let bug = store.create(BugRecord::new("", "Crash on launch")).unwrap();
//!
//! // Move between partitions
//! store.move_status(&bug.id, BugStatus::Resolved).unwrap();
//!
//! // Query
//! assert_eq!(store.list_by_status(BugStatus::Resolved).len(), 1);
//! ```

pub mod codec;
pub mod error;
pub mod model;
pub mod store;
pub mod users;
pub mod util;

pub use error::{BugbookError, Result, ValidationError};
pub use model::{BugRecord, BugStatus, Priority, StatusCounts, UserRecord};
pub use store::{BugStore, ImportSummary, LoadOutcome, Upserted};
pub use users::UserStore;

//! Command implementations. Each returns the library `Result` so the
//! error variants stay visible to callers and tests.

pub mod add;
pub mod attach;
pub mod edit;
pub mod email;
pub mod list;
pub mod show;
pub mod source;
pub mod transfer;
pub mod update;
pub mod user;
pub mod version;

use crate::error::{BugbookError, Result};
use crate::model::BugRecord;
use crate::validation::BugValidator;

/// Run the bug validator and fold its findings into one error.
pub(crate) fn validate_bug(bug: &BugRecord) -> Result<()> {
    BugValidator::validate(bug).map_err(BugbookError::from_validation_errors)
}

//! Assignment email drafts.
//!
//! Only composes the message; handing it to a mail client is the caller's
//! business (the CLI prints it or its `mailto:` URI).

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;

use crate::error::{BugbookError, Result};
use crate::model::BugRecord;

/// Everything outside the URI unreserved set.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// The address keeps its `@`.
const ADDRESS: &AsciiSet = &COMPONENT.remove(b'@');

/// A composed, unsent email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailDraft {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl EmailDraft {
    /// RFC 6068 `mailto:` URI for this draft.
    #[must_use]
    pub fn mailto(&self) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            utf8_percent_encode(&self.to, ADDRESS),
            utf8_percent_encode(&self.subject, COMPONENT),
            utf8_percent_encode(&self.body, COMPONENT),
        )
    }
}

/// Compose the notification sent to a bug's assignee.
///
/// # Errors
///
/// Returns `Validation` if the bug has no assignee email.
pub fn compose_assignment(bug: &BugRecord) -> Result<EmailDraft> {
    let to = bug.assignee_email.trim();
    if to.is_empty() {
        return Err(BugbookError::validation(
            "assigneeEmail",
            "No assignee email set",
        ));
    }

    Ok(EmailDraft {
        to: to.to_string(),
        subject: format!("Bug assigned: {}", bug.title),
        body: format!(
            "Bug: {}\n\n{}\n\nStatus: {}",
            bug.title, bug.description, bug.status
        ),
    })
}

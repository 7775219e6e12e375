//! Email command implementation.

use serde::Serialize;

use crate::cli::AppContext;
use crate::email::{EmailDraft, compose_assignment};
use crate::error::{BugbookError, Result};

#[derive(Serialize)]
struct EmailOutput<'a> {
    #[serde(flatten)]
    draft: &'a EmailDraft,
    mailto: String,
}

/// Print the assignment email for a bug.
///
/// # Errors
///
/// Returns `BugNotFound`, or a validation error if the bug has no assignee.
pub fn execute(id: &str, ctx: &AppContext) -> Result<()> {
    let bug = ctx
        .bugs
        .get(id)
        .ok_or_else(|| BugbookError::BugNotFound { id: id.to_string() })?;
    let draft = compose_assignment(bug)?;

    if ctx.json {
        ctx.print_json(&EmailOutput {
            draft: &draft,
            mailto: draft.mailto(),
        })?;
    } else {
        println!("To: {}", draft.to);
        println!("Subject: {}", draft.subject);
        println!();
        println!("{}", draft.body);
        println!();
        println!("{}", draft.mailto());
    }
    Ok(())
}

//! Show command implementation.

use crate::cli::AppContext;
use crate::error::{BugbookError, Result};
use crate::format::{BugDetails, format_bug_details};

/// Execute the show command.
///
/// # Errors
///
/// Returns `BugNotFound` if the ID is unknown.
pub fn execute(id: &str, ctx: &AppContext) -> Result<()> {
    let bug = ctx
        .bugs
        .get(id)
        .ok_or_else(|| BugbookError::BugNotFound { id: id.to_string() })?;
    let assignee = ctx.users.find_by_email(&bug.assignee_email);

    if ctx.json {
        ctx.print_json(&BugDetails { bug, assignee })?;
    } else {
        print!("{}", format_bug_details(bug, assignee));
    }
    Ok(())
}

//! Move, assign and remove: single-field changes by bug ID.

use serde_json::json;

use crate::cli::AppContext;
use crate::error::{BugbookError, Result};
use crate::format::status_heading;
use crate::model::BugStatus;
use crate::validation::is_valid_email;

fn not_found(id: &str) -> BugbookError {
    BugbookError::BugNotFound { id: id.to_string() }
}

/// Move a bug to another status partition.
///
/// # Errors
///
/// Returns `InvalidStatus`, `BugNotFound`, or `Write`.
pub fn move_status(id: &str, status: &str, ctx: &mut AppContext) -> Result<()> {
    let status = status.parse::<BugStatus>()?;
    if !ctx.bugs.move_status(id, status)? {
        return Err(not_found(id));
    }
    tracing::info!("Moved {id} to {status}");

    if ctx.json {
        ctx.print_json(&json!({ "id": id, "status": status }))?;
    } else {
        println!("Moved {id} to {}", status_heading(status));
    }
    Ok(())
}

/// Set the assignee email of a bug.
///
/// # Errors
///
/// Returns a validation error for a malformed email, `BugNotFound`, or
/// `Write`.
pub fn assign(id: &str, email: &str, ctx: &mut AppContext) -> Result<()> {
    let email = email.trim();
    if !is_valid_email(email) {
        return Err(BugbookError::validation(
            "assigneeEmail",
            "is not a valid email address",
        ));
    }
    ctx.bugs.assign(id, email)?;
    if ctx.users.find_by_email(email).is_none() {
        tracing::warn!("{email} is not in the user directory");
    }

    if ctx.json {
        ctx.print_json(&json!({ "id": id, "assigneeEmail": email }))?;
    } else {
        println!("Assigned {id} to {email}");
    }
    Ok(())
}

/// Delete a bug.
///
/// # Errors
///
/// Returns `BugNotFound` or `Write`.
pub fn remove(id: &str, ctx: &mut AppContext) -> Result<()> {
    let removed = ctx.bugs.remove(id)?.ok_or_else(|| not_found(id))?;
    tracing::info!("Removed {}", removed.id);

    if ctx.json {
        ctx.print_json(&removed)?;
    } else {
        println!("Removed {}: {}", removed.id, removed.title);
    }
    Ok(())
}

//! Edit command implementation.

use crate::cli::{AppContext, EditArgs};
use crate::error::{BugbookError, Result};
use crate::format::format_bug_line;
use crate::model::Priority;

use super::validate_bug;

/// Execute the edit command. Only the flags given are changed.
///
/// # Errors
///
/// Returns `BugNotFound` for an unknown ID, a validation error for bad
/// fields, or `Write` if the bug file cannot be written.
pub fn execute(args: &EditArgs, ctx: &mut AppContext) -> Result<()> {
    let mut bug = ctx
        .bugs
        .get(&args.id)
        .cloned()
        .ok_or_else(|| BugbookError::BugNotFound {
            id: args.id.clone(),
        })?;

    if let Some(title) = &args.title {
        bug.title = title.trim().to_string();
    }
    if let Some(description) = &args.description {
        bug.description.clone_from(description);
    }
    if let Some(priority) = &args.priority {
        bug.priority = priority.parse::<Priority>()?;
    }
    if let Some(project) = &args.project {
        bug.project.clone_from(project);
    }
    if let Some(notes) = &args.repeatable_steps {
        bug.repeatable_steps.clone_from(notes);
    }
    if !args.steps.is_empty() {
        bug.steps.clone_from(&args.steps);
    }
    validate_bug(&bug)?;

    ctx.bugs.upsert(bug.clone())?;
    tracing::info!("Updated {}", bug.id);

    if ctx.json {
        ctx.print_json(&bug)?;
    } else {
        println!("Updated {}", format_bug_line(&bug));
    }
    Ok(())
}

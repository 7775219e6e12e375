//! Add command implementation.

use crate::cli::{AddArgs, AppContext};
use crate::error::Result;
use crate::format::format_bug_line;
use crate::model::{BugRecord, BugStatus, Priority};

use super::validate_bug;

/// Execute the add command.
///
/// # Errors
///
/// Returns an error if a field is invalid or the bug file cannot be written.
pub fn execute(args: &AddArgs, ctx: &mut AppContext) -> Result<()> {
    let priority = match &args.priority {
        Some(p) => p.parse::<Priority>()?,
        None => ctx.config.default_priority,
    };
    let status = match &args.status {
        Some(s) => s.parse::<BugStatus>()?,
        None => BugStatus::New,
    };

    let draft = BugRecord {
        title: args.title.trim().to_string(),
        description: args.description.clone().unwrap_or_default(),
        status,
        assignee_email: args.assignee.as_deref().map(str::trim).unwrap_or_default().to_string(),
        project: args.project.clone().unwrap_or_default(),
        repeatable_steps: args.repeatable_steps.clone().unwrap_or_default(),
        steps: args.steps.clone(),
        priority,
        ..BugRecord::default()
    };
    validate_bug(&draft)?;

    let bug = ctx.bugs.create(draft)?;
    tracing::info!("Created {}", bug.id);

    if ctx.json {
        ctx.print_json(&bug)?;
    } else {
        println!("Created {}", format_bug_line(&bug));
    }
    Ok(())
}

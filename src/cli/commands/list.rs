//! List command implementation.
//!
//! Without `--status` the whole board is printed, partition by partition.

use crate::cli::{AppContext, ListArgs};
use crate::error::Result;
use crate::format::{Board, format_board, format_bug_line, status_heading};
use crate::model::BugStatus;

/// Execute the list command.
///
/// # Errors
///
/// Returns `InvalidStatus` for an unknown `--status` value.
pub fn execute(args: &ListArgs, ctx: &AppContext) -> Result<()> {
    let Some(status) = args.status.as_deref() else {
        if ctx.json {
            ctx.print_json(&Board::from_store(&ctx.bugs))?;
        } else if ctx.bugs.is_empty() {
            println!("No bugs found.");
        } else {
            print!("{}", format_board(&ctx.bugs));
        }
        return Ok(());
    };

    let status = status.parse::<BugStatus>()?;
    let bugs = ctx.bugs.list_by_status(status);
    if ctx.json {
        ctx.print_json(bugs)?;
    } else if bugs.is_empty() {
        println!("No {} bugs.", status_heading(status));
    } else {
        for bug in bugs {
            println!("{}", format_bug_line(bug));
        }
        println!("\n{} bug(s)", bugs.len());
    }
    Ok(())
}

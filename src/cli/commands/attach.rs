//! Attach command implementation.

use std::path::Path;

use crate::attachments::copy_attachment;
use crate::cli::AppContext;
use crate::error::{BugbookError, Result};

/// Copy an image into the attachments dir and append the copy's path to
/// the bug's `imagePaths`.
///
/// # Errors
///
/// Returns `BugNotFound`, a validation error for a non-image file, `Io` if
/// the copy fails, or `Write` if the bug file cannot be written.
pub fn execute(id: &str, file: &Path, ctx: &mut AppContext) -> Result<()> {
    let mut bug = ctx
        .bugs
        .get(id)
        .cloned()
        .ok_or_else(|| BugbookError::BugNotFound { id: id.to_string() })?;

    let stored = copy_attachment(&ctx.config.attachments_path(), file)?;
    let stored = dunce::simplified(&stored).to_string_lossy().into_owned();
    bug.image_paths.push(stored.clone());
    ctx.bugs.upsert(bug)?;

    if ctx.json {
        ctx.print_json(&serde_json::json!({ "id": id, "imagePath": stored }))?;
    } else {
        println!("Attached {stored} to {id}");
    }
    Ok(())
}

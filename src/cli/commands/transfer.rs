//! Import, export and reload: moving whole collections between memory
//! and disk.

use std::path::Path;

use serde::Serialize;

use crate::cli::AppContext;
use crate::error::Result;
use crate::store::LoadOutcome;

/// Merge an external bug list into the store.
///
/// # Errors
///
/// Returns `Io` if the file cannot be read, `Decode` if it is not a bug
/// list, or `Write` if the merged store cannot be saved.
pub fn import(file: &Path, ctx: &mut AppContext) -> Result<()> {
    let summary = ctx.bugs.import_file(file)?;

    if ctx.json {
        ctx.print_json(&summary)?;
    } else {
        println!(
            "Imported {} bug(s) from {}: {} new, {} replaced",
            summary.total(),
            file.display(),
            summary.inserted,
            summary.replaced
        );
    }
    Ok(())
}

/// Write every bug to `file` in the canonical format.
///
/// # Errors
///
/// Returns `Write` if the file cannot be written.
pub fn export(file: &Path, ctx: &AppContext) -> Result<()> {
    ctx.bugs.export_to(file)?;
    let count = ctx.bugs.len();

    if ctx.json {
        ctx.print_json(&serde_json::json!({ "path": file, "exported": count }))?;
    } else {
        println!("Exported {count} bug(s) to {}", file.display());
    }
    Ok(())
}

#[derive(Serialize)]
struct ReloadOutput {
    bugs: usize,
    users: usize,
    warnings: Vec<String>,
}

/// Discard memory and re-read both files.
///
/// # Errors
///
/// Only fails if JSON output cannot be serialized; unreadable files are
/// reported as warnings.
pub fn reload(ctx: &mut AppContext) -> Result<()> {
    let mut warnings = Vec::new();
    for (what, outcome) in [("bugs", ctx.bugs.load()), ("users", ctx.users.load())] {
        if let LoadOutcome::Corrupt(e) = outcome {
            warnings.push(format!("{what} file unreadable, starting empty: {e}"));
        }
    }
    let output = ReloadOutput {
        bugs: ctx.bugs.len(),
        users: ctx.users.len(),
        warnings,
    };

    if ctx.json {
        ctx.print_json(&output)?;
    } else {
        for warning in &output.warnings {
            println!("Warning: {warning}");
        }
        println!("Loaded {} bug(s) and {} user(s)", output.bugs, output.users);
    }
    Ok(())
}

//! Project source commands.

use std::io::Read;

use crate::cli::{AppContext, SourceAttachArgs, SourceSubcommand};
use crate::error::{BugbookError, Result};
use crate::source::{
    ProjectSource, SourceStore, parse_git_branch_output, parse_github_repo, validate_local_repo,
};

/// Execute a `source` subcommand.
///
/// # Errors
///
/// Returns a validation error for a bad location, `Io` if stdin cannot be
/// read, or `Write` if the source file cannot be written.
pub fn execute(command: SourceSubcommand, ctx: &AppContext) -> Result<()> {
    match command {
        SourceSubcommand::Attach(args) => attach(&args, ctx),
        SourceSubcommand::List => {
            let store = SourceStore::open(ctx.config.sources_path());
            if ctx.json {
                ctx.print_json(store.sources())?;
            } else if store.sources().is_empty() {
                println!("No project sources.");
            } else {
                for source in store.sources() {
                    println!("{} {source}", source.id);
                }
            }
            Ok(())
        }
        SourceSubcommand::Branches => {
            let mut output = String::new();
            std::io::stdin().read_to_string(&mut output)?;
            let branches = parse_git_branch_output(&output);
            if ctx.json {
                ctx.print_json(&branches)?;
            } else {
                for branch in &branches {
                    println!("{branch}");
                }
            }
            Ok(())
        }
    }
}

fn attach(args: &SourceAttachArgs, ctx: &AppContext) -> Result<()> {
    let source = match (&args.local, &args.github) {
        (Some(path), _) => {
            let path = validate_local_repo(path)?;
            ProjectSource::local(path.to_string_lossy(), args.branch.as_str())
        }
        (None, Some(url)) => {
            let repo = parse_github_repo(url).ok_or_else(|| {
                BugbookError::validation("repoUrl", format!("{url} is not a GitHub repository URL"))
            })?;
            tracing::debug!("Branches for {}/{}: {}", repo.owner, repo.repo, repo.branches_api_url());
            ProjectSource::github(url.trim(), args.branch.as_str())
        }
        (None, None) => {
            return Err(BugbookError::validation(
                "source",
                "pass --local <path> or --github <url>",
            ));
        }
    };

    let mut store = SourceStore::open(ctx.config.sources_path());
    let source = store.attach(source)?;

    if ctx.json {
        ctx.print_json(&source)?;
    } else {
        println!("Attached {} {source}", source.id);
    }
    Ok(())
}

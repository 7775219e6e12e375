//! User directory commands.

use crate::cli::{AppContext, UserSubcommand};
use crate::error::{BugbookError, Result};
use crate::model::UserRecord;
use crate::store::Upserted;
use crate::validation::UserValidator;

/// Execute a `user` subcommand.
///
/// # Errors
///
/// Returns a validation error for a bad email, `UserNotFound` for remove
/// and find misses, or `Write` if the user file cannot be written.
pub fn execute(command: UserSubcommand, ctx: &mut AppContext) -> Result<()> {
    match command {
        UserSubcommand::Add { email, name } => add(UserRecord::new(name.trim(), email.trim()), ctx),
        UserSubcommand::Remove { email } => {
            let removed = ctx
                .users
                .remove(&email)?
                .ok_or(BugbookError::UserNotFound { email })?;
            if ctx.json {
                ctx.print_json(&removed)?;
            } else {
                println!("Removed {}", describe(&removed));
            }
            Ok(())
        }
        UserSubcommand::Find { email } => {
            let user = ctx
                .users
                .find_by_email(&email)
                .ok_or_else(|| BugbookError::UserNotFound {
                    email: email.clone(),
                })?;
            if ctx.json {
                ctx.print_json(user)?;
            } else {
                println!("{}", describe(user));
            }
            Ok(())
        }
        UserSubcommand::List => {
            if ctx.json {
                ctx.print_json(ctx.users.users())?;
            } else if ctx.users.is_empty() {
                println!("No users.");
            } else {
                for user in ctx.users.users() {
                    println!("{}", describe(user));
                }
            }
            Ok(())
        }
    }
}

fn add(user: UserRecord, ctx: &mut AppContext) -> Result<()> {
    UserValidator::validate(&user).map_err(BugbookError::from_validation_errors)?;
    let outcome = ctx.users.add_or_update(user.clone())?;

    if ctx.json {
        ctx.print_json(&user)?;
    } else {
        let verb = match outcome {
            Upserted::Inserted => "Added",
            Upserted::Replaced => "Updated",
        };
        println!("{verb} {}", describe(&user));
    }
    Ok(())
}

fn describe(user: &UserRecord) -> String {
    if user.name.is_empty() {
        user.email.clone()
    } else {
        format!("{} <{}>", user.name, user.email)
    }
}

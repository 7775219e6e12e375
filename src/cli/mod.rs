//! Command-line interface for `bugbook`.
//!
//! This module provides the CLI parsing and command routing using clap.
//! The stores are opened once in [`run`] and handed to each command through
//! [`AppContext`].

pub mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::config::{CliOverrides, Config};
use crate::logging;
use crate::store::BugStore;
use crate::users::UserStore;

/// `bugbook` (bb) - file-backed bug tracker.
#[derive(Parser, Debug)]
#[command(name = "bb")]
#[command(
    author,
    version,
    about = "File-backed bug tracker with a New / In Progress / Resolved board",
    long_about = None,
    after_help = "Data lives in one directory: bugs.json, users.json, project_sources.json."
)]
pub struct Cli {
    /// Output format: text (default) or json
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Data directory (defaults to the platform data dir)
    #[arg(long, global = true, env = "BUGBOOK_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Prefix for generated bug IDs
    #[arg(long, global = true)]
    pub prefix: Option<String>,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new bug
    Add(AddArgs),

    /// Update fields of an existing bug
    Edit(EditArgs),

    /// Show bug details
    Show {
        /// Bug ID
        id: String,
    },

    /// List bugs (the whole board, or one status)
    List(ListArgs),

    /// Move a bug to another status
    Move {
        /// Bug ID
        id: String,
        /// Target status: new, in-progress, resolved
        status: String,
    },

    /// Set a bug's assignee email
    Assign {
        /// Bug ID
        id: String,
        /// Assignee email
        email: String,
    },

    /// Delete a bug
    #[command(alias = "rm")]
    Remove {
        /// Bug ID
        id: String,
    },

    /// Copy an image into the attachments dir and link it to a bug
    Attach {
        /// Bug ID
        id: String,
        /// Image file to copy
        file: PathBuf,
    },

    /// Merge bugs from a JSON or YAML file (upsert by ID)
    Import {
        /// File to read
        file: PathBuf,
    },

    /// Write every bug to a JSON file
    Export {
        /// File to write
        file: PathBuf,
    },

    /// Compose the assignment email for a bug
    Email {
        /// Bug ID
        id: String,
    },

    /// Re-read the bug and user files from disk
    Reload,

    /// Manage the user directory
    User(UserCommand),

    /// Manage project sources
    Source(SourceCommand),

    /// Show version information
    Version,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Bug title
    pub title: String,

    /// Longer description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Priority: low, medium, high (default from config)
    #[arg(short, long)]
    pub priority: Option<String>,

    /// Initial status (default: new)
    #[arg(short, long)]
    pub status: Option<String>,

    /// Assignee email
    #[arg(short, long)]
    pub assignee: Option<String>,

    /// Project name
    #[arg(long)]
    pub project: Option<String>,

    /// Free-form reproduction notes
    #[arg(long)]
    pub repeatable_steps: Option<String>,

    /// Reproduction step (repeat for several, in order)
    #[arg(long = "step")]
    pub steps: Vec<String>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Bug ID
    pub id: String,

    #[arg(short, long)]
    pub title: Option<String>,

    #[arg(short, long)]
    pub description: Option<String>,

    #[arg(short, long)]
    pub priority: Option<String>,

    #[arg(long)]
    pub project: Option<String>,

    #[arg(long)]
    pub repeatable_steps: Option<String>,

    /// Replace the reproduction steps (repeat for several)
    #[arg(long = "step")]
    pub steps: Vec<String>,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Only this status: new, in-progress, resolved
    #[arg(short, long)]
    pub status: Option<String>,
}

#[derive(Args, Debug)]
pub struct UserCommand {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum UserSubcommand {
    /// Add a user, or update the one with the same email
    Add {
        /// Email address (identity, case-insensitive)
        email: String,
        /// Display name
        #[arg(short, long, default_value = "")]
        name: String,
    },

    /// Remove a user by email
    Remove {
        email: String,
    },

    /// Look up a user by email
    Find {
        email: String,
    },

    /// List all users
    List,
}

#[derive(Args, Debug)]
pub struct SourceCommand {
    /// Source subcommand
    #[command(subcommand)]
    pub command: SourceSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum SourceSubcommand {
    /// Attach a local git checkout or a GitHub repository
    Attach(SourceAttachArgs),

    /// List attached sources
    List,

    /// Parse `git branch --all` output from stdin into branch names
    Branches,
}

#[derive(Args, Debug)]
pub struct SourceAttachArgs {
    /// Path to a local git repository
    #[arg(long, conflicts_with = "github", required_unless_present = "github")]
    pub local: Option<PathBuf>,

    /// GitHub repository URL
    #[arg(long)]
    pub github: Option<String>,

    /// Branch to track
    #[arg(short, long, default_value = "main")]
    pub branch: String,
}

/// Everything a command needs: config plus the opened stores.
#[derive(Debug)]
pub struct AppContext {
    pub config: Config,
    pub bugs: BugStore,
    pub users: UserStore,
    pub json: bool,
}

impl AppContext {
    /// Open both stores at the configured locations.
    #[must_use]
    pub fn open(config: Config, json: bool) -> Self {
        let mut bugs = BugStore::new(config.bugs_path());
        bugs.set_prefix(config.id_prefix.clone());
        bugs.load();
        let users = UserStore::open(config.users_path());
        Self {
            config,
            bugs,
            users,
            json,
        }
    }

    /// Print a value as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns `Json` if serialization fails.
    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> crate::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

/// Run the CLI.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())
        .context("Failed to initialize logging")?;

    let Some(command) = cli.command else {
        println!("bb - file-backed bug tracker. Use --help for usage.");
        return Ok(());
    };

    if matches!(command, Commands::Version) {
        return Ok(commands::version::execute(cli.json)?);
    }

    let overrides = CliOverrides {
        data_dir: cli.data_dir,
        prefix: cli.prefix,
    };
    let config = Config::load(&overrides)?;
    tracing::debug!("Running {}", command.name());
    let mut ctx = AppContext::open(config, cli.json);

    match command {
        Commands::Add(args) => commands::add::execute(&args, &mut ctx)?,
        Commands::Edit(args) => commands::edit::execute(&args, &mut ctx)?,
        Commands::Show { id } => commands::show::execute(&id, &ctx)?,
        Commands::List(args) => commands::list::execute(&args, &ctx)?,
        Commands::Move { id, status } => commands::update::move_status(&id, &status, &mut ctx)?,
        Commands::Assign { id, email } => commands::update::assign(&id, &email, &mut ctx)?,
        Commands::Remove { id } => commands::update::remove(&id, &mut ctx)?,
        Commands::Attach { id, file } => commands::attach::execute(&id, &file, &mut ctx)?,
        Commands::Import { file } => commands::transfer::import(&file, &mut ctx)?,
        Commands::Export { file } => commands::transfer::export(&file, &ctx)?,
        Commands::Email { id } => commands::email::execute(&id, &ctx)?,
        Commands::Reload => commands::transfer::reload(&mut ctx)?,
        Commands::User(user) => commands::user::execute(user.command, &mut ctx)?,
        Commands::Source(source) => commands::source::execute(source.command, &ctx)?,
        Commands::Version => commands::version::execute(ctx.json)?,
    }

    Ok(())
}

impl Commands {
    const fn name(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Edit(_) => "edit",
            Self::Show { .. } => "show",
            Self::List(_) => "list",
            Self::Move { .. } => "move",
            Self::Assign { .. } => "assign",
            Self::Remove { .. } => "remove",
            Self::Attach { .. } => "attach",
            Self::Import { .. } => "import",
            Self::Export { .. } => "export",
            Self::Email { .. } => "email",
            Self::Reload => "reload",
            Self::User(user) => match user.command {
                UserSubcommand::Add { .. } => "user add",
                UserSubcommand::Remove { .. } => "user remove",
                UserSubcommand::Find { .. } => "user find",
                UserSubcommand::List => "user list",
            },
            Self::Source(source) => match source.command {
                SourceSubcommand::Attach(_) => "source attach",
                SourceSubcommand::List => "source list",
                SourceSubcommand::Branches => "source branches",
            },
            Self::Version => "version",
        }
    }
}

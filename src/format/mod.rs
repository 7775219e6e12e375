//! Output formatting for `bugbook`.
//!
//! Supports both human-readable text output and machine-parseable JSON.
//!
//! # JSON Output Types
//!
//! - [`Board`] - All partitions with counts (list)
//! - [`BugDetails`] - Bug with its resolved assignee (show)

mod output;
mod text;

pub use output::{Board, BugDetails};
pub use text::{
    format_board, format_bug_details, format_bug_line, format_priority, format_status_icon,
    status_heading, truncate_to_width,
};

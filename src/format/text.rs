//! Text formatting functions for `bugbook`.
//!
//! Provides plain text (non-ANSI) formatting for terminal output:
//! - Status icons (○ ◐ ✓)
//! - Priority badges ([High], [Medium], [Low])
//! - Bug lines, the three-column board, and the detail view

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::model::{BugRecord, BugStatus, Priority, UserRecord};
use crate::store::BugStore;

/// Widest title shown on the board before truncation.
const BOARD_TITLE_WIDTH: usize = 60;

/// Status icon characters.
pub mod icons {
    /// New - not yet picked up (hollow circle).
    pub const NEW: &str = "○";
    /// In progress - active work (half-filled).
    pub const IN_PROGRESS: &str = "◐";
    /// Resolved - fixed (checkmark).
    pub const RESOLVED: &str = "✓";
}

/// Return the icon character for a status.
#[must_use]
pub const fn format_status_icon(status: BugStatus) -> &'static str {
    match status {
        BugStatus::New => icons::NEW,
        BugStatus::InProgress => icons::IN_PROGRESS,
        BugStatus::Resolved => icons::RESOLVED,
    }
}

/// Format priority as a bracketed badge.
#[must_use]
pub fn format_priority(priority: Priority) -> String {
    format!("[{}]", priority.as_str())
}

/// Format a single-line bug summary.
///
/// Format: `{icon} {id} [{priority}] {title}`, plus ` → {assignee}` when set.
#[must_use]
pub fn format_bug_line(bug: &BugRecord) -> String {
    let mut line = format!(
        "{} {} {} {}",
        format_status_icon(bug.status),
        bug.id,
        format_priority(bug.priority),
        bug.title,
    );
    if !bug.assignee_email.is_empty() {
        line.push_str(" → ");
        line.push_str(&bug.assignee_email);
    }
    line
}

/// Cut `text` to at most `max_width` terminal columns, marking the cut
/// with an ellipsis.
#[must_use]
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w + 1 > max_width {
            break;
        }
        out.push(c);
        width += w;
    }
    out.push('…');
    out
}

/// Render every partition with a header, in board order, then a total.
#[must_use]
pub fn format_board(store: &BugStore) -> String {
    let mut out = String::new();
    for status in BugStatus::ALL {
        let bugs = store.list_by_status(status);
        out.push_str(&format!("{} ({})\n", status_heading(status), bugs.len()));
        if bugs.is_empty() {
            out.push_str("  (none)\n");
        }
        for bug in bugs {
            out.push_str(&format!(
                "  {} {} {} {}\n",
                format_status_icon(bug.status),
                bug.id,
                format_priority(bug.priority),
                truncate_to_width(&bug.title, BOARD_TITLE_WIDTH),
            ));
        }
    }
    out.push_str(&format!("\n{} bug(s)\n", store.counts().total()));
    out
}

/// Human heading for a partition.
#[must_use]
pub const fn status_heading(status: BugStatus) -> &'static str {
    match status {
        BugStatus::New => "New",
        BugStatus::InProgress => "In Progress",
        BugStatus::Resolved => "Resolved",
    }
}

/// Multi-line detail view. `assignee` is the directory entry matching the
/// bug's assignee email, if any.
#[must_use]
pub fn format_bug_details(bug: &BugRecord, assignee: Option<&UserRecord>) -> String {
    let mut out = format!("{}\n", format_bug_line(bug));
    out.push_str(&format!("Status:   {}\n", status_heading(bug.status)));
    out.push_str(&format!("Priority: {}\n", bug.priority));
    if !bug.project.is_empty() {
        out.push_str(&format!("Project:  {}\n", bug.project));
    }
    if !bug.assignee_email.is_empty() {
        match assignee {
            Some(user) if !user.name.is_empty() => out.push_str(&format!(
                "Assignee: {} <{}>\n",
                user.name, bug.assignee_email
            )),
            _ => out.push_str(&format!("Assignee: {}\n", bug.assignee_email)),
        }
    }
    if !bug.description.is_empty() {
        out.push_str(&format!("\n{}\n", bug.description));
    }
    if !bug.repeatable_steps.is_empty() {
        out.push_str(&format!("\nRepeatable steps:\n{}\n", bug.repeatable_steps));
    }
    if !bug.steps.is_empty() {
        out.push_str("\nSteps:\n");
        for (idx, step) in bug.steps.iter().enumerate() {
            out.push_str(&format!("  {}. {step}\n", idx + 1));
        }
    }
    if !bug.image_paths.is_empty() {
        out.push_str("\nAttachments:\n");
        for path in &bug.image_paths {
            out.push_str(&format!("  {path}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn make_test_bug() -> BugRecord {
        BugRecord::new("bug-test", "Test title")
    }

    #[test]
    fn test_status_icons() {
        assert_eq!(format_status_icon(BugStatus::New), "○");
        assert_eq!(format_status_icon(BugStatus::InProgress), "◐");
        assert_eq!(format_status_icon(BugStatus::Resolved), "✓");
    }

    #[test]
    fn test_format_priority() {
        assert_eq!(format_priority(Priority::High), "[High]");
        assert_eq!(format_priority(Priority::Medium), "[Medium]");
        assert_eq!(format_priority(Priority::Low), "[Low]");
    }

    #[test]
    fn test_format_bug_line_new() {
        let line = format_bug_line(&make_test_bug());
        assert_eq!(line, "○ bug-test [Medium] Test title");
    }

    #[test]
    fn test_format_bug_line_resolved_with_assignee() {
        let mut bug = make_test_bug().with_status(BugStatus::Resolved);
        bug.assignee_email = "dev@x.com".to_string();
        let line = format_bug_line(&bug);
        assert_eq!(line, "✓ bug-test [Medium] Test title → dev@x.com");
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefghij", 5), "abcd…");
        // Wide characters count double.
        assert_eq!(truncate_to_width("日本語テキスト", 7), "日本語…");
    }

    #[test]
    fn test_format_board() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = BugStore::new(dir.path().join("bugs.json"));
        store.upsert(BugRecord::new("bug-1", "One")).unwrap();
        store
            .upsert(BugRecord::new("bug-2", "Two").with_status(BugStatus::Resolved))
            .unwrap();

        let board = format_board(&store);
        assert_eq!(
            board,
            "New (1)\n  ○ bug-1 [Medium] One\nIn Progress (0)\n  (none)\nResolved (1)\n  ✓ bug-2 [Medium] Two\n\n2 bug(s)\n"
        );
    }

    #[test]
    fn test_format_bug_details() {
        let mut bug = make_test_bug().with_status(BugStatus::InProgress);
        bug.assignee_email = "al@x.com".to_string();
        bug.steps = vec!["open".to_string(), "tap".to_string()];
        bug.image_paths = vec!["/tmp/a.png".to_string()];
        let user = UserRecord::new("Al", "AL@x.com");

        let details = format_bug_details(&bug, Some(&user));
        assert!(details.contains("Status:   In Progress"));
        assert!(details.contains("Assignee: Al <al@x.com>"));
        assert!(details.contains("  2. tap"));
        assert!(details.contains("  /tmp/a.png"));
        assert!(!details.contains("Project:"));
    }
}

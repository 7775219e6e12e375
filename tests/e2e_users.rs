mod common;

use common::cli::{BbWorkspace, add_bug, run_bb};

#[test]
fn add_or_update_is_case_insensitive() {
    let workspace = BbWorkspace::new();

    let added = run_bb(&workspace, ["user", "add", "Al@X.com", "--name", "Al"], "add");
    assert!(added.status.success(), "user add failed: {}", added.stderr);
    assert!(added.stdout.starts_with("Added"));

    let updated = run_bb(
        &workspace,
        ["user", "add", "al@x.com", "--name", "Alan"],
        "update",
    );
    assert!(updated.stdout.starts_with("Updated"));

    let users = run_bb(&workspace, ["user", "list", "--json"], "list").json();
    assert_eq!(users.as_array().unwrap().len(), 1);
    assert_eq!(users[0]["name"], "Alan");
    assert_eq!(users[0]["email"], "al@x.com");

    let found = run_bb(&workspace, ["user", "find", "AL@x.COM"], "find");
    assert_eq!(found.stdout.trim(), "Alan <al@x.com>");
}

#[test]
fn remove_and_validation() {
    let workspace = BbWorkspace::new();
    run_bb(&workspace, ["user", "add", "a@x.com"], "add");

    let invalid = run_bb(&workspace, ["user", "add", "nope"], "add_invalid");
    assert!(!invalid.status.success());

    let removed = run_bb(&workspace, ["user", "remove", "A@X.COM"], "remove");
    assert!(removed.status.success());

    let missing = run_bb(&workspace, ["user", "find", "a@x.com"], "find");
    assert!(!missing.status.success());
    assert!(missing.stderr.contains("User not found"));
}

#[test]
fn show_resolves_assignee_name() {
    let workspace = BbWorkspace::new();
    run_bb(&workspace, ["user", "add", "dev@x.com", "--name", "Dev"], "user");
    let id = add_bug(&workspace, "Broken link", &["--assignee", "DEV@x.com"]);

    let shown = run_bb(&workspace, ["show", &id], "show");
    assert!(shown.stdout.contains("Assignee: Dev <DEV@x.com>"));
}

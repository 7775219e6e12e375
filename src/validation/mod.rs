//! Validation helpers for `bugbook`.
//!
//! Collaborators run these before handing records to a store. The stores
//! themselves only enforce identity, never content rules.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationError;
use crate::model::{BugRecord, UserRecord};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("email pattern is valid")
});

/// Loose syntactic email check: `local@domain.tld`, no whitespace.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

/// Validates bug fields before they reach the store.
pub struct BugValidator;

impl BugValidator {
    /// Validate a bug and return all validation errors found.
    ///
    /// # Errors
    ///
    /// Returns a `Vec<ValidationError>` if any validation rules are violated.
    pub fn validate(bug: &BugRecord) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        // Title: Required, max 500 chars.
        if bug.title.trim().is_empty() {
            errors.push(ValidationError::new("title", "cannot be empty"));
        }
        if bug.title.chars().count() > 500 {
            errors.push(ValidationError::new("title", "exceeds 500 characters"));
        }

        if !bug.assignee_email.trim().is_empty() && !is_valid_email(&bug.assignee_email) {
            errors.push(ValidationError::new(
                "assigneeEmail",
                "is not a valid email address",
            ));
        }

        if bug.steps.iter().any(|step| step.trim().is_empty()) {
            errors.push(ValidationError::new("steps", "cannot contain empty steps"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Validates user directory entries.
pub struct UserValidator;

impl UserValidator {
    /// Validate a user and return all validation errors found.
    ///
    /// # Errors
    ///
    /// Returns a `Vec<ValidationError>` if any validation rules are violated.
    pub fn validate(user: &UserRecord) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if user.email.trim().is_empty() {
            errors.push(ValidationError::new("email", "cannot be empty"));
        } else if !is_valid_email(&user.email) {
            errors.push(ValidationError::new("email", "is not a valid email address"));
        }

        if user.name.chars().count() > 200 {
            errors.push(ValidationError::new("name", "exceeds 200 characters"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email(" dev.team+bugs@mail.example.org "));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("two@@x.com"));
        assert!(!is_valid_email("spaces in@x.com"));
        assert!(!is_valid_email("trailing@dot."));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn bug_validation_rejects_empty_title() {
        let bug = BugRecord::new("1", "   ");
        let errors = BugValidator::validate(&bug).unwrap_err();
        assert!(errors.iter().any(|err| err.field == "title"));
    }

    #[test]
    fn bug_validation_checks_assignee_only_when_set() {
        let mut bug = BugRecord::new("1", "Crash");
        assert!(BugValidator::validate(&bug).is_ok());

        bug.assignee_email = "not-an-email".to_string();
        let errors = BugValidator::validate(&bug).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "assigneeEmail");
    }

    #[test]
    fn bug_validation_rejects_blank_steps() {
        let mut bug = BugRecord::new("1", "Crash");
        bug.steps = vec!["open".to_string(), " ".to_string()];
        let errors = BugValidator::validate(&bug).unwrap_err();
        assert!(errors.iter().any(|err| err.field == "steps"));
    }

    #[test]
    fn title_limit_counts_characters() {
        assert!(BugValidator::validate(&BugRecord::new("1", "崩".repeat(500))).is_ok());

        let errors = BugValidator::validate(&BugRecord::new("1", "崩".repeat(501))).unwrap_err();
        assert_eq!(errors[0].message, "exceeds 500 characters");
    }

    #[test]
    fn name_limit_counts_characters() {
        assert!(UserValidator::validate(&UserRecord::new("é".repeat(200), "a@x.com")).is_ok());
        assert!(UserValidator::validate(&UserRecord::new("é".repeat(201), "a@x.com")).is_err());
    }

    #[test]
    fn user_validation() {
        assert!(UserValidator::validate(&UserRecord::new("Al", "al@x.com")).is_ok());
        assert!(UserValidator::validate(&UserRecord::new("", "al@x.com")).is_ok());

        let errors = UserValidator::validate(&UserRecord::new("Al", "")).unwrap_err();
        assert_eq!(errors[0].message, "cannot be empty");

        let errors = UserValidator::validate(&UserRecord::new("Al", "al")).unwrap_err();
        assert_eq!(errors[0].field, "email");
    }
}

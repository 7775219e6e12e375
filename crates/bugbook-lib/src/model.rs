//! Core data types for bugbook-lib.
//!
//! Field names serialize in camelCase so backing files stay readable by
//! other bug-list tools. Reading is deliberately forgiving: PascalCase
//! field names, `null` fields, and status/priority ordinals are accepted.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::BugbookError;

/// Treat an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Lowercase and drop separators so `In Progress`, `in_progress` and
/// `InProgress` compare equal.
fn normalize_name(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Raw shape of an enum field in a stored or imported file.
#[derive(Deserialize)]
#[serde(untagged)]
enum LenientEnum {
    Ordinal(i64),
    Name(String),
    Other(serde::de::IgnoredAny),
}

/// Bug lifecycle status. Each status is one partition of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum BugStatus {
    #[default]
    New,
    InProgress,
    Resolved,
}

impl BugStatus {
    /// All statuses in partition (and save) order.
    pub const ALL: [Self; 3] = [Self::New, Self::InProgress, Self::Resolved];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::InProgress => "InProgress",
            Self::Resolved => "Resolved",
        }
    }

    /// Position of this status's partition.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::New => 0,
            Self::InProgress => 1,
            Self::Resolved => 2,
        }
    }

    fn from_name(s: &str) -> Option<Self> {
        match normalize_name(s).as_str() {
            "new" => Some(Self::New),
            "inprogress" => Some(Self::InProgress),
            "resolved" => Some(Self::Resolved),
            _ => None,
        }
    }

    fn from_ordinal(n: i64) -> Option<Self> {
        match n {
            0 => Some(Self::New),
            1 => Some(Self::InProgress),
            2 => Some(Self::Resolved),
            _ => None,
        }
    }
}

impl fmt::Display for BugStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BugStatus {
    type Err = BugbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| BugbookError::InvalidStatus {
            status: s.to_string(),
        })
    }
}

impl Serialize for BugStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BugStatus {
    /// Unrecognized values route to `New`.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let status = match LenientEnum::deserialize(deserializer)? {
            LenientEnum::Ordinal(n) => Self::from_ordinal(n),
            LenientEnum::Name(name) => Self::from_name(&name),
            LenientEnum::Other(_) => None,
        };
        Ok(status.unwrap_or_default())
    }
}

/// Bug priority. Informational only; no store behavior depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    fn from_name(s: &str) -> Option<Self> {
        match normalize_name(s).as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = BugbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| BugbookError::InvalidPriority {
            priority: s.to_string(),
        })
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let priority = match LenientEnum::deserialize(deserializer)? {
            LenientEnum::Ordinal(0) => Some(Self::Low),
            LenientEnum::Ordinal(1) => Some(Self::Medium),
            LenientEnum::Ordinal(2) => Some(Self::High),
            LenientEnum::Name(name) => Self::from_name(&name),
            LenientEnum::Ordinal(_) | LenientEnum::Other(_) => None,
        };
        Ok(priority.unwrap_or_default())
    }
}

/// A single bug.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BugRecord {
    /// Opaque unique ID (e.g., "bug-4k2x"). Immutable once assigned.
    #[serde(default, alias = "Id", deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(default, alias = "Title", deserialize_with = "null_as_default")]
    pub title: String,

    #[serde(default, alias = "Description", deserialize_with = "null_as_default")]
    pub description: String,

    /// Selects the partition the record lives in.
    #[serde(default, alias = "Status")]
    pub status: BugStatus,

    #[serde(default, alias = "AssigneeEmail", deserialize_with = "null_as_default")]
    pub assignee_email: String,

    #[serde(default, alias = "Project", deserialize_with = "null_as_default")]
    pub project: String,

    #[serde(default, alias = "RepeatableSteps", deserialize_with = "null_as_default")]
    pub repeatable_steps: String,

    /// Locally copied attachment files. Existence is not checked.
    #[serde(default, alias = "ImagePaths", deserialize_with = "null_as_default")]
    pub image_paths: Vec<String>,

    /// Ordered reproduction steps.
    #[serde(default, alias = "Steps", deserialize_with = "null_as_default")]
    pub steps: Vec<String>,

    #[serde(default, alias = "Priority")]
    pub priority: Priority,
}

impl BugRecord {
    /// A `New` bug with the given ID and title; every other field empty.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: BugStatus) -> Self {
        self.status = status;
        self
    }
}

/// A directory entry. Identity is the email, compared case-insensitively.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    #[serde(default, alias = "Name", deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, alias = "Email", deserialize_with = "null_as_default")]
    pub email: String,
}

impl UserRecord {
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Case-insensitive email comparison.
    #[must_use]
    pub fn has_email(&self, email: &str) -> bool {
        self.email.trim().to_lowercase() == email.trim().to_lowercase()
    }
}

/// Number of records per partition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub new: usize,
    pub in_progress: usize,
    pub resolved: usize,
}

impl StatusCounts {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.new + self.in_progress + self.resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_variants() {
        assert_eq!("new".parse::<BugStatus>().unwrap(), BugStatus::New);
        assert_eq!(
            "in_progress".parse::<BugStatus>().unwrap(),
            BugStatus::InProgress
        );
        assert_eq!(
            "In Progress".parse::<BugStatus>().unwrap(),
            BugStatus::InProgress
        );
        assert_eq!(
            "RESOLVED".parse::<BugStatus>().unwrap(),
            BugStatus::Resolved
        );
        assert!("closed".parse::<BugStatus>().is_err());
    }

    #[test]
    fn test_status_deserialize_defaults_to_new() {
        let cases = [
            (r#""InProgress""#, BugStatus::InProgress),
            ("2", BugStatus::Resolved),
            (r#""wontfix""#, BugStatus::New),
            ("7", BugStatus::New),
            ("null", BugStatus::New),
        ];
        for (json, expected) in cases {
            let status: BugStatus = serde_json::from_str(json).unwrap();
            assert_eq!(status, expected, "input {json}");
        }
    }

    #[test]
    fn test_priority_default_and_lenient() {
        assert_eq!(Priority::default(), Priority::Medium);
        let p: Priority = serde_json::from_str(r#""high""#).unwrap();
        assert_eq!(p, Priority::High);
        let p: Priority = serde_json::from_str("0").unwrap();
        assert_eq!(p, Priority::Low);
        let p: Priority = serde_json::from_str(r#""urgent""#).unwrap();
        assert_eq!(p, Priority::Medium);
    }

    #[test]
    fn test_bug_serializes_camel_case_field_names() {
        let bug = BugRecord::new("bug-1", "Crash on launch");
        let value = serde_json::to_value(&bug).unwrap();
        let obj = value.as_object().unwrap();
        for key in [
            "id",
            "title",
            "description",
            "status",
            "assigneeEmail",
            "project",
            "repeatableSteps",
            "imagePaths",
            "steps",
            "priority",
        ] {
            assert!(obj.contains_key(key), "missing {key}");
        }
        assert_eq!(obj.len(), 10);
        assert_eq!(obj["status"], "New");
    }

    #[test]
    fn test_bug_accepts_pascal_case_and_nulls() {
        let json = r#"{
            "Id": "42",
            "Title": "Legacy",
            "Description": null,
            "Status": 1,
            "AssigneeEmail": "dev@example.com",
            "ImagePaths": null
        }"#;
        let bug: BugRecord = serde_json::from_str(json).unwrap();
        assert_eq!(bug.id, "42");
        assert_eq!(bug.title, "Legacy");
        assert_eq!(bug.description, "");
        assert_eq!(bug.status, BugStatus::InProgress);
        assert_eq!(bug.assignee_email, "dev@example.com");
        assert!(bug.image_paths.is_empty());
        assert_eq!(bug.priority, Priority::Medium);
    }

    #[test]
    fn test_user_email_identity_is_case_insensitive() {
        let user = UserRecord::new("Al", "A@x.com");
        assert!(user.has_email("a@X.COM"));
        assert!(user.has_email(" a@x.com "));
        assert!(!user.has_email("b@x.com"));
    }

    #[test]
    fn test_status_counts_total() {
        let counts = StatusCounts {
            new: 2,
            in_progress: 1,
            resolved: 4,
        };
        assert_eq!(counts.total(), 7);
    }
}

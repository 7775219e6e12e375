use crate::model::{BugRecord, BugStatus, StatusCounts, UserRecord};
use crate::store::BugStore;
use serde::Serialize;

/// All partitions for `list --json`.
#[derive(Debug, Clone, Serialize)]
pub struct Board<'a> {
    pub new: &'a [BugRecord],
    pub in_progress: &'a [BugRecord],
    pub resolved: &'a [BugRecord],
    pub counts: StatusCounts,
}

impl<'a> Board<'a> {
    #[must_use]
    pub fn from_store(store: &'a BugStore) -> Self {
        Self {
            new: store.list_by_status(BugStatus::New),
            in_progress: store.list_by_status(BugStatus::InProgress),
            resolved: store.list_by_status(BugStatus::Resolved),
            counts: store.counts(),
        }
    }
}

/// Bug with its resolved assignee for the show view.
#[derive(Debug, Clone, Serialize)]
pub struct BugDetails<'a> {
    #[serde(flatten)]
    pub bug: &'a BugRecord,
    pub assignee: Option<&'a UserRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_json_shape() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = BugStore::new(dir.path().join("bugs.json"));
        store
            .upsert(BugRecord::new("bug-1", "One").with_status(BugStatus::InProgress))
            .unwrap();

        let value = serde_json::to_value(Board::from_store(&store)).unwrap();
        assert_eq!(value["in_progress"][0]["id"], "bug-1");
        assert_eq!(value["new"].as_array().unwrap().len(), 0);
        assert_eq!(value["counts"]["in_progress"], 1);
    }

    #[test]
    fn details_flatten_bug_fields() {
        let bug = BugRecord::new("bug-1", "One");
        let user = UserRecord::new("Al", "al@x.com");
        let value = serde_json::to_value(BugDetails {
            bug: &bug,
            assignee: Some(&user),
        })
        .unwrap();
        assert_eq!(value["title"], "One");
        assert_eq!(value["assignee"]["name"], "Al");
    }
}

//! Aggregate counts for the dashboard.

use serde::{Deserialize, Serialize};

use crate::models::{Priority, Status};

/// Number of projects reported in [`BugStats::projects`].
pub const TOP_PROJECTS: usize = 5;

/// Count of bugs sharing one value of a grouped field.
///
/// Serialized as `{"_id": key, "count": n}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCount {
    #[serde(rename = "_id")]
    pub key: String,
    pub count: i64,
}

impl GroupCount {
    pub fn new(key: impl Into<String>, count: i64) -> Self {
        Self {
            key: key.into(),
            count,
        }
    }
}

/// Counts by status, by priority, and for the busiest projects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BugStats {
    pub status: Vec<GroupCount>,
    pub priority: Vec<GroupCount>,
    pub projects: Vec<GroupCount>,
}

impl BugStats {
    /// Shapes raw `(key, count)` groups.
    ///
    /// Status and priority groups are zero-filled so every enumerated value
    /// appears once, in declaration order. Projects are ranked by count
    /// (name breaks ties) and cut to [`TOP_PROJECTS`].
    pub fn from_groups(
        status: Vec<(String, i64)>,
        priority: Vec<(String, i64)>,
        projects: Vec<(String, i64)>,
    ) -> Self {
        Self {
            status: zero_filled(Status::ALL.iter().map(Status::as_str), status),
            priority: zero_filled(Priority::ALL.iter().map(Priority::as_str), priority),
            projects: top_projects(projects),
        }
    }

    /// Total number of bugs.
    pub fn total(&self) -> i64 {
        self.status.iter().map(|g| g.count).sum()
    }

    pub fn status_count(&self, status: Status) -> i64 {
        count_of(&self.status, status.as_str())
    }

    pub fn priority_count(&self, priority: Priority) -> i64 {
        count_of(&self.priority, priority.as_str())
    }
}

fn count_of(groups: &[GroupCount], key: &str) -> i64 {
    groups
        .iter()
        .find(|g| g.key == key)
        .map(|g| g.count)
        .unwrap_or(0)
}

fn zero_filled<'a>(
    keys: impl Iterator<Item = &'a str>,
    mut rows: Vec<(String, i64)>,
) -> Vec<GroupCount> {
    let mut groups: Vec<GroupCount> = keys
        .map(|key| {
            let count = rows
                .iter()
                .filter(|(k, _)| k == key)
                .map(|(_, c)| *c)
                .sum();
            GroupCount::new(key, count)
        })
        .collect();

    // Values outside the enum should not exist, but are reported rather
    // than silently dropped.
    rows.retain(|(k, _)| !groups.iter().any(|g| &g.key == k));
    groups.extend(rows.into_iter().map(|(k, c)| GroupCount::new(k, c)));
    groups
}

fn top_projects(rows: Vec<(String, i64)>) -> Vec<GroupCount> {
    let mut groups: Vec<GroupCount> = rows
        .into_iter()
        .map(|(key, count)| GroupCount::new(key, count))
        .collect();
    groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    groups.truncate(TOP_PROJECTS);
    groups
}

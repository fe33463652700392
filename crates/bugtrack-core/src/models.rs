//! Bug record and its enumerated fields.
//!
//! `Bug` is the only entity in the tracker. Its `status` and `priority`
//! are closed enums serialized in kebab-case (`in-progress`), and the two
//! timestamps are managed by the tracker itself, never by callers.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Assignee recorded when a bug is created without one.
pub const DEFAULT_ASSIGNEE: &str = "Unassigned";

/// Error returned when a string is not one of an enum's wire values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a supported {kind}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

/// Lifecycle state of a bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "kebab-case"))]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl Status {
    /// Every status, in declaration order.
    pub const ALL: [Status; 4] = [
        Status::Open,
        Status::InProgress,
        Status::Resolved,
        Status::Closed,
    ];

    /// Wire representation, e.g. `"in-progress"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in-progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    /// Human-readable label, e.g. `"In Progress"`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
            Self::Closed => "Closed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "status",
                value: s.to_string(),
            })
    }
}

/// How urgently a bug needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "kebab-case"))]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Every priority, lowest first.
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "priority",
                value: s.to_string(),
            })
    }
}

/// A tracked bug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Bug {
    /// Assigned at creation, never changes.
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    pub assigned_to: String,
    pub reported_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps_to_reproduce: Option<String>,
    /// Free-text project name; not a reference to another record.
    pub project: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for a bug that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBug {
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    pub assigned_to: String,
    pub reported_by: String,
    pub steps_to_reproduce: Option<String>,
    pub project: String,
}

/// Validated partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BugPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub assigned_to: Option<String>,
    pub reported_by: Option<String>,
    pub steps_to_reproduce: Option<String>,
    pub project: Option<String>,
}

impl BugPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Bug {
    /// Builds the stored record for a new bug.
    pub fn create(new_bug: NewBug, id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: new_bug.title,
            description: new_bug.description,
            status: new_bug.status,
            priority: new_bug.priority,
            assigned_to: new_bug.assigned_to,
            reported_by: new_bug.reported_by,
            steps_to_reproduce: new_bug.steps_to_reproduce,
            project: new_bug.project,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies every field present in `patch` and advances `updated_at`.
    ///
    /// Status changes are applied as given; callers gate them with
    /// [`Status::transition_to`] first.
    pub fn apply(&mut self, patch: BugPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(assigned_to) = patch.assigned_to {
            self.assigned_to = assigned_to;
        }
        if let Some(reported_by) = patch.reported_by {
            self.reported_by = reported_by;
        }
        if let Some(steps) = patch.steps_to_reproduce {
            self.steps_to_reproduce = Some(steps);
        }
        if let Some(project) = patch.project {
            self.project = project;
        }
        self.updated_at = next_update_time(self.updated_at, now);
    }
}

/// Current time at the microsecond precision the store keeps.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// `now`, unless the clock has not moved past `previous`; then one
/// microsecond after `previous`. Keeps `updated_at` strictly increasing.
pub fn next_update_time(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

//! Field validation for create and update requests.
//!
//! Request bodies arrive as [`BugInput`], where every field is optional
//! text. Validation trims text fields, checks required fields and length
//! limits, parses the enums, and reports every violated rule at once.

use serde::{Deserialize, Serialize};

use crate::models::{BugPatch, NewBug, Priority, Status, DEFAULT_ASSIGNEE};

pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 1000;

const TITLE_REQUIRED: &str = "Bug title is required";
const TITLE_TOO_LONG: &str = "Title cannot be more than 100 characters";
const DESCRIPTION_REQUIRED: &str = "Bug description is required";
const DESCRIPTION_TOO_LONG: &str = "Description cannot be more than 1000 characters";
const STATUS_INVALID: &str = "Status must be one of: open, in-progress, resolved, closed";
const PRIORITY_INVALID: &str = "Priority must be one of: low, medium, high, critical";
const REPORTER_REQUIRED: &str = "Reporter name is required";
const PROJECT_REQUIRED: &str = "Project name is required";

/// One violated rule, keyed by the JSON field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// All rules a request violated, in field order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Validation Error ({} field errors)", errors.len())]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

/// Bug fields as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BugInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reported_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps_to_reproduce: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

impl BugInput {
    /// Validates a create request. Required fields must be present.
    ///
    /// # Errors
    ///
    /// Returns every violated rule when the input is not a valid bug.
    pub fn validate_new(&self) -> Result<NewBug, ValidationError> {
        let mut errors = Vec::new();

        let title = required_text(
            &mut errors,
            "title",
            self.title.as_deref(),
            TITLE_REQUIRED,
            Some((MAX_TITLE_LEN, TITLE_TOO_LONG)),
        );
        let description = required_text(
            &mut errors,
            "description",
            self.description.as_deref(),
            DESCRIPTION_REQUIRED,
            Some((MAX_DESCRIPTION_LEN, DESCRIPTION_TOO_LONG)),
        );
        let status = enum_value::<Status>(
            &mut errors,
            "status",
            self.status.as_deref(),
            STATUS_INVALID,
        );
        let priority = enum_value::<Priority>(
            &mut errors,
            "priority",
            self.priority.as_deref(),
            PRIORITY_INVALID,
        );
        let reported_by = required_text(
            &mut errors,
            "reportedBy",
            self.reported_by.as_deref(),
            REPORTER_REQUIRED,
            None,
        );
        let project = required_text(
            &mut errors,
            "project",
            self.project.as_deref(),
            PROJECT_REQUIRED,
            None,
        );

        if !errors.is_empty() {
            return Err(ValidationError { errors });
        }

        Ok(NewBug {
            title: title.unwrap_or_default(),
            description: description.unwrap_or_default(),
            status: status.unwrap_or_default(),
            priority: priority.unwrap_or_default(),
            assigned_to: optional_text(self.assigned_to.as_deref())
                .unwrap_or_else(|| DEFAULT_ASSIGNEE.to_string()),
            reported_by: reported_by.unwrap_or_default(),
            steps_to_reproduce: optional_text(self.steps_to_reproduce.as_deref()),
            project: project.unwrap_or_default(),
        })
    }

    /// Validates an update request. Only fields present are checked, but a
    /// present required field may not be blank.
    ///
    /// # Errors
    ///
    /// Returns every violated rule among the fields present.
    pub fn validate_patch(&self) -> Result<BugPatch, ValidationError> {
        let mut errors = Vec::new();

        let title = self.title.as_deref().and_then(|value| {
            required_text(
                &mut errors,
                "title",
                Some(value),
                TITLE_REQUIRED,
                Some((MAX_TITLE_LEN, TITLE_TOO_LONG)),
            )
        });
        let description = self.description.as_deref().and_then(|value| {
            required_text(
                &mut errors,
                "description",
                Some(value),
                DESCRIPTION_REQUIRED,
                Some((MAX_DESCRIPTION_LEN, DESCRIPTION_TOO_LONG)),
            )
        });
        let status = enum_value::<Status>(
            &mut errors,
            "status",
            self.status.as_deref(),
            STATUS_INVALID,
        );
        let priority = enum_value::<Priority>(
            &mut errors,
            "priority",
            self.priority.as_deref(),
            PRIORITY_INVALID,
        );
        let reported_by = self.reported_by.as_deref().and_then(|value| {
            required_text(&mut errors, "reportedBy", Some(value), REPORTER_REQUIRED, None)
        });
        let project = self.project.as_deref().and_then(|value| {
            required_text(&mut errors, "project", Some(value), PROJECT_REQUIRED, None)
        });

        if !errors.is_empty() {
            return Err(ValidationError { errors });
        }

        Ok(BugPatch {
            title,
            description,
            status,
            priority,
            assigned_to: self.assigned_to.as_deref().map(|value| {
                optional_text(Some(value)).unwrap_or_else(|| DEFAULT_ASSIGNEE.to_string())
            }),
            reported_by,
            steps_to_reproduce: self.steps_to_reproduce.as_deref().map(|s| s.trim().to_string()),
            project,
        })
    }
}

/// Trims `value` and checks it is non-blank and within `max` characters.
/// Records at most one error per field.
fn required_text(
    errors: &mut Vec<FieldError>,
    field: &str,
    value: Option<&str>,
    required_message: &str,
    max: Option<(usize, &str)>,
) -> Option<String> {
    let trimmed = value.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        errors.push(FieldError::new(field, required_message));
        return None;
    }
    if let Some((max_len, message)) = max {
        if trimmed.chars().count() > max_len {
            errors.push(FieldError::new(field, message));
            return None;
        }
    }
    Some(trimmed.to_string())
}

fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn enum_value<T: std::str::FromStr>(
    errors: &mut Vec<FieldError>,
    field: &str,
    value: Option<&str>,
    message: &str,
) -> Option<T> {
    let value = value?;
    match value.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            errors.push(FieldError::new(field, message));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_input() -> BugInput {
        BugInput {
            title: Some("Crash on save".to_string()),
            description: Some("Saving a draft crashes the editor".to_string()),
            status: None,
            priority: None,
            assigned_to: None,
            reported_by: Some("Sam".to_string()),
            steps_to_reproduce: Some("1. Open editor\n2. Press save".to_string()),
            project: Some("Editor".to_string()),
        }
    }

    #[test]
    fn test_validate_new_applies_defaults() {
        let new_bug = complete_input().validate_new().unwrap();
        assert_eq!(new_bug.status, Status::Open);
        assert_eq!(new_bug.priority, Priority::Medium);
        assert_eq!(new_bug.assigned_to, DEFAULT_ASSIGNEE);
        assert_eq!(
            new_bug.steps_to_reproduce.as_deref(),
            Some("1. Open editor\n2. Press save")
        );
    }

    #[test]
    fn test_validate_new_trims_text() {
        let input = BugInput {
            title: Some("  Crash on save  ".to_string()),
            assigned_to: Some("  Lee ".to_string()),
            ..complete_input()
        };
        let new_bug = input.validate_new().unwrap();
        assert_eq!(new_bug.title, "Crash on save");
        assert_eq!(new_bug.assigned_to, "Lee");
    }

    #[test]
    fn test_missing_title_reports_title() {
        let input = BugInput {
            title: None,
            ..complete_input()
        };
        let err = input.validate_new().unwrap_err();
        assert_eq!(err.errors, vec![FieldError::new("title", TITLE_REQUIRED)]);
    }

    #[test]
    fn test_blank_title_is_missing() {
        let input = BugInput {
            title: Some("   ".to_string()),
            ..complete_input()
        };
        let err = input.validate_new().unwrap_err();
        assert!(err.has_field("title"));
    }

    #[test]
    fn test_title_length_limit() {
        let at_limit = BugInput {
            title: Some("A".repeat(100)),
            ..complete_input()
        };
        assert!(at_limit.validate_new().is_ok());

        let over_limit = BugInput {
            title: Some("A".repeat(101)),
            ..complete_input()
        };
        let err = over_limit.validate_new().unwrap_err();
        assert_eq!(err.errors, vec![FieldError::new("title", TITLE_TOO_LONG)]);
    }

    #[test]
    fn test_description_length_counts_characters() {
        let input = BugInput {
            description: Some("é".repeat(1000)),
            ..complete_input()
        };
        assert!(input.validate_new().is_ok());

        let input = BugInput {
            description: Some("é".repeat(1001)),
            ..complete_input()
        };
        assert!(input.validate_new().unwrap_err().has_field("description"));
    }

    #[test]
    fn test_all_errors_reported_in_field_order() {
        let input = BugInput {
            status: Some("done".to_string()),
            priority: Some("urgent".to_string()),
            ..Default::default()
        };
        let err = input.validate_new().unwrap_err();
        let fields: Vec<&str> = err.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["title", "description", "status", "priority", "reportedBy", "project"]
        );
    }

    #[test]
    fn test_patch_checks_only_present_fields() {
        let patch = BugInput {
            status: Some("closed".to_string()),
            ..Default::default()
        }
        .validate_patch()
        .unwrap();
        assert_eq!(patch.status, Some(Status::Closed));
        assert!(patch.title.is_none());
        assert!(patch.project.is_none());
    }

    #[test]
    fn test_patch_rejects_blank_required_field() {
        let err = BugInput {
            project: Some(" ".to_string()),
            title: Some("B".repeat(101)),
            ..Default::default()
        }
        .validate_patch()
        .unwrap_err();
        assert_eq!(
            err.errors,
            vec![
                FieldError::new("title", TITLE_TOO_LONG),
                FieldError::new("project", PROJECT_REQUIRED),
            ]
        );
    }

    #[test]
    fn test_patch_blank_assignee_resets_to_default() {
        let patch = BugInput {
            assigned_to: Some("".to_string()),
            ..Default::default()
        }
        .validate_patch()
        .unwrap();
        assert_eq!(patch.assigned_to.as_deref(), Some(DEFAULT_ASSIGNEE));
    }

    #[test]
    fn test_input_json_field_names() {
        let input: BugInput = serde_json::from_str(
            r#"{"title":"T","reportedBy":"R","stepsToReproduce":"S","assignedTo":"A"}"#,
        )
        .unwrap();
        assert_eq!(input.reported_by.as_deref(), Some("R"));
        assert_eq!(input.steps_to_reproduce.as_deref(), Some("S"));
        assert_eq!(input.assigned_to.as_deref(), Some("A"));

        let json = serde_json::to_value(&BugInput {
            project: Some("P".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "project": "P" }));
    }
}

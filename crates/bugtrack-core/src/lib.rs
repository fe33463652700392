// Bugtrack Core - domain model and rules for the bug tracker

pub mod models;
pub mod query;
pub mod stats;
pub mod transition;
pub mod validation;

pub use models::{
    next_update_time, timestamp_now, Bug, BugPatch, NewBug, ParseEnumError, Priority, Status,
    DEFAULT_ASSIGNEE,
};
pub use query::{
    BugFilter, BugQuery, ListParams, Pagination, SortDirection, SortField, SortKey, SortSpec,
};
pub use stats::{BugStats, GroupCount, TOP_PROJECTS};
pub use transition::{is_valid_transition, InvalidTransition};
pub use validation::{BugInput, FieldError, ValidationError};

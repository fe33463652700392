//! SQL access for bug records.
//!
//! All statements use bound parameters. The only text spliced into SQL is
//! column names and sort directions chosen from fixed lists below.

use bugtrack_core::{Bug, BugFilter, BugQuery, BugStats, SortDirection, SortField};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::error::AppError;

const BUG_COLUMNS: &str = "id, title, description, status, priority, assigned_to, \
     reported_by, steps_to_reproduce, project, created_at, updated_at";

/// One page of a list query plus the number of matches across all pages.
#[derive(Debug, Clone)]
pub struct BugPage {
    pub bugs: Vec<Bug>,
    pub total: u64,
}

/// Fixed-width RFC 3339 text, so stored timestamps sort correctly as text.
pub fn db_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Inserts a new bug record.
pub async fn insert_bug(pool: &SqlitePool, bug: &Bug) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO bugs (id, title, description, status, priority, assigned_to,
                          reported_by, steps_to_reproduce, project, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(bug.id)
    .bind(&bug.title)
    .bind(&bug.description)
    .bind(bug.status)
    .bind(bug.priority)
    .bind(&bug.assigned_to)
    .bind(&bug.reported_by)
    .bind(&bug.steps_to_reproduce)
    .bind(&bug.project)
    .bind(db_timestamp(bug.created_at))
    .bind(db_timestamp(bug.updated_at))
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetches a bug by id.
pub async fn find_bug(pool: &SqlitePool, id: Uuid) -> Result<Option<Bug>, AppError> {
    let bug = sqlx::query_as::<_, Bug>(&format!("SELECT {BUG_COLUMNS} FROM bugs WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(bug)
}

/// Writes every mutable field of `bug`. Returns false if the record is gone.
pub async fn update_bug(pool: &SqlitePool, bug: &Bug) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE bugs
        SET title = ?, description = ?, status = ?, priority = ?, assigned_to = ?,
            reported_by = ?, steps_to_reproduce = ?, project = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&bug.title)
    .bind(&bug.description)
    .bind(bug.status)
    .bind(bug.priority)
    .bind(&bug.assigned_to)
    .bind(&bug.reported_by)
    .bind(&bug.steps_to_reproduce)
    .bind(&bug.project)
    .bind(db_timestamp(bug.updated_at))
    .bind(bug.id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Deletes a bug and returns its title, or `None` if no record had that id.
pub async fn delete_bug(pool: &SqlitePool, id: Uuid) -> Result<Option<String>, AppError> {
    let title = sqlx::query_scalar::<_, String>("DELETE FROM bugs WHERE id = ? RETURNING title")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(title)
}

/// Runs a filtered, sorted, paginated list query.
pub async fn list_bugs(pool: &SqlitePool, query: &BugQuery) -> Result<BugPage, AppError> {
    let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT {BUG_COLUMNS} FROM bugs"));
    push_filter(&mut select, &query.filter);

    select.push(" ORDER BY ");
    for (i, key) in query.sort.keys().iter().enumerate() {
        if i > 0 {
            select.push(", ");
        }
        select
            .push(sort_column(key.field))
            .push(" ")
            .push(sort_keyword(key.direction));
    }
    // Insertion order breaks ties so pages never overlap.
    select
        .push(", rowid ")
        .push(sort_keyword(query.sort.primary_direction()));

    let limit = i64::from(query.pagination.limit);
    let offset = i64::try_from(query.pagination.offset()).unwrap_or(i64::MAX);
    select
        .push(" LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    let bugs = select.build_query_as::<Bug>().fetch_all(pool).await?;

    let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM bugs");
    push_filter(&mut count, &query.filter);
    let total = count.build_query_scalar::<i64>().fetch_one(pool).await?;

    Ok(BugPage {
        bugs,
        total: u64::try_from(total).unwrap_or(0),
    })
}

/// Counts by status, priority and project over the whole collection.
pub async fn bug_stats(pool: &SqlitePool) -> Result<BugStats, AppError> {
    let status: Vec<(String, i64)> =
        sqlx::query_as("SELECT status, COUNT(*) FROM bugs GROUP BY status")
            .fetch_all(pool)
            .await?;

    let priority: Vec<(String, i64)> =
        sqlx::query_as("SELECT priority, COUNT(*) FROM bugs GROUP BY priority")
            .fetch_all(pool)
            .await?;

    let projects: Vec<(String, i64)> =
        sqlx::query_as("SELECT project, COUNT(*) FROM bugs GROUP BY project")
            .fetch_all(pool)
            .await?;

    Ok(BugStats::from_groups(status, priority, projects))
}

fn push_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: &BugFilter) {
    let conditions = [
        ("status", &filter.status),
        ("priority", &filter.priority),
        ("project", &filter.project),
    ];

    let mut keyword = " WHERE ";
    for (column, value) in conditions {
        if let Some(value) = value {
            builder
                .push(keyword)
                .push(column)
                .push(" = ")
                .push_bind(value.clone());
            keyword = " AND ";
        }
    }
}

fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::CreatedAt => "created_at",
        SortField::UpdatedAt => "updated_at",
        SortField::Title => "title",
        SortField::Status => "status",
        SortField::Priority => "priority",
        SortField::Project => "project",
        SortField::AssignedTo => "assigned_to",
        SortField::ReportedBy => "reported_by",
    }
}

fn sort_keyword(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    }
}

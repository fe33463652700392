//! Bug CRUD, listing and statistics endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bugtrack_core::{timestamp_now, Bug, BugInput, BugStats, ListParams};
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::AppError;
use crate::store;

/// Success envelope carrying a single payload.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Response for a list request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BugListResponse {
    pub success: bool,
    /// Number of bugs in `data`.
    pub count: usize,
    /// Number of bugs matching the filters across all pages.
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u32,
    pub data: Vec<Bug>,
}

/// Serializes as `{}`.
#[derive(Debug, Serialize)]
pub struct EmptyData {}

/// Response for a successful delete.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub data: EmptyData,
    pub message: String,
}

/// Creates the bugs router.
pub fn router(pool: SqlitePool) -> Router {
    Router::new()
        .route("/", get(list_bugs).post(create_bug))
        .route("/stats", get(bug_stats))
        .route("/{id}", get(get_bug).put(update_bug).delete(delete_bug))
        .with_state(pool)
}

/// GET /api/bugs
///
/// Lists bugs matching the optional `status`, `priority` and `project`
/// filters, sorted by `sort` and paginated by `page`/`limit`.
async fn list_bugs(
    State(pool): State<SqlitePool>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<BugListResponse>, AppError> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let query = params.to_query();

    let page = store::list_bugs(&pool, &query).await?;

    Ok(Json(BugListResponse {
        success: true,
        count: page.bugs.len(),
        total: page.total,
        total_pages: query.pagination.total_pages(page.total),
        current_page: query.pagination.page,
        data: page.bugs,
    }))
}

/// GET /api/bugs/stats
async fn bug_stats(
    State(pool): State<SqlitePool>,
) -> Result<Json<DataResponse<BugStats>>, AppError> {
    let stats = store::bug_stats(&pool).await?;
    Ok(Json(DataResponse::new(stats)))
}

/// GET /api/bugs/{id}
async fn get_bug(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<Bug>>, AppError> {
    let id = parse_bug_id(&id)?;
    let bug = store::find_bug(&pool, id)
        .await?
        .ok_or_else(|| bug_not_found(id))?;

    Ok(Json(DataResponse::new(bug)))
}

/// POST /api/bugs
///
/// Validates the submitted fields, fills in defaults and stores the bug.
async fn create_bug(
    State(pool): State<SqlitePool>,
    payload: Result<Json<BugInput>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<Bug>>), AppError> {
    let Json(input) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let new_bug = input.validate_new()?;

    let bug = Bug::create(new_bug, Uuid::new_v4(), timestamp_now());
    store::insert_bug(&pool, &bug).await?;

    tracing::info!(bug_id = %bug.id, title = %bug.title, "Bug created");

    Ok((StatusCode::CREATED, Json(DataResponse::new(bug))))
}

/// PUT /api/bugs/{id}
///
/// Applies a partial update. A status change must follow the transition
/// table; if it does not, nothing is written.
async fn update_bug(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
    payload: Result<Json<BugInput>, JsonRejection>,
) -> Result<Json<DataResponse<Bug>>, AppError> {
    let id = parse_bug_id(&id)?;
    let Json(input) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let patch = input.validate_patch()?;

    let mut bug = store::find_bug(&pool, id)
        .await?
        .ok_or_else(|| bug_not_found(id))?;

    if let Some(next) = patch.status {
        bug.status.transition_to(next)?;
    }

    bug.apply(patch, timestamp_now());

    if !store::update_bug(&pool, &bug).await? {
        return Err(bug_not_found(id));
    }

    tracing::info!(bug_id = %bug.id, title = %bug.title, status = %bug.status, "Bug updated");

    Ok(Json(DataResponse::new(bug)))
}

/// DELETE /api/bugs/{id}
async fn delete_bug(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = parse_bug_id(&id)?;

    let title = store::delete_bug(&pool, id)
        .await?
        .ok_or_else(|| bug_not_found(id))?;

    tracing::info!(bug_id = %id, title = %title, "Bug deleted");

    Ok(Json(DeleteResponse {
        success: true,
        data: EmptyData {},
        message: "Bug successfully deleted".to_string(),
    }))
}

/// Parses a path identifier. Malformed ids are a client error, not a miss.
fn parse_bug_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest("Invalid id".to_string()))
}

fn bug_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Bug not found with id {}", id))
}

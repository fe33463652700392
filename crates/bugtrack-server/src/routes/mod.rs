//! API routes for the Bugtrack server.

pub mod bugs;

use axum::{
    extract::OriginalUri,
    http::{HeaderName, HeaderValue},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::normalize_path::NormalizePath;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::error::AppError;

/// The complete HTTP service. Trailing slashes are trimmed before routing,
/// so `/api/bugs/` and `/api/bugs` reach the same handler.
pub type App = NormalizePath<Router>;

/// Headers added to every response unless a handler already set them.
const SECURITY_HEADERS: [(&str, &str); 5] = [
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "SAMEORIGIN"),
    ("referrer-policy", "no-referrer"),
    ("x-dns-prefetch-control", "off"),
    ("x-permitted-cross-domain-policies", "none"),
];

/// Creates the main router: the API under `/api`, a health check, a JSON
/// 404 for everything else, plus security headers, CORS and request tracing.
pub fn create_router(pool: SqlitePool) -> App {
    let router = Router::new()
        .nest("/api", api_routes(pool))
        .route("/health", get(health_check))
        .fallback(not_found);

    let router = with_security_headers(router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    NormalizePath::trim_trailing_slash(router)
}

/// Creates the API routes.
fn api_routes(pool: SqlitePool) -> Router {
    Router::new().nest("/bugs", bugs::router(pool))
}

fn with_security_headers(router: Router) -> Router {
    SECURITY_HEADERS
        .into_iter()
        .fold(router, |router, (name, value)| {
            router.layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            ))
        })
}

/// GET /health
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn not_found(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::NotFound(format!("Not Found - {}", uri))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_security_header_names_are_valid() {
        for (name, value) in SECURITY_HEADERS {
            assert_eq!(name, name.to_ascii_lowercase());
            assert!(HeaderName::from_bytes(name.as_bytes()).is_ok());
            assert!(HeaderValue::from_str(value).is_ok());
        }
    }
}

//! HTTP routes.
//!
//! | Route | Description |
//! |-------|-------------|
//! | `GET /health` | Liveness probe |
//! | `GET /api/dogs?page=N` | One page of cached breeds |
//! | `GET /api/dogs/status` | Loader and cache state |

use std::num::{NonZeroU32, NonZeroUsize};
use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use kennel_core::{BreedCache, CacheStatus, PageResponse, PaginationView};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::error::ServerError;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    view: PaginationView,
    cache: Arc<BreedCache>,
    page_size: NonZeroUsize,
}

impl AppState {
    pub fn new(cache: Arc<BreedCache>, page_size: NonZeroUsize) -> Self {
        Self {
            view: PaginationView::new(Arc::clone(&cache)),
            cache,
            page_size,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/dogs", get(dogs_handler))
        .route("/api/dogs/status", get(status_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// CORS for the browser frontend. Credentials are allowed, so methods and
/// headers are mirrored rather than wildcarded.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, ServerError> {
    let origin = HeaderValue::from_str(origin).map_err(|_| ServerError::CorsOrigin {
        origin: origin.to_owned(),
    })?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

async fn health_handler() -> Json<serde_json::Value> {
    debug!("health check endpoint called");
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
struct DogsQuery {
    page: Option<i64>,
}

async fn dogs_handler(
    State(state): State<AppState>,
    query: Result<Query<DogsQuery>, QueryRejection>,
) -> Response {
    let requested = match query {
        Ok(Query(query)) => query.page.unwrap_or(1),
        Err(rejection) => return invalid_page(rejection.body_text()),
    };
    let Some(page) = u32::try_from(requested).ok().and_then(NonZeroU32::new) else {
        return invalid_page(format!("page must be an integer >= 1, got {requested}"));
    };

    debug!(page = page.get(), "API request for page");
    let response = state.view.page(page, state.page_size);

    match &response {
        PageResponse::Page(window) => {
            info!(page = window.page, items = window.items.len(), "serving page");
        }
        PageResponse::NotReady(not_ready) => {
            info!(
                page = not_ready.page,
                loaded_items = not_ready.loaded_items,
                "page requested but not loaded yet"
            );
        }
        PageResponse::OutOfRange(out_of_range) => {
            warn!(
                page = out_of_range.page,
                total_pages = out_of_range.total_pages,
                "page out of range"
            );
        }
    }

    Json(response).into_response()
}

async fn status_handler(State(state): State<AppState>) -> Json<CacheStatus> {
    Json(state.cache.status())
}

fn invalid_page(detail: String) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": "Invalid page parameter", "detail": detail })),
    )
        .into_response()
}

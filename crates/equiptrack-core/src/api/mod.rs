//! HTTP API
//!
//! axum router over the inventory, search and audit services. Handlers only
//! extract and validate transport input; all rules live in the domain layer.
//!
//! Errors are returned as JSON `{ "error": message, "code": code }`. Extractor
//! rejections (malformed body, missing query parameter, non-numeric path id)
//! are reported the same way as `InvalidInput`.

pub mod health;
pub mod inventory;
pub mod search;

use axum::Json;
use axum::Router;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::domain::equipment::InventoryService;
use crate::domain::search::{SearchService, SearchVectorMaintainer};
use crate::error::Error;
use crate::storage::Database;

/// Header carrying the caller identity set by the upstream auth gateway
pub const ACTOR_HEADER: &str = "x-actor";

/// Shared handler state
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub inventory: InventoryService,
    pub search: SearchService,
    pub vectors: SearchVectorMaintainer,
}

impl AppState {
    /// Build every service over one database
    pub fn new(db: Database) -> Self {
        let pool = db.pool().clone();
        Self {
            inventory: InventoryService::new(pool.clone()),
            search: SearchService::new(pool.clone()),
            vectors: SearchVectorMaintainer::new(pool),
            db,
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/types", post(inventory::create_type).get(inventory::list_types))
        .route(
            "/locations",
            post(inventory::create_location).get(inventory::list_locations),
        )
        .route("/inventory", post(inventory::create_equipment))
        .route("/inventory/search", post(search::search))
        .route("/inventory/search/advanced", post(search::advanced_search))
        .route("/inventory/search/quick", get(search::quick_search))
        .route("/inventory/search/suggestions", get(search::suggestions))
        .route("/inventory/search/stats", get(search::stats))
        .route("/inventory/search/analytics", get(search::analytics))
        .route("/inventory/search/optimize", post(search::optimize))
        .route("/inventory/search/bulk-update", post(search::bulk_update))
        .route("/inventory/:id", get(inventory::get_equipment))
        .route("/inventory/:id/patch", patch(inventory::patch_equipment))
        .route("/inventory/:id/history", get(inventory::history))
        .route("/inventory/:id/update-search", post(search::update_search))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn serve(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;

    tracing::info!("Equiptrack API listening on {}", local);
    tracing::info!("   POST   /inventory/search                 - Basic search");
    tracing::info!("   POST   /inventory/search/advanced        - Field-targeted search");
    tracing::info!("   GET    /inventory/search/quick           - Quick search");
    tracing::info!("   GET    /inventory/search/suggestions     - Autocomplete");
    tracing::info!("   GET    /inventory/search/stats           - Summary statistics");
    tracing::info!("   GET    /inventory/search/analytics       - Detailed analytics");
    tracing::info!("   POST   /inventory/search/optimize        - Recompute all vectors");
    tracing::info!("   POST   /inventory/search/bulk-update     - Recompute a batch");
    tracing::info!("   POST   /inventory/:id/update-search      - Recompute one vector");
    tracing::info!("   PATCH  /inventory/:id/patch              - Update and audit");

    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// JSON error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
}

/// Domain error rendered as an HTTP response
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(Error::InvalidInput(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(Error::InvalidInput(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(Error::InvalidInput(rejection.body_text()))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::EquipmentNotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidInput(_) | Error::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            Error::MissingActor => StatusCode::UNAUTHORIZED,
            Error::DatabaseError(_)
            | Error::Serialization(_)
            | Error::Io(_)
            | Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.0.is_client_error() {
            tracing::debug!(error = %self.0, code = self.0.code(), "Request rejected");
        } else {
            tracing::error!(error = %self.0, code = self.0.code(), "Request failed");
        }

        let body = ErrorBody {
            error: self.0.to_string(),
            code: self.0.code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handler result
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Read the caller identity; absent or blank is `MissingActor`
pub fn actor_from_headers(headers: &HeaderMap) -> ApiResult<String> {
    headers
        .get(ACTOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(ApiError(Error::MissingActor))
}

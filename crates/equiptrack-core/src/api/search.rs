//! Search and search-vector endpoints

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use super::{ApiResult, AppState};
use crate::domain::search::{
    AdvancedSearchRequest, BulkReport, OptimizeReport, SearchAnalytics, SearchRequest,
    SearchResponse, SearchStats, SuggestionResponse,
};

/// `?q=...&limit=...`
#[derive(Debug, Deserialize)]
pub struct TextQuery {
    pub q: String,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Bulk recompute body
#[derive(Debug, Deserialize)]
pub struct BulkUpdateRequest {
    pub equipment_ids: Vec<i64>,
}

/// Single recompute response
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateSearchResponse {
    pub message: String,
    pub equipment_id: i64,
}

pub async fn search(
    State(state): State<AppState>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> ApiResult<Json<SearchResponse>> {
    let Json(request) = body?;
    Ok(Json(state.search.search(&request).await?))
}

pub async fn advanced_search(
    State(state): State<AppState>,
    body: Result<Json<AdvancedSearchRequest>, JsonRejection>,
) -> ApiResult<Json<SearchResponse>> {
    let Json(request) = body?;
    Ok(Json(state.search.advanced_search(&request).await?))
}

pub async fn quick_search(
    State(state): State<AppState>,
    query: Result<Query<TextQuery>, QueryRejection>,
) -> ApiResult<Json<SearchResponse>> {
    let Query(params) = query?;
    Ok(Json(state.search.quick_search(&params.q, params.limit).await?))
}

pub async fn suggestions(
    State(state): State<AppState>,
    query: Result<Query<TextQuery>, QueryRejection>,
) -> ApiResult<Json<SuggestionResponse>> {
    let Query(params) = query?;
    Ok(Json(state.search.suggestions(&params.q, params.limit).await?))
}

pub async fn stats(State(state): State<AppState>) -> ApiResult<Json<SearchStats>> {
    Ok(Json(state.search.stats().await?))
}

pub async fn analytics(State(state): State<AppState>) -> ApiResult<Json<SearchAnalytics>> {
    Ok(Json(state.search.analytics().await?))
}

pub async fn optimize(State(state): State<AppState>) -> ApiResult<Json<OptimizeReport>> {
    Ok(Json(state.vectors.optimize().await?))
}

pub async fn bulk_update(
    State(state): State<AppState>,
    body: Result<Json<BulkUpdateRequest>, JsonRejection>,
) -> ApiResult<Json<BulkReport>> {
    let Json(request) = body?;
    Ok(Json(state.vectors.recompute_bulk(&request.equipment_ids).await?))
}

pub async fn update_search(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<UpdateSearchResponse>> {
    let Path(id) = path?;
    state.vectors.recompute(id).await?;
    Ok(Json(UpdateSearchResponse {
        message: format!("Search vector updated for equipment {}", id),
        equipment_id: id,
    }))
}

//! Inventory, type and location endpoints
//!
//! Create and patch require the actor header; both go through the audited
//! write path.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};

use super::{ApiResult, AppState, actor_from_headers};
use crate::domain::audit::HistoryEntry;
use crate::domain::equipment::{
    EquipmentDetail, EquipmentPatch, EquipmentType, Location, NewEquipment, NewEquipmentType,
    NewLocation,
};

pub async fn create_equipment(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<NewEquipment>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<EquipmentDetail>)> {
    let Json(new) = body?;
    let actor = actor_from_headers(&headers)?;
    let created = state.inventory.create(&actor, new).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_equipment(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<EquipmentDetail>> {
    let Path(id) = path?;
    Ok(Json(state.inventory.get(id).await?))
}

pub async fn patch_equipment(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    headers: HeaderMap,
    body: Result<Json<EquipmentPatch>, JsonRejection>,
) -> ApiResult<Json<EquipmentDetail>> {
    let Path(id) = path?;
    let Json(patch) = body?;
    let actor = actor_from_headers(&headers)?;
    Ok(Json(state.inventory.patch(&actor, id, patch).await?))
}

pub async fn history(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Vec<HistoryEntry>>> {
    let Path(id) = path?;
    Ok(Json(state.inventory.history(id).await?))
}

pub async fn create_type(
    State(state): State<AppState>,
    body: Result<Json<NewEquipmentType>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<EquipmentType>)> {
    let Json(new) = body?;
    let created = state.inventory.create_type(new).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_types(State(state): State<AppState>) -> ApiResult<Json<Vec<EquipmentType>>> {
    Ok(Json(state.inventory.list_types().await?))
}

pub async fn create_location(
    State(state): State<AppState>,
    body: Result<Json<NewLocation>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Location>)> {
    let Json(new) = body?;
    let created = state.inventory.create_location(new).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_locations(State(state): State<AppState>) -> ApiResult<Json<Vec<Location>>> {
    Ok(Json(state.inventory.list_locations().await?))
}

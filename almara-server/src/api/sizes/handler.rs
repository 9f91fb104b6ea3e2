//! Size API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::repository::size;
use crate::utils::{AppError, AppResult};
use shared::models::{Size, SizeCreate, SizeUpdate};

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub deleted: i64,
}

/// GET /sizes
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Size>>> {
    let sizes = size::find_all(&state.pool).await?;
    Ok(Json(sizes))
}

/// GET /sizes/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Size>> {
    let size = size::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Size {id} not found")))?;
    Ok(Json(size))
}

/// POST /sizes - find-or-create by name
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SizeCreate>,
) -> AppResult<(StatusCode, Json<Size>)> {
    let name = payload
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::validation("Name is required"))?;

    let size = size::find_or_create(&state.pool, name).await?;
    Ok((StatusCode::CREATED, Json(size)))
}

/// PUT /sizes/:id - rename; an absent name keeps the current one
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<SizeUpdate>,
) -> AppResult<Json<Size>> {
    let size = match payload.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => size::rename(&state.pool, id, name).await?,
        None => size::find_by_id(&state.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Size {id} not found")))?,
    };
    Ok(Json(size))
}

/// DELETE /sizes/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Deleted>> {
    if !size::delete(&state.pool, id).await? {
        return Err(AppError::not_found(format!("Size {id} not found")));
    }
    Ok(Json(Deleted { deleted: id }))
}

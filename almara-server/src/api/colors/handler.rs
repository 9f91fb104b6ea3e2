//! Color API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::repository::color;
use crate::utils::{AppError, AppResult};
use shared::models::{Color, ColorCreate, ColorUpdate};

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub deleted: i64,
}

/// GET /colors
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Color>>> {
    let colors = color::find_all(&state.pool).await?;
    Ok(Json(colors))
}

/// GET /colors/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Color>> {
    let color = color::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Color {id} not found")))?;
    Ok(Json(color))
}

/// POST /colors - find-or-create by name
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ColorCreate>,
) -> AppResult<(StatusCode, Json<Color>)> {
    let name = payload
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::validation("Name is required"))?;

    let color = color::find_or_create(&state.pool, name).await?;
    Ok((StatusCode::CREATED, Json(color)))
}

/// PUT /colors/:id - rename; an absent name keeps the current one
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ColorUpdate>,
) -> AppResult<Json<Color>> {
    let color = match payload.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => color::rename(&state.pool, id, name).await?,
        None => color::find_by_id(&state.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Color {id} not found")))?,
    };
    Ok(Json(color))
}

/// DELETE /colors/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Deleted>> {
    if !color::delete(&state.pool, id).await? {
        return Err(AppError::not_found(format!("Color {id} not found")));
    }
    Ok(Json(Deleted { deleted: id }))
}

//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::repository::category;
use crate::utils::{AppError, AppResult};
use shared::models::{Category, CategoryCreate, CategoryUpdate};

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub deleted: i64,
}

/// GET /categories - list categories by name
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let categories = category::find_all(&state.pool).await?;
    Ok(Json(categories))
}

/// GET /categories/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Category>> {
    let category = category::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category {id} not found")))?;
    Ok(Json(category))
}

/// POST /categories - find-or-create by name
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let name = payload
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::validation("Name is required"))?;

    let category = category::find_or_create(&state.pool, name).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /categories/:id - rename; an absent name keeps the current one
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    let category = match payload.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => category::rename(&state.pool, id, name).await?,
        None => category::find_by_id(&state.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Category {id} not found")))?,
    };
    Ok(Json(category))
}

/// DELETE /categories/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Deleted>> {
    if !category::delete(&state.pool, id).await? {
        return Err(AppError::not_found(format!("Category {id} not found")));
    }
    Ok(Json(Deleted { deleted: id }))
}

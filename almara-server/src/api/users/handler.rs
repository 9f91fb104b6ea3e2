//! Dashboard user API Handlers
//!
//! Read-only JSON for the admin dashboard. The password hash never leaves
//! the server; `User` skips it at the serde level and the list endpoint
//! only projects public columns.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use serde::Serialize;

use crate::core::ServerState;
use crate::db::repository::user;
use crate::utils::pagination::{self, PAGE_SIZE, PageQuery};
use crate::utils::{AppError, AppResult};
use shared::models::User;

/// One row of the dashboard user list.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Absolute URL of the detail endpoint
    pub detail: String,
}

/// Paginated dashboard envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListEnvelope {
    pub count: i64,
    pub users: Vec<UserSummary>,
    pub page: i64,
    pub total_pages: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
}

/// GET /api/users?page=N
pub async fn list_paginated(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<UserListEnvelope>> {
    let page = query.page();
    let count = user::count_all(&state.pool).await?;
    let rows = user::find_page(&state.pool, PAGE_SIZE, pagination::offset(page)).await?;

    let base = pagination::request_base(state.config.public_base_url.as_deref(), &headers);
    let users = rows
        .into_iter()
        .map(|u| UserSummary {
            detail: format!("{base}/api/users/{}", u.id),
            id: u.id,
            name: u.name,
            email: u.email,
        })
        .collect();

    let total_pages = pagination::total_pages(count);
    let (next, previous) = pagination::page_links(&base, "/api/users", page, total_pages);

    Ok(Json(UserListEnvelope {
        count,
        users,
        page,
        total_pages,
        next,
        previous,
    }))
}

/// Detail payload: the full user (hash stripped) plus an absolute avatar URL.
#[derive(Debug, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    #[serde(rename = "avatarUrl")]
    pub avatar_url: Option<String>,
}

/// GET /api/users/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> AppResult<Json<UserDetail>> {
    let user = user::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let base = pagination::request_base(state.config.public_base_url.as_deref(), &headers);
    let avatar_url = user.avatar.as_deref().map(|avatar| format!("{base}{avatar}"));

    Ok(Json(UserDetail { user, avatar_url }))
}

//! Session gate middleware
//!
//! Mirrors the browser flows: guests are redirected away from authenticated
//! pages, logged-in users away from the guest forms. Every other route
//! passes through. A valid session always injects [`SessionUser`] into the
//! request extensions so handlers can read the current user.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use shared::models::SessionUser;

use crate::auth::session::session_id_from_headers;
use crate::core::ServerState;

/// Pages only reachable without a session.
const GUEST_ONLY: &[&str] = &["/users/register", "/users/login"];

/// Pages only reachable with a session.
const AUTH_ONLY: &[&str] = &["/users/profile", "/users/logout"];

pub async fn session_gate(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Response {
    let user: Option<SessionUser> =
        session_id_from_headers(req.headers()).and_then(|id| state.sessions.get(&id));

    let path = req.uri().path();
    match &user {
        Some(_) if GUEST_ONLY.contains(&path) => {
            return Redirect::to("/users/profile").into_response();
        }
        None if AUTH_ONLY.contains(&path) => {
            return Redirect::to("/users/login").into_response();
        }
        _ => {}
    }

    if let Some(user) = user {
        req.extensions_mut().insert(user);
    }
    next.run(req).await
}

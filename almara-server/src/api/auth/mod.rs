//! Auth API module
//!
//! Browser-facing register/login/logout flows under `/users`. The
//! [`crate::auth::session_gate`] middleware handles the guest/auth
//! redirects for these paths.

mod avatar;
mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/users", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/register", get(handler::show_register).post(handler::register))
        .route("/login", get(handler::show_login).post(handler::login))
        .route("/profile", get(handler::show_profile))
        .route("/logout", get(handler::logout))
}

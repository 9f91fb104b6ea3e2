//! Product API module
//!
//! Two surfaces over the same rows:
//!
//! - `/products` - storefront REST (keyed by sku, full joined payloads)
//! - `/api/products` - dashboard API (keyed by id, paginated envelope)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/products", storefront_routes())
        .nest("/api/products", dashboard_routes())
}

fn storefront_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/create", get(handler::create_form))
        .route(
            "/{sku}",
            get(handler::get_by_sku)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{sku}/edit", get(handler::edit_form))
}

fn dashboard_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_paginated))
        .route("/{id}", get(handler::get_by_id))
}

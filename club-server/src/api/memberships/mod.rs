//! Membership API 模块 (会员资格)

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/memberships", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/request", post(handler::request))
        .route("/my", get(handler::my_memberships))
        .route("/validate", get(handler::validate))
        .route("/pending/{club_id}", get(handler::pending_by_club))
        .route("/expire-sweep", post(handler::expire_sweep))
        .route("/{id}/approve", post(handler::approve))
        .route("/{id}/reject", post(handler::reject))
        .route("/{id}/suspend", post(handler::suspend))
        .route("/{id}/cancel", post(handler::cancel))
}

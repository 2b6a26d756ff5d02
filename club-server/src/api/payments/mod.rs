//! Payment API 模块 (收款)

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/payments", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::record))
        .route("/reservation/{id}", get(handler::get_by_reservation))
        .route("/pending/{club_id}", get(handler::pending_by_club))
        .route("/history/{club_id}", get(handler::history_by_club))
}

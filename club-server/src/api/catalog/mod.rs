//! Catalog API 模块 (目录同步)

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/catalog/sync", post(handler::sync))
}

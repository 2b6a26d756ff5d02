//! Attendance API 模块 (考勤打卡)

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/attendance", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/check-in", post(handler::check_in))
        .route("/today/{club_id}", get(handler::today_by_club))
        .route("/range/{club_id}", get(handler::range_by_club))
        .route("/user/{user_id}", get(handler::by_user))
        .route("/session/{session_id}", get(handler::by_session))
        .route("/count/{membership_id}", get(handler::count_by_membership))
}

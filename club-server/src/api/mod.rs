//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`reservations`] - 课程预约接口
//! - [`payments`] - 收款接口
//! - [`memberships`] - 会员资格接口
//! - [`attendance`] - 考勤打卡接口
//! - [`sessions`] - 课程场次接口 (目录侧注入)
//! - [`catalog`] - 目录同步接口

pub mod attendance;
pub mod catalog;
pub mod health;
pub mod memberships;
pub mod payments;
pub mod reservations;
pub mod sessions;

use axum::Router;

use crate::core::ServerState;

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(reservations::router())
        .merge(payments::router())
        .merge(memberships::router())
        .merge(attendance::router())
        .merge(sessions::router())
        .merge(catalog::router())
}

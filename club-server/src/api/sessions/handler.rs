//! Session API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::session as session_repo;
use crate::utils::{AppError, AppResult};
use shared::models::{ClassSession, SessionCreate, SessionStatusUpdate};

#[derive(serde::Deserialize)]
pub struct ListQuery {
    pub club_id: i64,
    pub date: Option<String>,
}

/// GET /api/sessions?club_id=&date= - 按俱乐部/日期列出场次
pub async fn list(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<ClassSession>>> {
    let sessions =
        session_repo::find_by_club(&state.pool, query.club_id, query.date.as_deref()).await?;
    Ok(Json(sessions))
}

/// GET /api/sessions/:id - 场次详情 (含剩余座位)
pub async fn get_by_id(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ClassSession>> {
    let session = session_repo::find_by_id(&state.pool, id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
    Ok(Json(session))
}

/// POST /api/sessions - 目录侧注入场次 (员工)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<SessionCreate>,
) -> AppResult<Json<ClassSession>> {
    payload.validate()?;
    if !user.is_staff_for(payload.club_id) {
        return Err(AppError::Forbidden(
            "Only club staff can create sessions".into(),
        ));
    }
    crate::utils::time::parse_date(&payload.session_date)?;

    let session = session_repo::create(&state.pool, payload).await?;
    Ok(Json(session))
}

/// POST /api/sessions/:id/status - 员工取消/完结场次
pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<SessionStatusUpdate>,
) -> AppResult<Json<ClassSession>> {
    let session = session_repo::find_by_id(&state.pool, id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
    if !user.is_staff_for(session.club_id) {
        return Err(AppError::Forbidden(
            "Only club staff can change session status".into(),
        ));
    }

    let updated = session_repo::update_status(&state.pool, id, payload.status).await?;
    Ok(Json(updated))
}

//! Attendance API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::auth::CurrentUser;
use crate::booking;
use crate::core::ServerState;
use crate::db::repository::{
    attendance as attendance_repo, membership as membership_repo, projection,
    session as session_repo,
};
use crate::utils::{AppError, AppResult, time};
use shared::models::{Attendance, AttendanceDetail, CheckInRequest};

fn require_staff(user: &CurrentUser, club_id: i64) -> AppResult<()> {
    if !user.is_staff_for(club_id) {
        return Err(AppError::Forbidden(
            "Only club staff can access attendance".into(),
        ));
    }
    Ok(())
}

/// POST /api/attendance/check-in - 员工为会员打卡
pub async fn check_in(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CheckInRequest>,
) -> AppResult<Json<Attendance>> {
    require_staff(&user, payload.club_id)?;

    let today = state.today();
    let attendance =
        booking::attendance::check_in(&state.pool, payload, user.id, &today).await?;
    Ok(Json(attendance))
}

/// GET /api/attendance/today/:club_id - 今日打卡记录 (员工)
pub async fn today_by_club(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(club_id): Path<i64>,
) -> AppResult<Json<Vec<AttendanceDetail>>> {
    require_staff(&user, club_id)?;

    let tz = state.config.timezone;
    let today = time::parse_date(&state.today())?;
    let (from, to) = time::day_bounds_millis(today, tz);
    let rows = projection::attendance_by_club_between(&state.pool, club_id, from, to).await?;
    Ok(Json(rows))
}

#[derive(serde::Deserialize)]
pub struct RangeQuery {
    pub start_date: String,
    pub end_date: String,
}

/// GET /api/attendance/range/:club_id?start_date=&end_date= - 区间查询 (员工)
pub async fn range_by_club(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(club_id): Path<i64>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<Vec<AttendanceDetail>>> {
    require_staff(&user, club_id)?;

    let tz = state.config.timezone;
    let start = time::parse_date(&query.start_date)?;
    let end = time::parse_date(&query.end_date)?;
    let (from, _) = time::day_bounds_millis(start, tz);
    let (_, to) = time::day_bounds_millis(end, tz);
    let rows = projection::attendance_by_club_between(&state.pool, club_id, from, to).await?;
    Ok(Json(rows))
}

/// GET /api/attendance/user/:user_id - 用户打卡历史 (本人或管理员)
pub async fn by_user(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<AttendanceDetail>>> {
    if user.id != user_id && !user.admin {
        return Err(AppError::Forbidden(
            "You don't have permission to view this attendance history".into(),
        ));
    }
    let rows = projection::attendance_by_user(&state.pool, user_id).await?;
    Ok(Json(rows))
}

/// GET /api/attendance/session/:session_id - 场次到场名单 (员工)
pub async fn by_session(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(session_id): Path<i64>,
) -> AppResult<Json<Vec<AttendanceDetail>>> {
    let session = session_repo::find_by_id(&state.pool, session_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;
    require_staff(&user, session.club_id)?;

    let rows = projection::attendance_by_session(&state.pool, session_id).await?;
    Ok(Json(rows))
}

#[derive(serde::Serialize)]
pub struct AttendanceCount {
    pub count: i64,
}

/// GET /api/attendance/count/:membership_id - 打卡次数 (本人或员工)
pub async fn count_by_membership(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(membership_id): Path<i64>,
) -> AppResult<Json<AttendanceCount>> {
    let membership = membership_repo::find_by_id(&state.pool, membership_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound(format!("Membership {membership_id} not found")))?;

    if membership.user_id != user.id && !user.is_staff_for(membership.club_id) {
        return Err(AppError::Forbidden(
            "You don't have permission to view this membership".into(),
        ));
    }

    let count = attendance_repo::count_by_membership(&state.pool, membership_id).await?;
    Ok(Json(AttendanceCount { count }))
}

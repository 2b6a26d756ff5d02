//! Reservation API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::booking;
use crate::core::ServerState;
use crate::db::repository::reservation as reservation_repo;
use crate::utils::{AppError, AppResult};
use shared::models::{Reservation, ReservationCancel, ReservationCreate};

/// Load the reservation to learn its club before the staff check.
async fn load(state: &ServerState, id: i64) -> AppResult<Reservation> {
    reservation_repo::find_by_id(&state.pool, id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound(format!("Reservation {id} not found")))
}

/// POST /api/reservations - 预约课程座位
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<Json<Reservation>> {
    let reservation =
        booking::reservation::create_reservation(&state.pool, user.id, payload.session_id)
            .await?;
    Ok(Json(reservation))
}

/// GET /api/reservations/my - 当前用户的预约
pub async fn my_reservations(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Reservation>>> {
    let reservations = reservation_repo::find_by_user(&state.pool, user.id).await?;
    Ok(Json(reservations))
}

/// GET /api/reservations/:id - 查看单个预约 (本人或员工)
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Reservation>> {
    let reservation = load(&state, id).await?;
    let is_staff = user.is_staff_for(reservation.club_id);
    let reservation =
        booking::reservation::get_reservation(&state.pool, id, user.id, is_staff).await?;
    Ok(Json(reservation))
}

/// POST /api/reservations/:id/cancel - 取消预约 (本人或员工)
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ReservationCancel>,
) -> AppResult<Json<Reservation>> {
    let reservation = load(&state, id).await?;
    let is_staff = user.is_staff_for(reservation.club_id);

    let cancelled = booking::reservation::cancel_reservation(
        &state.pool,
        id,
        user.id,
        payload.reason.as_deref(),
        is_staff,
    )
    .await?;
    Ok(Json(cancelled))
}

/// POST /api/reservations/:id/checkin - 员工核销到场
pub async fn check_in(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Reservation>> {
    let reservation = load(&state, id).await?;
    if !user.is_staff_for(reservation.club_id) {
        return Err(AppError::Forbidden(
            "Only club staff can check in reservations".into(),
        ));
    }

    let checked = booking::reservation::check_in_reservation(&state.pool, id).await?;
    Ok(Json(checked))
}

/// POST /api/reservations/:id/no-show - 员工标记未到场
pub async fn no_show(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Reservation>> {
    let reservation = load(&state, id).await?;
    if !user.is_staff_for(reservation.club_id) {
        return Err(AppError::Forbidden(
            "Only club staff can mark no-shows".into(),
        ));
    }

    let updated = booking::reservation::mark_no_show(&state.pool, id).await?;
    Ok(Json(updated))
}

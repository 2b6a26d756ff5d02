//! Payment API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::booking;
use crate::core::ServerState;
use crate::db::repository::{payment as payment_repo, projection, reservation as reservation_repo};
use crate::utils::{AppError, AppResult};
use shared::models::{Payment, PaymentHistoryDetail, PendingPaymentDetail, RecordPaymentRequest};

#[derive(serde::Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// POST /api/payments - 员工登记收款，预约转为已支付
pub async fn record(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<RecordPaymentRequest>,
) -> AppResult<Json<Payment>> {
    payload.validate()?;

    let reservation = reservation_repo::find_by_id(&state.pool, payload.reservation_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| {
            AppError::NotFound(format!("Reservation {} not found", payload.reservation_id))
        })?;
    if !user.is_staff_for(reservation.club_id) {
        return Err(AppError::Forbidden(
            "Only club staff can record payments".into(),
        ));
    }

    let payment = booking::payment::record_payment(&state.pool, payload, user.id).await?;
    Ok(Json(payment))
}

/// GET /api/payments/reservation/:id - 按预约查收款 (本人或员工)
pub async fn get_by_reservation(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Payment>> {
    let reservation = reservation_repo::find_by_id(&state.pool, id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound(format!("Reservation {id} not found")))?;

    if reservation.user_id != user.id && !user.is_staff_for(reservation.club_id) {
        return Err(AppError::Forbidden(
            "You don't have permission to view this payment".into(),
        ));
    }

    let payment = payment_repo::find_by_reservation(&state.pool, id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound(format!("Payment for reservation {id} not found")))?;
    Ok(Json(payment))
}

/// GET /api/payments/pending/:club_id - 待收款列表 (员工收银视图)
pub async fn pending_by_club(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(club_id): Path<i64>,
) -> AppResult<Json<Vec<PendingPaymentDetail>>> {
    if !user.is_staff_for(club_id) {
        return Err(AppError::Forbidden(
            "Only club staff can view pending payments".into(),
        ));
    }
    let pending = projection::pending_payments_by_club(&state.pool, club_id).await?;
    Ok(Json(pending))
}

/// GET /api/payments/history/:club_id - 收款历史
pub async fn history_by_club(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(club_id): Path<i64>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<PaymentHistoryDetail>>> {
    if !user.is_staff_for(club_id) {
        return Err(AppError::Forbidden(
            "Only club staff can view payment history".into(),
        ));
    }
    let limit = query.limit.unwrap_or(50).clamp(1, 500);
    let offset = query.offset.unwrap_or(0).max(0);
    let history = projection::payment_history_by_club(&state.pool, club_id, limit, offset).await?;
    Ok(Json(history))
}

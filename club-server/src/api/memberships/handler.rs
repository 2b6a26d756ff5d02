//! Membership API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::booking;
use crate::core::ServerState;
use crate::db::repository::{membership as membership_repo, projection};
use crate::utils::{AppError, AppResult};
use shared::models::{
    ApproveMembershipRequest, MembershipDetail, PurchaseMembershipRequest,
    RejectMembershipRequest, UserMembership, ValidateMembershipResponse,
};

/// Load the membership to learn its club before the staff check.
async fn load(state: &ServerState, id: i64) -> AppResult<UserMembership> {
    membership_repo::find_by_id(&state.pool, id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound(format!("Membership {id} not found")))
}

fn require_staff(user: &CurrentUser, club_id: i64) -> AppResult<()> {
    if !user.is_staff_for(club_id) {
        return Err(AppError::Forbidden(
            "Only club staff can manage memberships".into(),
        ));
    }
    Ok(())
}

/// POST /api/memberships/request - 用户申请会员资格 (PENDING)
pub async fn request(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<PurchaseMembershipRequest>,
) -> AppResult<Json<UserMembership>> {
    let today = state.today();
    let membership =
        booking::membership::request_membership(&state.pool, user.id, payload, &today).await?;
    Ok(Json(membership))
}

/// GET /api/memberships/my - 当前用户的会员资格 (含展示名)
pub async fn my_memberships(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<MembershipDetail>>> {
    let memberships = projection::memberships_by_user(&state.pool, user.id).await?;
    Ok(Json(memberships))
}

/// GET /api/memberships/pending/:club_id - 待审批申请 (员工)
pub async fn pending_by_club(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(club_id): Path<i64>,
) -> AppResult<Json<Vec<MembershipDetail>>> {
    require_staff(&user, club_id)?;
    let memberships =
        projection::memberships_by_club_and_status(&state.pool, club_id, "PENDING").await?;
    Ok(Json(memberships))
}

/// POST /api/memberships/:id/approve - 员工审批并登记收款
pub async fn approve(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ApproveMembershipRequest>,
) -> AppResult<Json<UserMembership>> {
    payload.validate()?;
    let membership = load(&state, id).await?;
    require_staff(&user, membership.club_id)?;

    let today = state.today();
    let approved =
        booking::membership::approve_membership(&state.pool, id, payload, user.id, &today)
            .await?;
    Ok(Json(approved))
}

/// POST /api/memberships/:id/reject - 员工驳回申请
pub async fn reject(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<RejectMembershipRequest>,
) -> AppResult<Json<()>> {
    let membership = load(&state, id).await?;
    require_staff(&user, membership.club_id)?;

    booking::membership::reject_membership(&state.pool, id, payload.reason.as_deref()).await?;
    Ok(Json(()))
}

/// POST /api/memberships/:id/suspend - 员工暂停会员资格
pub async fn suspend(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<()>> {
    let membership = load(&state, id).await?;
    require_staff(&user, membership.club_id)?;

    booking::membership::suspend_membership(&state.pool, id).await?;
    Ok(Json(()))
}

/// POST /api/memberships/:id/cancel - 员工注销会员资格
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<()>> {
    let membership = load(&state, id).await?;
    require_staff(&user, membership.club_id)?;

    booking::membership::cancel_membership(&state.pool, id).await?;
    Ok(Json(()))
}

#[derive(serde::Deserialize)]
pub struct ValidateQuery {
    pub user_id: i64,
    pub club_id: i64,
}

/// GET /api/memberships/validate?user_id=&club_id= - 前台校验会员有效性
pub async fn validate(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ValidateQuery>,
) -> AppResult<Json<ValidateMembershipResponse>> {
    require_staff(&user, query.club_id)?;

    let today = state.today();
    let result =
        booking::membership::validate_membership(&state.pool, query.user_id, query.club_id, &today)
            .await?;
    Ok(Json(result))
}

#[derive(serde::Serialize)]
pub struct SweepResult {
    pub expired: u64,
}

/// POST /api/memberships/expire-sweep - 手动触发过期扫描 (管理员)
pub async fn expire_sweep(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<SweepResult>> {
    if !user.admin {
        return Err(AppError::Forbidden(
            "Only administrators can trigger the expiry sweep".into(),
        ));
    }

    let today = state.today();
    let expired = booking::membership::expire_old_memberships(&state.pool, &today).await?;
    Ok(Json(SweepResult { expired }))
}

//! Membership Workflow
//!
//! request (PENDING) → staff approve (ACTIVE + payment, start date reset to
//! the approval date) or reject (CANCELLED with reason). Expiry is driven by
//! a periodic sweep, the one transition not triggered by an external call.
//! All operations take `today` as an ISO date so the logic stays clock-free.

use shared::models::{
    ApproveMembershipRequest, PurchaseMembershipRequest, UserMembership,
    ValidateMembershipResponse,
};
use sqlx::SqlitePool;
use tracing::info;

use super::{BookingError, BookingResult};
use crate::db::repository::{
    RepoError, catalog as catalog_repo, membership as membership_repo, payment as payment_repo,
};
use crate::utils::time::add_days;

pub async fn request_membership(
    pool: &SqlitePool,
    user_id: i64,
    req: PurchaseMembershipRequest,
    today: &str,
) -> BookingResult<UserMembership> {
    let start_date = req.start_date.clone().unwrap_or_else(|| today.to_string());

    // Window left open by the request: derive it from the plan duration,
    // unlimited plans stay unlimited.
    let end_date = match req.end_date.clone() {
        Some(end) => Some(end),
        None => match catalog_repo::find_plan(pool, req.plan_id).await? {
            Some(plan) => match plan.duration_days {
                Some(days) => Some(add_days(&start_date, days).map_err(|e| {
                    RepoError::Validation(format!("Invalid start date: {e}"))
                })?),
                None => None,
            },
            None => None,
        },
    };

    let id = membership_repo::insert_pending(
        pool,
        user_id,
        req.plan_id,
        req.club_id,
        &start_date,
        end_date.as_deref(),
        req.notes.as_deref(),
    )
    .await?;

    let membership = membership_repo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create membership".into()))?;

    info!(
        membership_id = id,
        user_id,
        plan_id = req.plan_id,
        "Membership requested"
    );
    Ok(membership)
}

/// Staff approval: records the payment and activates the membership as one
/// atomic unit. Paid activation always starts on the approval date,
/// regardless of the originally requested start date.
pub async fn approve_membership(
    pool: &SqlitePool,
    id: i64,
    req: ApproveMembershipRequest,
    recorded_by: i64,
    today: &str,
) -> BookingResult<UserMembership> {
    let mut tx = pool.begin().await?;

    let membership = membership_repo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Membership {id}")))?;

    if !membership.status.is_pending() {
        return Err(BookingError::MembershipNotPending);
    }

    let payment_id = payment_repo::insert(
        &mut *tx,
        payment_repo::PaymentInsert {
            reservation_id: None,
            membership_id: Some(id),
            user_id: membership.user_id,
            club_id: membership.club_id,
            amount: req.amount,
            method: req.method,
            reference_number: req.reference_number.clone(),
            recorded_by: Some(recorded_by),
            notes: req.notes.clone(),
        },
    )
    .await?;
    membership_repo::mark_active(&mut *tx, id, payment_id, today).await?;

    let updated = membership_repo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to reload membership".into()))?;

    tx.commit().await?;

    info!(membership_id = id, payment_id, "Membership approved");
    Ok(updated)
}

pub async fn reject_membership(
    pool: &SqlitePool,
    id: i64,
    reason: Option<&str>,
) -> BookingResult<()> {
    let membership = membership_repo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Membership {id}")))?;

    if !membership.status.is_pending() {
        return Err(BookingError::MembershipNotPending);
    }

    membership_repo::mark_rejected(pool, id, reason).await?;
    info!(membership_id = id, reason, "Membership rejected");
    Ok(())
}

pub async fn suspend_membership(pool: &SqlitePool, id: i64) -> BookingResult<()> {
    membership_repo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Membership {id}")))?;
    membership_repo::mark_suspended(pool, id).await?;
    info!(membership_id = id, "Membership suspended");
    Ok(())
}

pub async fn cancel_membership(pool: &SqlitePool, id: i64) -> BookingResult<()> {
    membership_repo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| BookingError::NotFound(format!("Membership {id}")))?;
    membership_repo::mark_cancelled(pool, id).await?;
    info!(membership_id = id, "Membership cancelled");
    Ok(())
}

/// Staff-facing validity check used before recording attendance.
pub async fn validate_membership(
    pool: &SqlitePool,
    user_id: i64,
    club_id: i64,
    today: &str,
) -> BookingResult<ValidateMembershipResponse> {
    let memberships =
        membership_repo::find_active_by_user_and_club(pool, user_id, club_id).await?;

    let Some(membership) = memberships.first() else {
        return Ok(ValidateMembershipResponse {
            valid: false,
            message: "No active membership found".into(),
            membership_id: None,
            plan_id: None,
            end_date: None,
        });
    };

    let valid = membership.is_valid_on(today);
    let message = if valid {
        "Membership is valid".into()
    } else if membership.is_expired_on(today) {
        "Membership has expired".into()
    } else {
        "Membership is not valid".into()
    };

    Ok(ValidateMembershipResponse {
        valid,
        message,
        membership_id: Some(membership.id),
        plan_id: Some(membership.plan_id),
        end_date: membership.end_date.clone(),
    })
}

/// Periodic sweep: flip every over-due ACTIVE membership to EXPIRED.
/// Idempotent; unlimited memberships are never touched.
pub async fn expire_old_memberships(pool: &SqlitePool, today: &str) -> BookingResult<u64> {
    let expired = membership_repo::expire_older_than(pool, today).await?;
    if expired > 0 {
        info!(expired, "Expired memberships");
    }
    Ok(expired)
}

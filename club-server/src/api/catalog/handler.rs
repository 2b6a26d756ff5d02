//! Catalog API Handlers

use axum::{Json, extract::State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::catalog as catalog_repo;
use crate::utils::{AppError, AppResult};
use shared::models::CatalogSync;

#[derive(serde::Serialize)]
pub struct SyncResult {
    pub upserted: usize,
}

/// POST /api/catalog/sync - 管理后台推送展示数据 (管理员)
pub async fn sync(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CatalogSync>,
) -> AppResult<Json<SyncResult>> {
    if !user.admin {
        return Err(AppError::Forbidden(
            "Only administrators can sync the catalog".into(),
        ));
    }

    let upserted = catalog_repo::sync_all(&state.pool, &payload).await?;
    tracing::info!(upserted, "Catalog sync applied");
    Ok(Json(SyncResult { upserted }))
}

//! Catalog Repository
//!
//! Upserts for the display-data reference tables mirrored from the
//! management backend. Idempotent by construction: re-syncing the same
//! payload leaves the tables unchanged.

use super::RepoResult;
use shared::models::{ActivityDefinition, CatalogSync, Club, MembershipPlan, UserAccount};
use sqlx::{SqliteExecutor, SqlitePool};

pub async fn upsert_user(db: impl SqliteExecutor<'_>, user: &UserAccount) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO user_account (id, full_name, phone) VALUES (?1, ?2, ?3) ON CONFLICT(id) DO UPDATE SET full_name = excluded.full_name, phone = excluded.phone",
    )
    .bind(user.id)
    .bind(&user.full_name)
    .bind(&user.phone)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn upsert_club(db: impl SqliteExecutor<'_>, club: &Club) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO club (id, name) VALUES (?1, ?2) ON CONFLICT(id) DO UPDATE SET name = excluded.name",
    )
    .bind(club.id)
    .bind(&club.name)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn upsert_activity(
    db: impl SqliteExecutor<'_>,
    activity: &ActivityDefinition,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO activity_definition (id, name) VALUES (?1, ?2) ON CONFLICT(id) DO UPDATE SET name = excluded.name",
    )
    .bind(activity.id)
    .bind(&activity.name)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn upsert_plan(db: impl SqliteExecutor<'_>, plan: &MembershipPlan) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO membership_plan (id, name, duration_days, price) VALUES (?1, ?2, ?3, ?4) ON CONFLICT(id) DO UPDATE SET name = excluded.name, duration_days = excluded.duration_days, price = excluded.price",
    )
    .bind(plan.id)
    .bind(&plan.name)
    .bind(plan.duration_days)
    .bind(plan.price)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn find_plan(
    db: impl SqliteExecutor<'_>,
    id: i64,
) -> RepoResult<Option<MembershipPlan>> {
    let row = sqlx::query_as::<_, MembershipPlan>(
        "SELECT id, name, duration_days, price FROM membership_plan WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Apply a full sync payload; returns the number of upserted rows.
pub async fn sync_all(pool: &SqlitePool, payload: &CatalogSync) -> RepoResult<usize> {
    let mut count = 0;
    for user in &payload.users {
        upsert_user(pool, user).await?;
        count += 1;
    }
    for club in &payload.clubs {
        upsert_club(pool, club).await?;
        count += 1;
    }
    for activity in &payload.activities {
        upsert_activity(pool, activity).await?;
        count += 1;
    }
    for plan in &payload.plans {
        upsert_plan(pool, plan).await?;
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        for ddl in [
            "CREATE TABLE user_account (id INTEGER PRIMARY KEY, full_name TEXT NOT NULL, phone TEXT)",
            "CREATE TABLE club (id INTEGER PRIMARY KEY, name TEXT NOT NULL)",
            "CREATE TABLE activity_definition (id INTEGER PRIMARY KEY, name TEXT NOT NULL)",
            "CREATE TABLE membership_plan (id INTEGER PRIMARY KEY, name TEXT NOT NULL, duration_days INTEGER, price INTEGER NOT NULL DEFAULT 0)",
        ] {
            sqlx::query(ddl).execute(&pool).await.unwrap();
        }
        pool
    }

    #[tokio::test]
    async fn sync_is_idempotent_and_updates_names() {
        let pool = test_pool().await;
        let payload = CatalogSync {
            users: vec![UserAccount {
                id: 1,
                full_name: "Sara Ahmadi".into(),
                phone: Some("0912".into()),
            }],
            clubs: vec![Club {
                id: 1,
                name: "Downtown".into(),
            }],
            activities: vec![],
            plans: vec![MembershipPlan {
                id: 5,
                name: "Monthly".into(),
                duration_days: Some(30),
                price: 500_000,
            }],
        };

        assert_eq!(sync_all(&pool, &payload).await.unwrap(), 3);
        assert_eq!(sync_all(&pool, &payload).await.unwrap(), 3);

        let renamed = CatalogSync {
            clubs: vec![Club {
                id: 1,
                name: "Downtown II".into(),
            }],
            ..Default::default()
        };
        sync_all(&pool, &renamed).await.unwrap();

        let name: String = sqlx::query_scalar("SELECT name FROM club WHERE id = 1")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(name, "Downtown II");

        let plan = find_plan(&pool, 5).await.unwrap().unwrap();
        assert_eq!(plan.duration_days, Some(30));
    }
}

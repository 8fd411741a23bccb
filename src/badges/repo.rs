use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use std::collections::HashSet;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

/// One entry of the static badge catalog, seeded by migration.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: Uuid,
    pub name: String,
    pub name_localized: String,
    pub description: String,
    pub description_localized: String,
    pub icon: String,
    pub days_required: i32,
}

/// Result of an unlock insert. `AlreadyExists` means another request won the
/// race; the row is unchanged either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockOutcome {
    Created,
    AlreadyExists,
}

#[derive(Debug, Error)]
pub enum BadgeStoreError {
    #[error("no join date on record for user {0}")]
    MissingJoinDate(Uuid),
}

/// Persistence seam for everything the badge endpoints touch.
#[async_trait]
pub trait BadgeStore: Send + Sync {
    /// Full catalog, ascending `days_required`.
    async fn list_badges(&self) -> anyhow::Result<Vec<Badge>>;

    /// Ids of badges this user has already unlocked.
    async fn unlocked_badge_ids(&self, user_id: Uuid) -> anyhow::Result<HashSet<Uuid>>;

    /// Records an unlock. Idempotent under concurrent duplicate calls.
    async fn record_unlock(&self, user_id: Uuid, badge_id: Uuid)
        -> anyhow::Result<UnlockOutcome>;

    /// The user's membership join date, or `BadgeStoreError::MissingJoinDate`.
    async fn joined_at(&self, user_id: Uuid) -> anyhow::Result<OffsetDateTime>;
}

pub struct PgBadgeStore {
    db: PgPool,
}

impl PgBadgeStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BadgeStore for PgBadgeStore {
    async fn list_badges(&self) -> anyhow::Result<Vec<Badge>> {
        let rows = sqlx::query_as::<_, Badge>(
            r#"
            SELECT id, name, name_localized, description, description_localized,
                   icon, days_required
            FROM badges
            ORDER BY days_required ASC, name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn unlocked_badge_ids(&self, user_id: Uuid) -> anyhow::Result<HashSet<Uuid>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT badge_id
            FROM unlocked_badges
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(ids.into_iter().collect())
    }

    async fn record_unlock(
        &self,
        user_id: Uuid,
        badge_id: Uuid,
    ) -> anyhow::Result<UnlockOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO unlocked_badges (user_id, badge_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, badge_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(badge_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 1 {
            Ok(UnlockOutcome::Created)
        } else {
            Ok(UnlockOutcome::AlreadyExists)
        }
    }

    async fn joined_at(&self, user_id: Uuid) -> anyhow::Result<OffsetDateTime> {
        let joined = sqlx::query_scalar::<_, OffsetDateTime>(
            r#"
            SELECT created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        joined.ok_or_else(|| BadgeStoreError::MissingJoinDate(user_id).into())
    }
}

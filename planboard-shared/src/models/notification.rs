/// Notification model and database operations
///
/// Notifications are created transactionally alongside the action that
/// raises them (today only plan invitations) and read back by their owner.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE notifications (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     kind VARCHAR(50) NOT NULL,
///     message TEXT NOT NULL,
///     related_plan_id BIGINT REFERENCES strategic_plans(id) ON DELETE CASCADE,
///     invitation_id BIGINT REFERENCES plan_members(id) ON DELETE CASCADE,
///     status VARCHAR(20) NOT NULL DEFAULT 'unread',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Notification kind raised when a user is invited to a plan
pub const KIND_PLAN_INVITATION: &str = "plan_invitation";

/// Notification row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: i64,

    /// Recipient
    pub user_id: i64,

    /// Notification kind, e.g. `plan_invitation`
    pub kind: String,

    /// Human-readable message
    pub message: String,

    /// Plan the notification refers to, if any
    pub related_plan_id: Option<i64>,

    /// Membership row behind an invitation notification, if any
    pub invitation_id: Option<i64>,

    /// `unread` or `read`
    pub status: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    /// Creates a notification inside an existing transaction
    pub async fn create(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: i64,
        kind: &str,
        message: &str,
        related_plan_id: Option<i64>,
        invitation_id: Option<i64>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, kind, message, related_plan_id, invitation_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, kind, message, related_plan_id, invitation_id,
                      status, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(kind)
        .bind(message)
        .bind(related_plan_id)
        .bind(invitation_id)
        .fetch_one(&mut **tx)
        .await
    }

    /// Lists a user's notifications, newest first
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, kind, message, related_plan_id, invitation_id,
                   status, created_at, updated_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Marks one of a user's notifications as read
    ///
    /// Scoped to the owner so users cannot touch each other's rows.
    ///
    /// # Returns
    ///
    /// True if a row was updated
    pub async fn mark_read(
        pool: &PgPool,
        notification_id: i64,
        user_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET status = 'read', updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Marks the invitation notification read when its invitation is
    /// answered, inside the answering transaction
    pub async fn mark_invitation_read(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        invitation_id: i64,
        user_id: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE notifications
            SET status = 'read', updated_at = NOW()
            WHERE invitation_id = $1 AND user_id = $2
            "#,
        )
        .bind(invitation_id)
        .bind(user_id)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invitation_kind_constant() {
        assert_eq!(KIND_PLAN_INVITATION, "plan_invitation");
    }

    // Database behavior is covered in tests/db_integration.rs
}

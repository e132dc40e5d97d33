/// Plan membership model and database operations
///
/// A plan_members row is both an invitation and, once accepted, a grant of
/// access. The plan owner never appears in this table; ownership is derived
/// from `strategic_plans.owner_id`.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE member_role AS ENUM ('owner', 'member');
/// CREATE TYPE invite_status AS ENUM ('pending', 'accepted', 'rejected');
///
/// CREATE TABLE plan_members (
///     id BIGSERIAL PRIMARY KEY,
///     plan_id BIGINT NOT NULL REFERENCES strategic_plans(id) ON DELETE CASCADE,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     role member_role NOT NULL DEFAULT 'member',
///     status invite_status NOT NULL DEFAULT 'pending',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (plan_id, user_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Hard cap on collaborators per plan, counting pending and accepted rows
pub const MAX_COLLABORATORS: i64 = 6;

/// Role granted by an accepted membership
///
/// The `Owner` variant exists for rows imported from older data; new code
/// never persists it, since ownership lives on the plan row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "member_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Owner,
    Member,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Owner => "owner",
            MemberRole::Member => "member",
        }
    }
}

/// Lifecycle state of an invitation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "invite_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InviteStatus {
    /// Invited, not yet answered; grants no access
    Pending,

    /// Invitation accepted; grants member access
    Accepted,

    /// Invitation declined; grants no access and blocks re-inviting
    Rejected,
}

impl InviteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InviteStatus::Pending => "pending",
            InviteStatus::Accepted => "accepted",
            InviteStatus::Rejected => "rejected",
        }
    }
}

/// Plan membership row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PlanMember {
    pub id: i64,
    pub plan_id: i64,
    pub user_id: i64,
    pub role: MemberRole,
    pub status: InviteStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Membership row joined with the member's user info, for listings
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PlanMemberInfo {
    pub id: i64,
    pub plan_id: i64,
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: MemberRole,
    pub status: InviteStatus,
    pub created_at: DateTime<Utc>,
}

impl PlanMember {
    /// Creates a pending membership inside an existing transaction
    ///
    /// Used by the invitation flow, which writes the membership and its
    /// notification atomically.
    pub async fn create_pending(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        plan_id: i64,
        user_id: i64,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, PlanMember>(
            r#"
            INSERT INTO plan_members (plan_id, user_id, role, status)
            VALUES ($1, $2, 'member', 'pending')
            RETURNING id, plan_id, user_id, role, status, created_at, updated_at
            "#,
        )
        .bind(plan_id)
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await
    }

    /// Finds the membership row for a user on a plan
    ///
    /// At most one row exists per (plan, user) pair.
    pub async fn find_by_plan_and_user(
        pool: &PgPool,
        plan_id: i64,
        user_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, PlanMember>(
            r#"
            SELECT id, plan_id, user_id, role, status, created_at, updated_at
            FROM plan_members
            WHERE plan_id = $1 AND user_id = $2
            "#,
        )
        .bind(plan_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Counts collaborators holding a seat on a plan
    ///
    /// Pending and accepted rows both hold a seat toward
    /// [`MAX_COLLABORATORS`]; rejected rows do not.
    pub async fn count_seats(pool: &PgPool, plan_id: i64) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM plan_members
            WHERE plan_id = $1 AND status IN ('pending', 'accepted')
            "#,
        )
        .bind(plan_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Lists memberships for a plan joined with user info, oldest first
    pub async fn list_by_plan(
        pool: &PgPool,
        plan_id: i64,
    ) -> Result<Vec<PlanMemberInfo>, sqlx::Error> {
        sqlx::query_as::<_, PlanMemberInfo>(
            r#"
            SELECT m.id, m.plan_id, m.user_id, u.username, u.email, u.full_name,
                   m.role, m.status, m.created_at
            FROM plan_members m
            JOIN users u ON u.id = m.user_id
            WHERE m.plan_id = $1
            ORDER BY m.created_at ASC
            "#,
        )
        .bind(plan_id)
        .fetch_all(pool)
        .await
    }

    /// Transitions a pending invitation
    ///
    /// Only the invitee's own pending row can move to accepted or rejected.
    /// A row that was already answered never transitions again.
    ///
    /// # Returns
    ///
    /// The updated row, or None if no matching pending invitation existed
    pub async fn respond(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        invitation_id: i64,
        user_id: i64,
        status: InviteStatus,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, PlanMember>(
            r#"
            UPDATE plan_members
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND status = 'pending'
            RETURNING id, plan_id, user_id, role, status, created_at, updated_at
            "#,
        )
        .bind(invitation_id)
        .bind(user_id)
        .bind(status)
        .fetch_optional(&mut **tx)
        .await
    }

    /// Changes the role on an existing membership
    ///
    /// Rows already holding the owner role are never modified.
    ///
    /// # Returns
    ///
    /// True if a row was updated
    pub async fn update_role(
        pool: &PgPool,
        plan_id: i64,
        user_id: i64,
        role: MemberRole,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE plan_members
            SET role = $3, updated_at = NOW()
            WHERE plan_id = $1 AND user_id = $2 AND role <> 'owner'
            "#,
        )
        .bind(plan_id)
        .bind(user_id)
        .bind(role)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes a membership row
    ///
    /// # Returns
    ///
    /// True if a row was deleted
    pub async fn delete(pool: &PgPool, plan_id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM plan_members WHERE plan_id = $1 AND user_id = $2")
                .bind(plan_id)
                .bind(user_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_strings() {
        assert_eq!(MemberRole::Owner.as_str(), "owner");
        assert_eq!(MemberRole::Member.as_str(), "member");
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(InviteStatus::Pending.as_str(), "pending");
        assert_eq!(InviteStatus::Accepted.as_str(), "accepted");
        assert_eq!(InviteStatus::Rejected.as_str(), "rejected");
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&InviteStatus::Accepted).unwrap(),
            r#""accepted""#
        );
        assert_eq!(
            serde_json::to_string(&MemberRole::Member).unwrap(),
            r#""member""#
        );
    }

    #[test]
    fn test_collaborator_cap() {
        assert_eq!(MAX_COLLABORATORS, 6);
    }
}

/// Strategic plan model and database operations
///
/// A plan is the root aggregate: it owns four one-to-one section rows,
/// memberships, and the notifications raised by invitations. List-shaped
/// fields (promoters, strategic units) are stored as JSON text and decoded
/// leniently on the way out.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE strategic_plans (
///     id BIGSERIAL PRIMARY KEY,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     owner_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     company_name VARCHAR(255),
///     company_logo_url VARCHAR(512),
///     promoters TEXT,
///     strategic_units TEXT,
///     conclusions TEXT,
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;

use super::jsontext;

/// Strategic plan row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StrategicPlan {
    /// Unique plan ID
    pub id: i64,

    /// Plan title
    pub title: String,

    /// Free-form description
    pub description: Option<String>,

    /// User who created the plan
    ///
    /// Ownership lives on this column, never in plan_members.
    pub owner_id: i64,

    /// Company the plan is for
    pub company_name: Option<String>,

    /// Company logo URL
    pub company_logo_url: Option<String>,

    /// JSON list of promoters, stored as text
    pub promoters: Option<String>,

    /// JSON list of strategic units, stored as text
    pub strategic_units: Option<String>,

    /// Closing conclusions
    pub conclusions: Option<String>,

    /// Soft-archive flag
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StrategicPlan {
    /// Promoters decoded from stored JSON text
    pub fn promoters_list(&self) -> Vec<Value> {
        jsontext::decode_list(self.promoters.as_deref())
    }

    /// Strategic units decoded from stored JSON text
    pub fn strategic_units_list(&self) -> Vec<Value> {
        jsontext::decode_list(self.strategic_units.as_deref())
    }
}

/// Input for creating a new plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStrategicPlan {
    pub title: String,
    pub description: Option<String>,
    pub company_name: Option<String>,
    pub company_logo_url: Option<String>,
    pub promoters: Option<Value>,
    pub strategic_units: Option<Value>,
    pub conclusions: Option<String>,
}

/// Input for updating an existing plan
///
/// Only non-None fields are updated. An explicit JSON `null` in the
/// request body deserializes to None and is treated as absent, so a stored
/// field can be overwritten but never cleared back to NULL through this
/// type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStrategicPlan {
    pub title: Option<String>,
    pub description: Option<String>,
    pub company_name: Option<String>,
    pub company_logo_url: Option<String>,
    pub promoters: Option<Value>,
    pub strategic_units: Option<Value>,
    pub conclusions: Option<String>,
    pub is_active: Option<bool>,
}

impl StrategicPlan {
    /// Creates a new plan owned by `owner_id`
    ///
    /// Section rows are not created here; they appear lazily on first write.
    ///
    /// # Errors
    ///
    /// Returns an error if the owner doesn't exist or the database
    /// connection fails.
    pub async fn create(
        pool: &PgPool,
        owner_id: i64,
        data: CreateStrategicPlan,
    ) -> Result<Self, sqlx::Error> {
        let plan = sqlx::query_as::<_, StrategicPlan>(
            r#"
            INSERT INTO strategic_plans
                (title, description, owner_id, company_name, company_logo_url,
                 promoters, strategic_units, conclusions)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, title, description, owner_id, company_name, company_logo_url,
                      promoters, strategic_units, conclusions, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(owner_id)
        .bind(data.company_name)
        .bind(data.company_logo_url)
        .bind(jsontext::encode(data.promoters.as_ref()))
        .bind(jsontext::encode(data.strategic_units.as_ref()))
        .bind(data.conclusions)
        .fetch_one(pool)
        .await?;

        Ok(plan)
    }

    /// Finds a plan by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let plan = sqlx::query_as::<_, StrategicPlan>(
            r#"
            SELECT id, title, description, owner_id, company_name, company_logo_url,
                   promoters, strategic_units, conclusions, is_active,
                   created_at, updated_at
            FROM strategic_plans
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(plan)
    }

    /// Lists plans owned by a user, newest first
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let plans = sqlx::query_as::<_, StrategicPlan>(
            r#"
            SELECT id, title, description, owner_id, company_name, company_logo_url,
                   promoters, strategic_units, conclusions, is_active,
                   created_at, updated_at
            FROM strategic_plans
            WHERE owner_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(plans)
    }

    /// Lists plans shared with a user through an accepted membership
    ///
    /// Only accepted invitations grant access; pending and rejected rows
    /// are invisible here.
    pub async fn list_shared_with(pool: &PgPool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let plans = sqlx::query_as::<_, StrategicPlan>(
            r#"
            SELECT p.id, p.title, p.description, p.owner_id, p.company_name,
                   p.company_logo_url, p.promoters, p.strategic_units, p.conclusions,
                   p.is_active, p.created_at, p.updated_at
            FROM strategic_plans p
            JOIN plan_members m ON m.plan_id = p.id
            WHERE m.user_id = $1 AND m.status = 'accepted'
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(plans)
    }

    /// Updates a plan, merging non-None fields over the stored row
    ///
    /// # Returns
    ///
    /// The updated plan if found, None if the plan doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateStrategicPlan,
    ) -> Result<Option<Self>, sqlx::Error> {
        let plan = sqlx::query_as::<_, StrategicPlan>(
            r#"
            UPDATE strategic_plans SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                company_name = COALESCE($4, company_name),
                company_logo_url = COALESCE($5, company_logo_url),
                promoters = COALESCE($6, promoters),
                strategic_units = COALESCE($7, strategic_units),
                conclusions = COALESCE($8, conclusions),
                is_active = COALESCE($9, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, owner_id, company_name, company_logo_url,
                      promoters, strategic_units, conclusions, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.company_name)
        .bind(data.company_logo_url)
        .bind(jsontext::encode(data.promoters.as_ref()))
        .bind(jsontext::encode(data.strategic_units.as_ref()))
        .bind(data.conclusions)
        .bind(data.is_active)
        .fetch_optional(pool)
        .await?;

        Ok(plan)
    }

    /// Deletes a plan by ID
    ///
    /// Section rows, memberships, and related notifications are removed via
    /// cascading foreign keys.
    ///
    /// # Returns
    ///
    /// True if the plan was deleted, false if it didn't exist
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM strategic_plans WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts plans owned by a user
    pub async fn count_by_owner(pool: &PgPool, owner_id: i64) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM strategic_plans WHERE owner_id = $1")
                .bind(owner_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_plan() -> StrategicPlan {
        StrategicPlan {
            id: 1,
            title: "Growth 2026".to_string(),
            description: None,
            owner_id: 10,
            company_name: Some("Acme".to_string()),
            company_logo_url: None,
            promoters: Some(r#"[{"name": "Ana"}]"#.to_string()),
            strategic_units: Some("not-json".to_string()),
            conclusions: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_decoded_list_accessors() {
        let plan = sample_plan();

        let promoters = plan.promoters_list();
        assert_eq!(promoters.len(), 1);
        assert_eq!(promoters[0], json!({"name": "Ana"}));

        // Malformed stored text decodes to empty rather than erroring.
        assert!(plan.strategic_units_list().is_empty());
    }

    #[test]
    fn test_update_default_is_noop_shape() {
        let update = UpdateStrategicPlan::default();
        assert!(update.title.is_none());
        assert!(update.is_active.is_none());
    }
}

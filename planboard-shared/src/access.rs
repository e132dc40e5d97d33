/// Plan access control
///
/// All plan-scoped operations funnel through [`check_plan_access`], which
/// resolves a user's standing on a plan to a single decision. Ownership is
/// derived from `strategic_plans.owner_id`; memberships grant access only
/// once accepted.

use sqlx::PgPool;

use crate::models::plan::StrategicPlan;
use crate::models::plan_member::{InviteStatus, MemberRole, PlanMember};

/// Resolved standing of a user on a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// The user owns the plan
    Owner,

    /// The user holds an accepted membership with the given role
    Member(MemberRole),
}

impl AccessDecision {
    /// Whether this decision carries owner privileges
    pub fn is_owner(&self) -> bool {
        matches!(self, AccessDecision::Owner)
    }
}

/// Resolves a user's access to a plan
///
/// With `require_owner`, only the plan owner passes; members are refused
/// even with an accepted row. Without it, the owner passes first, then any
/// accepted membership. Pending and rejected invitations never grant
/// access.
///
/// # Returns
///
/// `Ok(None)` when the plan does not exist or the user has no standing on
/// it; callers decide whether that surfaces as 403 or 404.
pub async fn check_plan_access(
    pool: &PgPool,
    plan_id: i64,
    user_id: i64,
    require_owner: bool,
) -> Result<Option<AccessDecision>, sqlx::Error> {
    let Some(plan) = StrategicPlan::find_by_id(pool, plan_id).await? else {
        return Ok(None);
    };

    if plan.owner_id == user_id {
        return Ok(Some(AccessDecision::Owner));
    }

    if require_owner {
        return Ok(None);
    }

    let membership = PlanMember::find_by_plan_and_user(pool, plan_id, user_id).await?;

    match membership {
        Some(m) if m.status == InviteStatus::Accepted => {
            Ok(Some(AccessDecision::Member(m.role)))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_owner() {
        assert!(AccessDecision::Owner.is_owner());
        assert!(!AccessDecision::Member(MemberRole::Member).is_owner());
        assert!(!AccessDecision::Member(MemberRole::Owner).is_owner());
    }

    // check_plan_access itself is exercised in tests/db_integration.rs
}

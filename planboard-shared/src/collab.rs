/// Plan collaboration: invitations and membership management
///
/// Inviting creates the membership row (pending) and its notification in
/// one transaction, then enqueues an invitation event. A refused invite is
/// an Option::None, not an error; callers translate that to a client
/// failure without learning which precondition failed.

use sqlx::PgPool;

use crate::events::{EventSender, PlanEvent};
use crate::models::notification::{Notification, KIND_PLAN_INVITATION};
use crate::models::plan::StrategicPlan;
use crate::models::plan_member::{
    InviteStatus, MemberRole, PlanMember, PlanMemberInfo, MAX_COLLABORATORS,
};
use crate::models::user::User;

/// Invites a user to a plan by email
///
/// Preconditions, all of which refuse the invite with None:
/// - the caller owns the plan
/// - a user exists with the given email
/// - no membership row exists yet for (plan, user), whatever its status
/// - the plan has a free collaborator seat (pending plus accepted below
///   [`MAX_COLLABORATORS`])
///
/// The membership and its notification commit atomically; the invitation
/// event is enqueued only after commit.
pub async fn invite(
    pool: &PgPool,
    events: &EventSender,
    plan_id: i64,
    owner_id: i64,
    invitee_email: &str,
) -> Result<Option<PlanMember>, sqlx::Error> {
    let Some(plan) = StrategicPlan::find_by_id(pool, plan_id).await? else {
        return Ok(None);
    };
    if plan.owner_id != owner_id {
        return Ok(None);
    }

    let Some(invitee) = User::find_by_email(pool, invitee_email).await? else {
        return Ok(None);
    };

    // Any existing row blocks a re-invite, rejected ones included.
    if PlanMember::find_by_plan_and_user(pool, plan_id, invitee.id)
        .await?
        .is_some()
    {
        return Ok(None);
    }

    if PlanMember::count_seats(pool, plan_id).await? >= MAX_COLLABORATORS {
        return Ok(None);
    }

    let message = format!(
        "You have been invited to the strategic plan \"{}\"",
        plan.title
    );

    let mut tx = pool.begin().await?;
    let member = PlanMember::create_pending(&mut tx, plan_id, invitee.id).await?;
    Notification::create(
        &mut tx,
        invitee.id,
        KIND_PLAN_INVITATION,
        &message,
        Some(plan_id),
        Some(member.id),
    )
    .await?;
    tx.commit().await?;

    events.send(PlanEvent::Invitation {
        user_id: invitee.id,
        plan_id,
        from_user_id: owner_id,
        invitation_id: member.id,
        message,
    });

    Ok(Some(member))
}

/// Accepts or rejects a pending invitation
///
/// Only the invitee's own pending row transitions; the originating
/// notification is marked read in the same transaction. Responding to an
/// already-answered or foreign invitation returns false and changes
/// nothing.
pub async fn respond(
    pool: &PgPool,
    invitation_id: i64,
    user_id: i64,
    accept: bool,
) -> Result<bool, sqlx::Error> {
    let status = if accept {
        InviteStatus::Accepted
    } else {
        InviteStatus::Rejected
    };

    let mut tx = pool.begin().await?;

    let Some(member) = PlanMember::respond(&mut tx, invitation_id, user_id, status).await? else {
        tx.rollback().await?;
        return Ok(false);
    };

    Notification::mark_invitation_read(&mut tx, member.id, user_id).await?;
    tx.commit().await?;

    Ok(true)
}

/// Lists the membership rows of a plan with user info
///
/// Owner gating happens at the boundary.
pub async fn list_members(pool: &PgPool, plan_id: i64) -> Result<Vec<PlanMemberInfo>, sqlx::Error> {
    PlanMember::list_by_plan(pool, plan_id).await
}

/// Removes a collaborator from a plan
pub async fn remove_member(
    pool: &PgPool,
    plan_id: i64,
    user_id: i64,
) -> Result<bool, sqlx::Error> {
    PlanMember::delete(pool, plan_id, user_id).await
}

/// Changes a collaborator's role
///
/// Rows persisted with the owner role are refused at the storage layer.
pub async fn update_member_role(
    pool: &PgPool,
    plan_id: i64,
    user_id: i64,
    role: MemberRole,
) -> Result<bool, sqlx::Error> {
    PlanMember::update_role(pool, plan_id, user_id, role).await
}

/// Collaboration endpoints: invitations and plan members
///
/// # Endpoints
///
/// - `POST   /v1/plans/:id/invite` - Invite a user by email (owner only)
/// - `POST   /v1/plans/:id/invitations/:invitation_id/accept`
/// - `POST   /v1/plans/:id/invitations/:invitation_id/reject`
/// - `GET    /v1/plans/:id/members` - List members (owner only)
/// - `DELETE /v1/plans/:id/members/:user_id` - Remove a member (owner only)
/// - `PUT    /v1/plans/:id/members/:user_id/role` - Change a role (owner only)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use planboard_shared::{
    auth::middleware::CurrentUser,
    collab,
    models::plan_member::{MemberRole, PlanMember, PlanMemberInfo},
};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use super::plans::require_access;

/// Invite request body
#[derive(Debug, Deserialize, Validate)]
pub struct InviteRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

/// Role change request body
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: MemberRole,
}

/// Invites a user to collaborate on a plan
///
/// All refusals come back as one 400 so the caller cannot probe which
/// precondition failed.
pub async fn invite(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(plan_id): Path<i64>,
    Json(req): Json<InviteRequest>,
) -> ApiResult<(StatusCode, Json<PlanMember>)> {
    req.validate()?;

    let member = collab::invite(&state.db, &state.events, plan_id, current.0.id, &req.email)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Could not send invitation".to_string()))?;

    Ok((StatusCode::CREATED, Json(member)))
}

/// Accepts a pending invitation addressed to the caller
pub async fn accept_invitation(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((_plan_id, invitation_id)): Path<(i64, i64)>,
) -> ApiResult<Json<Value>> {
    if collab::respond(&state.db, invitation_id, current.0.id, true).await? {
        Ok(Json(json!({ "message": "Invitation accepted" })))
    } else {
        Err(ApiError::NotFound("Invitation not found".to_string()))
    }
}

/// Rejects a pending invitation addressed to the caller
pub async fn reject_invitation(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((_plan_id, invitation_id)): Path<(i64, i64)>,
) -> ApiResult<Json<Value>> {
    if collab::respond(&state.db, invitation_id, current.0.id, false).await? {
        Ok(Json(json!({ "message": "Invitation rejected" })))
    } else {
        Err(ApiError::NotFound("Invitation not found".to_string()))
    }
}

/// Lists a plan's members with their user info, owner only
pub async fn list_members(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(plan_id): Path<i64>,
) -> ApiResult<Json<Vec<PlanMemberInfo>>> {
    require_access(&state, plan_id, current.0.id, true).await?;

    let members = collab::list_members(&state.db, plan_id).await?;
    Ok(Json(members))
}

/// Removes a collaborator from a plan, owner only
pub async fn remove_member(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((plan_id, user_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    require_access(&state, plan_id, current.0.id, true).await?;

    if collab::remove_member(&state.db, plan_id, user_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Member not found".to_string()))
    }
}

/// Changes a collaborator's role, owner only
pub async fn update_member_role(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((plan_id, user_id)): Path<(i64, i64)>,
    Json(req): Json<UpdateRoleRequest>,
) -> ApiResult<Json<Value>> {
    require_access(&state, plan_id, current.0.id, true).await?;

    if collab::update_member_role(&state.db, plan_id, user_id, req.role).await? {
        Ok(Json(json!({ "message": "Role updated" })))
    } else {
        Err(ApiError::NotFound("Member not found".to_string()))
    }
}

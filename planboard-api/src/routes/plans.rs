/// Plan CRUD endpoints
///
/// # Endpoints
///
/// - `POST   /v1/plans` - Create a plan
/// - `GET    /v1/plans` - List the caller's plans (skip/limit)
/// - `GET    /v1/plans/owned` - Owned plans with progress (204 when none)
/// - `GET    /v1/plans/shared` - Plans shared with the caller (204 when none)
/// - `GET    /v1/plans/:id` - Plan detail with all sections
/// - `PUT    /v1/plans/:id` - Partial update (owner or accepted member)
/// - `DELETE /v1/plans/:id` - Delete (owner only)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use planboard_shared::{
    access::{self, AccessDecision},
    auth::middleware::CurrentUser,
    models::{
        plan::{CreateStrategicPlan, StrategicPlan, UpdateStrategicPlan},
        sections::{AnalysisTools, CompanyIdentity, Strategies, StrategicAnalysis},
    },
    progress,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// Create plan request
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePlanRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    pub description: Option<String>,
    pub company_name: Option<String>,
    pub company_logo_url: Option<String>,
    pub promoters: Option<Value>,
    pub strategic_units: Option<Value>,
    pub conclusions: Option<String>,
}

/// Update plan request, all fields optional
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePlanRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    pub description: Option<String>,
    pub company_name: Option<String>,
    pub company_logo_url: Option<String>,
    pub promoters: Option<Value>,
    pub strategic_units: Option<Value>,
    pub conclusions: Option<String>,
    pub is_active: Option<bool>,
}

/// Plan as returned over the API, list fields decoded
#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: i64,
    pub company_name: Option<String>,
    pub company_logo_url: Option<String>,
    pub promoters: Vec<Value>,
    pub strategic_units: Vec<Value>,
    pub conclusions: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StrategicPlan> for PlanResponse {
    fn from(plan: StrategicPlan) -> Self {
        let promoters = plan.promoters_list();
        let strategic_units = plan.strategic_units_list();
        Self {
            id: plan.id,
            title: plan.title,
            description: plan.description,
            owner_id: plan.owner_id,
            company_name: plan.company_name,
            company_logo_url: plan.company_logo_url,
            promoters,
            strategic_units,
            conclusions: plan.conclusions,
            is_active: plan.is_active,
            created_at: plan.created_at,
            updated_at: plan.updated_at,
        }
    }
}

/// Plan decorated with its completion for the owned/shared listings
#[derive(Debug, Serialize)]
pub struct PlanWithProgress {
    #[serde(flatten)]
    pub plan: PlanResponse,

    pub progress_percentage: f64,

    /// "Completed" / "In development"; always "Shared" in the shared
    /// listing
    pub status: String,
}

/// Plan detail with all four section rows
#[derive(Debug, Serialize)]
pub struct PlanDetailResponse {
    #[serde(flatten)]
    pub plan: PlanResponse,

    pub company_identity: Option<CompanyIdentity>,
    pub strategic_analysis: Option<StrategicAnalysis>,
    pub analysis_tools: Option<AnalysisTools>,
    pub strategies: Option<Strategies>,
}

/// Pagination query parameters
#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,

    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

/// Creates a plan owned by the caller
pub async fn create_plan(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CreatePlanRequest>,
) -> ApiResult<(StatusCode, Json<PlanResponse>)> {
    req.validate()?;

    let plan = StrategicPlan::create(
        &state.db,
        current.0.id,
        CreateStrategicPlan {
            title: req.title,
            description: req.description,
            company_name: req.company_name,
            company_logo_url: req.company_logo_url,
            promoters: req.promoters,
            strategic_units: req.strategic_units,
            conclusions: req.conclusions,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(plan.into())))
}

/// Lists the caller's plans with pagination
pub async fn list_plans(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<PlanResponse>>> {
    let limit = page.limit.clamp(1, 500);
    let skip = page.skip.max(0);

    let plans = StrategicPlan::list_by_owner(&state.db, current.0.id, limit, skip).await?;
    Ok(Json(plans.into_iter().map(Into::into).collect()))
}

/// Lists owned plans decorated with progress; 204 when the caller owns
/// none
pub async fn list_owned_with_progress(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Response> {
    let plans = StrategicPlan::list_by_owner(&state.db, current.0.id, 500, 0).await?;
    if plans.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let mut decorated = Vec::with_capacity(plans.len());
    for plan in plans {
        let p = progress::calculate(&state.db, plan.id).await?;
        decorated.push(PlanWithProgress {
            plan: plan.into(),
            progress_percentage: p.progress_percentage,
            status: p.status.as_str().to_string(),
        });
    }

    Ok(Json(decorated).into_response())
}

/// Lists plans shared with the caller; 204 when none
///
/// Shared plans always report status "Shared" regardless of completion.
pub async fn list_shared_with_progress(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Response> {
    let plans = StrategicPlan::list_shared_with(&state.db, current.0.id).await?;
    if plans.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let mut decorated = Vec::with_capacity(plans.len());
    for plan in plans {
        let p = progress::calculate(&state.db, plan.id).await?;
        decorated.push(PlanWithProgress {
            plan: plan.into(),
            progress_percentage: p.progress_percentage,
            status: "Shared".to_string(),
        });
    }

    Ok(Json(decorated).into_response())
}

/// Fetches a plan with all four sections eager-loaded
pub async fn get_plan(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(plan_id): Path<i64>,
) -> ApiResult<Json<PlanDetailResponse>> {
    require_access(&state, plan_id, current.0.id, false).await?;

    let plan = StrategicPlan::find_by_id(&state.db, plan_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Plan not found".to_string()))?;

    let company_identity = CompanyIdentity::find_by_plan(&state.db, plan_id).await?;
    let strategic_analysis = StrategicAnalysis::find_by_plan(&state.db, plan_id).await?;
    let analysis_tools = AnalysisTools::find_by_plan(&state.db, plan_id).await?;
    let strategies = Strategies::find_by_plan(&state.db, plan_id).await?;

    Ok(Json(PlanDetailResponse {
        plan: plan.into(),
        company_identity,
        strategic_analysis,
        analysis_tools,
        strategies,
    }))
}

/// Partially updates a plan; unset fields keep their stored values
pub async fn update_plan(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(plan_id): Path<i64>,
    Json(req): Json<UpdatePlanRequest>,
) -> ApiResult<Json<PlanResponse>> {
    req.validate()?;
    require_access(&state, plan_id, current.0.id, false).await?;

    let plan = StrategicPlan::update(
        &state.db,
        plan_id,
        UpdateStrategicPlan {
            title: req.title,
            description: req.description,
            company_name: req.company_name,
            company_logo_url: req.company_logo_url,
            promoters: req.promoters,
            strategic_units: req.strategic_units,
            conclusions: req.conclusions,
            is_active: req.is_active,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Plan not found".to_string()))?;

    Ok(Json(plan.into()))
}

/// Deletes a plan; owner only, cascades to sections and memberships
pub async fn delete_plan(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(plan_id): Path<i64>,
) -> ApiResult<StatusCode> {
    require_access(&state, plan_id, current.0.id, true).await?;

    if StrategicPlan::delete(&state.db, plan_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Plan not found".to_string()))
    }
}

/// Converts a denied access check into the right boundary error
///
/// A plan that does not exist maps to 404; a plan the caller has no
/// standing on maps to 403.
pub(crate) async fn require_access(
    state: &AppState,
    plan_id: i64,
    user_id: i64,
    require_owner: bool,
) -> ApiResult<AccessDecision> {
    match access::check_plan_access(&state.db, plan_id, user_id, require_owner).await? {
        Some(decision) => Ok(decision),
        None => {
            if StrategicPlan::find_by_id(&state.db, plan_id).await?.is_none() {
                Err(ApiError::NotFound("Plan not found".to_string()))
            } else {
                Err(ApiError::Forbidden(
                    "You do not have access to this plan".to_string(),
                ))
            }
        }
    }
}

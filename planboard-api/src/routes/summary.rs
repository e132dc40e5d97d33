/// Executive summary endpoint

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use planboard_shared::{auth::middleware::CurrentUser, summary, summary::ExecutiveSummary};

use super::plans::require_access;

/// Builds the executive summary for a plan
///
/// Assembles the plan, its decoded sections, completion status, and the
/// derived insights and recommendations into one document.
pub async fn executive_summary(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(plan_id): Path<i64>,
) -> ApiResult<Json<ExecutiveSummary>> {
    require_access(&state, plan_id, current.0.id, false).await?;

    let summary = summary::generate(&state.db, plan_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Plan not found".to_string()))?;

    Ok(Json(summary))
}

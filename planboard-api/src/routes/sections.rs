/// Plan section endpoints
///
/// Each section has a GET and a PUT under its plan. Reads of a section that
/// has never been written return an empty default instead of 404; writes
/// upsert, merging non-null fields over the stored row.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use planboard_shared::{
    auth::middleware::CurrentUser,
    models::sections::{
        UpdateAnalysisTools, UpdateCompanyIdentity, UpdateStrategicAnalysis, UpdateStrategies,
    },
    models::sections::{AnalysisTools, CompanyIdentity, Strategies, StrategicAnalysis},
    sections,
};
use serde_json::{json, Value};

use super::plans::require_access;
use crate::error::ApiError;

fn not_found() -> ApiError {
    ApiError::NotFound("Plan not found".to_string())
}

/// Fetches the company identity section
pub async fn get_company_identity(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(plan_id): Path<i64>,
) -> ApiResult<Json<Value>> {
    require_access(&state, plan_id, current.0.id, false).await?;

    let body = match CompanyIdentity::find_by_plan(&state.db, plan_id).await? {
        Some(row) => serde_json::to_value(row).unwrap_or(Value::Null),
        None => json!({
            "plan_id": plan_id,
            "mission": null,
            "vision": null,
            "core_values": null,
            "general_objectives": null,
            "strategic_mission": null,
        }),
    };

    Ok(Json(body))
}

/// Upserts the company identity section
pub async fn update_company_identity(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(plan_id): Path<i64>,
    Json(data): Json<UpdateCompanyIdentity>,
) -> ApiResult<Json<CompanyIdentity>> {
    require_access(&state, plan_id, current.0.id, false).await?;

    let section = sections::upsert_company_identity(&state.db, &state.events, plan_id, data)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(section))
}

/// Fetches the strategic analysis section
pub async fn get_strategic_analysis(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(plan_id): Path<i64>,
) -> ApiResult<Json<Value>> {
    require_access(&state, plan_id, current.0.id, false).await?;

    let body = match StrategicAnalysis::find_by_plan(&state.db, plan_id).await? {
        Some(row) => serde_json::to_value(row).unwrap_or(Value::Null),
        None => json!({
            "plan_id": plan_id,
            "internal_strengths": null,
            "internal_weaknesses": null,
            "external_opportunities": null,
            "external_threats": null,
            "swot_summary": null,
        }),
    };

    Ok(Json(body))
}

/// Upserts the strategic analysis section
pub async fn update_strategic_analysis(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(plan_id): Path<i64>,
    Json(data): Json<UpdateStrategicAnalysis>,
) -> ApiResult<Json<StrategicAnalysis>> {
    require_access(&state, plan_id, current.0.id, false).await?;

    let section = sections::upsert_strategic_analysis(&state.db, &state.events, plan_id, data)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(section))
}

/// Fetches the analysis tools section
pub async fn get_analysis_tools(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(plan_id): Path<i64>,
) -> ApiResult<Json<Value>> {
    require_access(&state, plan_id, current.0.id, false).await?;

    let body = match AnalysisTools::find_by_plan(&state.db, plan_id).await? {
        Some(row) => serde_json::to_value(row).unwrap_or(Value::Null),
        None => json!({
            "plan_id": plan_id,
            "value_chain_primary": null,
            "value_chain_support": null,
            "participation_matrix": null,
            "porter_competitive_rivalry": null,
            "porter_supplier_power": null,
            "porter_buyer_power": null,
            "porter_threat_substitutes": null,
            "porter_threat_new_entrants": null,
            "pest_political": null,
            "pest_economic": null,
            "pest_social": null,
            "pest_technological": null,
            "bcg_matrix_data": null,
        }),
    };

    Ok(Json(body))
}

/// Upserts the analysis tools section
pub async fn update_analysis_tools(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(plan_id): Path<i64>,
    Json(data): Json<UpdateAnalysisTools>,
) -> ApiResult<Json<AnalysisTools>> {
    require_access(&state, plan_id, current.0.id, false).await?;

    let section = sections::upsert_analysis_tools(&state.db, &state.events, plan_id, data)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(section))
}

/// Fetches the strategies section
pub async fn get_strategies(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(plan_id): Path<i64>,
) -> ApiResult<Json<Value>> {
    require_access(&state, plan_id, current.0.id, false).await?;

    let body = match Strategies::find_by_plan(&state.db, plan_id).await? {
        Some(row) => serde_json::to_value(row).unwrap_or(Value::Null),
        None => json!({
            "plan_id": plan_id,
            "strategy_identification": null,
            "game_growth": null,
            "game_avoid": null,
            "game_merge": null,
            "game_exit": null,
            "priority_strategies": null,
            "implementation_timeline": null,
        }),
    };

    Ok(Json(body))
}

/// Upserts the strategies section
pub async fn update_strategies(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(plan_id): Path<i64>,
    Json(data): Json<UpdateStrategies>,
) -> ApiResult<Json<Strategies>> {
    require_access(&state, plan_id, current.0.id, false).await?;

    let section = sections::upsert_strategies(&state.db, &state.events, plan_id, data)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(section))
}

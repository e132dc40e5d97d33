/// Section write operations
///
/// Wraps the model-level upserts with the side effects every successful
/// section write carries: a section-changed event and a recomputed-progress
/// event. Events are enqueued after the write commits and are best effort;
/// a failed progress recomputation only costs the progress event, never the
/// write itself.

use sqlx::PgPool;

use crate::events::{EventSender, PlanEvent};
use crate::models::plan::StrategicPlan;
use crate::models::sections::{
    AnalysisTools, CompanyIdentity, SectionKind, Strategies, StrategicAnalysis,
    UpdateAnalysisTools, UpdateCompanyIdentity, UpdateStrategicAnalysis, UpdateStrategies,
};
use crate::progress;

async fn emit_section_events(
    pool: &PgPool,
    events: &EventSender,
    plan_id: i64,
    section: SectionKind,
    updated_at: chrono::DateTime<chrono::Utc>,
) {
    events.send(PlanEvent::SectionChanged {
        plan_id,
        section,
        updated_at,
    });

    match progress::calculate(pool, plan_id).await {
        Ok(p) => events.send(PlanEvent::Progress {
            plan_id,
            completed: p.progress_percentage.round() as i64,
        }),
        Err(e) => {
            tracing::warn!(plan_id, error = %e, "failed to recompute progress for event");
        }
    }
}

/// Upserts the company identity section of a plan
///
/// # Returns
///
/// None when the plan does not exist
pub async fn upsert_company_identity(
    pool: &PgPool,
    events: &EventSender,
    plan_id: i64,
    data: UpdateCompanyIdentity,
) -> Result<Option<CompanyIdentity>, sqlx::Error> {
    if StrategicPlan::find_by_id(pool, plan_id).await?.is_none() {
        return Ok(None);
    }

    let section = CompanyIdentity::upsert(pool, plan_id, data).await?;
    emit_section_events(
        pool,
        events,
        plan_id,
        SectionKind::CompanyIdentity,
        section.updated_at,
    )
    .await;

    Ok(Some(section))
}

/// Upserts the strategic analysis section of a plan
pub async fn upsert_strategic_analysis(
    pool: &PgPool,
    events: &EventSender,
    plan_id: i64,
    data: UpdateStrategicAnalysis,
) -> Result<Option<StrategicAnalysis>, sqlx::Error> {
    if StrategicPlan::find_by_id(pool, plan_id).await?.is_none() {
        return Ok(None);
    }

    let section = StrategicAnalysis::upsert(pool, plan_id, data).await?;
    emit_section_events(
        pool,
        events,
        plan_id,
        SectionKind::StrategicAnalysis,
        section.updated_at,
    )
    .await;

    Ok(Some(section))
}

/// Upserts the analysis tools section of a plan
pub async fn upsert_analysis_tools(
    pool: &PgPool,
    events: &EventSender,
    plan_id: i64,
    data: UpdateAnalysisTools,
) -> Result<Option<AnalysisTools>, sqlx::Error> {
    if StrategicPlan::find_by_id(pool, plan_id).await?.is_none() {
        return Ok(None);
    }

    let section = AnalysisTools::upsert(pool, plan_id, data).await?;
    emit_section_events(
        pool,
        events,
        plan_id,
        SectionKind::AnalysisTools,
        section.updated_at,
    )
    .await;

    Ok(Some(section))
}

/// Upserts the strategies section of a plan
pub async fn upsert_strategies(
    pool: &PgPool,
    events: &EventSender,
    plan_id: i64,
    data: UpdateStrategies,
) -> Result<Option<Strategies>, sqlx::Error> {
    if StrategicPlan::find_by_id(pool, plan_id).await?.is_none() {
        return Ok(None);
    }

    let section = Strategies::upsert(pool, plan_id, data).await?;
    emit_section_events(
        pool,
        events,
        plan_id,
        SectionKind::Strategies,
        section.updated_at,
    )
    .await;

    Ok(Some(section))
}

/// Plan section models and database operations
///
/// Each plan has up to four one-to-one section rows: company identity,
/// strategic analysis (SWOT), analysis tools (value chain, Porter, PEST),
/// and strategies (identification, GAME, priorities). Rows are created
/// lazily: the first write upserts, and reads of a missing row fall back to
/// an empty default at the API layer.
///
/// All list- and map-shaped values are JSON stored as TEXT. Updates merge
/// field-by-field: a None in the update DTO leaves the stored value alone,
/// enforced in SQL via `COALESCE(EXCLUDED.col, table.col)`. An explicit
/// JSON `null` in a request body deserializes to None and is likewise
/// treated as absent; stored fields can be overwritten (an empty list
/// included) but never cleared back to NULL.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;

use super::jsontext;

/// Identifies one of the four plan sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    CompanyIdentity,
    StrategicAnalysis,
    AnalysisTools,
    Strategies,
}

impl SectionKind {
    /// Stable name used in event payloads and URLs
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::CompanyIdentity => "company_identity",
            SectionKind::StrategicAnalysis => "strategic_analysis",
            SectionKind::AnalysisTools => "analysis_tools",
            SectionKind::Strategies => "strategies",
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Company identity section: mission, vision, values, objectives
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CompanyIdentity {
    pub id: i64,
    pub plan_id: i64,
    pub mission: Option<String>,
    pub vision: Option<String>,
    /// JSON list of core values, stored as text
    pub core_values: Option<String>,
    /// JSON list of general objectives, stored as text
    pub general_objectives: Option<String>,
    pub strategic_mission: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for updating the company identity section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCompanyIdentity {
    pub mission: Option<String>,
    pub vision: Option<String>,
    pub core_values: Option<Value>,
    pub general_objectives: Option<Value>,
    pub strategic_mission: Option<String>,
}

/// Strategic analysis section: SWOT lists and summary
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StrategicAnalysis {
    pub id: i64,
    pub plan_id: i64,
    /// JSON list, stored as text
    pub internal_strengths: Option<String>,
    /// JSON list, stored as text
    pub internal_weaknesses: Option<String>,
    /// JSON list, stored as text
    pub external_opportunities: Option<String>,
    /// JSON list, stored as text
    pub external_threats: Option<String>,
    pub swot_summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for updating the strategic analysis section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStrategicAnalysis {
    pub internal_strengths: Option<Value>,
    pub internal_weaknesses: Option<Value>,
    pub external_opportunities: Option<Value>,
    pub external_threats: Option<Value>,
    pub swot_summary: Option<String>,
}

/// Analysis tools section: value chain, participation matrix, Porter's five
/// forces, PEST, BCG
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AnalysisTools {
    pub id: i64,
    pub plan_id: i64,
    /// JSON list, stored as text
    pub value_chain_primary: Option<String>,
    /// JSON list, stored as text
    pub value_chain_support: Option<String>,
    /// JSON map, stored as text
    pub participation_matrix: Option<String>,
    pub porter_competitive_rivalry: Option<String>,
    pub porter_supplier_power: Option<String>,
    pub porter_buyer_power: Option<String>,
    pub porter_threat_substitutes: Option<String>,
    pub porter_threat_new_entrants: Option<String>,
    pub pest_political: Option<String>,
    pub pest_economic: Option<String>,
    pub pest_social: Option<String>,
    pub pest_technological: Option<String>,
    /// JSON map, stored as text
    pub bcg_matrix_data: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for updating the analysis tools section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAnalysisTools {
    pub value_chain_primary: Option<Value>,
    pub value_chain_support: Option<Value>,
    pub participation_matrix: Option<Value>,
    pub porter_competitive_rivalry: Option<String>,
    pub porter_supplier_power: Option<String>,
    pub porter_buyer_power: Option<String>,
    pub porter_threat_substitutes: Option<String>,
    pub porter_threat_new_entrants: Option<String>,
    pub pest_political: Option<String>,
    pub pest_economic: Option<String>,
    pub pest_social: Option<String>,
    pub pest_technological: Option<String>,
    pub bcg_matrix_data: Option<Value>,
}

/// Strategies section: identification, GAME categories, priorities
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Strategies {
    pub id: i64,
    pub plan_id: i64,
    /// JSON list, stored as text
    pub strategy_identification: Option<String>,
    /// JSON list, stored as text
    pub game_growth: Option<String>,
    /// JSON list, stored as text
    pub game_avoid: Option<String>,
    /// JSON list, stored as text
    pub game_merge: Option<String>,
    /// JSON list, stored as text
    pub game_exit: Option<String>,
    /// JSON list, stored as text
    pub priority_strategies: Option<String>,
    /// JSON map, stored as text
    pub implementation_timeline: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for updating the strategies section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStrategies {
    pub strategy_identification: Option<Value>,
    pub game_growth: Option<Value>,
    pub game_avoid: Option<Value>,
    pub game_merge: Option<Value>,
    pub game_exit: Option<Value>,
    pub priority_strategies: Option<Value>,
    pub implementation_timeline: Option<Value>,
}

impl CompanyIdentity {
    /// Finds the section row for a plan
    pub async fn find_by_plan(pool: &PgPool, plan_id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, CompanyIdentity>(
            "SELECT * FROM company_identity WHERE plan_id = $1",
        )
        .bind(plan_id)
        .fetch_optional(pool)
        .await
    }

    /// Inserts or merges the section row for a plan
    ///
    /// None fields in `data` keep their stored values. The row's
    /// `updated_at` always advances, even for an effectively empty merge.
    pub async fn upsert(
        pool: &PgPool,
        plan_id: i64,
        data: UpdateCompanyIdentity,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, CompanyIdentity>(
            r#"
            INSERT INTO company_identity
                (plan_id, mission, vision, core_values, general_objectives, strategic_mission)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (plan_id) DO UPDATE SET
                mission = COALESCE(EXCLUDED.mission, company_identity.mission),
                vision = COALESCE(EXCLUDED.vision, company_identity.vision),
                core_values = COALESCE(EXCLUDED.core_values, company_identity.core_values),
                general_objectives = COALESCE(EXCLUDED.general_objectives, company_identity.general_objectives),
                strategic_mission = COALESCE(EXCLUDED.strategic_mission, company_identity.strategic_mission),
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(plan_id)
        .bind(data.mission)
        .bind(data.vision)
        .bind(jsontext::encode(data.core_values.as_ref()))
        .bind(jsontext::encode(data.general_objectives.as_ref()))
        .bind(data.strategic_mission)
        .fetch_one(pool)
        .await
    }
}

impl StrategicAnalysis {
    /// Finds the section row for a plan
    pub async fn find_by_plan(pool: &PgPool, plan_id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, StrategicAnalysis>(
            "SELECT * FROM strategic_analysis WHERE plan_id = $1",
        )
        .bind(plan_id)
        .fetch_optional(pool)
        .await
    }

    /// Inserts or merges the section row for a plan
    pub async fn upsert(
        pool: &PgPool,
        plan_id: i64,
        data: UpdateStrategicAnalysis,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, StrategicAnalysis>(
            r#"
            INSERT INTO strategic_analysis
                (plan_id, internal_strengths, internal_weaknesses,
                 external_opportunities, external_threats, swot_summary)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (plan_id) DO UPDATE SET
                internal_strengths = COALESCE(EXCLUDED.internal_strengths, strategic_analysis.internal_strengths),
                internal_weaknesses = COALESCE(EXCLUDED.internal_weaknesses, strategic_analysis.internal_weaknesses),
                external_opportunities = COALESCE(EXCLUDED.external_opportunities, strategic_analysis.external_opportunities),
                external_threats = COALESCE(EXCLUDED.external_threats, strategic_analysis.external_threats),
                swot_summary = COALESCE(EXCLUDED.swot_summary, strategic_analysis.swot_summary),
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(plan_id)
        .bind(jsontext::encode(data.internal_strengths.as_ref()))
        .bind(jsontext::encode(data.internal_weaknesses.as_ref()))
        .bind(jsontext::encode(data.external_opportunities.as_ref()))
        .bind(jsontext::encode(data.external_threats.as_ref()))
        .bind(data.swot_summary)
        .fetch_one(pool)
        .await
    }
}

impl AnalysisTools {
    /// Finds the section row for a plan
    pub async fn find_by_plan(pool: &PgPool, plan_id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, AnalysisTools>("SELECT * FROM analysis_tools WHERE plan_id = $1")
            .bind(plan_id)
            .fetch_optional(pool)
            .await
    }

    /// Inserts or merges the section row for a plan
    pub async fn upsert(
        pool: &PgPool,
        plan_id: i64,
        data: UpdateAnalysisTools,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, AnalysisTools>(
            r#"
            INSERT INTO analysis_tools
                (plan_id, value_chain_primary, value_chain_support, participation_matrix,
                 porter_competitive_rivalry, porter_supplier_power, porter_buyer_power,
                 porter_threat_substitutes, porter_threat_new_entrants,
                 pest_political, pest_economic, pest_social, pest_technological,
                 bcg_matrix_data)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (plan_id) DO UPDATE SET
                value_chain_primary = COALESCE(EXCLUDED.value_chain_primary, analysis_tools.value_chain_primary),
                value_chain_support = COALESCE(EXCLUDED.value_chain_support, analysis_tools.value_chain_support),
                participation_matrix = COALESCE(EXCLUDED.participation_matrix, analysis_tools.participation_matrix),
                porter_competitive_rivalry = COALESCE(EXCLUDED.porter_competitive_rivalry, analysis_tools.porter_competitive_rivalry),
                porter_supplier_power = COALESCE(EXCLUDED.porter_supplier_power, analysis_tools.porter_supplier_power),
                porter_buyer_power = COALESCE(EXCLUDED.porter_buyer_power, analysis_tools.porter_buyer_power),
                porter_threat_substitutes = COALESCE(EXCLUDED.porter_threat_substitutes, analysis_tools.porter_threat_substitutes),
                porter_threat_new_entrants = COALESCE(EXCLUDED.porter_threat_new_entrants, analysis_tools.porter_threat_new_entrants),
                pest_political = COALESCE(EXCLUDED.pest_political, analysis_tools.pest_political),
                pest_economic = COALESCE(EXCLUDED.pest_economic, analysis_tools.pest_economic),
                pest_social = COALESCE(EXCLUDED.pest_social, analysis_tools.pest_social),
                pest_technological = COALESCE(EXCLUDED.pest_technological, analysis_tools.pest_technological),
                bcg_matrix_data = COALESCE(EXCLUDED.bcg_matrix_data, analysis_tools.bcg_matrix_data),
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(plan_id)
        .bind(jsontext::encode(data.value_chain_primary.as_ref()))
        .bind(jsontext::encode(data.value_chain_support.as_ref()))
        .bind(jsontext::encode(data.participation_matrix.as_ref()))
        .bind(data.porter_competitive_rivalry)
        .bind(data.porter_supplier_power)
        .bind(data.porter_buyer_power)
        .bind(data.porter_threat_substitutes)
        .bind(data.porter_threat_new_entrants)
        .bind(data.pest_political)
        .bind(data.pest_economic)
        .bind(data.pest_social)
        .bind(data.pest_technological)
        .bind(jsontext::encode(data.bcg_matrix_data.as_ref()))
        .fetch_one(pool)
        .await
    }
}

impl Strategies {
    /// Finds the section row for a plan
    pub async fn find_by_plan(pool: &PgPool, plan_id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Strategies>("SELECT * FROM strategies WHERE plan_id = $1")
            .bind(plan_id)
            .fetch_optional(pool)
            .await
    }

    /// Inserts or merges the section row for a plan
    pub async fn upsert(
        pool: &PgPool,
        plan_id: i64,
        data: UpdateStrategies,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Strategies>(
            r#"
            INSERT INTO strategies
                (plan_id, strategy_identification, game_growth, game_avoid,
                 game_merge, game_exit, priority_strategies, implementation_timeline)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (plan_id) DO UPDATE SET
                strategy_identification = COALESCE(EXCLUDED.strategy_identification, strategies.strategy_identification),
                game_growth = COALESCE(EXCLUDED.game_growth, strategies.game_growth),
                game_avoid = COALESCE(EXCLUDED.game_avoid, strategies.game_avoid),
                game_merge = COALESCE(EXCLUDED.game_merge, strategies.game_merge),
                game_exit = COALESCE(EXCLUDED.game_exit, strategies.game_exit),
                priority_strategies = COALESCE(EXCLUDED.priority_strategies, strategies.priority_strategies),
                implementation_timeline = COALESCE(EXCLUDED.implementation_timeline, strategies.implementation_timeline),
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(plan_id)
        .bind(jsontext::encode(data.strategy_identification.as_ref()))
        .bind(jsontext::encode(data.game_growth.as_ref()))
        .bind(jsontext::encode(data.game_avoid.as_ref()))
        .bind(jsontext::encode(data.game_merge.as_ref()))
        .bind(jsontext::encode(data.game_exit.as_ref()))
        .bind(jsontext::encode(data.priority_strategies.as_ref()))
        .bind(jsontext::encode(data.implementation_timeline.as_ref()))
        .fetch_one(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_kind_names() {
        assert_eq!(SectionKind::CompanyIdentity.as_str(), "company_identity");
        assert_eq!(SectionKind::StrategicAnalysis.as_str(), "strategic_analysis");
        assert_eq!(SectionKind::AnalysisTools.as_str(), "analysis_tools");
        assert_eq!(SectionKind::Strategies.as_str(), "strategies");
    }

    #[test]
    fn test_update_dtos_default_to_noop() {
        let identity = UpdateCompanyIdentity::default();
        assert!(identity.mission.is_none());

        let tools = UpdateAnalysisTools::default();
        assert!(tools.porter_buyer_power.is_none());
        assert!(tools.bcg_matrix_data.is_none());
    }
}

/// Executive summary generation
///
/// Composes a full report over a plan: header info, the four sections with
/// their stored JSON decoded, per-section completion status from the shared
/// scoring table, and two ordered rule-driven lists of canned insights and
/// recommendations. The rules are a fixed predicate-to-sentence table; order
/// and wording are stable so the output is testable.
///
/// Access control happens upstream; this module only answers "does the plan
/// exist" and never re-gates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::PgPool;

use crate::models::jsontext;
use crate::models::plan::StrategicPlan;
use crate::models::sections::{AnalysisTools, CompanyIdentity, Strategies, StrategicAnalysis};
use crate::progress::{self, SectionScores};

/// Plan header info carried at the top of a summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanInfo {
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Company identity section, decoded
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyIdentityView {
    pub mission: Option<String>,
    pub vision: Option<String>,
    pub values: Vec<Value>,
    pub general_objectives: Vec<Value>,
}

/// Internal half of the SWOT view
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InternalAnalysisView {
    pub strengths: Vec<Value>,
    pub weaknesses: Vec<Value>,
}

/// External half of the SWOT view
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalAnalysisView {
    pub opportunities: Vec<Value>,
    pub threats: Vec<Value>,
}

/// Strategic analysis section, decoded
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrategicAnalysisView {
    pub internal_analysis: InternalAnalysisView,
    pub external_analysis: ExternalAnalysisView,
    pub swot_summary: Option<String>,
}

/// Value chain activities, decoded
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValueChainView {
    pub primary_activities: Vec<Value>,
    pub support_activities: Vec<Value>,
}

/// Porter's five forces, raw text per force
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PorterFiveForcesView {
    pub competitive_rivalry: Option<String>,
    pub supplier_power: Option<String>,
    pub buyer_power: Option<String>,
    pub threat_substitutes: Option<String>,
    pub threat_new_entrants: Option<String>,
}

/// PEST factors, raw text per factor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PestAnalysisView {
    pub political: Option<String>,
    pub economic: Option<String>,
    pub social: Option<String>,
    pub technological: Option<String>,
}

/// Analysis tools section, decoded
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisToolsView {
    pub value_chain: ValueChainView,
    pub participation_matrix: Map<String, Value>,
    pub porter_five_forces: PorterFiveForcesView,
    pub pest_analysis: PestAnalysisView,
}

/// GAME matrix strategies, decoded
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameMatrixView {
    pub growth_strategies: Vec<Value>,
    pub avoid_strategies: Vec<Value>,
    pub merge_strategies: Vec<Value>,
    pub exit_strategies: Vec<Value>,
}

/// Strategies section, decoded
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrategiesView {
    pub strategy_identification: Vec<Value>,
    pub game_matrix: GameMatrixView,
    pub priority_strategies: Vec<Value>,
    pub implementation_timeline: Map<String, Value>,
}

/// Completion of one section
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SectionStatus {
    pub completed: bool,
    pub percentage: f64,
}

/// Aggregate completion across all four sections
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OverallStatus {
    pub completed_sections: u32,
    pub total_sections: u32,
    pub percentage: f64,
}

/// Completion block of a summary
///
/// Sections that were never started are omitted; the overall entry always
/// divides by four regardless.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_identity: Option<SectionStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategic_analysis: Option<SectionStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_tools: Option<SectionStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategies: Option<SectionStatus>,

    pub overall: OverallStatus,
}

/// Full executive summary report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub plan_info: PlanInfo,
    pub company_identity: CompanyIdentityView,
    pub strategic_analysis: StrategicAnalysisView,
    pub analysis_tools: AnalysisToolsView,
    pub strategies: StrategiesView,
    pub completion_status: CompletionStatus,
    pub key_insights: Vec<String>,
    pub recommendations: Vec<String>,
}

fn present(value: Option<&str>) -> bool {
    value.is_some_and(|s| !s.is_empty())
}

fn section_status(score: f64) -> SectionStatus {
    SectionStatus {
        completed: score >= 100.0,
        percentage: score,
    }
}

fn identity_view(section: &CompanyIdentity) -> CompanyIdentityView {
    CompanyIdentityView {
        mission: section.mission.clone(),
        vision: section.vision.clone(),
        values: jsontext::decode_list(section.core_values.as_deref()),
        general_objectives: jsontext::decode_list(section.general_objectives.as_deref()),
    }
}

fn analysis_view(section: &StrategicAnalysis) -> StrategicAnalysisView {
    StrategicAnalysisView {
        internal_analysis: InternalAnalysisView {
            strengths: jsontext::decode_list(section.internal_strengths.as_deref()),
            weaknesses: jsontext::decode_list(section.internal_weaknesses.as_deref()),
        },
        external_analysis: ExternalAnalysisView {
            opportunities: jsontext::decode_list(section.external_opportunities.as_deref()),
            threats: jsontext::decode_list(section.external_threats.as_deref()),
        },
        swot_summary: section.swot_summary.clone(),
    }
}

fn tools_view(section: &AnalysisTools) -> AnalysisToolsView {
    AnalysisToolsView {
        value_chain: ValueChainView {
            primary_activities: jsontext::decode_list(section.value_chain_primary.as_deref()),
            support_activities: jsontext::decode_list(section.value_chain_support.as_deref()),
        },
        participation_matrix: jsontext::decode_map(section.participation_matrix.as_deref()),
        porter_five_forces: PorterFiveForcesView {
            competitive_rivalry: section.porter_competitive_rivalry.clone(),
            supplier_power: section.porter_supplier_power.clone(),
            buyer_power: section.porter_buyer_power.clone(),
            threat_substitutes: section.porter_threat_substitutes.clone(),
            threat_new_entrants: section.porter_threat_new_entrants.clone(),
        },
        pest_analysis: PestAnalysisView {
            political: section.pest_political.clone(),
            economic: section.pest_economic.clone(),
            social: section.pest_social.clone(),
            technological: section.pest_technological.clone(),
        },
    }
}

fn strategies_view(section: &Strategies) -> StrategiesView {
    StrategiesView {
        strategy_identification: jsontext::decode_list(
            section.strategy_identification.as_deref(),
        ),
        game_matrix: GameMatrixView {
            growth_strategies: jsontext::decode_list(section.game_growth.as_deref()),
            avoid_strategies: jsontext::decode_list(section.game_avoid.as_deref()),
            merge_strategies: jsontext::decode_list(section.game_merge.as_deref()),
            exit_strategies: jsontext::decode_list(section.game_exit.as_deref()),
        },
        priority_strategies: jsontext::decode_list(section.priority_strategies.as_deref()),
        implementation_timeline: jsontext::decode_map(
            section.implementation_timeline.as_deref(),
        ),
    }
}

/// Builds the ordered list of key insights
///
/// Each rule appends one fixed sentence when its predicate holds; the
/// evaluation order is part of the contract.
pub fn key_insights(
    identity: &CompanyIdentityView,
    analysis: &StrategicAnalysisView,
    tools: &AnalysisToolsView,
    strategies: &StrategiesView,
) -> Vec<String> {
    let mut insights = Vec::new();

    if present(identity.mission.as_deref()) && present(identity.vision.as_deref()) {
        insights.push(
            "The company has a clear identity with a well-defined mission and vision."
                .to_string(),
        );
    }

    if !identity.general_objectives.is_empty() {
        insights.push(format!(
            "{} general strategic objectives have been defined, each with its specific objectives.",
            identity.general_objectives.len()
        ));
    }

    let strengths = &analysis.internal_analysis.strengths;
    let weaknesses = &analysis.internal_analysis.weaknesses;
    let opportunities = &analysis.external_analysis.opportunities;
    let threats = &analysis.external_analysis.threats;

    if !strengths.is_empty() {
        insights.push(format!(
            "{} internal strengths were identified that can be leveraged.",
            strengths.len()
        ));
    }
    if !opportunities.is_empty() {
        insights.push(format!(
            "{} opportunities were detected in the external environment.",
            opportunities.len()
        ));
    }
    if !weaknesses.is_empty() {
        insights.push(format!(
            "{} areas of internal improvement were identified.",
            weaknesses.len()
        ));
    }
    if !threats.is_empty() {
        insights.push(format!(
            "{} threats were recognized in the external environment.",
            threats.len()
        ));
    }

    if !tools.value_chain.primary_activities.is_empty()
        || !tools.value_chain.support_activities.is_empty()
    {
        insights.push(
            "A detailed analysis of the company's value chain has been carried out.".to_string(),
        );
    }

    let porter = &tools.porter_five_forces;
    let porter_complete = present(porter.competitive_rivalry.as_deref())
        && present(porter.supplier_power.as_deref())
        && present(porter.buyer_power.as_deref())
        && present(porter.threat_substitutes.as_deref())
        && present(porter.threat_new_entrants.as_deref());
    if porter_complete {
        insights.push(
            "The Porter five forces analysis was completed to understand sector competition."
                .to_string(),
        );
    }

    let pest = &tools.pest_analysis;
    let pest_complete = present(pest.political.as_deref())
        && present(pest.economic.as_deref())
        && present(pest.social.as_deref())
        && present(pest.technological.as_deref());
    if pest_complete {
        insights.push(
            "A complete PEST analysis of the macroeconomic environment was performed.".to_string(),
        );
    }

    if !strategies.strategy_identification.is_empty() {
        insights.push("The main corporate strategies have been identified.".to_string());
    }

    let game = &strategies.game_matrix;
    let game_count = game.growth_strategies.len()
        + game.avoid_strategies.len()
        + game.merge_strategies.len()
        + game.exit_strategies.len();
    if game_count > 0 {
        insights.push(format!(
            "{} specific strategies were defined in the GAME matrix.",
            game_count
        ));
    }

    if !strategies.priority_strategies.is_empty() {
        insights.push(
            "Priority strategies with an implementation plan were established.".to_string(),
        );
    }

    insights
}

/// Builds the ordered list of recommendations
///
/// Keyed on the overall completion percentage and on specific missing
/// fields; closes with a review message once the plan is nearly done.
pub fn recommendations(
    overall_percentage: f64,
    identity: &CompanyIdentityView,
    analysis: &StrategicAnalysisView,
    tools: &AnalysisToolsView,
    strategies: &StrategiesView,
) -> Vec<String> {
    let mut recs = Vec::new();

    if overall_percentage < 30.0 {
        recs.push(
            "Complete at least 50% of the strategic plan sections to obtain meaningful insights."
                .to_string(),
        );
    } else if overall_percentage < 70.0 {
        recs.push(
            "Continue completing the remaining sections to build a comprehensive strategic plan."
                .to_string(),
        );
    }

    if !present(identity.mission.as_deref()) {
        recs.push(
            "Define the company mission to establish the organization's fundamental purpose."
                .to_string(),
        );
    }
    if !present(identity.vision.as_deref()) {
        recs.push("Establish a clear vision of the desired future for the company.".to_string());
    }
    if identity.general_objectives.is_empty() {
        recs.push(
            "Develop detailed strategic objectives with specific, measurable goals.".to_string(),
        );
    }

    let strengths = &analysis.internal_analysis.strengths;
    let weaknesses = &analysis.internal_analysis.weaknesses;
    let opportunities = &analysis.external_analysis.opportunities;
    let threats = &analysis.external_analysis.threats;

    if !strengths.is_empty() && !opportunities.is_empty() {
        recs.push(
            "Develop strategies that leverage the identified strengths to capitalize on market opportunities."
                .to_string(),
        );
    }
    if !weaknesses.is_empty() && !threats.is_empty() {
        recs.push(
            "Implement contingency plans to mitigate weaknesses against the identified threats."
                .to_string(),
        );
    }

    let porter = &tools.porter_five_forces;
    let core_forces_complete = present(porter.competitive_rivalry.as_deref())
        && present(porter.supplier_power.as_deref())
        && present(porter.buyer_power.as_deref());
    if !core_forces_complete {
        recs.push(
            "Complete the competitive forces analysis to better understand market positioning."
                .to_string(),
        );
    }

    if strategies.priority_strategies.is_empty() {
        recs.push(
            "Define priority strategies with a realistic implementation timeline.".to_string(),
        );
    }

    if overall_percentage >= 80.0 {
        recs.push(
            "The strategic plan is almost complete. Review and validate all sections before implementation."
                .to_string(),
        );
    }

    recs
}

fn completion_status(
    scores: SectionScores,
    identity_present: bool,
    analysis_present: bool,
    tools_present: bool,
    strategies_present: bool,
) -> CompletionStatus {
    CompletionStatus {
        company_identity: identity_present.then(|| section_status(scores.company_identity)),
        strategic_analysis: analysis_present.then(|| section_status(scores.strategic_analysis)),
        analysis_tools: tools_present.then(|| section_status(scores.analysis_tools)),
        strategies: strategies_present.then(|| section_status(scores.strategies)),
        overall: OverallStatus {
            completed_sections: scores.completed_count(),
            total_sections: 4,
            percentage: progress::round1(scores.mean()),
        },
    }
}

/// Generates the executive summary for a plan
///
/// # Returns
///
/// None only when the plan itself does not exist.
pub async fn generate(
    pool: &PgPool,
    plan_id: i64,
) -> Result<Option<ExecutiveSummary>, sqlx::Error> {
    let Some(plan) = StrategicPlan::find_by_id(pool, plan_id).await? else {
        return Ok(None);
    };

    let identity = CompanyIdentity::find_by_plan(pool, plan_id).await?;
    let analysis = StrategicAnalysis::find_by_plan(pool, plan_id).await?;
    let tools = AnalysisTools::find_by_plan(pool, plan_id).await?;
    let strategies = Strategies::find_by_plan(pool, plan_id).await?;

    let scores = progress::score_sections(
        identity.as_ref(),
        analysis.as_ref(),
        tools.as_ref(),
        strategies.as_ref(),
    );

    let identity_view = identity.as_ref().map(identity_view).unwrap_or_default();
    let analysis_view = analysis.as_ref().map(analysis_view).unwrap_or_default();
    let tools_view = tools.as_ref().map(tools_view).unwrap_or_default();
    let strategies_view = strategies.as_ref().map(strategies_view).unwrap_or_default();

    let completion = completion_status(
        scores,
        identity.is_some(),
        analysis.is_some(),
        tools.is_some(),
        strategies.is_some(),
    );

    let insights = key_insights(&identity_view, &analysis_view, &tools_view, &strategies_view);
    let recs = recommendations(
        completion.overall.percentage,
        &identity_view,
        &analysis_view,
        &tools_view,
        &strategies_view,
    );

    Ok(Some(ExecutiveSummary {
        plan_info: PlanInfo {
            title: plan.title,
            description: plan.description,
            created_at: plan.created_at,
            updated_at: plan.updated_at,
        },
        company_identity: identity_view,
        strategic_analysis: analysis_view,
        analysis_tools: tools_view,
        strategies: strategies_view,
        completion_status: completion,
        key_insights: insights,
        recommendations: recs,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_identity_view() -> CompanyIdentityView {
        CompanyIdentityView {
            mission: Some("Deliver value".to_string()),
            vision: Some("Lead the market".to_string()),
            values: vec![json!("integrity")],
            general_objectives: vec![json!("grow"), json!("retain")],
        }
    }

    #[test]
    fn test_insights_order_and_counts() {
        let identity = full_identity_view();
        let analysis = StrategicAnalysisView {
            internal_analysis: InternalAnalysisView {
                strengths: vec![json!("brand"), json!("team"), json!("cash")],
                weaknesses: vec![],
            },
            external_analysis: ExternalAnalysisView {
                opportunities: vec![json!("new market")],
                threats: vec![],
            },
            swot_summary: None,
        };
        let tools = AnalysisToolsView::default();
        let strategies = StrategiesView::default();

        let insights = key_insights(&identity, &analysis, &tools, &strategies);

        assert_eq!(insights.len(), 4);
        assert!(insights[0].contains("mission and vision"));
        assert!(insights[1].starts_with("2 general strategic objectives"));
        assert!(insights[2].starts_with("3 internal strengths"));
        assert!(insights[3].starts_with("1 opportunities"));
    }

    #[test]
    fn test_insights_game_matrix_counts_all_quadrants() {
        let strategies = StrategiesView {
            strategy_identification: vec![],
            game_matrix: GameMatrixView {
                growth_strategies: vec![json!("a"), json!("b")],
                avoid_strategies: vec![json!("c")],
                merge_strategies: vec![],
                exit_strategies: vec![json!("d")],
            },
            priority_strategies: vec![],
            implementation_timeline: Map::new(),
        };

        let insights = key_insights(
            &CompanyIdentityView::default(),
            &StrategicAnalysisView::default(),
            &AnalysisToolsView::default(),
            &strategies,
        );

        assert_eq!(insights.len(), 1);
        assert!(insights[0].starts_with("4 specific strategies"));
    }

    #[test]
    fn test_insights_porter_requires_all_five_forces() {
        let mut tools = AnalysisToolsView::default();
        tools.porter_five_forces = PorterFiveForcesView {
            competitive_rivalry: Some("high".to_string()),
            supplier_power: Some("low".to_string()),
            buyer_power: Some("medium".to_string()),
            threat_substitutes: Some("low".to_string()),
            threat_new_entrants: None,
        };

        let insights = key_insights(
            &CompanyIdentityView::default(),
            &StrategicAnalysisView::default(),
            &tools,
            &StrategiesView::default(),
        );
        assert!(insights.iter().all(|i| !i.contains("Porter")));

        tools.porter_five_forces.threat_new_entrants = Some("high".to_string());
        let insights = key_insights(
            &CompanyIdentityView::default(),
            &StrategicAnalysisView::default(),
            &tools,
            &StrategiesView::default(),
        );
        assert!(insights.iter().any(|i| i.contains("Porter")));
    }

    #[test]
    fn test_recommendations_empty_plan() {
        let recs = recommendations(
            0.0,
            &CompanyIdentityView::default(),
            &StrategicAnalysisView::default(),
            &AnalysisToolsView::default(),
            &StrategiesView::default(),
        );

        // Low completion, missing mission/vision/objectives, incomplete
        // competitive forces, missing priorities.
        assert_eq!(recs.len(), 6);
        assert!(recs[0].contains("at least 50%"));
        assert!(recs[1].contains("mission"));
        assert!(recs[2].contains("vision"));
        assert!(recs[3].contains("objectives"));
        assert!(recs[4].contains("competitive forces"));
        assert!(recs[5].contains("priority strategies"));
    }

    #[test]
    fn test_recommendations_thresholds() {
        let identity = full_identity_view();
        let recs = recommendations(
            50.0,
            &identity,
            &StrategicAnalysisView::default(),
            &AnalysisToolsView::default(),
            &StrategiesView::default(),
        );
        assert!(recs[0].contains("Continue completing"));

        let recs = recommendations(
            85.0,
            &identity,
            &StrategicAnalysisView::default(),
            &AnalysisToolsView::default(),
            &StrategiesView::default(),
        );
        assert!(recs.last().unwrap().contains("Review and validate"));
        assert!(recs.iter().all(|r| !r.contains("at least 50%")));
    }

    #[test]
    fn test_recommendations_swot_pairings() {
        let analysis = StrategicAnalysisView {
            internal_analysis: InternalAnalysisView {
                strengths: vec![json!("s")],
                weaknesses: vec![json!("w")],
            },
            external_analysis: ExternalAnalysisView {
                opportunities: vec![json!("o")],
                threats: vec![json!("t")],
            },
            swot_summary: None,
        };

        let recs = recommendations(
            75.0,
            &full_identity_view(),
            &analysis,
            &AnalysisToolsView::default(),
            &StrategiesView::default(),
        );

        assert!(recs.iter().any(|r| r.contains("leverage the identified strengths")));
        assert!(recs.iter().any(|r| r.contains("contingency plans")));
    }

    #[test]
    fn test_completion_status_skips_absent_sections() {
        let scores = SectionScores {
            company_identity: 33.0,
            strategic_analysis: 0.0,
            analysis_tools: 0.0,
            strategies: 0.0,
        };

        let status = completion_status(scores, true, false, false, false);

        assert!(status.company_identity.is_some());
        assert!(status.strategic_analysis.is_none());
        assert_eq!(status.overall.total_sections, 4);
        assert_eq!(status.overall.completed_sections, 0);
        assert_eq!(status.overall.percentage, 8.2);

        let json = serde_json::to_value(&status).unwrap();
        assert!(json.get("strategic_analysis").is_none());
        assert!(json.get("overall").is_some());
    }
}

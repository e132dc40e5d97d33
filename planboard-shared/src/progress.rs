/// Plan completion scoring
///
/// Derives a heuristic 0-100 completion score per section and an overall
/// percentage from which fields of the four section rows are filled in.
/// Each section maps to a fixed step table rather than a field count, so
/// partial credit follows a deliberate policy:
///
/// | Section            | 100                         | Partial tiers              |
/// |--------------------|-----------------------------|----------------------------|
/// | company_identity   | mission, vision, values     | 67 both m+v; 33 one        |
/// | strategic_analysis | internal and external side  | 50 one side                |
/// | analysis_tools     | value chain, Porter, PEST   | 75 two groups; 50 one      |
/// | strategies         | identification, GAME, prios | 67 two; 33 one             |
///
/// The same table feeds the executive summary, so both surfaces always
/// agree on what "complete" means.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::models::sections::{AnalysisTools, CompanyIdentity, Strategies, StrategicAnalysis};

/// Lifecycle status derived from the overall percentage
///
/// A plan with nothing filled in still reports "In development"; there is
/// no separate not-started state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanStatus {
    #[serde(rename = "Completed")]
    Completed,

    #[serde(rename = "In development")]
    InDevelopment,
}

impl PlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Completed => "Completed",
            PlanStatus::InDevelopment => "In development",
        }
    }
}

/// Per-section completion scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionScores {
    pub company_identity: f64,
    pub strategic_analysis: f64,
    pub analysis_tools: f64,
    pub strategies: f64,
}

impl SectionScores {
    /// Unweighted mean over exactly four sections, unrounded
    pub fn mean(&self) -> f64 {
        (self.company_identity + self.strategic_analysis + self.analysis_tools + self.strategies)
            / 4.0
    }

    /// Number of sections at full marks
    pub fn completed_count(&self) -> u32 {
        [
            self.company_identity,
            self.strategic_analysis,
            self.analysis_tools,
            self.strategies,
        ]
        .iter()
        .filter(|&&s| s >= 100.0)
        .count() as u32
    }
}

/// Overall plan progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanProgress {
    /// Mean of the four section scores, rounded to one decimal
    pub progress_percentage: f64,

    pub status: PlanStatus,

    pub sections: SectionScores,
}

fn present(value: Option<&str>) -> bool {
    value.is_some_and(|s| !s.is_empty())
}

fn present_trimmed(value: Option<&str>) -> bool {
    value.is_some_and(|s| !s.trim().is_empty())
}

/// Rounds to one decimal, ties to even
///
/// A mission-only plan has a mean of 8.25, which reports as 8.2.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// Scores the company identity section
///
/// Mission, vision, and values fields are trimmed before the presence
/// check, so whitespace-only text does not count.
pub fn score_company_identity(section: Option<&CompanyIdentity>) -> f64 {
    let Some(identity) = section else { return 0.0 };

    let has_mission = present_trimmed(identity.mission.as_deref());
    let has_vision = present_trimmed(identity.vision.as_deref());
    let has_values = present_trimmed(identity.core_values.as_deref());

    if has_mission && has_vision && has_values {
        100.0
    } else if has_mission && has_vision {
        67.0
    } else if has_mission || has_vision {
        33.0
    } else {
        0.0
    }
}

/// Scores the strategic analysis section
///
/// One internal field (strengths or weaknesses) and one external field
/// (opportunities or threats) each count for half. Presence is judged on
/// the raw stored text, so a stored `"[]"` still counts.
pub fn score_strategic_analysis(section: Option<&StrategicAnalysis>) -> f64 {
    let Some(analysis) = section else { return 0.0 };

    let has_internal = present(analysis.internal_strengths.as_deref())
        || present(analysis.internal_weaknesses.as_deref());
    let has_external = present(analysis.external_opportunities.as_deref())
        || present(analysis.external_threats.as_deref());

    if has_internal && has_external {
        100.0
    } else if has_internal || has_external {
        50.0
    } else {
        0.0
    }
}

/// Scores the analysis tools section
///
/// Three groups: value chain, Porter's five forces, PEST. Any filled field
/// within a group marks the whole group present.
pub fn score_analysis_tools(section: Option<&AnalysisTools>) -> f64 {
    let Some(tools) = section else { return 0.0 };

    let has_value_chain = present(tools.value_chain_primary.as_deref())
        || present(tools.value_chain_support.as_deref());
    let has_porter = present(tools.porter_competitive_rivalry.as_deref())
        || present(tools.porter_supplier_power.as_deref())
        || present(tools.porter_buyer_power.as_deref())
        || present(tools.porter_threat_substitutes.as_deref())
        || present(tools.porter_threat_new_entrants.as_deref());
    let has_pest = present(tools.pest_political.as_deref())
        || present(tools.pest_economic.as_deref())
        || present(tools.pest_social.as_deref())
        || present(tools.pest_technological.as_deref());

    let groups = [has_value_chain, has_porter, has_pest]
        .iter()
        .filter(|&&g| g)
        .count();

    match groups {
        3 => 100.0,
        2 => 75.0,
        1 => 50.0,
        _ => 0.0,
    }
}

/// Scores the strategies section
///
/// Three groups: identification, GAME matrix (any of growth, avoid, merge,
/// exit), and priority strategies.
pub fn score_strategies(section: Option<&Strategies>) -> f64 {
    let Some(strategies) = section else { return 0.0 };

    let has_identification = present(strategies.strategy_identification.as_deref());
    let has_game = present(strategies.game_growth.as_deref())
        || present(strategies.game_avoid.as_deref())
        || present(strategies.game_merge.as_deref())
        || present(strategies.game_exit.as_deref());
    let has_priorities = present(strategies.priority_strategies.as_deref());

    let groups = [has_identification, has_game, has_priorities]
        .iter()
        .filter(|&&g| g)
        .count();

    match groups {
        3 => 100.0,
        2 => 67.0,
        1 => 33.0,
        _ => 0.0,
    }
}

/// Scores all four sections at once
///
/// Pure over the section rows; both the progress endpoint and the
/// executive summary call this so they can never disagree.
pub fn score_sections(
    identity: Option<&CompanyIdentity>,
    analysis: Option<&StrategicAnalysis>,
    tools: Option<&AnalysisTools>,
    strategies: Option<&Strategies>,
) -> SectionScores {
    SectionScores {
        company_identity: score_company_identity(identity),
        strategic_analysis: score_strategic_analysis(analysis),
        analysis_tools: score_analysis_tools(tools),
        strategies: score_strategies(strategies),
    }
}

/// Derives overall progress from section scores
pub fn overall_progress(sections: SectionScores) -> PlanProgress {
    let percentage = round1(sections.mean());
    let status = if percentage >= 100.0 {
        PlanStatus::Completed
    } else {
        PlanStatus::InDevelopment
    };

    PlanProgress {
        progress_percentage: percentage,
        status,
        sections,
    }
}

/// Loads the four section rows and computes plan progress
///
/// Sections that were never created score 0, same as created-but-empty
/// rows.
pub async fn calculate(pool: &PgPool, plan_id: i64) -> Result<PlanProgress, sqlx::Error> {
    let identity = CompanyIdentity::find_by_plan(pool, plan_id).await?;
    let analysis = StrategicAnalysis::find_by_plan(pool, plan_id).await?;
    let tools = AnalysisTools::find_by_plan(pool, plan_id).await?;
    let strategies = Strategies::find_by_plan(pool, plan_id).await?;

    let sections = score_sections(
        identity.as_ref(),
        analysis.as_ref(),
        tools.as_ref(),
        strategies.as_ref(),
    );

    Ok(overall_progress(sections))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn empty_identity() -> CompanyIdentity {
        CompanyIdentity {
            id: 1,
            plan_id: 1,
            mission: None,
            vision: None,
            core_values: None,
            general_objectives: None,
            strategic_mission: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn empty_analysis() -> StrategicAnalysis {
        StrategicAnalysis {
            id: 1,
            plan_id: 1,
            internal_strengths: None,
            internal_weaknesses: None,
            external_opportunities: None,
            external_threats: None,
            swot_summary: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn empty_tools() -> AnalysisTools {
        AnalysisTools {
            id: 1,
            plan_id: 1,
            value_chain_primary: None,
            value_chain_support: None,
            participation_matrix: None,
            porter_competitive_rivalry: None,
            porter_supplier_power: None,
            porter_buyer_power: None,
            porter_threat_substitutes: None,
            porter_threat_new_entrants: None,
            pest_political: None,
            pest_economic: None,
            pest_social: None,
            pest_technological: None,
            bcg_matrix_data: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn empty_strategies() -> Strategies {
        Strategies {
            id: 1,
            plan_id: 1,
            strategy_identification: None,
            game_growth: None,
            game_avoid: None,
            game_merge: None,
            game_exit: None,
            priority_strategies: None,
            implementation_timeline: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_absent_sections_score_zero() {
        let scores = score_sections(None, None, None, None);
        assert_eq!(scores.company_identity, 0.0);
        assert_eq!(scores.strategic_analysis, 0.0);
        assert_eq!(scores.analysis_tools, 0.0);
        assert_eq!(scores.strategies, 0.0);
        assert_eq!(scores.mean(), 0.0);
    }

    #[test]
    fn test_empty_row_scores_like_absent_row() {
        assert_eq!(score_company_identity(Some(&empty_identity())), 0.0);
        assert_eq!(score_strategic_analysis(Some(&empty_analysis())), 0.0);
        assert_eq!(score_analysis_tools(Some(&empty_tools())), 0.0);
        assert_eq!(score_strategies(Some(&empty_strategies())), 0.0);
    }

    #[test]
    fn test_company_identity_tiers() {
        let mut identity = empty_identity();

        identity.mission = Some("Deliver value".to_string());
        assert_eq!(score_company_identity(Some(&identity)), 33.0);

        identity.vision = Some("Be the best".to_string());
        assert_eq!(score_company_identity(Some(&identity)), 67.0);

        identity.core_values = Some(r#"["integrity"]"#.to_string());
        assert_eq!(score_company_identity(Some(&identity)), 100.0);
    }

    #[test]
    fn test_company_identity_trims_whitespace() {
        let mut identity = empty_identity();
        identity.mission = Some("   ".to_string());
        assert_eq!(score_company_identity(Some(&identity)), 0.0);
    }

    #[test]
    fn test_strategic_analysis_tiers() {
        let mut analysis = empty_analysis();

        analysis.internal_weaknesses = Some(r#"["slow"]"#.to_string());
        assert_eq!(score_strategic_analysis(Some(&analysis)), 50.0);

        analysis.external_threats = Some(r#"["rivals"]"#.to_string());
        assert_eq!(score_strategic_analysis(Some(&analysis)), 100.0);
    }

    #[test]
    fn test_analysis_tools_tiers() {
        let mut tools = empty_tools();

        tools.pest_social = Some("aging population".to_string());
        assert_eq!(score_analysis_tools(Some(&tools)), 50.0);

        tools.porter_buyer_power = Some("high".to_string());
        assert_eq!(score_analysis_tools(Some(&tools)), 75.0);

        tools.value_chain_support = Some(r#"["hr"]"#.to_string());
        assert_eq!(score_analysis_tools(Some(&tools)), 100.0);
    }

    #[test]
    fn test_strategies_tiers() {
        let mut strategies = empty_strategies();

        strategies.game_exit = Some(r#"["divest"]"#.to_string());
        assert_eq!(score_strategies(Some(&strategies)), 33.0);

        strategies.priority_strategies = Some(r#"["focus"]"#.to_string());
        assert_eq!(score_strategies(Some(&strategies)), 67.0);

        strategies.strategy_identification = Some(r#"["grow"]"#.to_string());
        assert_eq!(score_strategies(Some(&strategies)), 100.0);
    }

    #[test]
    fn test_overall_mission_only() {
        // Only a mission set: identity 33, others 0, mean 8.25 rounds to 8.2.
        let mut identity = empty_identity();
        identity.mission = Some("X".to_string());

        let scores = score_sections(Some(&identity), None, None, None);
        let progress = overall_progress(scores);

        assert_eq!(progress.sections.company_identity, 33.0);
        assert_eq!(progress.progress_percentage, 8.2);
        assert_eq!(progress.status, PlanStatus::InDevelopment);
    }

    #[test]
    fn test_overall_completed() {
        let mut identity = empty_identity();
        identity.mission = Some("m".to_string());
        identity.vision = Some("v".to_string());
        identity.core_values = Some("[1]".to_string());

        let mut analysis = empty_analysis();
        analysis.internal_strengths = Some("[1]".to_string());
        analysis.external_threats = Some("[1]".to_string());

        let mut tools = empty_tools();
        tools.value_chain_primary = Some("[1]".to_string());
        tools.porter_supplier_power = Some("x".to_string());
        tools.pest_political = Some("x".to_string());

        let mut strategies = empty_strategies();
        strategies.strategy_identification = Some("[1]".to_string());
        strategies.game_growth = Some("[1]".to_string());
        strategies.priority_strategies = Some("[1]".to_string());

        let scores = score_sections(
            Some(&identity),
            Some(&analysis),
            Some(&tools),
            Some(&strategies),
        );
        let progress = overall_progress(scores);

        assert_eq!(progress.progress_percentage, 100.0);
        assert_eq!(progress.status, PlanStatus::Completed);
        assert_eq!(progress.sections.completed_count(), 4);
    }

    #[test]
    fn test_raw_json_empty_list_counts_as_present() {
        // Presence is judged on the stored text, so "[]" still counts.
        let mut analysis = empty_analysis();
        analysis.internal_strengths = Some("[]".to_string());
        assert_eq!(score_strategic_analysis(Some(&analysis)), 50.0);
    }

    #[test]
    fn test_round1() {
        // Ties round to the even tenth.
        assert_eq!(round1(8.25), 8.2);
        assert_eq!(round1(0.75), 0.8);
        assert_eq!(round1(66.666), 66.7);
        assert_eq!(round1(0.0), 0.0);
        assert_eq!(round1(100.0), 100.0);
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(PlanStatus::Completed.as_str(), "Completed");
        assert_eq!(PlanStatus::InDevelopment.as_str(), "In development");
        assert_eq!(
            serde_json::to_string(&PlanStatus::InDevelopment).unwrap(),
            r#""In development""#
        );
    }
}

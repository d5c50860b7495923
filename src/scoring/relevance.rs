use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use super::domain::{CandidateProfile, Importance, JobPosting, ScoringSettings};
use super::engine::{log_scored, CompositeEngine, EngineInfo, RuleInfo, ScoringEngine};
use super::explain::{render, Explanation};
use super::reason::AggregateScore;
use super::rules::{
    evaluate_isolated, BonusRule, CompanyRule, ExperienceRule, IndustryRule, Rule, ScoringContext,
    SkillsRule, TitleRule,
};

pub const DEFAULT_ENGINE_NAME: &str = "default_relevance";

/// Floor of the final total after the bonus layer.
pub const SCORE_FLOOR: f64 = 0.0;
/// Ceiling of the final total; bonuses may push a posting past the 100 base points.
pub const SCORE_CEILING: f64 = 120.0;

/// Stock engine: the five facet rules, the bonus layer and explanation rendering.
///
/// Importance tiers are resolved from settings on every call and reported through
/// [`RelevanceEngine::summary`]; they are not multiplied into the total.
pub struct RelevanceEngine {
    composite: CompositeEngine,
    bonus: BonusRule,
}

impl RelevanceEngine {
    pub fn new() -> Self {
        Self::with_name(DEFAULT_ENGINE_NAME)
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        let mut composite = CompositeEngine::new(name);
        composite.add_rule(TitleRule, Importance::High);
        composite.add_rule(SkillsRule, Importance::High);
        composite.add_rule(ExperienceRule, Importance::Medium);
        composite.add_rule(IndustryRule, Importance::Medium);
        composite.add_rule(CompanyRule, Importance::Low);
        info!(engine = %composite.name(), rules = composite.len(), "initialized relevance engine");

        Self {
            composite,
            bonus: BonusRule,
        }
    }

    pub fn composite(&self) -> &CompositeEngine {
        &self.composite
    }

    /// Mutable access for swapping facet rules before the engine is shared.
    pub fn composite_mut(&mut self) -> &mut CompositeEngine {
        &mut self.composite
    }

    pub fn explain(&self, score: &AggregateScore, mode: Explanation) -> String {
        render(score, mode)
    }

    /// Configuration view including what each facet would weigh if importance were applied.
    pub fn summary(&self, settings: &ScoringSettings) -> ScoringSummary {
        let importance = self.composite.resolve_importance(settings);
        let rules: Vec<WeightedRule> = self
            .composite
            .rule_infos(&importance)
            .into_iter()
            .map(|rule| WeightedRule {
                weighted_max: rule.max_score * rule.importance.multiplier(),
                rule,
            })
            .collect();

        ScoringSummary {
            engine_name: self.composite.name().to_string(),
            total_rules: rules.len(),
            base_max_score: rules.iter().map(|rule| rule.rule.max_score).sum(),
            weighted_max_score: rules.iter().map(|rule| rule.weighted_max).sum(),
            includes_bonus: true,
            bonus_max: self.bonus.max_score(),
            rules,
        }
    }
}

impl Default for RelevanceEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringEngine for RelevanceEngine {
    fn name(&self) -> &str {
        self.composite.name()
    }

    fn score_at(
        &self,
        job: &JobPosting,
        profile: &CandidateProfile,
        settings: &ScoringSettings,
        now: DateTime<Utc>,
    ) -> AggregateScore {
        let started = Instant::now();
        let importance = self.composite.resolve_importance(settings);
        let ctx = ScoringContext {
            job,
            profile,
            settings,
            importance: &importance,
            now,
        };

        let mut reasons = self.composite.evaluate_rules(&ctx);
        reasons.push(evaluate_isolated(&self.bonus, &ctx));

        let score = AggregateScore::from_reasons(job.id.as_str(), self.name(), reasons, now)
            .clamp_total(SCORE_FLOOR, SCORE_CEILING);
        log_scored(&score, started);
        score
    }

    fn info(&self) -> EngineInfo {
        let mut info = self.composite.info();
        info.total_max_score += self.bonus.max_score();
        info
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedRule {
    #[serde(flatten)]
    pub rule: RuleInfo,
    pub weighted_max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringSummary {
    pub engine_name: String,
    pub rules: Vec<WeightedRule>,
    pub total_rules: usize,
    pub base_max_score: f64,
    pub weighted_max_score: f64,
    pub includes_bonus: bool,
    pub bonus_max: f64,
}

use chrono::{DateTime, Utc};

use super::common::*;
use crate::scoring::domain::{CandidateProfile, Importance, JobPosting, ScoringSettings};
use crate::scoring::engine::{CompositeEngine, EngineInfo, ScoringEngine};
use crate::scoring::reason::{AggregateScore, Category};
use crate::scoring::rules::{RuleKind, SkillsRule, TitleRule};

fn composite() -> CompositeEngine {
    let mut engine = CompositeEngine::new("composite");
    engine.add_rule(TitleRule, Importance::High);
    engine.add_rule(FailingRule, Importance::Low);
    engine.add_rule(SkillsRule, Importance::High);
    engine
}

#[test]
fn failing_rule_is_isolated() {
    let score = composite().score_at(&ideal_job(), &profile(), &settings(), now());

    let reasons = score.scoring_reasons();
    assert_eq!(reasons.len(), 3);
    assert_eq!(reasons[1].category(), &Category::Custom("failing".to_string()));
    assert_eq!(reasons[1].points(), 0.0);
    assert_eq!(reasons[1].explanation(), "Failing scoring failed");
    assert!(reasons[1]
        .detail("error")
        .and_then(|value| value.as_str())
        .is_some_and(|error| error.contains("upstream lookup unavailable")));

    assert_eq!(score.total_score(), 52.0);
    assert_eq!(score.max_possible_score(), 60.0);
}

#[test]
fn category_labels_are_title_cased() {
    assert_eq!(Category::Bonus.label(), "Bonus");
    assert_eq!(Category::Custom("my_rule".to_string()).label(), "My_Rule");
    assert_eq!(Category::Custom("remote-first fit".to_string()).label(), "Remote-First Fit");
}

#[test]
fn panicking_rule_is_isolated() {
    let mut engine = CompositeEngine::new("panicky");
    engine.add_rule(PanickingRule, Importance::Low);
    engine.add_rule(TitleRule, Importance::High);

    let score = engine.score_at(&ideal_job(), &profile(), &settings(), now());
    assert_eq!(score.total_score(), 30.0);
    let failed = &score.scoring_reasons()[0];
    assert_eq!(failed.points(), 0.0);
    assert_eq!(failed.explanation(), "Panicking scoring failed");
    assert!(failed
        .detail("error")
        .and_then(|value| value.as_str())
        .is_some_and(|error| error.contains("index out of range")));
}

#[test]
fn empty_engine_scores_zero() {
    let engine = CompositeEngine::new("empty");
    let score = engine.score_at(&ideal_job(), &profile(), &settings(), now());
    assert!(engine.is_empty());
    assert_eq!(score.total_score(), 0.0);
    assert_eq!(score.percentage(), 0.0);
    assert!(score.scoring_reasons().is_empty());
}

#[test]
fn add_rule_replaces_same_kind() {
    let mut engine = composite();
    engine.add_rule(FixedRule(4.0), Importance::Low);
    engine.add_rule(FixedRule(7.0), Importance::Medium);

    assert_eq!(engine.len(), 4);
    let score = engine.score_at(&ideal_job(), &profile(), &settings(), now());
    assert_eq!(score.reason(&Category::Custom("fixed".to_string())).map(|r| r.points()), Some(7.0));
}

#[test]
fn remove_rule_by_kind() {
    let mut engine = composite();
    assert!(engine.remove_rule(RuleKind::Custom("failing")));
    assert!(!engine.remove_rule(RuleKind::Custom("failing")));
    assert_eq!(engine.rule_kinds(), vec![RuleKind::Title, RuleKind::Skills]);
    assert!(engine.rule(RuleKind::Title).is_some());
    assert!(engine.rule(RuleKind::Company).is_none());
}

#[test]
fn settings_override_default_importance() {
    let engine = composite();
    let mut settings = settings();
    settings.importance.title = Importance::Low;

    let resolved = engine.resolve_importance(&settings);
    assert_eq!(resolved.get(RuleKind::Title), Some(Importance::Low));
    assert_eq!(resolved.get(RuleKind::Skills), Some(Importance::High));
    assert_eq!(resolved.get(RuleKind::Custom("failing")), Some(Importance::Low));
    assert_eq!(resolved.get(RuleKind::Company), None);

    let tiers: Vec<(RuleKind, Importance)> = resolved.iter().collect();
    assert_eq!(
        tiers,
        vec![
            (RuleKind::Title, Importance::Low),
            (RuleKind::Skills, Importance::High),
            (RuleKind::Custom("failing"), Importance::Low),
        ]
    );
}

#[test]
fn importance_does_not_change_points() {
    let engine = composite();
    let mut low = settings();
    low.importance.title = Importance::Low;
    low.importance.skills = Importance::Low;

    let baseline = engine.score_at(&ideal_job(), &profile(), &settings(), now());
    let lowered = engine.score_at(&ideal_job(), &profile(), &low, now());
    assert_eq!(baseline.total_score(), lowered.total_score());
}

#[test]
fn info_lists_rules_in_order() {
    let info = composite().info();
    assert_eq!(info.name, "composite");
    assert_eq!(info.rule_count, 3);
    assert_eq!(info.total_max_score, 60.0);
    assert_eq!(info.rules[0].kind, RuleKind::Title);
    assert_eq!(info.rules[1].importance, Importance::Low);
}

struct ExplodingEngine;

impl ScoringEngine for ExplodingEngine {
    fn name(&self) -> &str {
        "exploding"
    }

    fn score_at(
        &self,
        job: &JobPosting,
        _profile: &CandidateProfile,
        _settings: &ScoringSettings,
        now: DateTime<Utc>,
    ) -> AggregateScore {
        if job.id == "boom" {
            panic!("malformed posting");
        }
        AggregateScore::from_reasons(job.id.as_str(), self.name(), Vec::new(), now)
    }

    fn info(&self) -> EngineInfo {
        EngineInfo {
            name: self.name().to_string(),
            rules: Vec::new(),
            total_max_score: 0.0,
            rule_count: 0,
        }
    }
}

fn batch() -> Vec<JobPosting> {
    let mut boom = ideal_job();
    boom.id = "boom".to_string();
    vec![job_at("Northwind"), boom, job_at("Globex")]
}

#[test]
fn score_many_traps_failed_jobs() {
    let scores = ExplodingEngine.score_many(&batch(), &profile(), &settings());

    assert_eq!(scores.len(), 3);
    let ids: Vec<&str> = scores.iter().map(AggregateScore::job_id).collect();
    assert_eq!(ids, vec!["job-northwind", "boom", "job-globex"]);

    let failed = &scores[1];
    assert_eq!(failed.total_score(), 0.0);
    assert_eq!(failed.max_possible_score(), 100.0);
    let reason = &failed.scoring_reasons()[0];
    assert_eq!(reason.category(), &Category::Error);
    assert_eq!(reason.explanation(), "Scoring failed due to error");
    assert_eq!(
        reason.detail("error").and_then(|value| value.as_str()),
        Some("malformed posting")
    );
}

#[test]
fn parallel_batch_matches_sequential_order() {
    let jobs = batch();
    let sequential = ExplodingEngine.score_many(&jobs, &profile(), &settings());
    let parallel = ExplodingEngine.score_many_parallel(&jobs, &profile(), &settings());

    let ids = |scores: &Vec<AggregateScore>| -> Vec<String> {
        scores.iter().map(|score| score.job_id().to_string()).collect()
    };
    assert_eq!(ids(&sequential), ids(&parallel));
    assert_eq!(parallel[1].grade(), sequential[1].grade());
}

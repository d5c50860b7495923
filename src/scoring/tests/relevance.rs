use super::common::*;
use crate::scoring::domain::Importance;
use crate::scoring::engine::ScoringEngine;
use crate::scoring::explain::Explanation;
use crate::scoring::reason::{Category, Grade};
use crate::scoring::relevance::{RelevanceEngine, DEFAULT_ENGINE_NAME};
use crate::scoring::rules::RuleKind;

#[test]
fn ideal_posting_earns_an_a() {
    let engine = RelevanceEngine::new();
    let score = engine.score_at(&ideal_job(), &profile(), &settings(), now());

    assert_eq!(score.engine(), DEFAULT_ENGINE_NAME);
    assert_eq!(score.job_id(), "job-ideal");
    assert_eq!(score.scoring_reasons().len(), 6);
    assert_eq!(score.total_score(), 110.0);
    assert_eq!(score.max_possible_score(), 110.0);
    assert!(score.percentage() >= 90.0);
    assert_eq!(score.grade(), Grade::A);
    assert!(score.meets_threshold(&settings()));
}

#[test]
fn reasons_follow_rule_order_with_bonus_last() {
    let score = RelevanceEngine::new().score_at(&ideal_job(), &profile(), &settings(), now());
    let categories: Vec<&Category> = score
        .scoring_reasons()
        .iter()
        .map(|reason| reason.category())
        .collect();
    assert_eq!(
        categories,
        vec![
            &Category::Title,
            &Category::Skills,
            &Category::Experience,
            &Category::Industry,
            &Category::Company,
            &Category::Bonus,
        ]
    );
}

#[test]
fn avoided_title_zeroes_title_facet() {
    let mut job = ideal_job();
    job.title = "Marketing Manager".to_string();
    let score = RelevanceEngine::new().score_at(&job, &profile(), &settings(), now());

    let title = score.reason(&Category::Title).expect("title reason");
    assert_eq!(title.points(), 0.0);
    assert!(title.explanation().contains("Marketing Manager"));
}

#[test]
fn avoided_company_costs_exactly_twenty_points() {
    let engine = RelevanceEngine::new();
    let neutral = engine.score_at(&job_at("Northwind Labs"), &profile(), &settings(), now());
    let avoided = engine.score_at(&job_at("Meta"), &profile(), &settings(), now());

    assert_eq!(neutral.total_score(), 100.0);
    assert_eq!(neutral.total_score() - avoided.total_score(), 20.0);
}

#[test]
fn total_is_clamped_at_floor() {
    let mut job = bare_job(
        "Marketing Manager",
        "Requires 12 years of experience in gambling.",
    );
    job.company = "Meta Staffing".to_string();
    let score = RelevanceEngine::new().score_at(&job, &profile(), &settings(), now());

    let raw: f64 = score.scoring_reasons().iter().map(|reason| reason.points()).sum();
    assert_eq!(raw, -45.0);
    assert_eq!(score.total_score(), 0.0);
    assert_eq!(score.grade(), Grade::F);
    assert!(!score.meets_threshold(&settings()));
}

#[test]
fn total_is_clamped_at_ceiling() {
    let mut engine = RelevanceEngine::new();
    engine.composite_mut().add_rule(FixedRule(30.0), Importance::Low);
    let score = engine.score_at(&ideal_job(), &profile(), &settings(), now());

    assert_eq!(score.total_score(), 120.0);
    assert_eq!(score.percentage(), 100.0);
}

#[test]
fn failing_custom_rule_does_not_sink_the_score() {
    let mut engine = RelevanceEngine::with_name("guarded");
    engine.composite_mut().add_rule(FailingRule, Importance::Low);
    let score = engine.score_at(&ideal_job(), &profile(), &settings(), now());

    assert_eq!(score.engine(), "guarded");
    assert_eq!(score.total_score(), 110.0);
    assert_eq!(score.scoring_reasons().len(), 7);
}

#[test]
fn scoring_is_deterministic() {
    let engine = RelevanceEngine::new();
    let first = engine.score_at(&ideal_job(), &profile(), &settings(), now());
    let second = engine.score_at(&ideal_job(), &profile(), &settings(), now());
    assert_eq!(first, second);
}

#[test]
fn summary_rendering_lists_top_matches() {
    let engine = RelevanceEngine::new();
    let score = engine.score_at(&ideal_job(), &profile(), &settings(), now());
    let text = engine.explain(&score, Explanation::Summary);

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Job Score: 100% (110.0/110.0 points)");
    assert_eq!(lines[1], "Grade: A");
    assert_eq!(lines[3], "Top Matches:");
    assert_eq!(
        lines[4],
        "   • Perfect title match: 'Senior Product Manager' (+30 pts)"
    );
    assert_eq!(lines.len(), 7);
    assert!(!text.contains("Concerns:"));
}

#[test]
fn detailed_rendering_marks_penalties() {
    let engine = RelevanceEngine::new();
    let score = engine.score_at(&job_at("Meta"), &profile(), &settings(), now());
    let text = engine.explain(&score, Explanation::Detailed);

    assert!(text.contains("Detailed Breakdown:"));
    assert!(text.contains("   [+] Title: +30.0 pts - Perfect title match: 'Senior Product Manager'"));
    assert!(text.contains("   [-] Company: -20.0 pts - Avoided company: Meta"));
    assert!(text.trim_end().ends_with("Avoided company: Meta"));
}

#[test]
fn summary_rendering_lists_concerns() {
    let engine = RelevanceEngine::new();
    let score = engine.score_at(&job_at("Meta"), &profile(), &settings(), now());
    let text = engine.explain(&score, Explanation::Summary);

    assert!(text.contains("Concerns:\n   • Avoided company: Meta (-20 pts)"));
}

#[test]
fn explanation_text_and_top_reasons() {
    let score = RelevanceEngine::new().score_at(&ideal_job(), &profile(), &settings(), now());

    let top: Vec<&Category> = score
        .top_reasons(2)
        .into_iter()
        .map(|reason| reason.category())
        .collect();
    assert_eq!(top, vec![&Category::Title, &Category::Skills]);

    let text = score.explanation_text(3);
    assert!(text.starts_with("Score: 100%\n"));
    assert_eq!(text.lines().count(), 4);
}

#[test]
fn summary_reports_weighted_maxima() {
    let mut settings = settings();
    settings.importance.company = Importance::High;
    let summary = RelevanceEngine::new().summary(&settings);

    assert_eq!(summary.total_rules, 5);
    assert_eq!(summary.base_max_score, 100.0);
    assert_eq!(summary.weighted_max_score, 182.5);
    assert_eq!(summary.bonus_max, 10.0);
    assert!(summary.includes_bonus);

    let company = summary
        .rules
        .iter()
        .find(|rule| rule.rule.kind == RuleKind::Company)
        .expect("company rule");
    assert_eq!(company.rule.importance, Importance::High);
    assert_eq!(company.weighted_max, 20.0);
}

#[test]
fn aggregate_serializes_with_category_names() {
    let score = RelevanceEngine::new().score_at(&ideal_job(), &profile(), &settings(), now());
    let value = serde_json::to_value(&score).expect("serializes");

    assert_eq!(value["job_id"], "job-ideal");
    assert_eq!(value["scoring_reasons"][0]["category"], "title");
    assert_eq!(value["scoring_reasons"][5]["category"], "bonus");
    assert_eq!(value["total_score"], 110.0);
}

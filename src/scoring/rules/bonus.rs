use std::sync::OnceLock;

use chrono::Duration;
use regex::Regex;
use serde_json::json;

use super::text::contains_any;
use super::{Rule, RuleError, RuleKind, ScoringContext};
use crate::scoring::domain::{CandidateProfile, Importance};
use crate::scoring::reason::ScoringReason;

/// Nominal ceiling for display. The summed deltas are not capped here.
const REPORTED_MAX: f64 = 10.0;

const REMOTE_BONUS: f64 = 5.0;
const SALARY_TARGET_BONUS: f64 = 3.0;
const SALARY_MINIMUM_BONUS: f64 = 1.0;
const RECENT_BONUS: f64 = 2.0;
const SOURCE_BONUS: f64 = 1.0;
const BRIEF_DESCRIPTION_PENALTY: f64 = -5.0;
const NO_SALARY_PENALTY: f64 = -2.0;
const RECRUITER_PENALTY: f64 = -3.0;

const MIN_DESCRIPTION_CHARS: usize = 200;

const REMOTE_INDICATORS: &[&str] = &["remote", "work from home", "wfh", "distributed", "anywhere"];
const EQUITY_INDICATORS: &[&str] = &["equity", "stock options", "rsu", "ownership", "shares"];
const HIGH_PRIORITY_SOURCES: &[&str] = &["linkedin", "company_direct"];
const VAGUE_SALARY_PHRASES: &[&str] = &["competitive", "market rate", "based on experience"];
const RECRUITER_INDICATORS: &[&str] = &["recruiting", "staffing", "headhunter", "talent acquisition"];

static SALARY_NUMBER: OnceLock<Option<Regex>> = OnceLock::new();

/// Always-run adjustment layer for signals that are not a facet of their own.
#[derive(Debug, Clone, Copy, Default)]
pub struct BonusRule;

impl Rule for BonusRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Bonus
    }

    fn max_score(&self) -> f64 {
        REPORTED_MAX
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Result<ScoringReason, RuleError> {
        let job = ctx.job;
        let profile = ctx.profile;
        let text = job.title_and_description();

        let mut total = 0.0;
        let mut bonuses = Vec::new();
        let mut penalties = Vec::new();

        if profile.remote_preference.wants_remote() {
            let location = job.location.to_lowercase();
            if contains_any(&text, REMOTE_INDICATORS) || contains_any(&location, REMOTE_INDICATORS)
            {
                total += REMOTE_BONUS;
                bonuses.push(format!("Remote work available (+{REMOTE_BONUS:.0})"));
            }
        }

        if let Some(salary) = job.salary_range.as_deref() {
            let salary_bonus = salary_bonus(salary, profile);
            if salary_bonus > 0.0 {
                total += salary_bonus;
                bonuses.push(format!("Competitive salary (+{salary_bonus:.0})"));
            }
        }

        if contains_any(&text, EQUITY_INDICATORS) {
            let equity_bonus = match profile.equity_importance {
                Importance::High => 2.0,
                Importance::Medium => 1.0,
                Importance::Low => 0.0,
            };
            if equity_bonus > 0.0 {
                total += equity_bonus;
                bonuses.push(format!("Equity mentioned (+{equity_bonus:.0})"));
            }
        }

        if let Some(posted_at) = job.posted_at {
            if ctx.now.signed_duration_since(posted_at) < Duration::hours(24) {
                total += RECENT_BONUS;
                bonuses.push(format!("Recently posted (+{RECENT_BONUS:.0})"));
            }
        }

        let source = job.source.trim().to_lowercase();
        if HIGH_PRIORITY_SOURCES.contains(&source.as_str()) {
            total += SOURCE_BONUS;
            bonuses.push(format!("High-priority source (+{SOURCE_BONUS:.0})"));
        }

        if job.description.chars().count() < MIN_DESCRIPTION_CHARS {
            total += BRIEF_DESCRIPTION_PENALTY;
            penalties.push(format!("Brief job description ({BRIEF_DESCRIPTION_PENALTY:.0})"));
        }

        let has_salary = job
            .salary_range
            .as_deref()
            .is_some_and(|salary| !salary.trim().is_empty());
        if !has_salary && !contains_any(&text, VAGUE_SALARY_PHRASES) {
            total += NO_SALARY_PENALTY;
            penalties.push(format!("No salary information ({NO_SALARY_PENALTY:.0})"));
        }

        if contains_any(&job.company.to_lowercase(), RECRUITER_INDICATORS) {
            total += RECRUITER_PENALTY;
            penalties.push(format!("Third-party recruiter ({RECRUITER_PENALTY:.0})"));
        }

        let adjustments: Vec<&String> = bonuses.iter().chain(&penalties).collect();
        let explanation = if adjustments.is_empty() {
            "No bonus factors applied".to_string()
        } else {
            let joined: Vec<&str> = adjustments.iter().map(|item| item.as_str()).collect();
            format!("Bonus factors: {}", joined.join("; "))
        };
        let adjustment_count = adjustments.len();

        Ok(
            ScoringReason::new(self.kind().category(), total, REPORTED_MAX, explanation)
                .with_detail("total_adjustments", adjustment_count)
                .with_detail("bonus_reasons", json!(bonuses))
                .with_detail("penalty_reasons", json!(penalties)),
        )
    }
}

fn salary_bonus(salary_range: &str, profile: &CandidateProfile) -> f64 {
    match max_salary(salary_range) {
        Some(max) if max >= profile.target_total_comp => SALARY_TARGET_BONUS,
        Some(max) if max >= profile.minimum_base_salary => SALARY_MINIMUM_BONUS,
        _ => 0.0,
    }
}

/// Largest figure in a free-form salary string. `k` expands to thousands and bare
/// numbers under 1000 are read as thousands ("120-150").
pub(crate) fn max_salary(salary_range: &str) -> Option<u64> {
    let pattern = SALARY_NUMBER
        .get_or_init(|| Regex::new(r"[\d,]+").ok())
        .as_ref()?;
    let expanded = salary_range.to_lowercase().replace('k', "000");

    pattern
        .find_iter(&expanded)
        .filter_map(|token| token.as_str().replace(',', "").parse::<u64>().ok())
        .map(|value| if value < 1000 { value * 1000 } else { value })
        .max()
}

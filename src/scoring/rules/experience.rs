use std::sync::OnceLock;

use regex::Regex;

use super::{Rule, RuleError, RuleKind, ScoringContext};
use crate::scoring::domain::Seniority;
use crate::scoring::reason::ScoringReason;

const MAX_SCORE: f64 = 20.0;
const NO_REQUIREMENT: f64 = 15.0;
const UNRECOGNIZED_LEVEL: f64 = 10.0;

static YEARS_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
static LEVEL_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

fn years_patterns() -> &'static [Regex] {
    YEARS_PATTERNS.get_or_init(|| {
        compile(&[
            r"(\d+)\+?\s*years?\s+(?:of\s+)?experience",
            r"(\d+)\+?\s*years?\s+(?:of\s+)?pm\s+experience",
            r"(\d+)\+?\s*years?\s+product\s+management",
            r"minimum\s+(\d+)\s+years?",
            r"at\s+least\s+(\d+)\s+years?",
        ])
    })
}

fn level_patterns() -> &'static [Regex] {
    LEVEL_PATTERNS.get_or_init(|| {
        compile(&[
            r"\b(junior|entry.?level)\b",
            r"\b(mid.?level|mid)\b",
            r"\b(senior)\b",
            r"\b(principal|staff)\b",
            r"\b(director|lead)\b",
        ])
    })
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
}

/// What the posting asks for, in priority order: explicit years beat seniority words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Requirement {
    Years(u32),
    Level(String),
}

pub(crate) fn extract_requirement(text: &str) -> Option<Requirement> {
    let years = years_patterns().iter().find_map(|pattern| {
        pattern
            .captures(text)
            .and_then(|captures| captures.get(1))
            .and_then(|years| years.as_str().parse::<u32>().ok())
    });
    if let Some(years) = years {
        return Some(Requirement::Years(years));
    }

    level_patterns().iter().find_map(|pattern| {
        pattern
            .captures(text)
            .and_then(|captures| captures.get(1))
            .map(|level| {
                Requirement::Level(
                    level
                        .as_str()
                        .replace("-level", "")
                        .replace("_level", ""),
                )
            })
    })
}

/// Compares the posting's experience requirement with the candidate's years and seniority.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExperienceRule;

impl ExperienceRule {
    fn by_years(&self, have: u32, required: u32) -> ScoringReason {
        let (points, explanation) = if required <= have {
            (MAX_SCORE, format!("You have {have} years, {required} required"))
        } else if required == have.saturating_add(1) {
            (
                15.0,
                format!("Slightly more experience preferred ({required} vs {have} years)"),
            )
        } else if required == have.saturating_add(2) {
            (
                10.0,
                format!("More experience preferred ({required} vs {have} years)"),
            )
        } else {
            (
                0.0,
                format!("Significantly more experience required ({required} vs {have} years)"),
            )
        };

        ScoringReason::new(self.kind().category(), points, MAX_SCORE, explanation)
            .with_detail("user_years", have)
            .with_detail("required_years", required)
            .with_detail("experience_gap", i64::from(required) - i64::from(have))
    }

    fn by_level(&self, have: Seniority, keyword: &str) -> ScoringReason {
        let Some(required) = Seniority::from_keyword(keyword) else {
            return ScoringReason::new(
                self.kind().category(),
                UNRECOGNIZED_LEVEL,
                MAX_SCORE,
                "Experience requirement unclear",
            )
            .with_detail("extracted_requirement", keyword);
        };

        let gap = required.rank() - have.rank();
        let (points, explanation) = if gap <= 0 {
            (
                MAX_SCORE,
                format!("Your {have} level meets {required} requirement"),
            )
        } else if gap == 1 {
            (15.0, format!("Close match: {have} level for {required} role"))
        } else {
            (5.0, format!("Seniority gap: {have} level for {required} role"))
        };

        ScoringReason::new(self.kind().category(), points, MAX_SCORE, explanation)
            .with_detail("user_seniority", have.label())
            .with_detail("required_seniority", required.label())
            .with_detail("seniority_gap", gap)
    }
}

impl Rule for ExperienceRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Experience
    }

    fn max_score(&self) -> f64 {
        MAX_SCORE
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Result<ScoringReason, RuleError> {
        let profile = ctx.profile;
        let reason = match extract_requirement(&ctx.job.title_and_description()) {
            Some(Requirement::Years(required)) => {
                self.by_years(profile.years_of_experience, required)
            }
            Some(Requirement::Level(keyword)) => self.by_level(profile.seniority, &keyword),
            None => ScoringReason::new(
                self.kind().category(),
                NO_REQUIREMENT,
                MAX_SCORE,
                "No specific experience requirement mentioned",
            )
            .with_detail("user_years", profile.years_of_experience),
        };

        Ok(reason)
    }
}

use super::text::{contains_any, lookup};
use super::{Rule, RuleError, RuleKind, ScoringContext};
use crate::scoring::domain::CandidateProfile;
use crate::scoring::reason::ScoringReason;

const MAX_SCORE: f64 = 10.0;
const AVOID_PENALTY: f64 = -20.0;
const STAGE_POINTS: f64 = 3.0;
const SIZE_POINTS: f64 = 2.0;
const ATTRIBUTE_CAP: f64 = 5.0;

const STAGE_KEYWORDS: &[(&str, &[&str])] = &[
    ("startup", &["startup", "early stage", "seed", "series a"]),
    ("growth", &["growth stage", "series b", "series c", "scaling"]),
    ("enterprise", &["enterprise", "established", "fortune"]),
    (
        "public",
        &["public company", "publicly traded", "nasdaq", "nyse"],
    ),
];

const SIZE_KEYWORDS: &[(&str, &[&str])] = &[
    ("1-10", &["small team", "startup", "< 10"]),
    ("11-50", &["small company", "team of"]),
    ("51-200", &["growing company", "medium size"]),
    ("201-500", &["established company", "hundreds"]),
    ("501-1000", &["large company", "enterprise"]),
    ("1000+", &["large enterprise", "thousands", "fortune"]),
];

/// Employer fit from explicit company lists, then stage and size signals.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompanyRule;

impl Rule for CompanyRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Company
    }

    fn max_score(&self) -> f64 {
        MAX_SCORE
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Result<ScoringReason, RuleError> {
        let profile = ctx.profile;
        let job = ctx.job;
        let company = job.company.to_lowercase();
        let listed = |names: &[String]| {
            names
                .iter()
                .find(|name| !name.trim().is_empty() && company.contains(&name.to_lowercase()))
                .cloned()
        };

        if let Some(avoided) = listed(&profile.avoid_companies) {
            return Ok(ScoringReason::new(
                self.kind().category(),
                AVOID_PENALTY,
                MAX_SCORE,
                format!("Avoided company: {avoided}"),
            )
            .with_detail("matched_avoid_company", avoided));
        }

        if let Some(preferred) = listed(&profile.preferred_companies) {
            return Ok(ScoringReason::new(
                self.kind().category(),
                MAX_SCORE,
                MAX_SCORE,
                format!("Preferred company: {preferred}"),
            )
            .with_detail("matched_company", preferred));
        }

        let text = format!("{} {}", job.description, job.company).to_lowercase();
        let attribute_score = attribute_score(&text, profile);
        if attribute_score > 0.0 {
            return Ok(ScoringReason::new(
                self.kind().category(),
                attribute_score,
                MAX_SCORE,
                "Company attributes match preferences",
            )
            .with_detail("attribute_score", attribute_score));
        }

        Ok(ScoringReason::new(
            self.kind().category(),
            0.0,
            MAX_SCORE,
            "No company preference match",
        )
        .with_detail("company", job.company.as_str()))
    }
}

/// Stage and size signals; only the first matching preference of each kind counts.
pub(crate) fn attribute_score(text: &str, profile: &CandidateProfile) -> f64 {
    let matches_any = |preferences: &[String], table: &[(&'static str, &'static [&'static str])]| {
        preferences.iter().any(|preference| {
            lookup(table, &preference.trim().to_lowercase())
                .is_some_and(|keywords| contains_any(text, keywords))
        })
    };

    let mut score = 0.0;
    if matches_any(&profile.company_stages, STAGE_KEYWORDS) {
        score += STAGE_POINTS;
    }
    if matches_any(&profile.company_sizes, SIZE_KEYWORDS) {
        score += SIZE_POINTS;
    }
    f64::min(score, ATTRIBUTE_CAP)
}

use super::text::{contains_any, lookup};
use super::{Rule, RuleError, RuleKind, ScoringContext};
use crate::scoring::reason::ScoringReason;

const MAX_SCORE: f64 = 15.0;
const AVOID_PENALTY: f64 = -15.0;
const INTERESTED_POINTS: f64 = 8.0;

const INDUSTRY_SYNONYMS: &[(&str, &[&str])] = &[
    (
        "fintech",
        &["financial technology", "finance", "banking", "payments", "crypto"],
    ),
    (
        "healthtech",
        &["healthcare", "health", "medical", "biotech", "pharma"],
    ),
    (
        "edtech",
        &["education technology", "learning", "e-learning", "educational"],
    ),
    (
        "saas",
        &["software as a service", "cloud software", "enterprise software"],
    ),
    ("e-commerce", &["ecommerce", "retail", "marketplace", "shopping"]),
    ("social", &["social media", "social network", "community"]),
    ("gaming", &["games", "gaming", "entertainment", "esports"]),
    (
        "mobility",
        &["transportation", "automotive", "rideshare", "logistics"],
    ),
];

/// Sector fit: avoided sectors carry a penalty, preferred ones a bonus.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndustryRule;

impl Rule for IndustryRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Industry
    }

    fn max_score(&self) -> f64 {
        MAX_SCORE
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Result<ScoringReason, RuleError> {
        let profile = ctx.profile;
        let job = ctx.job;
        let text = format!("{} {} {}", job.title, job.description, job.company).to_lowercase();
        let tag = job.industry.as_deref();
        let first_match = |industries: &[String]| {
            industries
                .iter()
                .find(|industry| industry_mentioned(industry, &text, tag))
                .cloned()
        };

        if let Some(avoided) = first_match(&profile.avoid_industries) {
            return Ok(ScoringReason::new(
                self.kind().category(),
                AVOID_PENALTY,
                MAX_SCORE,
                format!("Avoided industry: {avoided}"),
            )
            .with_detail("matched_avoid_industry", avoided));
        }

        let preferred = first_match(&profile.primary_industries)
            .map(|industry| (industry, MAX_SCORE, "primary", "Primary industry match"))
            .or_else(|| {
                first_match(&profile.interested_industries).map(|industry| {
                    (industry, INTERESTED_POINTS, "interested", "Interested industry")
                })
            });

        if let Some((industry, points, match_type, label)) = preferred {
            return Ok(ScoringReason::new(
                self.kind().category(),
                points,
                MAX_SCORE,
                format!("{label}: {industry}"),
            )
            .with_detail("matched_industry", industry)
            .with_detail("match_type", match_type));
        }

        let reason = ScoringReason::new(
            self.kind().category(),
            0.0,
            MAX_SCORE,
            "No industry preference match",
        );
        Ok(match tag {
            Some(tag) => reason.with_detail("detected_industry", tag),
            None => reason,
        })
    }
}

/// Tag equality, a mention in the posting text, or one of the sector's keywords.
pub(crate) fn industry_mentioned(industry: &str, text: &str, tag: Option<&str>) -> bool {
    let industry = industry.trim().to_lowercase();
    if industry.is_empty() {
        return false;
    }

    if tag.is_some_and(|tag| tag.trim().to_lowercase() == industry) {
        return true;
    }

    if text.contains(&industry) {
        return true;
    }

    lookup(INDUSTRY_SYNONYMS, &industry).is_some_and(|keywords| contains_any(text, keywords))
}

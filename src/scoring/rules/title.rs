use std::collections::BTreeSet;

use serde_json::json;

use super::text::{normalize, similarity};
use super::{Rule, RuleError, RuleKind, ScoringContext};
use crate::scoring::reason::ScoringReason;

const MAX_SCORE: f64 = 30.0;
const SECONDARY_EXACT: f64 = 25.0;
const PRIMARY_CLOSE: f64 = 20.0;
const SECONDARY_CLOSE: f64 = 15.0;
const KEYWORD_POINTS: f64 = 3.0;
const KEYWORD_CAP: f64 = 10.0;
const SIMILARITY_THRESHOLD: f64 = 0.70;

const BASE_KEYWORDS: &[&str] = &["product", "manager", "pm", "lead", "owner"];
const STOP_WORDS: &[&str] = &["the", "and", "or", "of", "in", "at", "to", "for", "a", "an"];

/// Scores how closely the posting title matches the candidate's target titles.
#[derive(Debug, Clone, Copy, Default)]
pub struct TitleRule;

impl Rule for TitleRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Title
    }

    fn max_score(&self) -> f64 {
        MAX_SCORE
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Result<ScoringReason, RuleError> {
        let profile = ctx.profile;
        let job_title = ctx.job.title.trim().to_lowercase();
        let normalized_title = normalize(&job_title);
        let reason = |points: f64, explanation: String| {
            ScoringReason::new(self.kind().category(), points, MAX_SCORE, explanation)
        };

        if let Some(avoided) = profile
            .avoid_titles
            .iter()
            .find(|avoid| !avoid.trim().is_empty() && job_title.contains(&avoid.to_lowercase()))
        {
            return Ok(reason(0.0, format!("Title contains avoided term: '{avoided}'"))
                .with_detail("matched_avoid_title", avoided.as_str()));
        }

        if let Some(primary) = profile
            .primary_titles
            .iter()
            .find(|title| normalize(title) == normalized_title)
        {
            return Ok(reason(MAX_SCORE, format!("Perfect title match: '{primary}'"))
                .with_detail("matched_title", primary.as_str())
                .with_detail("match_type", "exact"));
        }

        if let Some(secondary) = profile
            .secondary_titles
            .iter()
            .find(|title| normalize(title) == normalized_title)
        {
            return Ok(
                reason(SECONDARY_EXACT, format!("Secondary title match: '{secondary}'"))
                    .with_detail("matched_title", secondary.as_str())
                    .with_detail("match_type", "secondary_exact"),
            );
        }

        let close = close_match(&profile.primary_titles, &normalized_title)
            .map(|title| (title, PRIMARY_CLOSE, "close_primary"))
            .or_else(|| {
                close_match(&profile.secondary_titles, &normalized_title)
                    .map(|title| (title, SECONDARY_CLOSE, "close_secondary"))
            });
        if let Some((title, points, match_type)) = close {
            return Ok(reason(points, format!("Similar to '{title}'"))
                .with_detail("matched_title", title.as_str())
                .with_detail("match_type", match_type));
        }

        let matched: Vec<String> = title_keywords(&profile.primary_titles, &profile.secondary_titles)
            .into_iter()
            .filter(|keyword| job_title.contains(keyword.as_str()))
            .collect();
        if !matched.is_empty() {
            let points = (matched.len() as f64 * KEYWORD_POINTS).min(KEYWORD_CAP);
            return Ok(reason(points, format!("Partial match: {}", matched.join(", ")))
                .with_detail("match_type", "partial")
                .with_detail("keyword_count", matched.len())
                .with_detail("matched_keywords", json!(matched)));
        }

        Ok(reason(0.0, "No title match found".to_string())
            .with_detail("job_title", ctx.job.title.as_str()))
    }
}

fn close_match<'t>(titles: &'t [String], normalized_title: &str) -> Option<&'t String> {
    titles
        .iter()
        .find(|title| similarity(normalized_title, &normalize(title)) >= SIMILARITY_THRESHOLD)
}

/// Vocabulary for partial matches: fixed role words plus every word of the target titles,
/// minus stop words. Sorted so matches are reported deterministically.
fn title_keywords(primary: &[String], secondary: &[String]) -> BTreeSet<String> {
    let from_titles = primary
        .iter()
        .chain(secondary)
        .flat_map(|title| {
            title
                .to_lowercase()
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        });

    BASE_KEYWORDS
        .iter()
        .map(|keyword| keyword.to_string())
        .chain(from_titles)
        .filter(|word| !STOP_WORDS.contains(&word.as_str()))
        .collect()
}

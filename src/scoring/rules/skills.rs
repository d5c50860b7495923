use serde_json::json;

use super::text::lookup;
use super::{Rule, RuleError, RuleKind, ScoringContext};
use crate::scoring::reason::ScoringReason;

const MAX_SCORE: f64 = 25.0;
const CORE_POINTS: f64 = 3.0;
const TECHNICAL_POINTS: f64 = 2.0;
const DOMAIN_POINTS: f64 = 2.0;

const SKILL_SYNONYMS: &[(&str, &[&str])] = &[
    ("product strategy", &["strategy", "strategic planning"]),
    ("data analysis", &["analytics", "data analytics", "data science"]),
    ("user research", &["user studies", "ux research", "customer research"]),
    ("a/b testing", &["ab testing", "experimentation", "split testing"]),
    ("sql", &["structured query language", "database queries"]),
    ("figma", &["design tools", "prototyping"]),
    ("jira", &["project management", "ticket management"]),
    ("agile", &["scrum", "agile methodology"]),
    ("roadmapping", &["roadmap", "product roadmap", "strategic roadmap"]),
];

/// Additive skill overlap between the posting text and the candidate's skill lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkillsRule;

impl Rule for SkillsRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Skills
    }

    fn max_score(&self) -> f64 {
        MAX_SCORE
    }

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Result<ScoringReason, RuleError> {
        let profile = ctx.profile;
        let text = ctx.job.title_and_description();

        let groups: [(&str, &[String], f64); 3] = [
            ("Core", &profile.core_skills, CORE_POINTS),
            ("Tech", &profile.technical_skills, TECHNICAL_POINTS),
            ("Domain", &profile.domain_expertise, DOMAIN_POINTS),
        ];

        let mut matched = Vec::new();
        let mut raw_points = 0.0;
        for (label, skills, points) in groups {
            for skill in skills.iter().filter(|skill| skill_mentioned(skill, &text)) {
                matched.push(format!("{label}: {skill}"));
                raw_points += points;
            }
        }

        if matched.is_empty() {
            let searched = profile.core_skills.len()
                + profile.technical_skills.len()
                + profile.domain_expertise.len();
            return Ok(ScoringReason::new(
                self.kind().category(),
                0.0,
                MAX_SCORE,
                "No skill matches found",
            )
            .with_detail("searched_skills_count", searched));
        }

        Ok(ScoringReason::new(
            self.kind().category(),
            f64::min(raw_points, MAX_SCORE),
            MAX_SCORE,
            format!("{} skills matched", matched.len()),
        )
        .with_detail("skill_count", matched.len())
        .with_detail("raw_points", raw_points)
        .with_detail("matched_skills", json!(matched)))
    }
}

/// Direct substring, every word of a multi-word skill, or a known synonym.
pub(crate) fn skill_mentioned(skill: &str, text: &str) -> bool {
    let skill = skill.trim().to_lowercase();
    if skill.is_empty() {
        return false;
    }

    if text.contains(&skill) {
        return true;
    }

    if skill.contains(' ') && skill.split_whitespace().all(|word| text.contains(word)) {
        return true;
    }

    lookup(SKILL_SYNONYMS, &skill)
        .map(|synonyms| synonyms.iter().any(|synonym| text.contains(synonym)))
        .unwrap_or(false)
}

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::ScoringSettings;

/// Tag naming which facet produced a reason.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Title,
    Skills,
    Experience,
    Industry,
    Company,
    Bonus,
    Error,
    Custom(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Title => "title",
            Category::Skills => "skills",
            Category::Experience => "experience",
            Category::Industry => "industry",
            Category::Company => "company",
            Category::Bonus => "bonus",
            Category::Error => "error",
            Category::Custom(name) => name,
        }
    }

    /// Title-cased form used in rendered explanations; every word after a non-letter
    /// starts upper case (`my_rule` becomes `My_Rule`).
    pub fn label(&self) -> String {
        let mut label = String::with_capacity(self.as_str().len());
        let mut word_start = true;
        for c in self.as_str().chars() {
            if c.is_alphabetic() {
                if word_start {
                    label.extend(c.to_uppercase());
                } else {
                    label.extend(c.to_lowercase());
                }
                word_start = false;
            } else {
                label.push(c);
                word_start = true;
            }
        }
        label
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.as_str() {
            "title" => Category::Title,
            "skills" => Category::Skills,
            "experience" => Category::Experience,
            "industry" => Category::Industry,
            "company" => Category::Company,
            "bonus" => Category::Bonus,
            "error" => Category::Error,
            _ => Category::Custom(value),
        }
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rule's contribution to a score, kept for transparent audits.
///
/// `max_points` is the facet's nominal ceiling and only feeds percentage displays; penalties
/// and bonuses may land outside `0..=max_points`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringReason {
    category: Category,
    points: f64,
    max_points: f64,
    explanation: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    details: BTreeMap<String, Value>,
}

impl ScoringReason {
    pub fn new(
        category: Category,
        points: f64,
        max_points: f64,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            category,
            points,
            max_points,
            explanation: explanation.into(),
            details: BTreeMap::new(),
        }
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn points(&self) -> f64 {
        self.points
    }

    pub fn max_points(&self) -> f64 {
        self.max_points
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn details(&self) -> &BTreeMap<String, Value> {
        &self.details
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.get(key)
    }

    pub fn percentage(&self) -> f64 {
        if self.max_points == 0.0 {
            return 0.0;
        }
        self.points / self.max_points * 100.0
    }
}

/// Letter grade derived from an aggregate percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            Grade::A
        } else if percentage >= 80.0 {
            Grade::B
        } else if percentage >= 70.0 {
            Grade::C
        } else if percentage >= 60.0 {
            Grade::D
        } else {
            Grade::F
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Aggregate result for one posting: summed points, summed nominal maxima and the reason trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateScore {
    job_id: String,
    total_score: f64,
    max_possible_score: f64,
    scoring_reasons: Vec<ScoringReason>,
    engine: String,
    scored_at: DateTime<Utc>,
}

impl AggregateScore {
    /// Sums points and maxima over `reasons`, preserving their order.
    pub fn from_reasons(
        job_id: impl Into<String>,
        engine: impl Into<String>,
        reasons: Vec<ScoringReason>,
        scored_at: DateTime<Utc>,
    ) -> Self {
        let total_score = reasons.iter().map(ScoringReason::points).sum();
        let max_possible_score = reasons.iter().map(ScoringReason::max_points).sum();

        Self {
            job_id: job_id.into(),
            total_score,
            max_possible_score,
            scoring_reasons: reasons,
            engine: engine.into(),
            scored_at,
        }
    }

    /// Minimal all-zero result standing in for a posting that could not be scored.
    pub fn failed(
        job_id: impl Into<String>,
        engine: impl Into<String>,
        error: impl Into<String>,
        scored_at: DateTime<Utc>,
    ) -> Self {
        let error: String = error.into();
        let reason = ScoringReason::new(Category::Error, 0.0, 100.0, "Scoring failed due to error")
            .with_detail("error", error);

        Self {
            job_id: job_id.into(),
            total_score: 0.0,
            max_possible_score: 100.0,
            scoring_reasons: vec![reason],
            engine: engine.into(),
            scored_at,
        }
    }

    pub(crate) fn clamp_total(mut self, floor: f64, ceiling: f64) -> Self {
        self.total_score = self.total_score.clamp(floor, ceiling);
        self
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn total_score(&self) -> f64 {
        self.total_score
    }

    pub fn max_possible_score(&self) -> f64 {
        self.max_possible_score
    }

    pub fn scoring_reasons(&self) -> &[ScoringReason] {
        &self.scoring_reasons
    }

    pub fn engine(&self) -> &str {
        &self.engine
    }

    pub fn scored_at(&self) -> DateTime<Utc> {
        self.scored_at
    }

    pub fn reason(&self, category: &Category) -> Option<&ScoringReason> {
        self.scoring_reasons
            .iter()
            .find(|reason| reason.category() == category)
    }

    pub fn percentage(&self) -> f64 {
        if self.max_possible_score == 0.0 {
            return 0.0;
        }
        (self.total_score / self.max_possible_score * 100.0).min(100.0)
    }

    pub fn grade(&self) -> Grade {
        Grade::from_percentage(self.percentage())
    }

    /// Threshold check used by the delivery side to decide whether a posting is worth sending.
    pub fn meets_threshold(&self, settings: &ScoringSettings) -> bool {
        self.total_score >= settings.minimum_score_threshold
    }

    /// Highest-scoring reasons first; ties keep rule order.
    pub fn top_reasons(&self, limit: usize) -> Vec<&ScoringReason> {
        let mut sorted: Vec<&ScoringReason> = self.scoring_reasons.iter().collect();
        sorted.sort_by(|a, b| b.points().total_cmp(&a.points()));
        sorted.truncate(limit);
        sorted
    }

    /// Short explanation listing the positive reasons among the top `max_reasons`.
    pub fn explanation_text(&self, max_reasons: usize) -> String {
        if self.scoring_reasons.is_empty() {
            return format!(
                "Score: {:.0}% (No detailed breakdown available)",
                self.percentage()
            );
        }

        let mut lines = vec![format!("Score: {:.0}%", self.percentage())];
        lines.extend(
            self.top_reasons(max_reasons)
                .into_iter()
                .filter(|reason| reason.points() > 0.0)
                .map(|reason| format!("• {} (+{:.0} pts)", reason.explanation(), reason.points())),
        );
        lines.join("\n")
    }
}

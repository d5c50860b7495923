use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Posting produced by the discovery pipeline. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: String,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub salary_range: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub posted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub source: String,
}

impl JobPosting {
    /// Lowercased title and description, the text most rules search.
    pub(crate) fn title_and_description(&self) -> String {
        format!("{} {}", self.title, self.description).to_lowercase()
    }
}

/// Ordered seniority ladder; comparisons follow declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seniority {
    Junior,
    Mid,
    Senior,
    Principal,
    Director,
    Vp,
}

impl Seniority {
    pub const fn ordered() -> [Seniority; 6] {
        [
            Seniority::Junior,
            Seniority::Mid,
            Seniority::Senior,
            Seniority::Principal,
            Seniority::Director,
            Seniority::Vp,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Seniority::Junior => "junior",
            Seniority::Mid => "mid",
            Seniority::Senior => "senior",
            Seniority::Principal => "principal",
            Seniority::Director => "director",
            Seniority::Vp => "vp",
        }
    }

    /// Exact tier lookup. Anything off the ladder ("staff", "lead") is `None`.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let keyword = keyword.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|tier| tier.label() == keyword)
    }

    pub(crate) fn rank(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for Seniority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemotePreference {
    RemoteOnly,
    RemoteFirst,
    Hybrid,
    Onsite,
}

impl RemotePreference {
    pub const fn wants_remote(self) -> bool {
        matches!(self, RemotePreference::RemoteOnly | RemotePreference::RemoteFirst)
    }
}

/// Coarse importance tier. Also used for how much equity matters to the candidate.
///
/// Reads case-insensitively ("High", "HIGH" and "high" are the same tier).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Importance {
    Low,
    Medium,
    High,
}

impl Importance {
    pub const fn multiplier(self) -> f64 {
        match self {
            Importance::Low => 1.0,
            Importance::Medium => 1.5,
            Importance::High => 2.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Importance::Low => "low",
            Importance::Medium => "medium",
            Importance::High => "high",
        }
    }
}

impl FromStr for Importance {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Importance::Low),
            "medium" => Ok(Importance::Medium),
            "high" => Ok(Importance::High),
            other => Err(format!("unknown importance '{other}'")),
        }
    }
}

impl TryFrom<String> for Importance {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Weighted preference record a posting is scored against.
///
/// Validated by the configuration collaborator before it reaches the engine; list fields
/// are membership sets and an empty list simply never matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub years_of_experience: u32,
    #[serde(default)]
    pub current_title: String,
    pub seniority: Seniority,
    #[serde(default)]
    pub primary_titles: Vec<String>,
    #[serde(default)]
    pub secondary_titles: Vec<String>,
    #[serde(default)]
    pub avoid_titles: Vec<String>,
    #[serde(default)]
    pub core_skills: Vec<String>,
    #[serde(default)]
    pub technical_skills: Vec<String>,
    #[serde(default)]
    pub domain_expertise: Vec<String>,
    #[serde(default)]
    pub primary_industries: Vec<String>,
    #[serde(default)]
    pub interested_industries: Vec<String>,
    #[serde(default)]
    pub avoid_industries: Vec<String>,
    pub remote_preference: RemotePreference,
    #[serde(default)]
    pub preferred_locations: Vec<String>,
    #[serde(default)]
    pub company_stages: Vec<String>,
    #[serde(default)]
    pub company_sizes: Vec<String>,
    #[serde(default)]
    pub preferred_companies: Vec<String>,
    #[serde(default)]
    pub avoid_companies: Vec<String>,
    #[serde(default)]
    pub minimum_base_salary: u64,
    #[serde(default)]
    pub target_total_comp: u64,
    pub equity_importance: Importance,
}

/// Importance tier per scored facet, as configured by the operator.
///
/// A missing or unrecognized tier falls back to that facet's default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FacetImportanceInput")]
pub struct FacetImportance {
    pub title: Importance,
    pub skills: Importance,
    pub experience: Importance,
    pub industry: Importance,
    pub company: Importance,
}

impl Default for FacetImportance {
    fn default() -> Self {
        Self {
            title: Importance::High,
            skills: Importance::High,
            experience: Importance::Medium,
            industry: Importance::Medium,
            company: Importance::Low,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FacetImportanceInput {
    title: Option<String>,
    skills: Option<String>,
    experience: Option<String>,
    industry: Option<String>,
    company: Option<String>,
}

impl From<FacetImportanceInput> for FacetImportance {
    fn from(input: FacetImportanceInput) -> Self {
        let defaults = FacetImportance::default();
        Self {
            title: tier_or("title", input.title, defaults.title),
            skills: tier_or("skills", input.skills, defaults.skills),
            experience: tier_or("experience", input.experience, defaults.experience),
            industry: tier_or("industry", input.industry, defaults.industry),
            company: tier_or("company", input.company, defaults.company),
        }
    }
}

fn tier_or(facet: &str, value: Option<String>, fallback: Importance) -> Importance {
    let Some(value) = value else {
        return fallback;
    };
    value.parse().unwrap_or_else(|err: String| {
        warn!(facet, error = %err, fallback = %fallback, "using default importance");
        fallback
    })
}

/// Scoring knobs. The threshold is read by callers filtering results, never by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringSettings {
    #[serde(default = "default_minimum_score_threshold")]
    pub minimum_score_threshold: f64,
    #[serde(default)]
    pub importance: FacetImportance,
}

fn default_minimum_score_threshold() -> f64 {
    60.0
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            minimum_score_threshold: default_minimum_score_threshold(),
            importance: FacetImportance::default(),
        }
    }
}

//! Pluggable facet evaluators.
//!
//! Every rule is immutable once built and receives everything it needs through
//! [`ScoringContext`], so a single rule set can be shared by concurrent callers that use
//! different settings.

mod bonus;
mod company;
mod experience;
mod industry;
mod skills;
pub(crate) mod text;
mod title;

pub use bonus::BonusRule;
pub use company::CompanyRule;
pub use experience::ExperienceRule;
pub use industry::IndustryRule;
pub use skills::SkillsRule;
pub use title::TitleRule;

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use super::domain::{CandidateProfile, Importance, JobPosting, ScoringSettings};
use super::reason::{Category, ScoringReason};

/// Enumerable identity of a rule, used for lookup and removal instead of free-form names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleKind {
    Title,
    Skills,
    Experience,
    Industry,
    Company,
    Bonus,
    Custom(&'static str),
}

impl RuleKind {
    pub const fn name(self) -> &'static str {
        match self {
            RuleKind::Title => "title",
            RuleKind::Skills => "skills",
            RuleKind::Experience => "experience",
            RuleKind::Industry => "industry",
            RuleKind::Company => "company",
            RuleKind::Bonus => "bonus",
            RuleKind::Custom(name) => name,
        }
    }

    pub fn category(self) -> Category {
        match self {
            RuleKind::Title => Category::Title,
            RuleKind::Skills => Category::Skills,
            RuleKind::Experience => Category::Experience,
            RuleKind::Industry => Category::Industry,
            RuleKind::Company => Category::Company,
            RuleKind::Bonus => Category::Bonus,
            RuleKind::Custom(name) => Category::Custom(name.to_string()),
        }
    }
}

impl Serialize for RuleKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolved importance tier per rule for a single scoring call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportanceMap {
    tiers: BTreeMap<RuleKind, Importance>,
}

impl ImportanceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tiers for the five facet rules taken straight from the operator settings.
    pub fn from_settings(settings: &ScoringSettings) -> Self {
        let importance = &settings.importance;
        let mut map = Self::new();
        map.set(RuleKind::Title, importance.title);
        map.set(RuleKind::Skills, importance.skills);
        map.set(RuleKind::Experience, importance.experience);
        map.set(RuleKind::Industry, importance.industry);
        map.set(RuleKind::Company, importance.company);
        map
    }

    pub fn set(&mut self, kind: RuleKind, importance: Importance) {
        self.tiers.insert(kind, importance);
    }

    pub fn get(&self, kind: RuleKind) -> Option<Importance> {
        self.tiers.get(&kind).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RuleKind, Importance)> + '_ {
        self.tiers.iter().map(|(kind, importance)| (*kind, *importance))
    }
}

/// Inputs for one evaluation. Borrowed, never mutated.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub job: &'a JobPosting,
    pub profile: &'a CandidateProfile,
    pub settings: &'a ScoringSettings,
    pub importance: &'a ImportanceMap,
    pub now: DateTime<Utc>,
}

impl ScoringContext<'_> {
    pub fn importance_of(&self, kind: RuleKind) -> Option<Importance> {
        self.importance.get(kind)
    }
}

/// Failure raised by a rule. The engine converts it into a zero-point reason.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleError {
    #[error("{rule} evaluation failed: {message}")]
    Evaluation { rule: &'static str, message: String },
    #[error("{rule} panicked: {message}")]
    Panicked { rule: &'static str, message: String },
}

/// Contract every relevance facet implements.
///
/// "No match" is a regular zero-point reason; `Err` is reserved for genuine failures.
pub trait Rule: Send + Sync {
    fn kind(&self) -> RuleKind;

    fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Nominal ceiling reported alongside every reason this rule produces.
    fn max_score(&self) -> f64;

    fn evaluate(&self, ctx: &ScoringContext<'_>) -> Result<ScoringReason, RuleError>;
}

/// Runs a rule with failures and panics contained to a zero-point reason.
pub(crate) fn evaluate_isolated(rule: &dyn Rule, ctx: &ScoringContext<'_>) -> ScoringReason {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| rule.evaluate(ctx)))
        .unwrap_or_else(|payload| {
            Err(RuleError::Panicked {
                rule: rule.name(),
                message: panic_message(payload.as_ref()),
            })
        });

    match outcome {
        Ok(reason) => reason,
        Err(err) => {
            tracing::error!(job_id = %ctx.job.id, rule = rule.name(), error = %err, "rule failed");
            ScoringReason::new(
                rule.kind().category(),
                0.0,
                rule.max_score(),
                format!("{} scoring failed", rule.kind().category().label()),
            )
            .with_detail("error", err.to_string())
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

//! Job relevance scoring.
//!
//! A [`RelevanceEngine`] runs independent facet rules (title, skills, experience, industry,
//! company) plus an additive bonus layer against one posting and returns an explainable
//! [`AggregateScore`]. Engines are interchangeable behind [`ScoringEngine`] and can be
//! catalogued in an [`EngineRegistry`].

pub mod domain;
mod engine;
mod explain;
pub mod reason;
mod registry;
mod relevance;
pub mod rules;

#[cfg(test)]
mod tests;

pub use domain::{
    CandidateProfile, FacetImportance, Importance, JobPosting, RemotePreference, ScoringSettings,
    Seniority,
};
pub use engine::{CompositeEngine, EngineInfo, RuleInfo, ScoringEngine};
pub use explain::{render, Explanation};
pub use reason::{AggregateScore, Category, Grade, ScoringReason};
pub use registry::{EngineRegistry, RegistryInfo};
pub use relevance::{
    RelevanceEngine, ScoringSummary, WeightedRule, DEFAULT_ENGINE_NAME, SCORE_CEILING,
    SCORE_FLOOR,
};
pub use rules::{ImportanceMap, Rule, RuleError, RuleKind, ScoringContext};

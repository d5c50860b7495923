use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::domain::{CandidateProfile, JobPosting, ScoringSettings};
use super::engine::{EngineInfo, ScoringEngine};
use super::reason::AggregateScore;
use super::relevance::RelevanceEngine;

/// Name to engine catalogue owned by the composition root.
///
/// Built once and then shared read-only; engines are handed out as `Arc` so lookups never
/// hold the registry.
#[derive(Default)]
pub struct EngineRegistry {
    engines: BTreeMap<String, Arc<dyn ScoringEngine>>,
    default_engine: Option<String>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the stock relevance engine as its default.
    pub fn with_default_engine() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(RelevanceEngine::new()), true);
        registry
    }

    /// Adds or replaces an engine under its own name. The first engine registered becomes
    /// the default unless another one is explicitly promoted.
    pub fn register(&mut self, engine: Arc<dyn ScoringEngine>, set_as_default: bool) {
        let name = engine.name().to_string();
        self.engines.insert(name.clone(), engine);
        if set_as_default || self.default_engine.is_none() {
            self.default_engine = Some(name.clone());
        }
        info!(engine = %name, "registered scoring engine");
    }

    /// Removing the default promotes the first remaining engine by name.
    pub fn unregister(&mut self, name: &str) -> bool {
        if self.engines.remove(name).is_none() {
            return false;
        }
        if self.default_engine.as_deref() == Some(name) {
            self.default_engine = self.engines.keys().next().cloned();
        }
        info!(engine = %name, "removed scoring engine");
        true
    }

    pub fn set_default(&mut self, name: &str) -> bool {
        if !self.engines.contains_key(name) {
            return false;
        }
        self.default_engine = Some(name.to_string());
        info!(engine = %name, "set default scoring engine");
        true
    }

    pub fn default_engine(&self) -> Option<&str> {
        self.default_engine.as_deref()
    }

    /// Named engine, or the default when `name` is `None`.
    pub fn get(&self, name: Option<&str>) -> Option<Arc<dyn ScoringEngine>> {
        let name = name.or(self.default_engine.as_deref())?;
        self.engines.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        self.engines.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    pub fn score(
        &self,
        job: &JobPosting,
        profile: &CandidateProfile,
        settings: &ScoringSettings,
        engine: Option<&str>,
    ) -> Option<AggregateScore> {
        self.get(engine)
            .map(|engine| engine.score(job, profile, settings))
    }

    pub fn score_many(
        &self,
        jobs: &[JobPosting],
        profile: &CandidateProfile,
        settings: &ScoringSettings,
        engine: Option<&str>,
    ) -> Vec<AggregateScore> {
        self.get(engine)
            .map(|engine| engine.score_many(jobs, profile, settings))
            .unwrap_or_default()
    }

    pub fn info(&self) -> RegistryInfo {
        RegistryInfo {
            total_engines: self.engines.len(),
            default_engine: self.default_engine.clone(),
            engines: self
                .engines
                .values()
                .map(|engine| engine.info())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistryInfo {
    pub total_engines: usize,
    pub default_engine: Option<String>,
    pub engines: Vec<EngineInfo>,
}

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, error};

use super::domain::{CandidateProfile, Importance, JobPosting, ScoringSettings};
use super::reason::{AggregateScore, ScoringReason};
use super::rules::{evaluate_isolated, panic_message, ImportanceMap, Rule, RuleKind, ScoringContext};

/// Interchangeable scoring strategy, selectable by name through the registry.
///
/// `score_at` must always return a result; failures surface inside the reason list.
pub trait ScoringEngine: Send + Sync {
    fn name(&self) -> &str;

    fn score_at(
        &self,
        job: &JobPosting,
        profile: &CandidateProfile,
        settings: &ScoringSettings,
        now: DateTime<Utc>,
    ) -> AggregateScore;

    fn info(&self) -> EngineInfo;

    fn score(
        &self,
        job: &JobPosting,
        profile: &CandidateProfile,
        settings: &ScoringSettings,
    ) -> AggregateScore {
        self.score_at(job, profile, settings, Utc::now())
    }

    /// Scores every posting in order. A posting that blows up becomes an all-zero result
    /// tagged `error` and the batch carries on.
    fn score_many(
        &self,
        jobs: &[JobPosting],
        profile: &CandidateProfile,
        settings: &ScoringSettings,
    ) -> Vec<AggregateScore> {
        let now = Utc::now();
        jobs.iter()
            .map(|job| score_trapped(self, job, profile, settings, now))
            .collect()
    }

    /// Same contract as [`ScoringEngine::score_many`], spread over the rayon pool.
    fn score_many_parallel(
        &self,
        jobs: &[JobPosting],
        profile: &CandidateProfile,
        settings: &ScoringSettings,
    ) -> Vec<AggregateScore> {
        let now = Utc::now();
        jobs.par_iter()
            .map(|job| score_trapped(self, job, profile, settings, now))
            .collect()
    }
}

pub(crate) fn log_scored(score: &AggregateScore, started: Instant) {
    debug!(
        job_id = score.job_id(),
        engine = score.engine(),
        total = score.total_score(),
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "scored job"
    );
}

fn score_trapped<E: ScoringEngine + ?Sized>(
    engine: &E,
    job: &JobPosting,
    profile: &CandidateProfile,
    settings: &ScoringSettings,
    now: DateTime<Utc>,
) -> AggregateScore {
    panic::catch_unwind(AssertUnwindSafe(|| engine.score_at(job, profile, settings, now)))
        .unwrap_or_else(|payload| {
            let message = panic_message(payload.as_ref());
            error!(job_id = %job.id, engine = engine.name(), error = %message, "failed to score job");
            AggregateScore::failed(job.id.as_str(), engine.name(), message, now)
        })
}

/// Static description of an engine's rule set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineInfo {
    pub name: String,
    pub rules: Vec<RuleInfo>,
    pub total_max_score: f64,
    pub rule_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleInfo {
    pub kind: RuleKind,
    pub importance: Importance,
    pub max_score: f64,
}

struct RuleSlot {
    rule: Box<dyn Rule>,
    importance: Importance,
}

/// Ordered rule collection that runs every rule against a posting and sums the outcomes.
///
/// Each rule carries a default importance tier; operator settings override it per call
/// through [`ImportanceMap`] without touching the rules.
pub struct CompositeEngine {
    name: String,
    rules: Vec<RuleSlot>,
}

impl CompositeEngine {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    /// Appends a rule. A rule of the same kind is replaced in place.
    pub fn add_rule<R: Rule + 'static>(&mut self, rule: R, importance: Importance) {
        let kind = rule.kind();
        let slot = RuleSlot {
            rule: Box::new(rule),
            importance,
        };
        match self.rules.iter_mut().find(|slot| slot.rule.kind() == kind) {
            Some(existing) => *existing = slot,
            None => self.rules.push(slot),
        }
        debug!(engine = %self.name, rule = kind.name(), "added rule");
    }

    pub fn remove_rule(&mut self, kind: RuleKind) -> bool {
        let before = self.rules.len();
        self.rules.retain(|slot| slot.rule.kind() != kind);
        let removed = self.rules.len() < before;
        if removed {
            debug!(engine = %self.name, rule = kind.name(), "removed rule");
        }
        removed
    }

    pub fn rule(&self, kind: RuleKind) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .find(|slot| slot.rule.kind() == kind)
            .map(|slot| slot.rule.as_ref())
    }

    pub fn rule_kinds(&self) -> Vec<RuleKind> {
        self.rules.iter().map(|slot| slot.rule.kind()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Default tiers overlaid with whatever the settings specify for each facet.
    pub fn resolve_importance(&self, settings: &ScoringSettings) -> ImportanceMap {
        let configured = ImportanceMap::from_settings(settings);
        let mut resolved = ImportanceMap::new();
        for slot in &self.rules {
            let kind = slot.rule.kind();
            resolved.set(kind, configured.get(kind).unwrap_or(slot.importance));
        }
        resolved
    }

    /// One reason per rule, in rule order. Failing rules yield a zero-point reason.
    pub fn evaluate_rules(&self, ctx: &ScoringContext<'_>) -> Vec<ScoringReason> {
        self.rules
            .iter()
            .map(|slot| evaluate_isolated(slot.rule.as_ref(), ctx))
            .collect()
    }

    pub(crate) fn rule_infos(&self, importance: &ImportanceMap) -> Vec<RuleInfo> {
        self.rules
            .iter()
            .map(|slot| RuleInfo {
                kind: slot.rule.kind(),
                importance: importance.get(slot.rule.kind()).unwrap_or(slot.importance),
                max_score: slot.rule.max_score(),
            })
            .collect()
    }
}

impl ScoringEngine for CompositeEngine {
    fn name(&self) -> &str {
        &self.name
    }

    fn score_at(
        &self,
        job: &JobPosting,
        profile: &CandidateProfile,
        settings: &ScoringSettings,
        now: DateTime<Utc>,
    ) -> AggregateScore {
        let started = Instant::now();
        let importance = self.resolve_importance(settings);
        let ctx = ScoringContext {
            job,
            profile,
            settings,
            importance: &importance,
            now,
        };
        let score = AggregateScore::from_reasons(
            job.id.as_str(),
            self.name.as_str(),
            self.evaluate_rules(&ctx),
            now,
        );
        log_scored(&score, started);
        score
    }

    fn info(&self) -> EngineInfo {
        let rules = self.rule_infos(&ImportanceMap::new());
        EngineInfo {
            name: self.name.clone(),
            total_max_score: rules.iter().map(|rule| rule.max_score).sum(),
            rule_count: rules.len(),
            rules,
        }
    }
}

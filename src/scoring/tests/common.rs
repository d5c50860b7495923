use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::scoring::domain::{
    CandidateProfile, Importance, JobPosting, RemotePreference, ScoringSettings, Seniority,
};
use crate::scoring::reason::ScoringReason;
use crate::scoring::rules::{ImportanceMap, Rule, RuleError, RuleKind, ScoringContext};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub(super) fn profile() -> CandidateProfile {
    CandidateProfile {
        years_of_experience: 8,
        current_title: "Senior Product Manager".to_string(),
        seniority: Seniority::Senior,
        primary_titles: strings(&["Senior Product Manager", "Principal Product Manager"]),
        secondary_titles: strings(&["Product Manager", "Product Lead"]),
        avoid_titles: strings(&["Marketing Manager", "Intern"]),
        core_skills: strings(&[
            "Product Strategy",
            "Roadmapping",
            "Stakeholder Management",
            "A/B Testing",
        ]),
        technical_skills: strings(&["SQL", "Figma", "Jira"]),
        domain_expertise: strings(&["Payments", "B2B SaaS"]),
        primary_industries: strings(&["fintech"]),
        interested_industries: strings(&["saas"]),
        avoid_industries: strings(&["gambling"]),
        remote_preference: RemotePreference::RemoteFirst,
        preferred_locations: strings(&["Remote", "New York"]),
        company_stages: strings(&["growth"]),
        company_sizes: strings(&["201-500"]),
        preferred_companies: strings(&["Stripe"]),
        avoid_companies: strings(&["Meta"]),
        minimum_base_salary: 150_000,
        target_total_comp: 200_000,
        equity_importance: Importance::High,
    }
}

pub(super) const IDEAL_DESCRIPTION: &str = "Own product strategy and roadmapping for our \
    payments platform. You will lead stakeholder management across engineering, design and \
    finance, run a/b testing programs, and dig into SQL dashboards. Daily tools include Figma \
    and Jira. Deep b2b saas experience required, along with 6+ years of experience shipping \
    products. This is a remote role with meaningful equity.";

pub(super) fn ideal_job() -> JobPosting {
    JobPosting {
        id: "job-ideal".to_string(),
        title: "Senior Product Manager".to_string(),
        company: "Stripe".to_string(),
        location: "Remote (US)".to_string(),
        description: IDEAL_DESCRIPTION.to_string(),
        salary_range: Some("$180k - $220k".to_string()),
        industry: Some("fintech".to_string()),
        posted_at: Some(now() - Duration::hours(2)),
        source: "linkedin".to_string(),
    }
}

/// Ideal posting moved to another employer.
pub(super) fn job_at(company: &str) -> JobPosting {
    JobPosting {
        id: format!("job-{}", company.to_lowercase().replace(' ', "-")),
        company: company.to_string(),
        ..ideal_job()
    }
}

/// Sparse posting with nothing but a title and a one-line description.
pub(super) fn bare_job(title: &str, description: &str) -> JobPosting {
    JobPosting {
        id: "job-bare".to_string(),
        title: title.to_string(),
        company: "Acme".to_string(),
        location: "New York".to_string(),
        description: description.to_string(),
        salary_range: None,
        industry: None,
        posted_at: None,
        source: "indeed".to_string(),
    }
}

pub(super) fn settings() -> ScoringSettings {
    ScoringSettings::default()
}

pub(super) fn evaluate(rule: &dyn Rule, job: &JobPosting, profile: &CandidateProfile) -> ScoringReason {
    let settings = settings();
    let importance = ImportanceMap::from_settings(&settings);
    let ctx = ScoringContext {
        job,
        profile,
        settings: &settings,
        importance: &importance,
        now: now(),
    };
    rule.evaluate(&ctx).expect("rule evaluates")
}

/// Rule that always reports a failure.
pub(super) struct FailingRule;

impl Rule for FailingRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Custom("failing")
    }

    fn max_score(&self) -> f64 {
        5.0
    }

    fn evaluate(&self, _ctx: &ScoringContext<'_>) -> Result<ScoringReason, RuleError> {
        Err(RuleError::Evaluation {
            rule: self.name(),
            message: "upstream lookup unavailable".to_string(),
        })
    }
}

/// Rule that panics mid-evaluation.
pub(super) struct PanickingRule;

impl Rule for PanickingRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Custom("panicking")
    }

    fn max_score(&self) -> f64 {
        5.0
    }

    fn evaluate(&self, _ctx: &ScoringContext<'_>) -> Result<ScoringReason, RuleError> {
        panic!("index out of range");
    }
}

/// Rule that awards a fixed number of points.
pub(super) struct FixedRule(pub(super) f64);

impl Rule for FixedRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Custom("fixed")
    }

    fn max_score(&self) -> f64 {
        10.0
    }

    fn evaluate(&self, _ctx: &ScoringContext<'_>) -> Result<ScoringReason, RuleError> {
        Ok(ScoringReason::new(
            self.kind().category(),
            self.0,
            self.max_score(),
            "fixed award",
        ))
    }
}

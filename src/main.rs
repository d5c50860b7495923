use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use job_relevance::config::AppConfig;
use job_relevance::error::AppError;
use job_relevance::scoring::{
    render, AggregateScore, CandidateProfile, EngineRegistry, Explanation, JobPosting,
    ScoringSettings,
};
use job_relevance::telemetry;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "job-relevance",
    about = "Score job postings against a candidate profile from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score one posting or a JSON array of postings
    Score(ScoreArgs),
    /// Describe the registered scoring engines
    Engines,
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// JSON file holding a job posting or an array of postings
    #[arg(long)]
    job: PathBuf,
    /// JSON file holding the candidate profile
    #[arg(long)]
    profile: PathBuf,
    /// JSON file holding scoring settings (defaults apply when omitted)
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Engine to use instead of the configured default
    #[arg(long)]
    engine: Option<String>,
    /// Render every non-zero reason instead of the summary
    #[arg(long)]
    detailed: bool,
    /// Emit the aggregate scores as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JobInput {
    Many(Vec<JobPosting>),
    One(Box<JobPosting>),
}

impl JobInput {
    fn into_vec(self) -> Vec<JobPosting> {
        match self {
            JobInput::Many(jobs) => jobs,
            JobInput::One(job) => vec![*job],
        }
    }
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let mut registry = EngineRegistry::with_default_engine();
    if !registry.set_default(&config.scoring.default_engine) {
        return Err(AppError::UnknownEngine(config.scoring.default_engine));
    }

    match cli.command {
        Command::Score(args) => run_score(&registry, args),
        Command::Engines => {
            println!("{}", serde_json::to_string_pretty(&registry.info())?);
            Ok(())
        }
    }
}

fn run_score(registry: &EngineRegistry, args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        job,
        profile,
        settings,
        engine,
        detailed,
        json,
    } = args;

    let jobs = read_json::<JobInput>(&job)?.into_vec();
    let profile: CandidateProfile = read_json(&profile)?;
    let settings: ScoringSettings = match settings {
        Some(path) => read_json(&path)?,
        None => ScoringSettings::default(),
    };

    let engine_name = engine.as_deref();
    let engine = registry
        .get(engine_name)
        .ok_or_else(|| AppError::UnknownEngine(engine_name.unwrap_or_default().to_string()))?;

    info!(engine = engine.name(), jobs = jobs.len(), "scoring postings");
    let scores = engine.score_many(&jobs, &profile, &settings);

    if json {
        println!("{}", serde_json::to_string_pretty(&scores)?);
        return Ok(());
    }

    let mode = if detailed {
        Explanation::Detailed
    } else {
        Explanation::Summary
    };
    render_scores(&jobs, &scores, &settings, mode);
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| AppError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

fn render_scores(
    jobs: &[JobPosting],
    scores: &[AggregateScore],
    settings: &ScoringSettings,
    mode: Explanation,
) {
    for (job, score) in jobs.iter().zip(scores) {
        let verdict = if score.meets_threshold(settings) {
            "above threshold"
        } else {
            "below threshold"
        };
        println!("{} at {} [{}] ({verdict})", job.title, job.company, job.id);
        println!("{}\n", render(score, mode));
    }
}

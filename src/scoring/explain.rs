use serde::{Deserialize, Serialize};

use super::reason::{AggregateScore, ScoringReason};

const SUMMARY_TOP_MATCHES: usize = 3;

/// How much of the reason trail to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Explanation {
    /// Every non-zero reason, best first.
    Detailed,
    /// Top three positive reasons plus every penalty.
    #[default]
    Summary,
}

/// Multi-line, human-readable rendering of an aggregate score.
pub fn render(score: &AggregateScore, mode: Explanation) -> String {
    let mut lines = vec![
        format!(
            "Job Score: {:.0}% ({:.1}/{:.1} points)",
            score.percentage(),
            score.total_score(),
            score.max_possible_score()
        ),
        format!("Grade: {}", score.grade()),
        String::new(),
    ];

    match mode {
        Explanation::Detailed => {
            lines.push("Detailed Breakdown:".to_string());
            for reason in sorted_by_points(score.scoring_reasons().iter()) {
                if reason.points() == 0.0 {
                    continue;
                }
                let marker = if reason.points() > 0.0 { "[+]" } else { "[-]" };
                lines.push(format!(
                    "   {marker} {}: {:+.1} pts - {}",
                    reason.category().label(),
                    reason.points(),
                    reason.explanation()
                ));
            }
        }
        Explanation::Summary => {
            let positives = sorted_by_points(
                score
                    .scoring_reasons()
                    .iter()
                    .filter(|reason| reason.points() > 0.0),
            );
            if !positives.is_empty() {
                lines.push("Top Matches:".to_string());
                for reason in positives.into_iter().take(SUMMARY_TOP_MATCHES) {
                    lines.push(format!(
                        "   • {} (+{:.0} pts)",
                        reason.explanation(),
                        reason.points()
                    ));
                }
            }

            let penalties: Vec<&ScoringReason> = score
                .scoring_reasons()
                .iter()
                .filter(|reason| reason.points() < 0.0)
                .collect();
            if !penalties.is_empty() {
                lines.push("Concerns:".to_string());
                for reason in penalties {
                    lines.push(format!(
                        "   • {} ({:.0} pts)",
                        reason.explanation(),
                        reason.points()
                    ));
                }
            }
        }
    }

    lines.join("\n")
}

/// Stable sort, so equal points keep rule order.
fn sorted_by_points<'a>(reasons: impl Iterator<Item = &'a ScoringReason>) -> Vec<&'a ScoringReason> {
    let mut sorted: Vec<&ScoringReason> = reasons.collect();
    sorted.sort_by(|a, b| b.points().total_cmp(&a.points()));
    sorted
}

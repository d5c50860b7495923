use similar::TextDiff;

/// Lowercases, turns punctuation into spaces and collapses runs of whitespace.
pub(crate) fn normalize(value: &str) -> String {
    let cleaned: String = value
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Character-level sequence similarity in `0.0..=1.0` (`2 * matches / total_len`).
pub(crate) fn similarity(left: &str, right: &str) -> f64 {
    if left.is_empty() && right.is_empty() {
        return 1.0;
    }
    f64::from(TextDiff::from_chars(left, right).ratio())
}

/// First needle found in `haystack`, if any. `haystack` is expected to be lowercased already.
pub(crate) fn find_any<'a>(haystack: &str, needles: &[&'a str]) -> Option<&'a str> {
    needles
        .iter()
        .copied()
        .find(|needle| haystack.contains(needle))
}

pub(crate) fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    find_any(haystack, needles).is_some()
}

/// Keyword table lookup keyed by a lowercased preference value.
pub(crate) fn lookup<'t>(
    table: &'t [(&'static str, &'static [&'static str])],
    key: &str,
) -> Option<&'t [&'static str]> {
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, keywords)| *keywords)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_punctuation_and_collapses_whitespace() {
        assert_eq!(
            normalize("  Senior   Product-Manager, (Payments) "),
            "senior product manager payments"
        );
        assert_eq!(normalize("data_platform"), "data_platform");
    }

    #[test]
    fn similarity_rewards_close_titles() {
        assert_eq!(similarity("product manager", "product manager"), 1.0);
        assert!(similarity("senior product manager", "senior product managers") > 0.9);
        assert!(similarity("chef", "product manager") < 0.5);
    }

    #[test]
    fn find_any_returns_first_listed_needle() {
        assert_eq!(find_any("fully remote role", &["onsite", "remote"]), Some("remote"));
        assert!(!contains_any("office based", &["remote", "wfh"]));
    }
}

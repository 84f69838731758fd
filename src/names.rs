//! Heuristics that pull a show/movie search string and season/episode numbers
//! out of noisy file and directory names.
//!
//! Only the last path component is ever inspected.

use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

/// A single cleanup step: every match of `pattern` is replaced by `replacement`.
pub struct StripRule {
    pub pattern: Regex,
    pub replacement: &'static str,
}

lazy_static! {
    /// Applied in order; each rule sees the trimmed output of the previous one.
    /// Season markers go first so the digit strip can't leave a dangling "Season" / "S".
    pub static ref SEARCH_STRIP_RULES: Vec<StripRule> = [
        (r"(?i)season\s\d+", ""),
        (r"(?i)s\s\d+", ""),
        (r"(?i)s\d+", ""),
        (r"\d+", ""),
    ]
    .iter()
    .map(|&(pattern, replacement)| StripRule { pattern: Regex::new(pattern).unwrap(), replacement })
    .collect();

    static ref SEASON_NUMBER_RE: Regex = Regex::new(r"[-+]?\d+").unwrap();

    /// Episode markers by confidence: "E07", then "1x07", then any bare number.
    static ref EPISODE_PATTERNS_RE: Vec<Regex> = [
        r"(?i)e(\d+)",
        r"(?i)x(\d+)",
        r"(\d+)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect();
}

fn last_segment(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
}

/// Runs `input` through `rules` in order, trimming after every step.
pub fn apply_strip_rules(rules: &[StripRule], input: &str) -> String {
    rules.iter().fold(input.trim().to_owned(), |acc, rule| {
        rule.pattern.replace_all(&acc, rule.replacement).trim().to_owned()
    })
}

/// Catalog search string for a directory or file name, e.g.
/// `"/shows/Breaking Bad Season 3"` becomes `"Breaking Bad"`.
pub fn derive_search_string(path: &str) -> String {
    apply_strip_rules(&SEARCH_STRIP_RULES, last_segment(path))
}

/// First (optionally signed) number in the last path segment, or -1.
pub fn derive_season_number(path: &str) -> i32 {
    SEASON_NUMBER_RE
        .find(last_segment(path))
        .and_then(|m| m.as_str().parse::<i32>().ok())
        .unwrap_or(-1)
}

/// Episode number from a file name, or -1.
///
/// The first pattern that matches and parses wins, so "Show.S01E07" is 7
/// rather than the season's 1.
pub fn derive_episode_number(name: &str) -> i32 {
    let name = last_segment(name);
    EPISODE_PATTERNS_RE
        .iter()
        .find_map(|re| {
            re.captures(name)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<i32>().ok())
        })
        .unwrap_or(-1)
}

//! Entry-level heuristic for job postings.
//!
//! The classifier is an ordered list of `(pattern, verdict)` rules evaluated
//! against `"{title} {summary}"`. The first matching rule decides; when none
//! match the posting is not entry-level. Seniority rules come before junior
//! rules, so a posting mentioning both "senior" and "entry-level" is rejected.

use super::record::JobRecord;
use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Patterns that mark a posting as senior. Checked first.
const SENIOR_BLOCK: &[&str] = &[
    "senior",
    "lead",
    "staff",
    "principal",
    "manager",
    "director",
    "architect",
    r"\b5\+",
    r"\b4\+",
];

/// Patterns that mark a posting as junior-friendly.
const JUNIOR_ALLOW: &[&str] = &[
    "junior",
    "entry",
    "entry[- ]level",
    "new grad",
    "graduate",
    "trainee",
    "assistant",
    "intern",
    "associate",
    "0-1",
    "0-2",
];

#[derive(Debug, Error)]
#[error("Invalid classifier pattern '{pattern}': {source}")]
pub struct RuleError {
    pattern: String,
    #[source]
    source: regex::Error,
}

/// Outcome a rule assigns when its pattern matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Senior,
    EntryLevel,
}

#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Regex,
    verdict: Verdict,
}

impl Rule {
    /// Compiles a case-insensitive rule.
    pub fn new(pattern: &str, verdict: Verdict) -> Result<Self, RuleError> {
        let pattern = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| RuleError {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self { pattern, verdict })
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }
}

#[derive(Debug, Clone)]
pub struct EntryLevelClassifier {
    rules: Vec<Rule>,
}

impl EntryLevelClassifier {
    /// Builds a classifier from an explicit rule list. Order is significant.
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The built-in senior-block then junior-allow rule set.
    pub fn standard() -> Result<Self, RuleError> {
        let rules = SENIOR_BLOCK
            .iter()
            .map(|p| (p, Verdict::Senior))
            .chain(JUNIOR_ALLOW.iter().map(|p| (p, Verdict::EntryLevel)))
            .map(|(p, verdict)| Rule::new(p, verdict))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(rules))
    }

    /// Returns the verdict of the first rule matching `text`, if any.
    pub fn classify_text(&self, text: &str) -> Option<Verdict> {
        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(text))
            .map(Rule::verdict)
    }

    pub fn is_entry_level(&self, job: &JobRecord) -> bool {
        self.classify_text(&job.search_text()) == Some(Verdict::EntryLevel)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

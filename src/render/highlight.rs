// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Search highlighting: a node matches when the pattern finds one of its
//! running job IDs, job owners, or its own name.

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;

use crate::slurm::JobUsage;

/// How a cell is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Highlight {
    #[default]
    Plain,
    Matched,
}

#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    pattern: Option<Regex>,
}

impl Highlighter {
    /// Join `patterns` with `|` into one expression. Empty patterns are
    /// ignored; none left disables matching.
    pub fn new(patterns: &[String]) -> Result<Self> {
        let parts: Vec<&str> = patterns
            .iter()
            .map(String::as_str)
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            return Ok(Self::default());
        }
        let joined = parts.join("|");
        let pattern = Regex::new(&joined).with_context(|| format!("Invalid search pattern '{}'", joined))?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    pub fn is_searching(&self) -> bool {
        self.pattern.is_some()
    }

    pub fn matches(&self, node: &str, usage: Option<&JobUsage>) -> bool {
        let Some(pattern) = &self.pattern else {
            return false;
        };
        if pattern.is_match(node) {
            return true;
        }
        usage.is_some_and(|u| u.jobs.iter().chain(u.users.iter()).any(|s| pattern.is_match(s)))
    }

    pub fn highlight(&self, node: &str, usage: Option<&JobUsage>) -> Highlight {
        if self.matches(node, usage) {
            Highlight::Matched
        } else {
            Highlight::Plain
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(jobs: &[&str], users: &[&str]) -> JobUsage {
        JobUsage {
            jobs: jobs.iter().map(|s| s.to_string()).collect(),
            users: users.iter().map(|s| s.to_string()).collect(),
            memory: vec![],
        }
    }

    fn patterns(p: &[&str]) -> Vec<String> {
        p.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_pattern_never_matches() {
        let h = Highlighter::new(&[]).unwrap();
        assert!(!h.is_searching());
        assert!(!h.matches("node01", Some(&usage(&["1"], &["alice"]))));

        let h = Highlighter::new(&patterns(&[""])).unwrap();
        assert!(!h.is_searching());
        assert_eq!(h.highlight("node01", None), Highlight::Plain);

        let h = Highlighter::new(&patterns(&["", ""])).unwrap();
        assert!(!h.is_searching());
        assert!(!h.matches("node01", None));
    }

    #[test]
    fn test_empty_patterns_are_ignored() {
        let h = Highlighter::new(&patterns(&["", "gpu", ""])).unwrap();
        assert!(h.is_searching());
        assert!(h.matches("gpu01", None));
        assert!(!h.matches("node01", Some(&usage(&["1"], &["alice"]))));
    }

    #[test]
    fn test_matches_user_job_or_name() {
        let u = usage(&["12345"], &["alice"]);

        assert!(Highlighter::new(&patterns(&["alice"])).unwrap().matches("node01", Some(&u)));
        assert!(Highlighter::new(&patterns(&["^12345$"])).unwrap().matches("node01", Some(&u)));
        assert!(Highlighter::new(&patterns(&["node0[1-3]"])).unwrap().matches("node01", None));
        assert!(!Highlighter::new(&patterns(&["bob"])).unwrap().matches("node01", Some(&u)));
    }

    #[test]
    fn test_multiple_patterns_are_alternatives() {
        let h = Highlighter::new(&patterns(&["bob", "gpu"])).unwrap();
        assert_eq!(h.highlight("gpu01", None), Highlight::Matched);
        assert_eq!(h.highlight("node01", Some(&usage(&["7"], &["bob"]))), Highlight::Matched);
        assert_eq!(h.highlight("node01", Some(&usage(&["7"], &["alice"]))), Highlight::Plain);
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(Highlighter::new(&patterns(&["node[01"])).is_err());
    }
}

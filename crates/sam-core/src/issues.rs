//! Findings produced by consistency checks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::enums::Severity;

/// One inconsistency found in platform data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    /// Stable machine-readable code, e.g. `queue_sent_prospect_pending`.
    pub code: String,
    /// The row or entity the issue is about (id, email, account name).
    pub subject: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    /// SQL a human can run to fix the issue by hand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_sql: Option<String>,
}

impl Issue {
    pub fn new(
        severity: Severity,
        code: impl Into<String>,
        subject: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            code: code.into(),
            subject: subject.into(),
            description: description.into(),
            impact: None,
            fix_sql: None,
        }
    }

    #[must_use]
    pub fn with_impact(mut self, impact: impl Into<String>) -> Self {
        self.impact = Some(impact.into());
        self
    }

    #[must_use]
    pub fn with_fix_sql(mut self, sql: impl Into<String>) -> Self {
        self.fix_sql = Some(sql.into());
        self
    }
}

/// A titled collection of issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueReport {
    pub title: String,
    pub issues: Vec<Issue>,
    pub generated_at: DateTime<Utc>,
}

impl IssueReport {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            issues: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn extend(&mut self, issues: impl IntoIterator<Item = Issue>) {
        self.issues.extend(issues);
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issue counts keyed by severity, most severe first. Severities with no
    /// issues are included with a zero count.
    #[must_use]
    pub fn count_by_severity(&self) -> Vec<(Severity, usize)> {
        let mut counts: BTreeMap<Severity, usize> =
            Severity::ALL.iter().map(|severity| (*severity, 0)).collect();
        for issue in &self.issues {
            *counts.entry(issue.severity).or_insert(0) += 1;
        }
        counts.into_iter().rev().collect()
    }

    #[must_use]
    pub fn max_severity(&self) -> Option<Severity> {
        self.issues.iter().map(|issue| issue.severity).max()
    }

    /// Whether any issue is at or above `threshold`.
    #[must_use]
    pub fn has_at_least(&self, threshold: Severity) -> bool {
        self.max_severity().is_some_and(|max| max >= threshold)
    }

    /// Issues ordered most severe first, stable within a severity.
    pub fn sort(&mut self) {
        self.issues.sort_by(|a, b| b.severity.cmp(&a.severity));
    }
}

//! Consistency checks over already-loaded rows.
//!
//! Each check is a pure function: rows in, an [`IssueReport`] and a
//! [`RepairPlan`] out. Fetching the rows and applying the plan is the
//! service's job, so every rule here can be tested without a network.

pub mod accounts;
pub mod approvals;
pub mod campaigns;
pub mod drafts;
pub mod membership;
pub mod queue;

use serde::Serialize;

use sam_core::issues::IssueReport;

use crate::plan::RepairPlan;

/// Findings and the patches that would fix them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckOutcome {
    pub report: IssueReport,
    pub plan: RepairPlan,
}

impl CheckOutcome {
    pub fn new(title: &str) -> Self {
        Self {
            report: IssueReport::new(title),
            plan: RepairPlan::new(title),
        }
    }

    /// Sort issues most severe first.
    #[must_use]
    pub fn finish(mut self) -> Self {
        self.report.sort();
        self
    }
}

//! # sam-ops
//!
//! Consistency checks, audited repairs, and batched launches for the SAM
//! outreach platform.
//!
//! Every operation follows the same shape: load rows through `sam-api`, run a
//! pure check that yields an [`sam_core::issues::IssueReport`] and a
//! [`RepairPlan`], then apply the plan only when the operator confirms. All
//! writes are appended to a JSONL journal by [`JournalWriter`].

pub mod checks;
pub mod diagnose;
pub mod executions;
pub mod journal;
pub mod launch;
pub mod plan;
pub mod service;

mod error;

#[cfg(test)]
mod fixtures;

pub use checks::CheckOutcome;
pub use error::OpsError;
pub use journal::JournalWriter;
pub use plan::{ApplyOutcome, Patch, RepairPlan, apply};
pub use service::OpsService;

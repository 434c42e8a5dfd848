//! Repair plans: row patches computed by a check, applied only on confirm.

use serde::Serialize;
use serde_json::{Map, Value};

use sam_api::{PostgrestClient, Query};

use crate::error::OpsError;
use crate::journal::{JournalWriter, Outcome};

/// Failure text for a patch whose filter matched nothing.
pub const NO_ROWS_MATCHED: &str = "patch matched no rows";

/// Column changes for one row, addressed by `id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Patch {
    pub table: String,
    pub id: String,
    pub changes: Map<String, Value>,
    pub reason: String,
}

impl Patch {
    pub fn new(table: &str, id: &str, reason: impl Into<String>) -> Self {
        Self {
            table: table.to_string(),
            id: id.to_string(),
            changes: Map::new(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.changes.insert(column.to_string(), value.into());
        self
    }

    /// The value a column will be set to, if this patch changes it.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.changes.get(column)
    }
}

/// Ordered patches plus free-form notes for the operator.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RepairPlan {
    pub title: String,
    pub patches: Vec<Patch>,
    pub notes: Vec<String>,
}

impl RepairPlan {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn push(&mut self, patch: Patch) {
        self.patches.push(patch);
    }

    pub fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// Append another plan's patches and notes.
    pub fn merge(&mut self, other: Self) {
        self.patches.extend(other.patches);
        self.notes.extend(other.notes);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.patches.len()
    }
}

/// Result of [`apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyOutcome {
    pub applied: usize,
    /// `(row id, error)` per failed patch.
    pub failed: Vec<(String, String)>,
    pub dry_run: bool,
}

impl ApplyOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Apply `plan` patch by patch.
///
/// Without `confirm` nothing is written and the outcome is a dry run. With
/// it, each patch is a `PATCH ?id=eq.{id}` returning the updated rows; a
/// patch that comes back empty is a failure. Failures do not stop later
/// patches. Every attempt is journaled.
///
/// # Errors
///
/// Only journal write failures abort; API failures are collected per patch.
pub async fn apply(
    plan: &RepairPlan,
    db: &PostgrestClient,
    journal: &JournalWriter,
    confirm: bool,
) -> Result<ApplyOutcome, OpsError> {
    if !confirm {
        tracing::info!(plan = %plan.title, patches = plan.len(), "dry run, nothing written");
        return Ok(ApplyOutcome {
            dry_run: true,
            ..ApplyOutcome::default()
        });
    }

    let mut outcome = ApplyOutcome::default();
    for patch in &plan.patches {
        let changes = Value::Object(patch.changes.clone());
        let result = db
            .update::<Value, _>(&patch.table, &Query::by_id(&patch.id), &patch.changes)
            .await;
        let recorded = match result {
            Ok(rows) if rows.is_empty() => {
                tracing::warn!(table = %patch.table, id = %patch.id, "patch matched no rows");
                outcome.failed.push((patch.id.clone(), NO_ROWS_MATCHED.to_string()));
                Outcome::Failed {
                    error: NO_ROWS_MATCHED.to_string(),
                }
            }
            Ok(rows) => {
                tracing::info!(
                    table = %patch.table,
                    id = %patch.id,
                    fields = ?patch.changes.keys().collect::<Vec<_>>(),
                    "patch applied"
                );
                outcome.applied += 1;
                Outcome::Applied { rows: rows.len() }
            }
            Err(err) => {
                tracing::warn!(table = %patch.table, id = %patch.id, error = %err, "patch failed");
                outcome.failed.push((patch.id.clone(), err.to_string()));
                Outcome::Failed {
                    error: err.to_string(),
                }
            }
        };
        journal.record("update", &patch.table, &patch.id, changes, recorded)?;
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn patch_builder_collects_changes() {
        let patch = Patch::new("campaign_prospects", "p1", "sent outside queue")
            .set("status", "connection_request_sent")
            .set("error_message", Value::Null);
        assert_eq!(patch.get("status"), Some(&json!("connection_request_sent")));
        assert_eq!(patch.get("error_message"), Some(&Value::Null));
        assert!(patch.get("contacted_at").is_none());
    }

    #[test]
    fn merge_keeps_order() {
        let mut plan = RepairPlan::new("a");
        plan.push(Patch::new("t", "1", "r"));
        let mut other = RepairPlan::new("b");
        other.push(Patch::new("t", "2", "r"));
        other.note("n");
        plan.merge(other);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.patches[1].id, "2");
        assert_eq!(plan.notes, vec!["n".to_string()]);
    }
}

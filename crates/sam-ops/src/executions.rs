//! N8N execution summaries and workflow node edits.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use sam_api::n8n::{Execution, Workflow};
use sam_core::classify::{ErrorCategory, classify};

use crate::error::OpsError;

/// Failures listed in a summary.
pub const RECENT_FAILURES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedExecution {
    pub id: String,
    pub workflow_id: Option<String>,
    pub started_at: Option<String>,
    pub stopped_at: Option<String>,
    pub error: Option<String>,
    pub category: Option<ErrorCategory>,
}

impl FailedExecution {
    fn from_execution(execution: &Execution) -> Self {
        let error = execution.error_message();
        Self {
            id: execution.id.clone(),
            workflow_id: execution.workflow_id.clone(),
            started_at: execution.started_at.clone(),
            stopped_at: execution.stopped_at.clone(),
            category: error.as_deref().map(classify),
            error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionSummary {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    pub failed: usize,
    /// Failed share of finished executions, 0.0 when none finished.
    pub failure_rate: f64,
    /// Newest first.
    pub recent_failures: Vec<FailedExecution>,
}

/// Counts by status, failure rate over finished runs, newest failures.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize(executions: &[Execution]) -> ExecutionSummary {
    let mut by_status = BTreeMap::new();
    for execution in executions {
        *by_status
            .entry(execution.effective_status().to_string())
            .or_insert(0) += 1;
    }

    let mut failures: Vec<&Execution> = executions.iter().filter(|e| e.is_failure()).collect();
    failures.sort_by(|a, b| b.started_at.cmp(&a.started_at));

    let finished = executions
        .iter()
        .filter(|e| !matches!(e.effective_status(), "running" | "waiting" | "new"))
        .count();
    let failure_rate = if finished == 0 {
        0.0
    } else {
        failures.len() as f64 / finished as f64
    };

    ExecutionSummary {
        total: executions.len(),
        by_status,
        failed: failures.len(),
        failure_rate,
        recent_failures: failures
            .into_iter()
            .take(RECENT_FAILURES)
            .map(FailedExecution::from_execution)
            .collect(),
    }
}

/// A node parameter change, applied or previewed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeEdit {
    pub workflow_id: String,
    pub workflow_name: String,
    pub node: String,
    pub path: String,
    pub previous: Option<Value>,
    pub value: Value,
    pub applied: bool,
}

/// Set `node.parameters.<dotted_path>` to `value`, creating missing
/// intermediate objects. Returns the previous value.
///
/// # Errors
///
/// Returns [`OpsError::Workflow`] when the node is absent, the path is empty,
/// or a path segment runs through a non-object value.
pub fn set_node_parameter(
    workflow: &mut Workflow,
    node_name: &str,
    dotted_path: &str,
    value: Value,
) -> Result<Option<Value>, OpsError> {
    let workflow_name = workflow.name.clone();
    let node = workflow.node_mut(node_name).ok_or_else(|| {
        OpsError::Workflow(format!("workflow '{workflow_name}' has no node named '{node_name}'"))
    })?;

    let segments: Vec<&str> = dotted_path
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    let Some((last, parents)) = segments.split_last() else {
        return Err(OpsError::Workflow("parameter path is empty".into()));
    };

    let mut current: &mut Map<String, Value> = &mut node.parameters;
    for segment in parents {
        let entry = current
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        current = entry.as_object_mut().ok_or_else(|| {
            OpsError::Workflow(format!(
                "parameter '{segment}' of node '{node_name}' is not an object"
            ))
        })?;
    }
    Ok(current.insert((*last).to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn execution(id: &str, status: &str, started: &str, error: Option<&str>) -> Execution {
        let data = error.map(|message| {
            json!({"resultData": {"error": {"message": message}, "lastNodeExecuted": "Send CR"}})
        });
        serde_json::from_value(json!({
            "id": id,
            "finished": status == "success",
            "status": status,
            "startedAt": started,
            "workflowId": "wf-1",
            "data": data,
        }))
        .unwrap()
    }

    #[test]
    fn summary_counts_and_rates() {
        let executions = [
            execution("1", "success", "2025-10-14T08:00:00Z", None),
            execution("2", "error", "2025-10-14T09:00:00Z", Some("You have reached your weekly limit")),
            execution("3", "crashed", "2025-10-14T10:00:00Z", None),
            execution("4", "running", "2025-10-14T11:00:00Z", None),
        ];
        let summary = summarize(&executions);

        assert_eq!(summary.total, 4);
        assert_eq!(summary.failed, 2);
        assert!((summary.failure_rate - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.by_status.get("crashed"), Some(&1));

        let ids: Vec<_> = summary.recent_failures.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "2"]);
        let weekly = &summary.recent_failures[1];
        assert_eq!(
            weekly.error.as_deref(),
            Some("Send CR: You have reached your weekly limit")
        );
        assert_eq!(weekly.category, Some(ErrorCategory::WeeklyLimit));
        assert_eq!(summary.recent_failures[0].category, None);
    }

    #[test]
    fn empty_summary_has_zero_rate() {
        let summary = summarize(&[]);
        assert_eq!(summary.total, 0);
        assert!(summary.failure_rate.abs() < f64::EPSILON);
    }

    fn workflow() -> Workflow {
        serde_json::from_value(json!({
            "id": "wf-1",
            "name": "Connector",
            "nodes": [
                {"name": "Wait", "type": "n8n-nodes-base.wait", "parameters": {"amount": 2, "unit": "days"}, "position": [0, 0]},
            ],
        }))
        .unwrap()
    }

    #[test]
    fn sets_nested_parameters() {
        let mut wf = workflow();
        let previous = set_node_parameter(&mut wf, "Wait", "amount", json!(5)).unwrap();
        assert_eq!(previous, Some(json!(2)));

        set_node_parameter(&mut wf, "Wait", "options.resume.mode", json!("webhook")).unwrap();
        let node = wf.node("Wait").unwrap();
        assert_eq!(node.parameters["amount"], json!(5));
        assert_eq!(node.parameters["options"]["resume"]["mode"], json!("webhook"));
        assert_eq!(node.extra["position"], json!([0, 0]));
    }

    #[test]
    fn rejects_missing_node_and_bad_paths() {
        let mut wf = workflow();
        assert!(matches!(
            set_node_parameter(&mut wf, "Nope", "amount", json!(1)),
            Err(OpsError::Workflow(message)) if message.contains("no node named 'Nope'")
        ));
        assert!(set_node_parameter(&mut wf, "Wait", " . ", json!(1)).is_err());
        assert!(set_node_parameter(&mut wf, "Wait", "unit.inner", json!(1)).is_err());
    }
}

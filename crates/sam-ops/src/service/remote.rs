//! Unipile and N8N operations.

use serde::Serialize;
use serde_json::{Value, json};

use sam_api::n8n::{Execution, ExecutionFilter};
use sam_api::unipile::UnipileAccount;

use super::OpsService;
use crate::diagnose::{AccountDiagnosis, ProfileCheck, diagnose};
use crate::error::OpsError;
use crate::executions::{ExecutionSummary, NodeEdit, set_node_parameter, summarize};
use crate::journal::Outcome;

/// Invitations fetched when counting an account's pending requests.
const INVITATION_SAMPLE: usize = 100;

/// Executions with their summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionListing {
    pub summary: ExecutionSummary,
    pub executions: Vec<Execution>,
}

impl OpsService {
    /// Every account connected to Unipile.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::Api`] when Unipile is not configured or the call
    /// fails.
    pub async fn unipile_accounts(&self) -> Result<Vec<UnipileAccount>, OpsError> {
        Ok(self.clients().unipile()?.list_accounts().await?)
    }

    /// Account state, pending invitations, and a lookup per profile.
    ///
    /// Profile lookups are made one after another; a failed lookup becomes
    /// a classified finding instead of an error.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::Api`] when Unipile is not configured or the
    /// account itself cannot be fetched.
    pub async fn diagnose_account(&self, account_id: &str, profiles: &[String]) -> Result<AccountDiagnosis, OpsError> {
        let unipile = self.clients().unipile()?;
        let account = unipile.get_account(account_id).await?;

        let pending = match unipile.list_sent_invitations(account_id, INVITATION_SAMPLE).await {
            Ok(invitations) => Some(invitations.len()),
            Err(err) => {
                tracing::warn!(account = account_id, error = %err, "could not list sent invitations");
                None
            }
        };

        let mut checks = Vec::with_capacity(profiles.len());
        for profile in profiles {
            let lookup = unipile.get_profile(account_id, profile).await;
            checks.push(ProfileCheck::from_lookup(profile, lookup));
        }
        Ok(diagnose(&account, pending, checks))
    }

    /// Recent executions and their summary.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::Api`] when N8N is not configured or the call
    /// fails.
    pub async fn n8n_executions(&self, filter: &ExecutionFilter) -> Result<ExecutionListing, OpsError> {
        let executions = self.clients().n8n()?.list_executions(filter).await?;
        Ok(ExecutionListing {
            summary: summarize(&executions),
            executions,
        })
    }

    /// Change one node parameter of a workflow. Only a preview unless
    /// `confirm`; the update is journaled.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::Workflow`] when the node or path is invalid,
    /// [`OpsError::Api`] if a call fails, or [`OpsError::Journal`] if the
    /// journal cannot be written.
    pub async fn set_node_param(
        &self,
        workflow_id: &str,
        node: &str,
        path: &str,
        value: Value,
        confirm: bool,
    ) -> Result<NodeEdit, OpsError> {
        let n8n = self.clients().n8n()?;
        let mut workflow = n8n.get_workflow(workflow_id).await?;
        let previous = set_node_parameter(&mut workflow, node, path, value.clone())?;
        let mut edit = NodeEdit {
            workflow_id: workflow.id.clone(),
            workflow_name: workflow.name.clone(),
            node: node.to_string(),
            path: path.to_string(),
            previous,
            value,
            applied: false,
        };
        if !confirm {
            tracing::info!(workflow = workflow_id, node, path, "dry run, workflow not updated");
            return Ok(edit);
        }

        let changes = json!({
            "node": edit.node,
            "path": edit.path,
            "previous": edit.previous,
            "value": edit.value,
        });
        match n8n.update_workflow(&workflow).await {
            Ok(_) => {
                tracing::info!(workflow = workflow_id, node, path, "workflow parameter updated");
                self.journal()
                    .record("workflow_update", "n8n_workflows", workflow_id, changes, Outcome::Applied { rows: 1 })?;
                edit.applied = true;
                Ok(edit)
            }
            Err(err) => {
                self.journal().record(
                    "workflow_update",
                    "n8n_workflows",
                    workflow_id,
                    changes,
                    Outcome::Failed { error: err.to_string() },
                )?;
                Err(err.into())
            }
        }
    }
}

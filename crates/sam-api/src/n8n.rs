//! N8N workflow engine client: executions, workflow definitions, webhooks.

use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::http::check_response;

const SERVICE: &str = "n8n";

/// Upper bound on pages followed by [`N8nClient::list_executions`].
const MAX_PAGES: usize = 50;

// ── Types ──────────────────────────────────────────────────────────

/// N8N ids are strings in newer versions and numbers in older ones.
fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn opt_id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let id = id_string(deserializer)?;
    Ok((!id.is_empty()).then_some(id))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub mode: Option<String>,
    /// `success`, `error`, `crashed`, `waiting`, `running`, `canceled`.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub stopped_at: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub workflow_id: Option<String>,
    /// Run data; only present when requested with `includeData`.
    #[serde(default)]
    pub data: Option<Value>,
}

impl Execution {
    /// Status, inferring `success`/`error` from `finished` for old payloads.
    #[must_use]
    pub fn effective_status(&self) -> &str {
        match self.status.as_deref() {
            Some(status) if !status.is_empty() => status,
            _ if self.finished => "success",
            _ if self.stopped_at.is_some() => "error",
            _ => "running",
        }
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self.effective_status(), "error" | "crashed" | "failed")
    }

    /// Error message recorded in the run data, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        let result = self.data.as_ref()?.get("resultData")?;
        let error = result.get("error")?;
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| error.get("description").and_then(Value::as_str))?;
        let node = result.get("lastNodeExecuted").and_then(Value::as_str);
        Some(node.map_or_else(|| message.to_string(), |node| format!("{node}: {message}")))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionFilter {
    pub workflow_id: Option<String>,
    pub status: Option<String>,
    /// Total executions to return.
    pub limit: usize,
    pub include_data: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExecutionPage {
    #[serde(default)]
    data: Vec<Execution>,
    #[serde(default)]
    next_cursor: Option<String>,
}

/// A workflow definition. Node fields this tool does not touch are carried
/// through `extra` so a PUT round-trips them unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub nodes: Vec<WorkflowNode>,
    #[serde(default)]
    pub connections: Value,
    #[serde(default)]
    pub settings: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowNode {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Workflow {
    #[must_use]
    pub fn node(&self, name: &str) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|node| node.name == name)
    }

    pub fn node_mut(&mut self, name: &str) -> Option<&mut WorkflowNode> {
        self.nodes.iter_mut().find(|node| node.name == name)
    }
}

/// Body of the workflow update call; the public API rejects read-only fields.
#[derive(Serialize)]
struct WorkflowUpdate<'a> {
    name: &'a str,
    nodes: &'a [WorkflowNode],
    connections: &'a Value,
    settings: &'a Value,
}

/// Status and body returned by a webhook call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookResponse {
    pub status: u16,
    pub body: String,
}

// ── Client ─────────────────────────────────────────────────────────

/// HTTP client for one N8N instance. The REST API and webhooks are
/// configured separately; either may be absent.
#[derive(Debug, Clone)]
pub struct N8nClient {
    http: reqwest::Client,
    api_base: Option<String>,
    api_key: String,
    webhook_base: Option<String>,
}

impl N8nClient {
    pub fn new(
        http: reqwest::Client,
        api_base: Option<String>,
        api_key: impl Into<String>,
        webhook_base: Option<String>,
    ) -> Self {
        let trim = |url: String| url.trim_end_matches('/').to_string();
        Self {
            http,
            api_base: api_base.map(trim),
            api_key: api_key.into(),
            webhook_base: webhook_base.map(trim),
        }
    }

    fn api_url(&self, path: &str) -> Result<String, ApiError> {
        let base = self
            .api_base
            .as_deref()
            .ok_or_else(|| ApiError::NotConfigured("N8N API URL is not configured".into()))?;
        Ok(format!("{base}/{path}"))
    }

    fn headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&self.api_key)
            .map_err(|_| ApiError::NotConfigured("N8N API key is not a valid header value".into()))?;
        headers.insert("X-N8N-API-KEY", key);
        headers.insert(reqwest::header::ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    async fn get<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T, ApiError> {
        let url = self.api_url(path_and_query)?;
        tracing::debug!(%url, "n8n get");
        let resp = self.http.get(&url).headers(self.headers()?).send().await?;
        let resp = check_response(SERVICE, resp).await?;
        resp.json()
            .await
            .map_err(|e| ApiError::Decode(format!("n8n {path_and_query}: {e}")))
    }

    /// Executions matching `filter`, newest first, following `nextCursor`
    /// until `filter.limit` executions are collected.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status, or decode failure.
    pub async fn list_executions(&self, filter: &ExecutionFilter) -> Result<Vec<Execution>, ApiError> {
        let wanted = filter.limit.max(1);
        let mut executions = Vec::new();
        let mut cursor: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let page_size = (wanted - executions.len()).min(250);
            let mut params = vec![format!("limit={page_size}")];
            if let Some(workflow_id) = &filter.workflow_id {
                params.push(format!("workflowId={}", urlencoding::encode(workflow_id)));
            }
            if let Some(status) = &filter.status {
                params.push(format!("status={}", urlencoding::encode(status)));
            }
            if filter.include_data {
                params.push("includeData=true".to_string());
            }
            if let Some(cursor) = &cursor {
                params.push(format!("cursor={}", urlencoding::encode(cursor)));
            }

            let page: ExecutionPage = self.get(&format!("executions?{}", params.join("&"))).await?;
            executions.extend(page.data);
            cursor = page.next_cursor.filter(|c| !c.is_empty());
            if executions.len() >= wanted || cursor.is_none() {
                break;
            }
        }

        executions.truncate(wanted);
        Ok(executions)
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status, or decode failure.
    pub async fn get_execution(&self, id: &str, include_data: bool) -> Result<Execution, ApiError> {
        self.get(&format!(
            "executions/{}?includeData={include_data}",
            urlencoding::encode(id)
        ))
        .await
    }

    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status, or decode failure.
    pub async fn get_workflow(&self, id: &str) -> Result<Workflow, ApiError> {
        self.get(&format!("workflows/{}", urlencoding::encode(id))).await
    }

    /// Replace a workflow's name, nodes, connections and settings.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport, status, or decode failure.
    pub async fn update_workflow(&self, workflow: &Workflow) -> Result<Workflow, ApiError> {
        let url = self.api_url(&format!("workflows/{}", urlencoding::encode(&workflow.id)))?;
        tracing::info!(workflow_id = %workflow.id, nodes = workflow.nodes.len(), "n8n update workflow");
        let body = WorkflowUpdate {
            name: &workflow.name,
            nodes: &workflow.nodes,
            connections: &workflow.connections,
            settings: &workflow.settings,
        };
        let resp = self
            .http
            .put(&url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await?;
        let resp = check_response(SERVICE, resp).await?;
        resp.json()
            .await
            .map_err(|e| ApiError::Decode(format!("n8n update workflow: {e}")))
    }

    /// POST `payload` to a webhook. `target` is either a full URL or a path
    /// under the configured webhook base.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotConfigured`] when `target` is a path and no
    /// webhook base is set, otherwise transport or status errors.
    pub async fn trigger_webhook<P: Serialize + ?Sized>(
        &self,
        target: &str,
        payload: &P,
    ) -> Result<WebhookResponse, ApiError> {
        let url = if target.starts_with("http://") || target.starts_with("https://") {
            target.to_string()
        } else {
            let base = self
                .webhook_base
                .as_deref()
                .ok_or_else(|| ApiError::NotConfigured("N8N webhook URL is not configured".into()))?;
            format!("{base}/{}", target.trim_start_matches('/'))
        };
        tracing::info!(%url, "n8n trigger webhook");
        let resp = self.http.post(&url).json(payload).send().await?;
        let resp = check_response(SERVICE, resp).await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(WebhookResponse { status, body })
    }
}

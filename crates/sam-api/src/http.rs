//! Shared HTTP response helpers for the service clients.
//!
//! Centralizes status-code checks (429 rate limiting with `Retry-After`
//! parsing, PostgREST error bodies, provider error bodies) so the client
//! modules stay focused on request construction and response mapping.

use serde::Deserialize;
use std::time::Duration;

use crate::error::ApiError;

const TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Build the `reqwest` client shared by all services.
pub fn build_client() -> Result<reqwest::Client, ApiError> {
    Ok(reqwest::Client::builder()
        .user_agent(concat!("samops/", env!("CARGO_PKG_VERSION")))
        .timeout(TIMEOUT)
        .build()?)
}

/// Check a Unipile/N8N response.
///
/// Returns the response unchanged on success. Handles:
/// - **429 Too Many Requests** → [`ApiError::RateLimited`]
/// - **Non-success status** → [`ApiError::Api`] with the provider's message
pub async fn check_response(
    service: &'static str,
    resp: reqwest::Response,
) -> Result<reqwest::Response, ApiError> {
    if resp.status() == 429 {
        return Err(ApiError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::Api {
            service,
            status,
            message: provider_message(&body),
        });
    }
    Ok(resp)
}

/// Check a PostgREST response, decoding `{code, message, details, hint}`
/// error bodies into [`ApiError::Postgrest`].
pub async fn check_postgrest_response(
    resp: reqwest::Response,
) -> Result<reqwest::Response, ApiError> {
    if resp.status() == 429 {
        return Err(ApiError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        return Err(postgrest_error(status, &body));
    }
    Ok(resp)
}

#[derive(Deserialize)]
struct PostgrestErrorBody {
    code: Option<String>,
    message: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

fn postgrest_error(status: u16, body: &str) -> ApiError {
    match serde_json::from_str::<PostgrestErrorBody>(body) {
        Ok(err) if err.code.is_some() || err.message.is_some() => ApiError::Postgrest {
            status,
            code: err.code.unwrap_or_default(),
            message: err.message.unwrap_or_default(),
            details: err.details,
            hint: err.hint,
        },
        _ => ApiError::Api {
            service: "postgrest",
            status,
            message: body.trim().to_string(),
        },
    }
}

/// Best human-readable message from a provider error body.
///
/// Unipile uses `{title, detail, type}`; N8N and GoTrue use `{message}` or
/// `{error, error_description}`. Anything else is returned verbatim.
fn provider_message(body: &str) -> String {
    let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };
    let field = |key: &str| {
        map.get(key)
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    let mut parts = Vec::new();
    for key in ["title", "message", "error", "detail", "error_description"] {
        if let Some(value) = field(key) {
            if !parts.contains(&value) {
                parts.push(value);
            }
        }
    }
    let mut message = if parts.is_empty() {
        body.trim().to_string()
    } else {
        parts.join(": ")
    };
    if let Some(kind) = field("type") {
        message = format!("{message} ({kind})");
    }
    message
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

//! Placeholder substitution for campaign message templates.
//!
//! Templates use `{first_name}` style placeholders; older campaigns were
//! written with the double-brace `{{first_name}}` form, so both are accepted.

use crate::entities::CampaignProspect;

/// Greeting used when the prospect has no first name.
pub const FIRST_NAME_FALLBACK: &str = "there";

/// Substitute prospect fields into a template.
///
/// Unknown placeholders are left untouched so that
/// [`unresolved_placeholders`] can report them.
///
/// ```
/// # use sam_core::personalize::personalize;
/// # use sam_core::entities::CampaignProspect;
/// let prospect: CampaignProspect = serde_json::from_str(
///     r#"{"id":"p1","campaign_id":"c1","first_name":"Ada","company_name":"Acme"}"#,
/// ).unwrap();
/// assert_eq!(personalize("Hi {first_name} at {{company}}", &prospect), "Hi Ada at Acme");
/// ```
#[must_use]
pub fn personalize(template: &str, prospect: &CampaignProspect) -> String {
    let field = |value: &Option<String>| value.as_deref().map(str::trim).unwrap_or_default().to_string();
    substitute(template, |key| match key {
        "first_name" => Some(
            prospect
                .first_name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .unwrap_or(FIRST_NAME_FALLBACK)
                .to_string(),
        ),
        "last_name" => Some(field(&prospect.last_name)),
        "company_name" | "company" => Some(field(&prospect.company_name)),
        "title" | "job_title" => Some(field(&prospect.title)),
        _ => None,
    })
}

/// Placeholder names still present in `text`, in order of appearance.
#[must_use]
pub fn unresolved_placeholders(text: &str) -> Vec<String> {
    let mut found = Vec::new();
    substitute(text, |key| {
        found.push(key.to_string());
        None
    });
    found
}

/// Whether a personalized message is fit to send: not blank, no leftover
/// placeholders and no stringified `undefined`/`null` values.
#[must_use]
pub fn is_sendable(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty()
        && unresolved_placeholders(trimmed).is_empty()
        && !trimmed
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| word == "undefined" || word == "null")
}

/// Walk `template`, replacing each `{key}` / `{{key}}` for which `lookup`
/// returns a value.
fn substitute<F>(template: &str, mut lookup: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];
        let double = candidate.starts_with("{{");
        let (open, close) = if double { ("{{", "}}") } else { ("{", "}") };

        let body = &candidate[open.len()..];
        let key_len = body
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(body.len());
        let key = &body[..key_len];

        if !key.is_empty() && body[key_len..].starts_with(close) {
            let token_len = open.len() + key_len + close.len();
            match lookup(&key.to_ascii_lowercase()) {
                Some(value) => out.push_str(&value),
                None => out.push_str(&candidate[..token_len]),
            }
            rest = &candidate[token_len..];
        } else {
            out.push('{');
            rest = &candidate[1..];
        }
    }

    out.push_str(rest);
    out
}

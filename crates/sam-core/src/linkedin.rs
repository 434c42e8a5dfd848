//! LinkedIn profile URL parsing.
//!
//! Prospect rows store whatever the upload contained: full URLs with or
//! without scheme and `www.`, country subdomains, tracking query strings,
//! trailing slashes, relative `/in/` paths, or a bare vanity name. Everything
//! downstream (dedup, sender payloads, profile lookups) keys on the normalized
//! vanity slug.

const PROFILE_PREFIX: &str = "/in/";
const LINKEDIN_HOST: &str = "linkedin.com";

/// Extract the lowercase vanity slug from a LinkedIn profile reference.
///
/// ```
/// use sam_core::linkedin::vanity_slug;
///
/// assert_eq!(vanity_slug("https://www.linkedin.com/in/John-Doe-123/").as_deref(), Some("john-doe-123"));
/// assert_eq!(vanity_slug("linkedin.com/in/jane?trk=abc").as_deref(), Some("jane"));
/// assert_eq!(vanity_slug("https://www.linkedin.com/company/acme"), None);
/// ```
#[must_use]
pub fn vanity_slug(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let without_query = trimmed.split(['?', '#']).next().unwrap_or_default();
    let rest = strip_scheme(without_query);

    let (had_host, path) = match split_linkedin_host(rest) {
        Some(path) => (true, path),
        None if rest.contains('/') && !rest.starts_with('/') && !rest.starts_with("in/") => {
            // Some other host, or a path we do not understand.
            return None;
        }
        None => (false, rest),
    };

    let path = path.trim_end_matches('/');
    let segment = if let Some(after) = path.strip_prefix(PROFILE_PREFIX) {
        after.split('/').next().unwrap_or_default()
    } else if let Some(after) = path.strip_prefix("in/") {
        after.split('/').next().unwrap_or_default()
    } else if !had_host && !path.contains('/') {
        path
    } else {
        return None;
    };

    normalize_segment(segment)
}

/// Canonical profile URL for a vanity slug.
#[must_use]
pub fn profile_url(slug: &str) -> String {
    format!("https://www.linkedin.com/in/{}", slug.trim().trim_matches('/'))
}

/// Whether the value looks like a LinkedIn member provider id rather than a
/// vanity name (`ACoAA…` ids or `urn:li:…` URNs).
#[must_use]
pub fn is_provider_id(value: &str) -> bool {
    let value = value.trim();
    value.starts_with("ACoA") || value.starts_with("urn:li:")
}

/// Member id from a URN such as `urn:li:fs_miniProfile:ACoAAB…`.
#[must_use]
pub fn provider_id_from_urn(urn: &str) -> Option<&str> {
    let urn = urn.trim();
    if !urn.starts_with("urn:li:") {
        return None;
    }
    urn.rsplit(':').next().filter(|id| !id.is_empty())
}

fn strip_scheme(value: &str) -> &str {
    for scheme in ["https://", "http://"] {
        if value
            .get(..scheme.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(scheme))
        {
            return &value[scheme.len()..];
        }
    }
    value
}

/// If `value` starts with a `linkedin.com` host (optionally with a
/// subdomain such as `www.` or `uk.`), return the path after it.
fn split_linkedin_host(value: &str) -> Option<&str> {
    let host_end = value.find('/').unwrap_or(value.len());
    let host = value[..host_end].to_ascii_lowercase();
    let is_linkedin = host == LINKEDIN_HOST || host.ends_with(".linkedin.com");
    is_linkedin.then(|| &value[host_end..])
}

fn normalize_segment(segment: &str) -> Option<String> {
    let decoded = urlencoding::decode(segment)
        .map_or_else(|_| segment.to_string(), std::borrow::Cow::into_owned);
    let slug = decoded.trim().to_lowercase();
    let valid = !slug.is_empty()
        && !slug.chars().any(|c| c.is_whitespace() || c == '@' || c == '/');
    valid.then_some(slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://www.linkedin.com/in/john-doe-123/", Some("john-doe-123"))]
    #[case("http://linkedin.com/in/john-doe/", Some("john-doe"))]
    #[case("https://linkedin.com/in/john-doe?param=1", Some("john-doe"))]
    #[case("linkedin.com/in/JOHN-DOE/", Some("john-doe"))]
    #[case("HTTPS://WWW.LINKEDIN.COM/in/Mixed", Some("mixed"))]
    #[case("https://uk.linkedin.com/in/brit-person", Some("brit-person"))]
    #[case("https://www.linkedin.com/in/adam-h-fry/details/experience/", Some("adam-h-fry"))]
    #[case("https://www.linkedin.com/in/j%C3%BCrgen-m", Some("jürgen-m"))]
    #[case("https://www.linkedin.com/in/anchor#about", Some("anchor"))]
    #[case("/in/relative-path", Some("relative-path"))]
    #[case("in/no-leading-slash", Some("no-leading-slash"))]
    #[case("rubenmayer", Some("rubenmayer"))]
    #[case("  padded-slug  ", Some("padded-slug"))]
    fn extracts_slug(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(vanity_slug(input).as_deref(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("https://www.linkedin.com/company/acme")]
    #[case("https://www.linkedin.com/feed/update/urn:li:activity:1")]
    #[case("https://www.linkedin.com/in/")]
    #[case("https://example.com/in/someone")]
    #[case("https://notlinkedin.com/in/someone")]
    #[case("someone@example.com")]
    #[case("John Doe")]
    fn rejects_non_profile_input(#[case] input: &str) {
        assert_eq!(vanity_slug(input), None);
    }

    #[test]
    fn profile_url_is_canonical() {
        assert_eq!(
            profile_url("/jane-doe/"),
            "https://www.linkedin.com/in/jane-doe"
        );
    }

    #[test]
    fn slug_roundtrips_through_profile_url() {
        let slug = vanity_slug("linkedin.com/in/Round-Trip").unwrap();
        assert_eq!(vanity_slug(&profile_url(&slug)).as_deref(), Some("round-trip"));
    }

    #[test]
    fn detects_provider_ids() {
        assert!(is_provider_id("ACoAAASEFSgBmAsKhHk1EZVHn93R--zoSI16F0c"));
        assert!(is_provider_id("urn:li:fs_miniProfile:ACoAABeQoWM"));
        assert!(!is_provider_id("rubenmayer"));
        assert_eq!(
            provider_id_from_urn("urn:li:fs_miniProfile:ACoAABeQoWM"),
            Some("ACoAABeQoWM")
        );
        assert_eq!(provider_id_from_urn("ACoAABeQoWM"), None);
    }
}

//! Client for the hosted Postgres REST API (PostgREST) and the GoTrue admin
//! user listing.

use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use sam_core::entities::AuthUser;

use crate::error::ApiError;
use crate::http::check_postgrest_response;
use crate::query::Query;

/// Page size used by [`PostgrestClient::select_all`] when the query has no
/// limit of its own. PostgREST's default `max-rows` on Supabase is 1000.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Values per `in.(...)` filter in [`PostgrestClient::select_all_in`]. Keeps
/// request URLs well under proxy limits with uuid keys.
pub const IN_LIST_CHUNK: usize = 100;

const AUTH_USERS_PER_PAGE: usize = 1000;

/// Service-role client for PostgREST.
#[derive(Debug, Clone)]
pub struct PostgrestClient {
    http: reqwest::Client,
    rest_url: String,
    auth_url: String,
    key: String,
}

#[derive(Deserialize)]
struct AuthUserPage {
    #[serde(default)]
    users: Vec<AuthUser>,
}

impl PostgrestClient {
    /// `rest_url` and `auth_url` must end with `/`.
    pub fn new(
        http: reqwest::Client,
        rest_url: impl Into<String>,
        auth_url: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            rest_url: rest_url.into(),
            auth_url: auth_url.into(),
            key: key.into(),
        }
    }

    fn table_url(&self, table: &str, query: &Query) -> String {
        let qs = query.to_query_string();
        if qs.is_empty() {
            format!("{}{table}", self.rest_url)
        } else {
            format!("{}{table}?{qs}", self.rest_url)
        }
    }

    fn headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&self.key)
            .map_err(|_| ApiError::NotConfigured("service role key is not a valid header value".into()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.key))
            .map_err(|_| ApiError::NotConfigured("service role key is not a valid header value".into()))?;
        headers.insert("apikey", key);
        headers.insert(reqwest::header::AUTHORIZATION, bearer);
        Ok(headers)
    }

    /// `GET /rest/v1/{table}?{query}`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, a PostgREST error body, or a
    /// response that does not decode into `T`.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &Query,
    ) -> Result<Vec<T>, ApiError> {
        let url = self.table_url(table, query);
        tracing::debug!(%url, "postgrest select");
        let resp = self.http.get(&url).headers(self.headers()?).send().await?;
        let resp = check_postgrest_response(resp).await?;
        decode(resp, table).await
    }

    /// First row matching `query`, or `None`.
    ///
    /// # Errors
    ///
    /// See [`Self::select`].
    pub async fn select_one<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &Query,
    ) -> Result<Option<T>, ApiError> {
        let rows = self.select(table, &query.clone().limit(1)).await?;
        Ok(rows.into_iter().next())
    }

    /// Page through every row matching `query`, `page_size` rows at a time,
    /// until a short page comes back.
    ///
    /// Offsets are only stable under a total order, so a query without one is
    /// ordered by `id` ascending.
    ///
    /// # Errors
    ///
    /// See [`Self::select`].
    pub async fn select_all<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &Query,
    ) -> Result<Vec<T>, ApiError> {
        let page_size = query.limit_value().unwrap_or(DEFAULT_PAGE_SIZE).max(1);
        let mut offset = query.offset_value().unwrap_or(0);
        let query = if query.has_order() {
            query.clone()
        } else {
            query.clone().order("id", true)
        };
        let mut rows = Vec::new();
        loop {
            let page: Vec<T> = self
                .select(table, &query.clone().limit(page_size).offset(offset))
                .await?;
            let fetched = page.len();
            rows.extend(page);
            if fetched < page_size {
                break;
            }
            offset += fetched;
        }
        Ok(rows)
    }

    /// [`Self::select_all`] with `column=in.(values)` added, issued in chunks
    /// of [`IN_LIST_CHUNK`] values. Rows come back in chunk order.
    ///
    /// # Errors
    ///
    /// See [`Self::select`].
    pub async fn select_all_in<T, S>(
        &self,
        table: &str,
        query: &Query,
        column: &str,
        values: &[S],
    ) -> Result<Vec<T>, ApiError>
    where
        T: DeserializeOwned,
        S: AsRef<str>,
    {
        let mut rows = Vec::new();
        for chunk in values.chunks(IN_LIST_CHUNK) {
            let chunk_query = query.clone().in_list(column, chunk);
            rows.extend(self.select_all::<T>(table, &chunk_query).await?);
        }
        Ok(rows)
    }

    /// Exact row count via `Prefer: count=exact` and the `Content-Range`
    /// header (`0-0/123`, or `*/0` when empty).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] when the header is missing or malformed.
    pub async fn count(&self, table: &str, query: &Query) -> Result<u64, ApiError> {
        let url = self.table_url(table, &query.clone().select("id"));
        let resp = self
            .http
            .head(&url)
            .headers(self.headers()?)
            .header("Prefer", "count=exact")
            .send()
            .await?;
        let resp = check_postgrest_response(resp).await?;
        let range = resp
            .headers()
            .get(reqwest::header::CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Decode(format!("{table}: count response has no Content-Range")))?;
        parse_content_range_total(range)
            .ok_or_else(|| ApiError::Decode(format!("{table}: unparseable Content-Range '{range}'")))
    }

    /// `PATCH` the rows matching `query` and return them as updated.
    ///
    /// Callers compare the returned length with what they expected to catch
    /// filters that silently matched nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnfilteredMutation`] when `query` has no filter,
    /// otherwise see [`Self::select`].
    pub async fn update<T, P>(&self, table: &str, query: &Query, patch: &P) -> Result<Vec<T>, ApiError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        if !query.has_filters() {
            return Err(ApiError::UnfilteredMutation {
                operation: "update",
                table: table.to_string(),
            });
        }
        let url = self.table_url(table, query);
        tracing::info!(table, filter = %query, "postgrest update");
        let resp = self
            .http
            .patch(&url)
            .headers(self.headers()?)
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;
        let resp = check_postgrest_response(resp).await?;
        decode(resp, table).await
    }

    /// `POST` one row or an array of rows.
    ///
    /// # Errors
    ///
    /// See [`Self::select`].
    pub async fn insert<T, R>(&self, table: &str, rows: &R) -> Result<Vec<T>, ApiError>
    where
        T: DeserializeOwned,
        R: Serialize + ?Sized,
    {
        let url = format!("{}{table}", self.rest_url);
        tracing::info!(table, "postgrest insert");
        let resp = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .header("Prefer", "return=representation")
            .json(rows)
            .send()
            .await?;
        let resp = check_postgrest_response(resp).await?;
        decode(resp, table).await
    }

    /// `DELETE` the rows matching `query`; returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnfilteredMutation`] when `query` has no filter,
    /// otherwise see [`Self::select`].
    pub async fn delete(&self, table: &str, query: &Query) -> Result<u64, ApiError> {
        if !query.has_filters() {
            return Err(ApiError::UnfilteredMutation {
                operation: "delete",
                table: table.to_string(),
            });
        }
        let url = self.table_url(table, query);
        tracing::info!(table, filter = %query, "postgrest delete");
        let resp = self
            .http
            .delete(&url)
            .headers(self.headers()?)
            .header("Prefer", "return=representation")
            .send()
            .await?;
        let resp = check_postgrest_response(resp).await?;
        let removed: Vec<serde_json::Value> = decode(resp, table).await?;
        Ok(u64::try_from(removed.len()).unwrap_or(u64::MAX))
    }

    /// Whether `table` is exposed by PostgREST at all.
    ///
    /// # Errors
    ///
    /// Propagates errors other than "table missing".
    pub async fn table_exists(&self, table: &str) -> Result<bool, ApiError> {
        match self
            .select::<serde_json::Value>(table, &Query::new().limit(1))
            .await
        {
            Ok(_) => Ok(true),
            Err(err) if err.is_missing_table() || err.status() == Some(404) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Every user known to the auth service, via the admin API.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport or decode failure.
    pub async fn list_auth_users(&self) -> Result<Vec<AuthUser>, ApiError> {
        let mut users = Vec::new();
        let mut page = 1_usize;
        loop {
            let url = format!(
                "{}users?page={page}&per_page={AUTH_USERS_PER_PAGE}",
                self.auth_url
            );
            let resp = self.http.get(&url).headers(self.headers()?).send().await?;
            let resp = check_postgrest_response(resp).await?;
            let body: AuthUserPage = resp
                .json()
                .await
                .map_err(|e| ApiError::Decode(format!("auth users page {page}: {e}")))?;
            let fetched = body.users.len();
            users.extend(body.users);
            if fetched < AUTH_USERS_PER_PAGE {
                break;
            }
            page += 1;
        }
        tracing::debug!(count = users.len(), "listed auth users");
        Ok(users)
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response, table: &str) -> Result<Vec<T>, ApiError> {
    let body = resp.text().await?;
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&body).map_err(|e| ApiError::Decode(format!("{table}: {e}")))
}

/// Total from a `Content-Range` value such as `0-24/3573` or `*/0`.
fn parse_content_range_total(value: &str) -> Option<u64> {
    let (_, total) = value.trim().rsplit_once('/')?;
    total.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0-0/123", Some(123))]
    #[case("*/0", Some(0))]
    #[case("0-24/3573", Some(3573))]
    #[case("0-24/*", None)]
    #[case("garbage", None)]
    fn parses_content_range(#[case] value: &str, #[case] expected: Option<u64>) {
        assert_eq!(parse_content_range_total(value), expected);
    }

    #[test]
    fn table_url_includes_query() {
        let client = PostgrestClient::new(
            reqwest::Client::new(),
            "https://x.supabase.co/rest/v1/",
            "https://x.supabase.co/auth/v1/admin/",
            "key",
        );
        assert_eq!(
            client.table_url("campaigns", &Query::by_id("c1")),
            "https://x.supabase.co/rest/v1/campaigns?id=eq.c1"
        );
        assert_eq!(
            client.table_url("campaigns", &Query::new()),
            "https://x.supabase.co/rest/v1/campaigns"
        );
    }
}

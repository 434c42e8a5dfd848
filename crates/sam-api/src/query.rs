//! PostgREST query-string builder.
//!
//! Renders horizontal filters (`status=eq.active`), `select`, `order`,
//! `limit` and `offset` in the syntax PostgREST expects. Values are
//! percent-encoded; the structural characters of the filter grammar are left
//! readable since PostgREST decodes the whole value before parsing it.

use std::fmt::{self, Display};

/// A PostgREST read/write filter set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Vec<String>,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for `Query::new().eq("id", id)`.
    #[must_use]
    pub fn by_id(id: &str) -> Self {
        Self::new().eq("id", id)
    }

    /// Columns to return, e.g. `"id,status,campaigns(name)"`.
    #[must_use]
    pub fn select(mut self, columns: &str) -> Self {
        let columns: String = columns.chars().filter(|c| !c.is_whitespace()).collect();
        self.select = Some(columns);
        self
    }

    fn filter(mut self, column: &str, operator: &str, value: impl Display) -> Self {
        self.filters
            .push((column.to_string(), format!("{operator}.{value}")));
        self
    }

    #[must_use]
    pub fn eq(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "eq", value)
    }

    #[must_use]
    pub fn neq(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "neq", value)
    }

    #[must_use]
    pub fn gt(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "gt", value)
    }

    #[must_use]
    pub fn gte(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "gte", value)
    }

    #[must_use]
    pub fn lt(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "lt", value)
    }

    #[must_use]
    pub fn lte(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "lte", value)
    }

    /// Case-insensitive pattern match; `*` is the wildcard.
    #[must_use]
    pub fn ilike(self, column: &str, pattern: &str) -> Self {
        self.filter(column, "ilike", pattern)
    }

    #[must_use]
    pub fn is_null(self, column: &str) -> Self {
        self.filter(column, "is", "null")
    }

    #[must_use]
    pub fn not_null(self, column: &str) -> Self {
        self.filter(column, "not.is", "null")
    }

    /// `column=in.(a,b,c)`. Values containing `,` `(` `)` or `"` are
    /// double-quoted.
    #[must_use]
    pub fn in_list<I, S>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rendered = values
            .into_iter()
            .map(|value| quote_list_value(value.as_ref()))
            .collect::<Vec<_>>()
            .join(",");
        self.filter(column, "in", format_args!("({rendered})"))
    }

    /// Raw logical disjunction, e.g. `status.eq.failed,status.eq.skipped`.
    #[must_use]
    pub fn or(mut self, expression: &str) -> Self {
        let trimmed = expression.trim();
        let wrapped = if trimmed.starts_with('(') && trimmed.ends_with(')') {
            trimmed.to_string()
        } else {
            format!("({trimmed})")
        };
        self.filters.push(("or".to_string(), wrapped));
        self
    }

    #[must_use]
    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.order.push(format!("{column}.{direction}"));
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Whether any row filter is present. Mutations require one.
    #[must_use]
    pub fn has_filters(&self) -> bool {
        !self.filters.is_empty()
    }

    #[must_use]
    pub fn has_order(&self) -> bool {
        !self.order.is_empty()
    }

    #[must_use]
    pub const fn limit_value(&self) -> Option<usize> {
        self.limit
    }

    #[must_use]
    pub const fn offset_value(&self) -> Option<usize> {
        self.offset
    }

    /// Render as a query string without the leading `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut parts = Vec::new();
        if let Some(select) = &self.select {
            parts.push(format!("select={}", encode(select)));
        }
        for (column, value) in &self.filters {
            parts.push(format!("{}={}", encode(column), encode(value)));
        }
        if !self.order.is_empty() {
            parts.push(format!("order={}", encode(&self.order.join(","))));
        }
        if let Some(limit) = self.limit {
            parts.push(format!("limit={limit}"));
        }
        if let Some(offset) = self.offset {
            parts.push(format!("offset={offset}"));
        }
        parts.join("&")
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

fn quote_list_value(value: &str) -> String {
    if value.contains([',', '(', ')', '"']) {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

/// Percent-encode, keeping the filter grammar's punctuation readable.
fn encode(value: &str) -> String {
    urlencoding::encode(value)
        .replace("%28", "(")
        .replace("%29", ")")
        .replace("%2C", ",")
        .replace("%2A", "*")
        .replace("%3A", ":")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_filters_in_order() {
        let query = Query::new()
            .select("id, status")
            .eq("status", "active")
            .in_list("id", ["a", "b"])
            .order("created_at", true)
            .limit(5);
        assert_eq!(
            query.to_query_string(),
            "select=id,status&status=eq.active&id=in.(a,b)&order=created_at.asc&limit=5"
        );
    }

    #[test]
    fn encodes_values() {
        let query = Query::new().eq("name", "Ada & Co").gte("created_at", "2025-10-14T09:30:00+00:00");
        assert_eq!(
            query.to_query_string(),
            "name=eq.Ada%20%26%20Co&created_at=gte.2025-10-14T09:30:00%2B00:00"
        );
    }

    #[test]
    fn quotes_reserved_list_values() {
        let query = Query::new().in_list("name", ["plain", "Doe, Jane", "say \"hi\""]);
        assert_eq!(
            query.to_query_string(),
            "name=in.(plain,%22Doe,%20Jane%22,%22say%20%5C%22hi%5C%22%22)"
        );
    }

    #[test]
    fn empty_in_list() {
        let query = Query::new().in_list("id", Vec::<String>::new());
        assert_eq!(query.to_query_string(), "id=in.()");
    }

    #[test]
    fn null_checks_and_or() {
        let query = Query::new()
            .is_null("user_id")
            .not_null("workspace_id")
            .or("status.eq.failed,status.eq.skipped");
        assert_eq!(
            query.to_query_string(),
            "user_id=is.null&workspace_id=not.is.null&or=(status.eq.failed,status.eq.skipped)"
        );
    }

    #[test]
    fn order_limit_offset() {
        let query = Query::new()
            .order("created_at", false)
            .order("id", true)
            .limit(100)
            .offset(200);
        assert_eq!(
            query.to_query_string(),
            "order=created_at.desc,id.asc&limit=100&offset=200"
        );
        assert!(!query.has_filters());
        assert!(Query::by_id("x").has_filters());
    }
}

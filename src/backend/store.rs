//! Content Store Contract
//!
//! Generic query interface over the site's named collections. Rows travel
//! as JSON objects; the typed helpers at the bottom decode them into the
//! content models.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

use super::error::{BackendError, BackendResult};

/// Collections held by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    BlogPosts,
    Executives,
    ContactMessages,
}

impl Table {
    pub const ALL: [Table; 3] = [Table::BlogPosts, Table::Executives, Table::ContactMessages];

    /// Collection name on the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::BlogPosts => "blog_posts",
            Table::Executives => "executives",
            Table::ContactMessages => "contact_messages",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Equality filter on one column
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub value: Value,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Sort order on one column
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub column: String,
    pub direction: Direction,
}

/// A select over one collection
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub table: Table,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Query {
    /// Select every row of `table`
    pub fn from(table: Table) -> Self {
        Self {
            table,
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Keep rows whose `column` equals `value`
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order = Some(Order {
            column: column.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Row storage consumed by the content services
#[async_trait(?Send)]
pub trait ContentStore {
    /// Rows matching `query`
    async fn select(&self, query: &Query) -> BackendResult<Vec<Value>>;

    /// Exact number of rows matching `query`'s filters (order and limit ignored)
    async fn count(&self, query: &Query) -> BackendResult<u64>;

    /// Insert one row; omitted columns take the collection's defaults
    async fn insert(&self, table: Table, row: Value) -> BackendResult<()>;

    /// Apply `patch` to the row with identifier `id`
    async fn update(&self, table: Table, id: &str, patch: Value) -> BackendResult<()>;

    /// Remove the row with identifier `id`
    async fn delete(&self, table: Table, id: &str) -> BackendResult<()>;
}

/// Select and decode rows
pub async fn fetch_all<T: DeserializeOwned>(
    store: &dyn ContentStore,
    query: &Query,
) -> BackendResult<Vec<T>> {
    store
        .select(query)
        .await?
        .into_iter()
        .map(|row| serde_json::from_value(row).map_err(BackendError::from))
        .collect()
}

/// Select at most one row and decode it
pub async fn fetch_optional<T: DeserializeOwned>(
    store: &dyn ContentStore,
    query: &Query,
) -> BackendResult<Option<T>> {
    let query = query.clone().limit(1);
    let mut rows = store.select(&query).await?;
    match rows.pop() {
        Some(row) => Ok(Some(serde_json::from_value(row)?)),
        None => Ok(None),
    }
}

/// Serialize a record into a row object
pub fn to_row<T: Serialize>(record: &T) -> BackendResult<Value> {
    Ok(serde_json::to_value(record)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_builder() {
        let query = Query::from(Table::BlogPosts)
            .eq("published", true)
            .order_by("created_at", Direction::Descending)
            .limit(3);

        assert_eq!(query.table, Table::BlogPosts);
        assert_eq!(query.filters[0].column, "published");
        assert_eq!(query.filters[0].value, json!(true));
        assert_eq!(query.order.as_ref().unwrap().direction, Direction::Descending);
        assert_eq!(query.limit, Some(3));
    }

    #[test]
    fn test_table_names() {
        let names: Vec<_> = Table::ALL.iter().map(Table::as_str).collect();
        assert_eq!(names, vec!["blog_posts", "executives", "contact_messages"]);
        assert_eq!(Table::Executives.to_string(), "executives");
    }
}

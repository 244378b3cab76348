//! PostgREST Content Store
//!
//! [`ContentStore`] over the backend's REST data API.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use super::client::BackendClient;
use super::error::{BackendError, BackendResult};
use super::store::{ContentStore, Direction, Query, Table};

/// Content store backed by `/rest/v1`
#[derive(Clone)]
pub struct RestStore {
    client: BackendClient,
}

impl RestStore {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    fn table_url(&self, table: Table) -> String {
        self.client.endpoint(&format!("rest/v1/{}", table.as_str()))
    }

    fn row_url(&self, table: Table, id: &str) -> String {
        format!("{}?id=eq.{}", self.table_url(table), urlencoding::encode(id))
    }
}

/// Query string for a select: `select=*&col=eq.v&order=col.desc&limit=n`
pub fn query_string(query: &Query) -> String {
    let mut params = vec!["select=*".to_string()];

    for filter in &query.filters {
        params.push(format!(
            "{}={}",
            urlencoding::encode(&filter.column),
            filter_operand(&filter.value)
        ));
    }

    if let Some(order) = &query.order {
        let direction = match order.direction {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        };
        params.push(format!("order={}.{}", urlencoding::encode(&order.column), direction));
    }

    if let Some(limit) = query.limit {
        params.push(format!("limit={}", limit));
    }

    params.join("&")
}

fn filter_operand(value: &Value) -> String {
    match value {
        Value::Null => "is.null".to_string(),
        Value::String(s) => format!("eq.{}", urlencoding::encode(s)),
        other => format!("eq.{}", urlencoding::encode(&other.to_string())),
    }
}

/// Total from a `Content-Range` header such as `0-9/42` or `*/42`
pub fn parse_content_range(header: &str) -> Option<u64> {
    header.rsplit_once('/')?.1.trim().parse().ok()
}

#[async_trait(?Send)]
impl ContentStore for RestStore {
    async fn select(&self, query: &Query) -> BackendResult<Vec<Value>> {
        let url = format!("{}?{}", self.table_url(query.table), query_string(query));
        let response = self.client.send(self.client.request(Method::GET, &url)).await?;

        let rows: Vec<Value> = response.json().await.map_err(BackendError::from_transport)?;
        tracing::debug!(table = %query.table, rows = rows.len(), "Selected rows");
        Ok(rows)
    }

    async fn count(&self, query: &Query) -> BackendResult<u64> {
        let mut counted = query.clone();
        counted.order = None;
        counted.limit = None;

        let url = format!("{}?{}", self.table_url(query.table), query_string(&counted));
        let request = self
            .client
            .request(Method::HEAD, &url)
            .header("Prefer", "count=exact");
        let response = self.client.send(request).await?;

        let range = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| BackendError::InvalidResponse("missing Content-Range".to_string()))?;

        parse_content_range(range)
            .ok_or_else(|| BackendError::InvalidResponse(format!("bad Content-Range: {}", range)))
    }

    async fn insert(&self, table: Table, row: Value) -> BackendResult<()> {
        let request = self
            .client
            .request(Method::POST, &self.table_url(table))
            .header("Prefer", "return=minimal")
            .json(&Value::Array(vec![row]));
        self.client.send(request).await?;

        tracing::info!(table = %table, "Inserted row");
        Ok(())
    }

    async fn update(&self, table: Table, id: &str, patch: Value) -> BackendResult<()> {
        let request = self
            .client
            .request(Method::PATCH, &self.row_url(table, id))
            .header("Prefer", "return=minimal")
            .json(&patch);
        self.client.send(request).await?;

        tracing::info!(table = %table, id = %id, "Updated row");
        Ok(())
    }

    async fn delete(&self, table: Table, id: &str) -> BackendResult<()> {
        let request = self.client.request(Method::DELETE, &self.row_url(table, id));
        self.client.send(request).await?;

        tracing::info!(table = %table, id = %id, "Deleted row");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;
    use httpmock::prelude::*;
    use httpmock::Method::{HEAD, PATCH};
    use serde_json::json;

    fn store_for(server: &MockServer) -> RestStore {
        let config = BackendConfig {
            url: server.base_url(),
            anon_key: "anon-key".to_string(),
            ..BackendConfig::default()
        };
        RestStore::new(BackendClient::new(&config).unwrap())
    }

    #[test]
    fn test_query_string() {
        let query = Query::from(Table::BlogPosts)
            .eq("published", true)
            .eq("id", "a b")
            .order_by("created_at", Direction::Descending)
            .limit(1);

        assert_eq!(
            query_string(&query),
            "select=*&published=eq.true&id=eq.a%20b&order=created_at.desc&limit=1"
        );
    }

    #[test]
    fn test_null_filter() {
        let query = Query::from(Table::Executives).eq("image_url", Value::Null);
        assert_eq!(query_string(&query), "select=*&image_url=is.null");
    }

    #[test]
    fn test_parse_content_range() {
        assert_eq!(parse_content_range("0-9/42"), Some(42));
        assert_eq!(parse_content_range("*/0"), Some(0));
        assert_eq!(parse_content_range("0-9/*"), None);
        assert_eq!(parse_content_range("garbage"), None);
    }

    #[tokio::test]
    async fn test_select_sends_filters_and_keys() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/rest/v1/blog_posts")
                    .query_param("published", "eq.true")
                    .query_param("order", "created_at.desc")
                    .header("apikey", "anon-key")
                    .header("authorization", "Bearer anon-key");
                then.status(200).json_body(json!([{"id": "p1"}, {"id": "p2"}]));
            })
            .await;

        let store = store_for(&server);
        let query = Query::from(Table::BlogPosts)
            .eq("published", true)
            .order_by("created_at", Direction::Descending);
        let rows = store.select(&query).await.unwrap();

        mock.assert_async().await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["id"], "p2");
    }

    #[tokio::test]
    async fn test_count_reads_content_range() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(HEAD)
                    .path("/rest/v1/contact_messages")
                    .query_param("read", "eq.false")
                    .header("prefer", "count=exact");
                then.status(200).header("content-range", "*/5");
            })
            .await;

        let store = store_for(&server);
        let count = store
            .count(&Query::from(Table::ContactMessages).eq("read", false).limit(1))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(count, 5);
    }

    #[tokio::test]
    async fn test_update_uses_access_token() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PATCH)
                    .path("/rest/v1/contact_messages")
                    .query_param("id", "eq.m1")
                    .header("authorization", "Bearer user-jwt")
                    .json_body(json!({"read": true}));
                then.status(204);
            })
            .await;

        let store = store_for(&server);
        store.client.set_access_token(Some("user-jwt".to_string()));
        store
            .update(Table::ContactMessages, "m1", json!({"read": true}))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/rest/v1/executives");
                then.status(403).body("permission denied");
            })
            .await;

        let store = store_for(&server);
        let err = store.delete(Table::Executives, "e1").await.unwrap_err();

        assert_eq!(err.status(), Some(403));
    }
}

//! PostgREST-backed implementation of [`TableClient`].
//!
//! Speaks the hosted service's table API: `apikey` + bearer headers,
//! `?col=eq.value` filters, `Prefer: return=representation` so mutations
//! echo the stored row back. Error bodies are decoded into [`ClientError`]
//! with the backend code preserved for classification.

use super::errors::{backend_codes, ClientError};
use super::table::{ClientResult, TableClient};
use crate::config::BackendConfig;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;

pub struct PostgrestClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl PostgrestClient {
    pub fn new(config: &BackendConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ClientError::message(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn decode_rows(response: Response) -> ClientResult<Vec<Value>> {
        if !response.status().is_success() {
            return Err(Self::decode_failure(response).await);
        }
        response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| ClientError::message(format!("resposta inválida do serviço: {e}")))
    }

    async fn decode_failure(response: Response) -> ClientError {
        let status = response.status();
        match response.json::<Value>().await {
            Ok(body) => {
                let code = body
                    .get("code")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                let message = body
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("HTTP {status}"));
                ClientError { code, message }
            }
            Err(_) => ClientError::message(format!("HTTP {status}")),
        }
    }
}

/// Render an `order=` parameter.
fn order_param(order_by: &str, ascending: bool) -> String {
    let direction = if ascending { "asc" } else { "desc" };
    format!("{order_by}.{direction}")
}

/// Render a JSON value as a filter literal: strings go bare, everything
/// else uses its JSON form.
fn eq_literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl TableClient for PostgrestClient {
    async fn select_all(
        &self,
        table: &str,
        order_by: &str,
        ascending: bool,
    ) -> ClientResult<Vec<Value>> {
        let response = self
            .authed(self.http.get(self.rest_url(table)))
            .query(&[
                ("select", "*".to_string()),
                ("order", order_param(order_by, ascending)),
            ])
            .send()
            .await
            .map_err(|e| ClientError::message(e.to_string()))?;

        Self::decode_rows(response).await
    }

    async fn select_one(
        &self,
        table: &str,
        column: &str,
        value: &Value,
    ) -> ClientResult<Option<Value>> {
        let response = self
            .authed(self.http.get(self.rest_url(table)))
            .query(&[
                ("select", "*".to_string()),
                (column, format!("eq.{}", eq_literal(value))),
                ("limit", "1".to_string()),
            ])
            .send()
            .await
            .map_err(|e| ClientError::message(e.to_string()))?;

        let rows = Self::decode_rows(response).await?;
        Ok(rows.into_iter().next())
    }

    async fn select_eq(
        &self,
        table: &str,
        column: &str,
        value: &Value,
        order_by: &str,
    ) -> ClientResult<Vec<Value>> {
        let response = self
            .authed(self.http.get(self.rest_url(table)))
            .query(&[
                ("select", "*".to_string()),
                (column, format!("eq.{}", eq_literal(value))),
                ("order", order_param(order_by, true)),
            ])
            .send()
            .await
            .map_err(|e| ClientError::message(e.to_string()))?;

        Self::decode_rows(response).await
    }

    async fn select_ilike(
        &self,
        table: &str,
        column: &str,
        needle: &str,
        order_by: &str,
    ) -> ClientResult<Vec<Value>> {
        let response = self
            .authed(self.http.get(self.rest_url(table)))
            .query(&[
                ("select", "*".to_string()),
                (column, format!("ilike.*{needle}*")),
                ("order", order_param(order_by, true)),
            ])
            .send()
            .await
            .map_err(|e| ClientError::message(e.to_string()))?;

        Self::decode_rows(response).await
    }

    async fn insert(&self, table: &str, row: Value) -> ClientResult<Value> {
        let response = self
            .authed(self.http.post(self.rest_url(table)))
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await
            .map_err(|e| ClientError::message(e.to_string()))?;

        let rows = Self::decode_rows(response).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| ClientError::new(backend_codes::NO_ROWS, "Results contain 0 rows"))
    }

    async fn update_by_id(&self, table: &str, id: i64, patch: Value) -> ClientResult<Value> {
        let response = self
            .authed(self.http.patch(self.rest_url(table)))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(&patch)
            .send()
            .await
            .map_err(|e| ClientError::message(e.to_string()))?;

        let rows = Self::decode_rows(response).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| ClientError::new(backend_codes::NO_ROWS, "Results contain 0 rows"))
    }

    async fn delete_by_id(&self, table: &str, id: i64) -> ClientResult<()> {
        let response = self
            .authed(self.http.delete(self.rest_url(table)))
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await
            .map_err(|e| ClientError::message(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::decode_failure(response).await);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_param() {
        assert_eq!(order_param("id", true), "id.asc");
        assert_eq!(order_param("nome", false), "nome.desc");
    }

    #[test]
    fn test_eq_literal_strips_string_quotes() {
        assert_eq!(eq_literal(&Value::String("PR".to_string())), "PR");
        assert_eq!(eq_literal(&serde_json::json!(42)), "42");
    }
}

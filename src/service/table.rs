//! Backing-service table access seam.
//!
//! The entity services talk to the hosted store exclusively through this
//! trait; rows travel as JSON values and failures carry the raw backend
//! code and message for per-entity classification.

use super::errors::ClientError;
use async_trait::async_trait;
use serde_json::Value;

pub type ClientResult<T> = Result<T, ClientError>;

/// Row-level operations against one table of the backing service.
#[async_trait]
pub trait TableClient: Send + Sync {
    /// All rows, ordered by `order_by`.
    async fn select_all(
        &self,
        table: &str,
        order_by: &str,
        ascending: bool,
    ) -> ClientResult<Vec<Value>>;

    /// The single row where `column = value`, or `None` when no row matches.
    async fn select_one(
        &self,
        table: &str,
        column: &str,
        value: &Value,
    ) -> ClientResult<Option<Value>>;

    /// Rows where `column = value`, ordered by `order_by` ascending.
    async fn select_eq(
        &self,
        table: &str,
        column: &str,
        value: &Value,
        order_by: &str,
    ) -> ClientResult<Vec<Value>>;

    /// Rows where `column` contains `needle`, case-insensitive, ordered by
    /// `order_by` ascending.
    async fn select_ilike(
        &self,
        table: &str,
        column: &str,
        needle: &str,
        order_by: &str,
    ) -> ClientResult<Vec<Value>>;

    /// Insert one row, returning the stored representation.
    async fn insert(&self, table: &str, row: Value) -> ClientResult<Value>;

    /// Patch the row with `id`, returning the stored representation. Fails
    /// with the no-rows code when the row disappeared.
    async fn update_by_id(&self, table: &str, id: i64, patch: Value) -> ClientResult<Value>;

    /// Delete the row with `id`.
    async fn delete_by_id(&self, table: &str, id: i64) -> ClientResult<()>;
}

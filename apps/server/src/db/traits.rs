//! Persistence trait definition

use crate::{context::Context, Result};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// SQL type of a key column. Lookup values arrive as text and are cast to
/// this type, so comparisons stay on the column's own index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    Uuid,
    Integer,
    BigInt,
    Text,
}

impl KeyType {
    pub fn sql_type(self) -> &'static str {
        match self {
            Self::Uuid => "uuid",
            Self::Integer => "integer",
            Self::BigInt => "bigint",
            Self::Text => "text",
        }
    }

    /// Whether `value` is a literal of this type. No row matches one that is not.
    pub fn accepts(self, value: &str) -> bool {
        match self {
            Self::Uuid => Uuid::parse_str(value).is_ok(),
            Self::Integer => value.parse::<i32>().is_ok(),
            Self::BigInt => value.parse::<i64>().is_ok(),
            Self::Text => true,
        }
    }
}

/// A filterable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub key: KeyType,
}

/// A stored entity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Table {
    pub name: &'static str,
    pub id_column: &'static str,
    pub id_type: KeyType,
    /// Column used for stable ordering of list queries.
    pub order_by: &'static str,
}

impl Table {
    pub fn id(&self) -> Column {
        Column {
            name: self.id_column,
            key: self.id_type,
        }
    }
}

/// A many-to-many join between a parent key and rows of `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinTable {
    pub name: &'static str,
    pub parent_column: &'static str,
    pub parent_type: KeyType,
    pub child_column: &'static str,
    pub target: &'static Table,
}

/// Offset/limit slice of a list query. `limit: None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: Option<u64>,
}

impl Window {
    pub fn new(offset: u64, limit: u64) -> Self {
        Self {
            offset,
            limit: Some(limit),
        }
    }

    pub fn unbounded() -> Self {
        Self {
            offset: 0,
            limit: None,
        }
    }
}

/// Abstract interface to the row store.
///
/// Rows travel as JSON objects keyed by column name; typed access lives in
/// [`crate::services::Dao`]. Every call carries the request `Context` it is
/// made for.
#[async_trait]
pub trait Persistence: Send + Sync {
    /// Fetch one row by primary key.
    async fn find(&self, ctx: &Context, table: &Table, id: &str) -> Result<Option<JsonValue>>;

    /// Fetch a window of all rows, ordered by `table.order_by`.
    async fn find_all(&self, ctx: &Context, table: &Table, window: Window) -> Result<Vec<JsonValue>>;

    /// Count all rows.
    async fn count(&self, ctx: &Context, table: &Table) -> Result<u64>;

    /// Fetch rows whose `column` equals `value`.
    async fn find_by(
        &self,
        ctx: &Context,
        table: &Table,
        column: &Column,
        value: &str,
        window: Window,
    ) -> Result<Vec<JsonValue>>;

    /// Count rows whose `column` equals `value`.
    async fn count_by(
        &self,
        ctx: &Context,
        table: &Table,
        column: &Column,
        value: &str,
    ) -> Result<u64>;

    /// Fetch target rows linked to `parent_id` through a join table.
    async fn find_linked(
        &self,
        ctx: &Context,
        join: &JoinTable,
        parent_id: &str,
        window: Window,
    ) -> Result<Vec<JsonValue>>;

    /// Count target rows linked to `parent_id` through a join table.
    async fn count_linked(&self, ctx: &Context, join: &JoinTable, parent_id: &str) -> Result<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_types_accept_only_their_literals() {
        assert!(KeyType::Uuid.accepts("9a1b2c3d-0000-4000-8000-000000000001"));
        assert!(!KeyType::Uuid.accepts("42"));
        assert!(KeyType::Integer.accepts("42"));
        assert!(!KeyType::Integer.accepts("4294967296"));
        assert!(KeyType::BigInt.accepts("4294967296"));
        assert!(!KeyType::BigInt.accepts("abc"));
        assert!(KeyType::Text.accepts("Anonymous"));
        assert_eq!(KeyType::BigInt.sql_type(), "bigint");
    }
}

//! In-memory `Persistence` implementation.
//!
//! Backs the `memory` database backend and the integration tests. Rows are
//! JSON objects grouped by table name, with the same column names as the
//! PostgreSQL schema.

use std::{cmp::Ordering, collections::HashMap, sync::RwLock};

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::{
    context::Context,
    db::traits::{Column, JoinTable, Persistence, Table, Window},
    Error, Result,
};

#[derive(Default)]
pub struct MemoryPersistence {
    tables: RwLock<HashMap<String, Vec<JsonValue>>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `{ "<table>": [ {row}, ... ], ... }`.
    pub fn from_seed(seed: JsonValue) -> Result<Self> {
        let JsonValue::Object(tables) = seed else {
            return Err(Error::Configuration(
                "seed data must be a JSON object keyed by table name".to_string(),
            ));
        };

        let store = Self::new();
        for (table, rows) in tables {
            let JsonValue::Array(rows) = rows else {
                return Err(Error::Configuration(format!(
                    "seed data for table '{table}' must be an array"
                )));
            };
            for row in rows {
                store.insert(&table, row)?;
            }
        }
        Ok(store)
    }

    pub fn from_seed_file(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Configuration(format!("Failed to read seed file {path}: {e}")))?;
        let seed: JsonValue = serde_json::from_str(&raw)
            .map_err(|e| Error::Configuration(format!("Invalid seed file {path}: {e}")))?;
        Self::from_seed(seed)
    }

    pub fn insert(&self, table: &str, row: JsonValue) -> Result<()> {
        if !row.is_object() {
            return Err(Error::Configuration(format!(
                "rows of table '{table}' must be JSON objects"
            )));
        }
        let mut tables = self
            .tables
            .write()
            .map_err(|_| Error::Internal("memory store lock poisoned".to_string()))?;
        tables.entry(table.to_string()).or_default().push(row);
        Ok(())
    }

    fn rows(&self, table: &str) -> Result<Vec<JsonValue>> {
        let tables = self
            .tables
            .read()
            .map_err(|_| Error::Internal("memory store lock poisoned".to_string()))?;
        Ok(tables.get(table).cloned().unwrap_or_default())
    }

    fn matching(&self, table: &str, column: &str, value: &str) -> Result<Vec<JsonValue>> {
        Ok(self
            .rows(table)?
            .into_iter()
            .filter(|row| column_key(row, column).as_deref() == Some(value))
            .collect())
    }
}

/// Text form of a column value, mirroring `column::text` in SQL.
fn column_key(row: &JsonValue, column: &str) -> Option<String> {
    match row.get(column)? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn compare_values(a: Option<&JsonValue>, b: Option<&JsonValue>) -> Ordering {
    match (a, b) {
        (Some(JsonValue::Number(x)), Some(JsonValue::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(JsonValue::String(x)), Some(JsonValue::String(y))) => x.cmp(y),
        (Some(JsonValue::Bool(x)), Some(JsonValue::Bool(y))) => x.cmp(y),
        // NULLs sort last, as in PostgreSQL ascending order.
        (None | Some(JsonValue::Null), None | Some(JsonValue::Null)) => Ordering::Equal,
        (None | Some(JsonValue::Null), _) => Ordering::Greater,
        (_, None | Some(JsonValue::Null)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

fn ordered(mut rows: Vec<JsonValue>, table: &Table) -> Vec<JsonValue> {
    rows.sort_by(|a, b| {
        compare_values(a.get(table.order_by), b.get(table.order_by))
            .then_with(|| compare_values(a.get(table.id_column), b.get(table.id_column)))
    });
    rows
}

fn windowed(rows: Vec<JsonValue>, window: Window) -> Vec<JsonValue> {
    let iter = rows.into_iter().skip(window.offset as usize);
    match window.limit {
        Some(limit) => iter.take(limit as usize).collect(),
        None => iter.collect(),
    }
}

#[async_trait]
impl Persistence for MemoryPersistence {
    async fn find(&self, ctx: &Context, table: &Table, id: &str) -> Result<Option<JsonValue>> {
        tracing::trace!(request_id = %ctx.request_id(), table = table.name, id, "find");
        Ok(self
            .rows(table.name)?
            .into_iter()
            .find(|row| column_key(row, table.id_column).as_deref() == Some(id)))
    }

    async fn find_all(&self, ctx: &Context, table: &Table, window: Window) -> Result<Vec<JsonValue>> {
        tracing::trace!(request_id = %ctx.request_id(), table = table.name, "find_all");
        Ok(windowed(ordered(self.rows(table.name)?, table), window))
    }

    async fn count(&self, _ctx: &Context, table: &Table) -> Result<u64> {
        Ok(self.rows(table.name)?.len() as u64)
    }

    async fn find_by(
        &self,
        ctx: &Context,
        table: &Table,
        column: &Column,
        value: &str,
        window: Window,
    ) -> Result<Vec<JsonValue>> {
        tracing::trace!(request_id = %ctx.request_id(), table = table.name, column = column.name, "find_by");
        let rows = self.matching(table.name, column.name, value)?;
        Ok(windowed(ordered(rows, table), window))
    }

    async fn count_by(
        &self,
        _ctx: &Context,
        table: &Table,
        column: &Column,
        value: &str,
    ) -> Result<u64> {
        Ok(self.matching(table.name, column.name, value)?.len() as u64)
    }

    async fn find_linked(
        &self,
        ctx: &Context,
        join: &JoinTable,
        parent_id: &str,
        window: Window,
    ) -> Result<Vec<JsonValue>> {
        tracing::trace!(request_id = %ctx.request_id(), join = join.name, parent_id, "find_linked");

        let child_ids: Vec<String> = self
            .matching(join.name, join.parent_column, parent_id)?
            .iter()
            .filter_map(|row| column_key(row, join.child_column))
            .collect();

        let target = join.target;
        let rows = self
            .rows(target.name)?
            .into_iter()
            .filter(|row| {
                column_key(row, target.id_column)
                    .map(|id| child_ids.contains(&id))
                    .unwrap_or(false)
            })
            .collect();
        Ok(windowed(ordered(rows, target), window))
    }

    async fn count_linked(&self, _ctx: &Context, join: &JoinTable, parent_id: &str) -> Result<u64> {
        Ok(self.matching(join.name, join.parent_column, parent_id)?.len() as u64)
    }
}

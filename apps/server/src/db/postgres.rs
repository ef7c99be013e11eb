//! PostgreSQL-backed `Persistence` implementation
//!
//! Rows are returned as `row_to_json` objects so that one set of queries
//! serves every entity table. Table and column names come from the static
//! descriptors in `tables.rs`; every value is bound as a parameter and cast
//! to the key column's type, never the other way round.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::PgPool;

use crate::{
    context::Context,
    db::traits::{Column, JoinTable, Persistence, Table, Window},
    Error, Result,
};

#[derive(Clone)]
pub struct PostgresPersistence {
    pub(crate) pool: PgPool,
}

impl PostgresPersistence {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn ident(name: &str) -> Result<&str> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if valid {
        Ok(name)
    } else {
        Err(Error::Internal(format!("Refusing unsafe SQL identifier '{name}'")))
    }
}

/// `alias.column = $1::type`, so the planner can use the column's index.
fn key_filter(alias: &str, column: &Column) -> Result<String> {
    Ok(format!(
        "{alias}.{} = $1::{}",
        ident(column.name)?,
        column.key.sql_type()
    ))
}

fn parent_column(join: &JoinTable) -> Column {
    Column {
        name: join.parent_column,
        key: join.parent_type,
    }
}

fn limit_param(window: Window) -> Option<i64> {
    window.limit.map(|l| i64::try_from(l).unwrap_or(i64::MAX))
}

fn offset_param(window: Window) -> i64 {
    i64::try_from(window.offset).unwrap_or(i64::MAX)
}

fn find_sql(table: &Table) -> Result<String> {
    Ok(format!(
        "SELECT row_to_json(t)::jsonb FROM {} t WHERE {}",
        ident(table.name)?,
        key_filter("t", &table.id())?
    ))
}

fn find_by_sql(table: &Table, column: &Column) -> Result<String> {
    Ok(format!(
        "SELECT row_to_json(t)::jsonb FROM {} t WHERE {} \
         ORDER BY t.{} ASC, t.{} ASC LIMIT $2 OFFSET $3",
        ident(table.name)?,
        key_filter("t", column)?,
        ident(table.order_by)?,
        ident(table.id_column)?
    ))
}

fn count_by_sql(table: &Table, column: &Column) -> Result<String> {
    Ok(format!(
        "SELECT COUNT(*) FROM {} t WHERE {}",
        ident(table.name)?,
        key_filter("t", column)?
    ))
}

fn find_linked_sql(join: &JoinTable) -> Result<String> {
    let target = join.target;
    Ok(format!(
        "SELECT row_to_json(t)::jsonb FROM {target} t \
         JOIN {join} j ON j.{child} = t.{target_id} \
         WHERE {filter} \
         ORDER BY t.{order} ASC, t.{target_id} ASC LIMIT $2 OFFSET $3",
        target = ident(target.name)?,
        join = ident(join.name)?,
        child = ident(join.child_column)?,
        target_id = ident(target.id_column)?,
        filter = key_filter("j", &parent_column(join))?,
        order = ident(target.order_by)?,
    ))
}

fn count_linked_sql(join: &JoinTable) -> Result<String> {
    Ok(format!(
        "SELECT COUNT(*) FROM {} j WHERE {}",
        ident(join.name)?,
        key_filter("j", &parent_column(join))?
    ))
}

#[async_trait]
impl Persistence for PostgresPersistence {
    async fn find(&self, ctx: &Context, table: &Table, id: &str) -> Result<Option<JsonValue>> {
        tracing::debug!(request_id = %ctx.request_id(), table = table.name, id, "find");

        if !table.id_type.accepts(id) {
            return Ok(None);
        }
        sqlx::query_scalar::<_, JsonValue>(&find_sql(table)?)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn find_all(&self, ctx: &Context, table: &Table, window: Window) -> Result<Vec<JsonValue>> {
        tracing::debug!(request_id = %ctx.request_id(), table = table.name, ?window, "find_all");

        let sql = format!(
            "SELECT row_to_json(t)::jsonb FROM {} t ORDER BY t.{} ASC, t.{} ASC LIMIT $1 OFFSET $2",
            ident(table.name)?,
            ident(table.order_by)?,
            ident(table.id_column)?
        );

        sqlx::query_scalar::<_, JsonValue>(&sql)
            .bind(limit_param(window))
            .bind(offset_param(window))
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn count(&self, ctx: &Context, table: &Table) -> Result<u64> {
        tracing::debug!(request_id = %ctx.request_id(), table = table.name, "count");

        let sql = format!("SELECT COUNT(*) FROM {}", ident(table.name)?);
        let total: i64 = sqlx::query_scalar(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(total.max(0) as u64)
    }

    async fn find_by(
        &self,
        ctx: &Context,
        table: &Table,
        column: &Column,
        value: &str,
        window: Window,
    ) -> Result<Vec<JsonValue>> {
        tracing::debug!(
            request_id = %ctx.request_id(),
            table = table.name,
            column = column.name,
            value,
            "find_by"
        );

        if !column.key.accepts(value) {
            return Ok(Vec::new());
        }
        sqlx::query_scalar::<_, JsonValue>(&find_by_sql(table, column)?)
            .bind(value)
            .bind(limit_param(window))
            .bind(offset_param(window))
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn count_by(
        &self,
        ctx: &Context,
        table: &Table,
        column: &Column,
        value: &str,
    ) -> Result<u64> {
        tracing::debug!(
            request_id = %ctx.request_id(),
            table = table.name,
            column = column.name,
            "count_by"
        );

        if !column.key.accepts(value) {
            return Ok(0);
        }
        let total: i64 = sqlx::query_scalar(&count_by_sql(table, column)?)
            .bind(value)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(total.max(0) as u64)
    }

    async fn find_linked(
        &self,
        ctx: &Context,
        join: &JoinTable,
        parent_id: &str,
        window: Window,
    ) -> Result<Vec<JsonValue>> {
        tracing::debug!(
            request_id = %ctx.request_id(),
            join = join.name,
            parent_id,
            "find_linked"
        );

        if !join.parent_type.accepts(parent_id) {
            return Ok(Vec::new());
        }
        sqlx::query_scalar::<_, JsonValue>(&find_linked_sql(join)?)
            .bind(parent_id)
            .bind(limit_param(window))
            .bind(offset_param(window))
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn count_linked(&self, ctx: &Context, join: &JoinTable, parent_id: &str) -> Result<u64> {
        tracing::debug!(request_id = %ctx.request_id(), join = join.name, "count_linked");

        if !join.parent_type.accepts(parent_id) {
            return Ok(0);
        }
        let total: i64 = sqlx::query_scalar(&count_linked_sql(join)?)
            .bind(parent_id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(total.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tables::{
        BUNDLE_ITEM, BUNDLE, ITEM, PROCESS_FILES, SUBGROUPS, USAGE_EVENT, VERSION,
        VERSION_HISTORY_KEY,
    };

    #[test]
    fn identifiers_are_restricted() {
        assert!(ident("epersongroup2eperson").is_ok());
        assert!(ident("uuid; DROP TABLE item").is_err());
        assert!(ident("").is_err());
        assert!(ident("Name").is_err());
    }

    #[test]
    fn key_lookups_cast_the_parameter_not_the_column() {
        let queries = [
            find_sql(&ITEM).unwrap(),
            find_sql(&USAGE_EVENT).unwrap(),
            find_by_sql(&BUNDLE, &BUNDLE_ITEM).unwrap(),
            count_by_sql(&VERSION, &VERSION_HISTORY_KEY).unwrap(),
            find_linked_sql(&SUBGROUPS).unwrap(),
            count_linked_sql(&PROCESS_FILES).unwrap(),
        ];
        for sql in &queries {
            assert!(!sql.contains("::text"), "column cast in: {sql}");
        }

        assert!(queries[0].contains("WHERE t.uuid = $1::uuid"));
        assert!(queries[1].contains("WHERE t.event_id = $1::bigint"));
        assert!(queries[2].contains("WHERE t.item_id = $1::uuid"));
        assert!(queries[3].contains("WHERE t.versionhistory_id = $1::integer"));
        assert!(queries[4].contains("WHERE j.parent_id = $1::uuid"));
        assert!(queries[5].contains("WHERE j.process_id = $1::integer"));
    }

    #[test]
    fn offsets_never_go_negative() {
        let window = Window::new(u64::MAX, u64::MAX);
        assert_eq!(offset_param(window), i64::MAX);
        assert_eq!(limit_param(window), Some(i64::MAX));
        assert_eq!(limit_param(Window::unbounded()), None);
    }
}

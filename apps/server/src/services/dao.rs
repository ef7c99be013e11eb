//! Typed access to the row store.

use serde_json::Value as JsonValue;
use std::{marker::PhantomData, sync::Arc};

use crate::{
    context::Context,
    db::{Column, JoinTable, Persistence, Window},
    models::DomainObject,
    Error, Result,
};

/// Loads rows of `T::TABLE` and maps them onto `T`.
pub struct Dao<T> {
    store: Arc<dyn Persistence>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Dao<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: DomainObject> Dao<T> {
    pub fn new(store: Arc<dyn Persistence>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    pub async fn find(&self, ctx: &Context, id: &T::Id) -> Result<Option<T>> {
        self.store
            .find(ctx, T::TABLE, &id.to_string())
            .await?
            .map(map_row::<T>)
            .transpose()
    }

    pub async fn exists(&self, ctx: &Context, id: &T::Id) -> Result<bool> {
        Ok(self.store.find(ctx, T::TABLE, &id.to_string()).await?.is_some())
    }

    pub async fn find_all(&self, ctx: &Context, window: Window) -> Result<Vec<T>> {
        map_rows(self.store.find_all(ctx, T::TABLE, window).await?)
    }

    pub async fn count(&self, ctx: &Context) -> Result<u64> {
        self.store.count(ctx, T::TABLE).await
    }

    pub async fn find_by(
        &self,
        ctx: &Context,
        column: &Column,
        value: &str,
        window: Window,
    ) -> Result<Vec<T>> {
        map_rows(self.store.find_by(ctx, T::TABLE, column, value, window).await?)
    }

    /// First row (in table order) whose `column` equals `value`.
    pub async fn find_first_by(
        &self,
        ctx: &Context,
        column: &Column,
        value: &str,
    ) -> Result<Option<T>> {
        Ok(self
            .find_by(ctx, column, value, Window::new(0, 1))
            .await?
            .into_iter()
            .next())
    }

    pub async fn count_by(&self, ctx: &Context, column: &Column, value: &str) -> Result<u64> {
        self.store.count_by(ctx, T::TABLE, column, value).await
    }

    /// Rows of `T` linked to `parent_id` through `join`; `join.target` must be `T::TABLE`.
    pub async fn find_linked(
        &self,
        ctx: &Context,
        join: &JoinTable,
        parent_id: &str,
        window: Window,
    ) -> Result<Vec<T>> {
        debug_assert_eq!(join.target, T::TABLE);
        map_rows(self.store.find_linked(ctx, join, parent_id, window).await?)
    }

    pub async fn count_linked(&self, ctx: &Context, join: &JoinTable, parent_id: &str) -> Result<u64> {
        self.store.count_linked(ctx, join, parent_id).await
    }
}

fn map_row<T: DomainObject>(row: JsonValue) -> Result<T> {
    serde_json::from_value(row).map_err(|source| Error::RowMapping {
        table: T::TABLE.name,
        source,
    })
}

fn map_rows<T: DomainObject>(rows: Vec<JsonValue>) -> Result<Vec<T>> {
    rows.into_iter().map(map_row::<T>).collect()
}

//! Version and version history service.

use std::sync::Arc;
use uuid::Uuid;

use super::Dao;
use crate::{
    context::Context,
    db::{
        tables::{VERSION_HISTORY_KEY, VERSION_ITEM},
        Persistence, Window,
    },
    models::{Version, VersionHistory},
    Result,
};

#[derive(Clone)]
pub struct VersioningService {
    pub versions: Dao<Version>,
    pub histories: Dao<VersionHistory>,
}

impl VersioningService {
    pub fn new(store: Arc<dyn Persistence>) -> Self {
        Self {
            versions: Dao::new(store.clone()),
            histories: Dao::new(store),
        }
    }

    /// The version record of an item, if the item is versioned.
    pub async fn version_of_item(&self, ctx: &Context, item: &Uuid) -> Result<Option<Version>> {
        self.versions
            .find_first_by(ctx, &VERSION_ITEM, &item.to_string())
            .await
    }

    pub async fn history_of(&self, ctx: &Context, version: &Version) -> Result<Option<VersionHistory>> {
        self.histories.find(ctx, &version.versionhistory_id).await
    }

    /// Versions of a history, oldest first.
    pub async fn versions_of(
        &self,
        ctx: &Context,
        history_id: i32,
        window: Window,
    ) -> Result<(Vec<Version>, u64)> {
        let key = history_id.to_string();
        let rows = self
            .versions
            .find_by(ctx, &VERSION_HISTORY_KEY, &key, window)
            .await?;
        let total = self.versions.count_by(ctx, &VERSION_HISTORY_KEY, &key).await?;
        Ok((rows, total))
    }
}

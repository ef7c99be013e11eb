//! Community, collection, item, bundle and bitstream services.

use std::sync::Arc;
use uuid::Uuid;

use super::Dao;
use crate::{
    context::Context,
    db::{
        tables::{BITSTREAM_BUNDLE, BUNDLE_ITEM, COLLECTION_OWNING_COMMUNITY, COMMUNITY_PARENT},
        Persistence, Window,
    },
    models::{Bitstream, Bundle, Collection, Community, DSpaceObject, Item},
    Result,
};

#[derive(Clone)]
pub struct ContentService {
    pub communities: Dao<Community>,
    pub collections: Dao<Collection>,
    pub items: Dao<Item>,
    pub bundles: Dao<Bundle>,
    pub bitstreams: Dao<Bitstream>,
}

impl ContentService {
    pub fn new(store: Arc<dyn Persistence>) -> Self {
        Self {
            communities: Dao::new(store.clone()),
            collections: Dao::new(store.clone()),
            items: Dao::new(store.clone()),
            bundles: Dao::new(store.clone()),
            bitstreams: Dao::new(store),
        }
    }

    /// Resolve a UUID against every content table.
    pub async fn find_dso(&self, ctx: &Context, id: &Uuid) -> Result<Option<DSpaceObject>> {
        if let Some(c) = self.communities.find(ctx, id).await? {
            return Ok(Some(DSpaceObject::Community(c)));
        }
        if let Some(c) = self.collections.find(ctx, id).await? {
            return Ok(Some(DSpaceObject::Collection(c)));
        }
        if let Some(i) = self.items.find(ctx, id).await? {
            return Ok(Some(DSpaceObject::Item(i)));
        }
        if let Some(b) = self.bundles.find(ctx, id).await? {
            return Ok(Some(DSpaceObject::Bundle(b)));
        }
        Ok(self.bitstreams.find(ctx, id).await?.map(DSpaceObject::Bitstream))
    }

    pub async fn parent_community_of_community(
        &self,
        ctx: &Context,
        community: &Community,
    ) -> Result<Option<Community>> {
        match &community.parent_community_id {
            Some(parent) => self.communities.find(ctx, parent).await,
            None => Ok(None),
        }
    }

    pub async fn parent_community_of_collection(
        &self,
        ctx: &Context,
        collection: &Collection,
    ) -> Result<Option<Community>> {
        match &collection.owning_community_id {
            Some(parent) => self.communities.find(ctx, parent).await,
            None => Ok(None),
        }
    }

    pub async fn subcommunities(
        &self,
        ctx: &Context,
        community: &Uuid,
        window: Window,
    ) -> Result<(Vec<Community>, u64)> {
        let key = community.to_string();
        let rows = self
            .communities
            .find_by(ctx, &COMMUNITY_PARENT, &key, window)
            .await?;
        let total = self.communities.count_by(ctx, &COMMUNITY_PARENT, &key).await?;
        Ok((rows, total))
    }

    pub async fn collections_of(
        &self,
        ctx: &Context,
        community: &Uuid,
        window: Window,
    ) -> Result<(Vec<Collection>, u64)> {
        let key = community.to_string();
        let rows = self
            .collections
            .find_by(ctx, &COLLECTION_OWNING_COMMUNITY, &key, window)
            .await?;
        let total = self.collections.count_by(ctx, &COLLECTION_OWNING_COMMUNITY, &key).await?;
        Ok((rows, total))
    }

    pub async fn owning_collection(&self, ctx: &Context, item: &Item) -> Result<Option<Collection>> {
        match &item.owning_collection_id {
            Some(owner) => self.collections.find(ctx, owner).await,
            None => Ok(None),
        }
    }

    pub async fn bundles_of(
        &self,
        ctx: &Context,
        item: &Uuid,
        window: Window,
    ) -> Result<(Vec<Bundle>, u64)> {
        let key = item.to_string();
        let rows = self.bundles.find_by(ctx, &BUNDLE_ITEM, &key, window).await?;
        let total = self.bundles.count_by(ctx, &BUNDLE_ITEM, &key).await?;
        Ok((rows, total))
    }

    pub async fn bitstreams_of(
        &self,
        ctx: &Context,
        bundle: &Uuid,
        window: Window,
    ) -> Result<(Vec<Bitstream>, u64)> {
        let key = bundle.to_string();
        let rows = self.bitstreams.find_by(ctx, &BITSTREAM_BUNDLE, &key, window).await?;
        let total = self.bitstreams.count_by(ctx, &BITSTREAM_BUNDLE, &key).await?;
        Ok((rows, total))
    }
}

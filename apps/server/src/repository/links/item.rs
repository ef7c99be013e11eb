//! Relations of items and bundles.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::{page, require, single};
use crate::{
    authorize::{TargetKind, TargetRef},
    context::Context,
    converter::ConverterService,
    repository::{LinkRepository, LinkTarget, Pageable},
    services::{ContentService, VersioningService},
    Result,
};

/// `items/{id}/owningCollection`; none while the item is in submission.
pub struct ItemOwningCollectionLink {
    content: ContentService,
    converter: Arc<ConverterService>,
}

impl ItemOwningCollectionLink {
    pub fn new(content: ContentService, converter: Arc<ConverterService>) -> Self {
        Self { content, converter }
    }
}

#[async_trait]
impl LinkRepository for ItemOwningCollectionLink {
    const CATEGORY: &'static str = "core";
    const MODEL: &'static str = "items";
    const RELATION: &'static str = "owningCollection";

    type Id = Uuid;

    fn target_for(&self, parent: &Uuid) -> Option<TargetRef> {
        Some(TargetRef::new(TargetKind::Item, parent))
    }

    async fn resolve(&self, ctx: &Context, id: Uuid, _pageable: Pageable) -> Result<LinkTarget> {
        let item = require(self.content.items.find(ctx, &id).await?, "item", id)?;
        let owner = self.content.owning_collection(ctx, &item).await?;
        single(&self.converter, owner)
    }
}

/// `items/{id}/bundles`
pub struct ItemBundlesLink {
    content: ContentService,
    converter: Arc<ConverterService>,
}

impl ItemBundlesLink {
    pub fn new(content: ContentService, converter: Arc<ConverterService>) -> Self {
        Self { content, converter }
    }
}

#[async_trait]
impl LinkRepository for ItemBundlesLink {
    const CATEGORY: &'static str = "core";
    const MODEL: &'static str = "items";
    const RELATION: &'static str = "bundles";

    type Id = Uuid;

    fn target_for(&self, parent: &Uuid) -> Option<TargetRef> {
        Some(TargetRef::new(TargetKind::Item, parent))
    }

    async fn resolve(&self, ctx: &Context, id: Uuid, pageable: Pageable) -> Result<LinkTarget> {
        require(self.content.items.find(ctx, &id).await?, "item", id)?;
        let bundles = self.content.bundles_of(ctx, &id, pageable.window()).await?;
        page(&self.converter, bundles, pageable)
    }
}

/// `items/{id}/version`; none for unversioned items.
pub struct ItemVersionLink {
    content: ContentService,
    versioning: VersioningService,
    converter: Arc<ConverterService>,
}

impl ItemVersionLink {
    pub fn new(
        content: ContentService,
        versioning: VersioningService,
        converter: Arc<ConverterService>,
    ) -> Self {
        Self {
            content,
            versioning,
            converter,
        }
    }
}

#[async_trait]
impl LinkRepository for ItemVersionLink {
    const CATEGORY: &'static str = "core";
    const MODEL: &'static str = "items";
    const RELATION: &'static str = "version";

    type Id = Uuid;

    fn target_for(&self, parent: &Uuid) -> Option<TargetRef> {
        Some(TargetRef::new(TargetKind::Item, parent))
    }

    async fn resolve(&self, ctx: &Context, id: Uuid, _pageable: Pageable) -> Result<LinkTarget> {
        require(self.content.items.find(ctx, &id).await?, "item", id)?;
        let version = self.versioning.version_of_item(ctx, &id).await?;
        single(&self.converter, version)
    }
}

/// `bundles/{id}/item`
pub struct BundleItemLink {
    content: ContentService,
    converter: Arc<ConverterService>,
}

impl BundleItemLink {
    pub fn new(content: ContentService, converter: Arc<ConverterService>) -> Self {
        Self { content, converter }
    }
}

#[async_trait]
impl LinkRepository for BundleItemLink {
    const CATEGORY: &'static str = "core";
    const MODEL: &'static str = "bundles";
    const RELATION: &'static str = "item";

    type Id = Uuid;

    fn target_for(&self, parent: &Uuid) -> Option<TargetRef> {
        Some(TargetRef::new(TargetKind::Bundle, parent))
    }

    async fn resolve(&self, ctx: &Context, id: Uuid, _pageable: Pageable) -> Result<LinkTarget> {
        let bundle = require(self.content.bundles.find(ctx, &id).await?, "bundle", id)?;
        let item = self.content.items.find(ctx, &bundle.item_id).await?;
        single(&self.converter, item)
    }
}

/// `bundles/{id}/bitstreams`
pub struct BundleBitstreamsLink {
    content: ContentService,
    converter: Arc<ConverterService>,
}

impl BundleBitstreamsLink {
    pub fn new(content: ContentService, converter: Arc<ConverterService>) -> Self {
        Self { content, converter }
    }
}

#[async_trait]
impl LinkRepository for BundleBitstreamsLink {
    const CATEGORY: &'static str = "core";
    const MODEL: &'static str = "bundles";
    const RELATION: &'static str = "bitstreams";

    type Id = Uuid;

    fn target_for(&self, parent: &Uuid) -> Option<TargetRef> {
        Some(TargetRef::new(TargetKind::Bundle, parent))
    }

    async fn resolve(&self, ctx: &Context, id: Uuid, pageable: Pageable) -> Result<LinkTarget> {
        require(self.content.bundles.find(ctx, &id).await?, "bundle", id)?;
        let bitstreams = self
            .content
            .bitstreams_of(ctx, &id, pageable.window())
            .await?;
        page(&self.converter, bitstreams, pageable)
    }
}

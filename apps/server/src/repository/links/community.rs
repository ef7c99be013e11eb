//! Relations of communities and collections.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::{page, require, single};
use crate::{
    authorize::{TargetKind, TargetRef},
    context::Context,
    converter::ConverterService,
    repository::{LinkRepository, LinkTarget, Pageable},
    services::ContentService,
    Result,
};

/// `collections/{id}/parentCommunity`
pub struct CollectionParentCommunityLink {
    content: ContentService,
    converter: Arc<ConverterService>,
}

impl CollectionParentCommunityLink {
    pub fn new(content: ContentService, converter: Arc<ConverterService>) -> Self {
        Self { content, converter }
    }
}

#[async_trait]
impl LinkRepository for CollectionParentCommunityLink {
    const CATEGORY: &'static str = "core";
    const MODEL: &'static str = "collections";
    const RELATION: &'static str = "parentCommunity";

    type Id = Uuid;

    fn target_for(&self, parent: &Uuid) -> Option<TargetRef> {
        Some(TargetRef::new(TargetKind::Collection, parent))
    }

    async fn resolve(&self, ctx: &Context, id: Uuid, _pageable: Pageable) -> Result<LinkTarget> {
        let collection = require(self.content.collections.find(ctx, &id).await?, "collection", id)?;
        let parent = self
            .content
            .parent_community_of_collection(ctx, &collection)
            .await?;
        single(&self.converter, parent)
    }
}

/// `communities/{id}/parentCommunity`; none for top-level communities.
pub struct CommunityParentCommunityLink {
    content: ContentService,
    converter: Arc<ConverterService>,
}

impl CommunityParentCommunityLink {
    pub fn new(content: ContentService, converter: Arc<ConverterService>) -> Self {
        Self { content, converter }
    }
}

#[async_trait]
impl LinkRepository for CommunityParentCommunityLink {
    const CATEGORY: &'static str = "core";
    const MODEL: &'static str = "communities";
    const RELATION: &'static str = "parentCommunity";

    type Id = Uuid;

    fn target_for(&self, parent: &Uuid) -> Option<TargetRef> {
        Some(TargetRef::new(TargetKind::Community, parent))
    }

    async fn resolve(&self, ctx: &Context, id: Uuid, _pageable: Pageable) -> Result<LinkTarget> {
        let community = require(self.content.communities.find(ctx, &id).await?, "community", id)?;
        let parent = self
            .content
            .parent_community_of_community(ctx, &community)
            .await?;
        single(&self.converter, parent)
    }
}

/// `communities/{id}/subcommunities`
pub struct SubcommunitiesLink {
    content: ContentService,
    converter: Arc<ConverterService>,
}

impl SubcommunitiesLink {
    pub fn new(content: ContentService, converter: Arc<ConverterService>) -> Self {
        Self { content, converter }
    }
}

#[async_trait]
impl LinkRepository for SubcommunitiesLink {
    const CATEGORY: &'static str = "core";
    const MODEL: &'static str = "communities";
    const RELATION: &'static str = "subcommunities";

    type Id = Uuid;

    fn target_for(&self, parent: &Uuid) -> Option<TargetRef> {
        Some(TargetRef::new(TargetKind::Community, parent))
    }

    async fn resolve(&self, ctx: &Context, id: Uuid, pageable: Pageable) -> Result<LinkTarget> {
        require(self.content.communities.find(ctx, &id).await?, "community", id)?;
        let children = self
            .content
            .subcommunities(ctx, &id, pageable.window())
            .await?;
        page(&self.converter, children, pageable)
    }
}

/// `communities/{id}/collections`
pub struct CommunityCollectionsLink {
    content: ContentService,
    converter: Arc<ConverterService>,
}

impl CommunityCollectionsLink {
    pub fn new(content: ContentService, converter: Arc<ConverterService>) -> Self {
        Self { content, converter }
    }
}

#[async_trait]
impl LinkRepository for CommunityCollectionsLink {
    const CATEGORY: &'static str = "core";
    const MODEL: &'static str = "communities";
    const RELATION: &'static str = "collections";

    type Id = Uuid;

    fn target_for(&self, parent: &Uuid) -> Option<TargetRef> {
        Some(TargetRef::new(TargetKind::Community, parent))
    }

    async fn resolve(&self, ctx: &Context, id: Uuid, pageable: Pageable) -> Result<LinkTarget> {
        require(self.content.communities.find(ctx, &id).await?, "community", id)?;
        let collections = self
            .content
            .collections_of(ctx, &id, pageable.window())
            .await?;
        page(&self.converter, collections, pageable)
    }
}

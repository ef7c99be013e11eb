//! Relations of subscriptions, groups and epersons.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::{page, require, single};
use crate::{
    authorize::{TargetKind, TargetRef},
    context::Context,
    converter::ConverterService,
    repository::{LinkRepository, LinkTarget, Pageable},
    services::{ContentService, EPersonService, SubscriptionService},
    Result,
};

/// `subscriptions/{id}/eperson`
pub struct SubscriptionEPersonLink {
    subscriptions: SubscriptionService,
    epersons: EPersonService,
    converter: Arc<ConverterService>,
}

impl SubscriptionEPersonLink {
    pub fn new(
        subscriptions: SubscriptionService,
        epersons: EPersonService,
        converter: Arc<ConverterService>,
    ) -> Self {
        Self {
            subscriptions,
            epersons,
            converter,
        }
    }
}

#[async_trait]
impl LinkRepository for SubscriptionEPersonLink {
    const CATEGORY: &'static str = "core";
    const MODEL: &'static str = "subscriptions";
    const RELATION: &'static str = "eperson";

    type Id = i32;

    fn target_for(&self, parent: &i32) -> Option<TargetRef> {
        Some(TargetRef::new(TargetKind::Subscription, parent))
    }

    async fn resolve(&self, ctx: &Context, id: i32, _pageable: Pageable) -> Result<LinkTarget> {
        let subscription = require(
            self.subscriptions.subscriptions.find(ctx, &id).await?,
            "subscription",
            id,
        )?;
        let eperson = self.epersons.epersons.find(ctx, &subscription.eperson_id).await?;
        single(&self.converter, eperson)
    }
}

/// `subscriptions/{id}/resource`: the community, collection or item.
pub struct SubscriptionResourceLink {
    subscriptions: SubscriptionService,
    content: ContentService,
    converter: Arc<ConverterService>,
}

impl SubscriptionResourceLink {
    pub fn new(
        subscriptions: SubscriptionService,
        content: ContentService,
        converter: Arc<ConverterService>,
    ) -> Self {
        Self {
            subscriptions,
            content,
            converter,
        }
    }
}

#[async_trait]
impl LinkRepository for SubscriptionResourceLink {
    const CATEGORY: &'static str = "core";
    const MODEL: &'static str = "subscriptions";
    const RELATION: &'static str = "resource";

    type Id = i32;

    fn target_for(&self, parent: &i32) -> Option<TargetRef> {
        Some(TargetRef::new(TargetKind::Subscription, parent))
    }

    async fn resolve(&self, ctx: &Context, id: i32, _pageable: Pageable) -> Result<LinkTarget> {
        let subscription = require(
            self.subscriptions.subscriptions.find(ctx, &id).await?,
            "subscription",
            id,
        )?;
        let resource = self
            .content
            .find_dso(ctx, &subscription.dspace_object_id)
            .await?
            .map(|object| self.converter.dso_to_rest(&object))
            .transpose()?;
        Ok(LinkTarget::Single(resource))
    }
}

/// `groups/{id}/epersons`: direct members only.
pub struct GroupEPersonsLink {
    epersons: EPersonService,
    converter: Arc<ConverterService>,
}

impl GroupEPersonsLink {
    pub fn new(epersons: EPersonService, converter: Arc<ConverterService>) -> Self {
        Self { epersons, converter }
    }
}

#[async_trait]
impl LinkRepository for GroupEPersonsLink {
    const CATEGORY: &'static str = "eperson";
    const MODEL: &'static str = "groups";
    const RELATION: &'static str = "epersons";

    type Id = Uuid;

    fn target_for(&self, parent: &Uuid) -> Option<TargetRef> {
        Some(TargetRef::new(TargetKind::Group, parent))
    }

    async fn resolve(&self, ctx: &Context, id: Uuid, pageable: Pageable) -> Result<LinkTarget> {
        require(self.epersons.groups.find(ctx, &id).await?, "group", id)?;
        let members = self.epersons.members(ctx, &id, pageable.window()).await?;
        page(&self.converter, members, pageable)
    }
}

/// `groups/{id}/subgroups`
pub struct GroupSubgroupsLink {
    epersons: EPersonService,
    converter: Arc<ConverterService>,
}

impl GroupSubgroupsLink {
    pub fn new(epersons: EPersonService, converter: Arc<ConverterService>) -> Self {
        Self { epersons, converter }
    }
}

#[async_trait]
impl LinkRepository for GroupSubgroupsLink {
    const CATEGORY: &'static str = "eperson";
    const MODEL: &'static str = "groups";
    const RELATION: &'static str = "subgroups";

    type Id = Uuid;

    fn target_for(&self, parent: &Uuid) -> Option<TargetRef> {
        Some(TargetRef::new(TargetKind::Group, parent))
    }

    async fn resolve(&self, ctx: &Context, id: Uuid, pageable: Pageable) -> Result<LinkTarget> {
        require(self.epersons.groups.find(ctx, &id).await?, "group", id)?;
        let subgroups = self.epersons.subgroups(ctx, &id, pageable.window()).await?;
        page(&self.converter, subgroups, pageable)
    }
}

/// `epersons/{id}/groups`: direct memberships only.
pub struct EPersonGroupsLink {
    epersons: EPersonService,
    converter: Arc<ConverterService>,
}

impl EPersonGroupsLink {
    pub fn new(epersons: EPersonService, converter: Arc<ConverterService>) -> Self {
        Self { epersons, converter }
    }
}

#[async_trait]
impl LinkRepository for EPersonGroupsLink {
    const CATEGORY: &'static str = "eperson";
    const MODEL: &'static str = "epersons";
    const RELATION: &'static str = "groups";

    type Id = Uuid;

    fn target_for(&self, parent: &Uuid) -> Option<TargetRef> {
        Some(TargetRef::new(TargetKind::EPerson, parent))
    }

    async fn resolve(&self, ctx: &Context, id: Uuid, pageable: Pageable) -> Result<LinkTarget> {
        require(self.epersons.epersons.find(ctx, &id).await?, "eperson", id)?;
        let groups = self.epersons.memberships(ctx, &id, pageable.window()).await?;
        page(&self.converter, groups, pageable)
    }
}

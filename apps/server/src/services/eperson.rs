//! EPerson, group and subscription services.

use std::{collections::HashSet, sync::Arc};
use uuid::Uuid;

use super::Dao;
use crate::{
    context::Context,
    db::{
        tables::{EPERSON_MEMBERSHIPS, GROUP_MEMBERS, GROUP_NAME, PARENT_GROUPS, SUBGROUPS},
        Persistence, Window,
    },
    models::{
        eperson::{ADMINISTRATOR_GROUP, ANONYMOUS_GROUP},
        EPerson, Group, Subscription,
    },
    Result,
};

#[derive(Clone)]
pub struct EPersonService {
    pub epersons: Dao<EPerson>,
    pub groups: Dao<Group>,
}

impl EPersonService {
    pub fn new(store: Arc<dyn Persistence>) -> Self {
        Self {
            epersons: Dao::new(store.clone()),
            groups: Dao::new(store),
        }
    }

    pub async fn find_group_by_name(&self, ctx: &Context, name: &str) -> Result<Option<Group>> {
        self.groups.find_first_by(ctx, &GROUP_NAME, name).await
    }

    /// Direct eperson members of a group.
    pub async fn members(
        &self,
        ctx: &Context,
        group: &Uuid,
        window: Window,
    ) -> Result<(Vec<EPerson>, u64)> {
        let key = group.to_string();
        let rows = self.epersons.find_linked(ctx, &GROUP_MEMBERS, &key, window).await?;
        let total = self.epersons.count_linked(ctx, &GROUP_MEMBERS, &key).await?;
        Ok((rows, total))
    }

    /// Direct child groups of a group.
    pub async fn subgroups(
        &self,
        ctx: &Context,
        group: &Uuid,
        window: Window,
    ) -> Result<(Vec<Group>, u64)> {
        let key = group.to_string();
        let rows = self.groups.find_linked(ctx, &SUBGROUPS, &key, window).await?;
        let total = self.groups.count_linked(ctx, &SUBGROUPS, &key).await?;
        Ok((rows, total))
    }

    /// Groups the eperson is a direct member of.
    pub async fn memberships(
        &self,
        ctx: &Context,
        eperson: &Uuid,
        window: Window,
    ) -> Result<(Vec<Group>, u64)> {
        let key = eperson.to_string();
        let rows = self
            .groups
            .find_linked(ctx, &EPERSON_MEMBERSHIPS, &key, window)
            .await?;
        let total = self.groups.count_linked(ctx, &EPERSON_MEMBERSHIPS, &key).await?;
        Ok((rows, total))
    }

    /// Every group the caller belongs to, directly or through nested groups.
    /// Always includes the Anonymous group when it exists.
    pub async fn all_group_ids(&self, ctx: &Context, eperson: Option<Uuid>) -> Result<HashSet<Uuid>> {
        let mut pending: Vec<Uuid> = Vec::new();

        if let Some(anonymous) = self.find_group_by_name(ctx, ANONYMOUS_GROUP).await? {
            pending.push(anonymous.uuid);
        }
        if let Some(eperson) = eperson {
            let direct = self
                .groups
                .find_linked(ctx, &EPERSON_MEMBERSHIPS, &eperson.to_string(), Window::unbounded())
                .await?;
            pending.extend(direct.into_iter().map(|g| g.uuid));
        }

        let mut seen = HashSet::new();
        while let Some(group) = pending.pop() {
            if !seen.insert(group) {
                continue;
            }
            let parents = self
                .groups
                .find_linked(ctx, &PARENT_GROUPS, &group.to_string(), Window::unbounded())
                .await?;
            pending.extend(parents.into_iter().map(|g| g.uuid));
        }
        Ok(seen)
    }

    pub async fn is_member(&self, ctx: &Context, eperson: Uuid, group: &Uuid) -> Result<bool> {
        Ok(self.all_group_ids(ctx, Some(eperson)).await?.contains(group))
    }

    pub async fn is_admin(&self, ctx: &Context, eperson: Uuid) -> Result<bool> {
        match self.find_group_by_name(ctx, ADMINISTRATOR_GROUP).await? {
            Some(admins) => self.is_member(ctx, eperson, &admins.uuid).await,
            None => Ok(false),
        }
    }
}

#[derive(Clone)]
pub struct SubscriptionService {
    pub subscriptions: Dao<Subscription>,
}

impl SubscriptionService {
    pub fn new(store: Arc<dyn Persistence>) -> Self {
        Self {
            subscriptions: Dao::new(store),
        }
    }
}

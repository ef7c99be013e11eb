//! Resource-policy backed permission evaluation.

use async_trait::async_trait;
use chrono::Utc;
use std::{str::FromStr, sync::Arc};
use uuid::Uuid;

use super::{Permission, PermissionEvaluator, TargetKind, TargetRef};
use crate::{
    context::Context,
    db::{tables, Persistence, Table, Window},
    models::{ClaimedTask, Process, ResourcePolicy, Subscription, Version},
    services::{Dao, EPersonService},
    Result,
};

const CONTENT_TABLES: [&Table; 5] = [
    &tables::COMMUNITY,
    &tables::COLLECTION,
    &tables::ITEM,
    &tables::BUNDLE,
    &tables::BITSTREAM,
];

/// Default evaluator.
///
/// Administrators pass every check. Content objects are governed by their
/// `resourcepolicy` rows; subscriptions, processes and claimed tasks are
/// readable by their owner; a version is readable when its item is.
pub struct ResourcePolicyEvaluator {
    store: Arc<dyn Persistence>,
    epersons: EPersonService,
    policies: Dao<ResourcePolicy>,
    subscriptions: Dao<Subscription>,
    processes: Dao<Process>,
    claimed_tasks: Dao<ClaimedTask>,
    versions: Dao<Version>,
}

impl ResourcePolicyEvaluator {
    pub fn new(store: Arc<dyn Persistence>) -> Self {
        Self {
            epersons: EPersonService::new(store.clone()),
            policies: Dao::new(store.clone()),
            subscriptions: Dao::new(store.clone()),
            processes: Dao::new(store.clone()),
            claimed_tasks: Dao::new(store.clone()),
            versions: Dao::new(store.clone()),
            store,
        }
    }

    async fn target_exists(&self, ctx: &Context, target: &TargetRef) -> Result<bool> {
        let candidates: &[&Table] = match target.kind {
            TargetKind::Community => &[&tables::COMMUNITY],
            TargetKind::Collection => &[&tables::COLLECTION],
            TargetKind::Item => &[&tables::ITEM],
            TargetKind::Bundle => &[&tables::BUNDLE],
            TargetKind::Bitstream => &[&tables::BITSTREAM],
            TargetKind::EPerson => &[&tables::EPERSON],
            TargetKind::Group => &[&tables::EPERSON_GROUP],
            TargetKind::Subscription => &[&tables::SUBSCRIPTION],
            TargetKind::Process => &[&tables::PROCESS],
            TargetKind::Version => &[&tables::VERSION],
            TargetKind::ClaimedTask => &[&tables::CLAIMED_TASK],
            TargetKind::DSpaceObject => &CONTENT_TABLES,
        };
        for table in candidates {
            if self.store.find(ctx, table, &target.id).await?.is_some() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Whether an active policy grants `permission` (or ADMIN) on `resource`
    /// to the caller, one of the caller's groups, or Anonymous.
    async fn policy_grants(
        &self,
        ctx: &Context,
        resource: &str,
        permission: Permission,
    ) -> Result<bool> {
        let policies = self
            .policies
            .find_by(ctx, &tables::POLICY_RESOURCE, resource, Window::unbounded())
            .await?;
        let today = Utc::now().date_naive();
        let relevant: Vec<&ResourcePolicy> = policies
            .iter()
            .filter(|p| {
                (p.action_id == permission.action_id()
                    || p.action_id == Permission::Admin.action_id())
                    && p.is_active_on(today)
            })
            .collect();
        if relevant.is_empty() {
            return Ok(false);
        }

        let user = ctx.current_user();
        if relevant
            .iter()
            .any(|p| user.is_some() && p.eperson_id == user)
        {
            return Ok(true);
        }

        let groups = self.epersons.all_group_ids(ctx, user).await?;
        Ok(relevant
            .iter()
            .any(|p| p.epersongroup_id.map_or(false, |g| groups.contains(&g))))
    }

    async fn owned_by_caller(&self, ctx: &Context, target: &TargetRef) -> Result<bool> {
        let Some(user) = ctx.current_user() else {
            return Ok(false);
        };
        let owner = match target.kind {
            TargetKind::Subscription => self
                .subscriptions
                .find(ctx, &parse(&target.id)?)
                .await?
                .map(|s| s.eperson_id),
            TargetKind::Process => self
                .processes
                .find(ctx, &parse(&target.id)?)
                .await?
                .and_then(|p| p.user_id),
            TargetKind::ClaimedTask => self
                .claimed_tasks
                .find(ctx, &parse(&target.id)?)
                .await?
                .map(|t| t.owner_id),
            TargetKind::EPerson => Uuid::parse_str(&target.id).ok(),
            _ => None,
        };
        Ok(owner == Some(user))
    }
}

fn parse<T: FromStr>(id: &str) -> Result<T> {
    id.parse()
        .map_err(|_| crate::Error::Internal(format!("malformed permission target id '{id}'")))
}

#[async_trait]
impl PermissionEvaluator for ResourcePolicyEvaluator {
    async fn is_admin(&self, ctx: &Context) -> Result<bool> {
        match ctx.current_user() {
            Some(user) => self.epersons.is_admin(ctx, user).await,
            None => Ok(false),
        }
    }

    async fn has_permission(
        &self,
        ctx: &Context,
        target: &TargetRef,
        permission: Permission,
    ) -> Result<bool> {
        if !self.target_exists(ctx, target).await? {
            return Ok(true);
        }
        if self.is_admin(ctx).await? {
            return Ok(true);
        }

        let granted = match target.kind {
            kind if kind.is_content() => self.policy_grants(ctx, &target.id, permission).await?,
            TargetKind::Version => {
                let version = self.versions.find(ctx, &parse(&target.id)?).await?;
                match version.and_then(|v| v.item_id) {
                    Some(item) => self.policy_grants(ctx, &item.to_string(), permission).await?,
                    None => false,
                }
            }
            TargetKind::Group => match (permission, ctx.current_user()) {
                (Permission::Read, Some(user)) => {
                    let group = parse::<Uuid>(&target.id)?;
                    self.epersons.is_member(ctx, user, &group).await?
                }
                _ => false,
            },
            _ => permission == Permission::Read && self.owned_by_caller(ctx, target).await?,
        };

        tracing::trace!(
            request_id = %ctx.request_id(),
            kind = ?target.kind,
            id = %target.id,
            %permission,
            granted,
            "Evaluated permission"
        );
        Ok(granted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryPersistence;
    use serde_json::json;

    struct Fixture {
        evaluator: ResourcePolicyEvaluator,
        admin: Uuid,
        reader: Uuid,
        public_item: Uuid,
        private_item: Uuid,
        embargoed_item: Uuid,
    }

    fn fixture() -> Fixture {
        let admin_group = Uuid::new_v4();
        let anonymous_group = Uuid::new_v4();
        let readers = Uuid::new_v4();
        let admin = Uuid::new_v4();
        let reader = Uuid::new_v4();
        let public_item = Uuid::new_v4();
        let private_item = Uuid::new_v4();
        let embargoed_item = Uuid::new_v4();

        let store = MemoryPersistence::from_seed(json!({
            "eperson": [ { "uuid": admin }, { "uuid": reader } ],
            "epersongroup": [
                { "uuid": admin_group, "name": "Administrator" },
                { "uuid": anonymous_group, "name": "Anonymous" },
                { "uuid": readers, "name": "Readers" }
            ],
            "epersongroup2eperson": [
                { "eperson_group_id": admin_group, "eperson_id": admin },
                { "eperson_group_id": readers, "eperson_id": reader }
            ],
            "item": [
                { "uuid": public_item, "name": "Public" },
                { "uuid": private_item, "name": "Private" },
                { "uuid": embargoed_item, "name": "Embargoed" }
            ],
            "resourcepolicy": [
                { "policy_id": 1, "resource_id": public_item, "action_id": 0, "epersongroup_id": anonymous_group },
                { "policy_id": 2, "resource_id": private_item, "action_id": 0, "epersongroup_id": readers },
                { "policy_id": 3, "resource_id": embargoed_item, "action_id": 0, "epersongroup_id": anonymous_group, "start_date": "2999-01-01" }
            ]
        }))
        .unwrap();

        Fixture {
            evaluator: ResourcePolicyEvaluator::new(Arc::new(store)),
            admin,
            reader,
            public_item,
            private_item,
            embargoed_item,
        }
    }

    async fn can_read(f: &Fixture, ctx: &Context, item: Uuid) -> bool {
        f.evaluator
            .has_permission(ctx, &TargetRef::new(TargetKind::Item, item), Permission::Read)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn anonymous_policy_grants_everyone() {
        let f = fixture();
        assert!(can_read(&f, &Context::anonymous(), f.public_item).await);
        assert!(can_read(&f, &Context::for_user(f.reader), f.public_item).await);
    }

    #[tokio::test]
    async fn group_policy_grants_members_only() {
        let f = fixture();
        assert!(can_read(&f, &Context::for_user(f.reader), f.private_item).await);
        assert!(!can_read(&f, &Context::anonymous(), f.private_item).await);
    }

    #[tokio::test]
    async fn policies_outside_their_window_are_ignored() {
        let f = fixture();
        assert!(!can_read(&f, &Context::anonymous(), f.embargoed_item).await);
        assert!(can_read(&f, &Context::for_user(f.admin), f.embargoed_item).await);
    }

    #[tokio::test]
    async fn unknown_target_is_granted() {
        let f = fixture();
        assert!(can_read(&f, &Context::anonymous(), Uuid::new_v4()).await);
    }

    #[tokio::test]
    async fn eperson_can_read_itself_only() {
        let f = fixture();
        let ctx = Context::for_user(f.reader);
        let me = TargetRef::new(TargetKind::EPerson, f.reader);
        let other = TargetRef::new(TargetKind::EPerson, f.admin);
        assert!(f.evaluator.has_permission(&ctx, &me, Permission::Read).await.unwrap());
        assert!(!f.evaluator.has_permission(&ctx, &other, Permission::Read).await.unwrap());
    }
}

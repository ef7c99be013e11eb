//! Repository registry
//!
//! Maps `(category, model)` and `(category, model, relation)` to the
//! registered repositories. Every repository is wrapped by the permission
//! gate on registration. The registry also renders resources: it adds one
//! `_links` entry per registered relation and resolves embeds requested by
//! the projection.

use futures::future::try_join_all;
use serde_json::Value as JsonValue;
use std::{collections::HashMap, sync::Arc};

use super::{
    entities::{
        AuthorizationRepository, HarvesterMetadataRepository, PropertyRepository,
        StoredObjectRepository, SubmissionAccessOptionRepository, UsageReportRepository,
        WorkflowActionRepository, WorkflowStepRepository,
    },
    links::*,
    DynEntityRepository, DynLinkRepository, EntityRepository, GuardedLink, GuardedRepository,
    LinkRepository, LinkTarget, Page, Pageable, Projection,
};
use crate::{
    authorize::{
        AuthorizationFeatureService, Permission, PermissionGate, Preauthorize, TargetKind,
    },
    config::Config,
    context::Context,
    converter::{ConverterService, HalResource},
    services::Services,
    Error, Result,
};

/// `category -> model -> value`. Nested so lookups borrow request `&str`s.
type ByModel<V> = HashMap<&'static str, HashMap<&'static str, V>>;

/// Relations of one model, in registration order.
type Relations = Vec<(&'static str, Arc<dyn DynLinkRepository>)>;

pub struct Registry {
    converter: Arc<ConverterService>,
    default_page_size: u64,
    entities: ByModel<Arc<dyn DynEntityRepository>>,
    links: ByModel<Relations>,
}

pub struct RegistryBuilder {
    gate: PermissionGate,
    registry: Registry,
}

impl RegistryBuilder {
    pub fn entity<R: EntityRepository>(mut self, repository: R) -> Self {
        let guarded = GuardedRepository::new(repository, self.gate.clone());
        let previous = self
            .registry
            .entities
            .entry(R::CATEGORY)
            .or_default()
            .insert(R::MODEL, Arc::new(guarded));
        if previous.is_some() {
            tracing::warn!(
                category = R::CATEGORY,
                model = R::MODEL,
                "Entity repository registered twice"
            );
        }
        self
    }

    pub fn link<L: LinkRepository>(mut self, repository: L) -> Self {
        let guarded: Arc<dyn DynLinkRepository> =
            Arc::new(GuardedLink::new(repository, self.gate.clone()));
        let relations = self
            .registry
            .links
            .entry(L::CATEGORY)
            .or_default()
            .entry(L::MODEL)
            .or_default();
        match relations.iter_mut().find(|(name, _)| *name == L::RELATION) {
            Some(slot) => {
                tracing::warn!(
                    category = L::CATEGORY,
                    model = L::MODEL,
                    relation = L::RELATION,
                    "Link repository registered twice"
                );
                slot.1 = guarded;
            }
            None => relations.push((L::RELATION, guarded)),
        }
        self
    }

    pub fn build(self) -> Registry {
        tracing::debug!(
            entities = self.registry.entities.len(),
            links = self.registry.links.len(),
            "Repository registry built"
        );
        self.registry
    }
}

impl Registry {
    pub fn builder(
        gate: PermissionGate,
        converter: Arc<ConverterService>,
        default_page_size: u64,
    ) -> RegistryBuilder {
        RegistryBuilder {
            gate,
            registry: Registry {
                converter,
                default_page_size,
                entities: HashMap::new(),
                links: HashMap::new(),
            },
        }
    }

    /// Every repository this server exposes.
    pub fn standard(
        services: &Services,
        gate: PermissionGate,
        converter: Arc<ConverterService>,
        config: &Config,
    ) -> Self {
        let s = services;
        let c = converter.clone();
        let read = Preauthorize::HasPermission(Permission::Read);
        let history = if config.versioning.history_view_admin {
            Preauthorize::Admin
        } else {
            Preauthorize::PermitAll
        };
        let features = AuthorizationFeatureService::new(
            gate.evaluator().clone(),
            s.epersons.clone(),
            s.content.clone(),
            config.statistics.admin_only,
        );

        Self::builder(gate, converter, u64::from(config.rest.default_page_size))
            // core
            .entity(
                StoredObjectRepository::new(s.content.communities.clone(), c.clone())
                    .guarded_as(TargetKind::Community)
                    .listable(Preauthorize::PermitAll),
            )
            .entity(
                StoredObjectRepository::new(s.content.collections.clone(), c.clone())
                    .guarded_as(TargetKind::Collection)
                    .listable(Preauthorize::PermitAll),
            )
            .entity(
                StoredObjectRepository::new(s.content.items.clone(), c.clone())
                    .guarded_as(TargetKind::Item)
                    .listable(Preauthorize::Admin),
            )
            .entity(
                StoredObjectRepository::new(s.content.bundles.clone(), c.clone())
                    .guarded_as(TargetKind::Bundle),
            )
            .entity(
                StoredObjectRepository::new(s.content.bitstreams.clone(), c.clone())
                    .guarded_as(TargetKind::Bitstream)
                    .listable(Preauthorize::Admin),
            )
            .entity(
                StoredObjectRepository::new(s.subscriptions.subscriptions.clone(), c.clone())
                    .guarded_as(TargetKind::Subscription)
                    .listable(Preauthorize::Admin),
            )
            .entity(
                StoredObjectRepository::new(s.licenses.licenses.clone(), c.clone())
                    .find_one_rule(Preauthorize::PermitAll)
                    .listable(Preauthorize::PermitAll),
            )
            .entity(
                StoredObjectRepository::new(s.licenses.labels.clone(), c.clone())
                    .find_one_rule(Preauthorize::PermitAll),
            )
            // eperson
            .entity(
                StoredObjectRepository::new(s.epersons.epersons.clone(), c.clone())
                    .guarded_as(TargetKind::EPerson)
                    .listable(Preauthorize::Admin),
            )
            .entity(
                StoredObjectRepository::new(s.epersons.groups.clone(), c.clone())
                    .guarded_as(TargetKind::Group)
                    .listable(Preauthorize::Admin),
            )
            // system
            .entity(
                StoredObjectRepository::new(s.processes.processes.clone(), c.clone())
                    .guarded_as(TargetKind::Process)
                    .listable(Preauthorize::Admin),
            )
            // versioning
            .entity(
                StoredObjectRepository::new(s.versioning.versions.clone(), c.clone())
                    .guarded_as(TargetKind::Version)
                    .find_one_rule(read),
            )
            .entity(
                StoredObjectRepository::new(s.versioning.histories.clone(), c.clone())
                    .find_one_rule(history),
            )
            // workflow
            .entity(
                StoredObjectRepository::new(s.workflow.claimed_tasks.clone(), c.clone())
                    .guarded_as(TargetKind::ClaimedTask),
            )
            .entity(WorkflowStepRepository::new(s.workflow.clone(), c.clone()))
            .entity(WorkflowActionRepository::new(s.workflow.clone(), c.clone()))
            // config
            .entity(PropertyRepository::new(s.configuration.clone(), c.clone()))
            .entity(HarvesterMetadataRepository::new(s.configuration.clone(), c.clone()))
            .entity(SubmissionAccessOptionRepository::new(s.configuration.clone(), c.clone()))
            // authz / statistics
            .entity(AuthorizationRepository::new(features, c.clone()))
            .entity(UsageReportRepository::new(
                s.statistics.clone(),
                c.clone(),
                config.statistics.admin_only,
            ))
            // links
            .link(CollectionParentCommunityLink::new(s.content.clone(), c.clone()))
            .link(CommunityParentCommunityLink::new(s.content.clone(), c.clone()))
            .link(SubcommunitiesLink::new(s.content.clone(), c.clone()))
            .link(CommunityCollectionsLink::new(s.content.clone(), c.clone()))
            .link(ItemOwningCollectionLink::new(s.content.clone(), c.clone()))
            .link(ItemBundlesLink::new(s.content.clone(), c.clone()))
            .link(ItemVersionLink::new(
                s.content.clone(),
                s.versioning.clone(),
                c.clone(),
            ))
            .link(BundleItemLink::new(s.content.clone(), c.clone()))
            .link(BundleBitstreamsLink::new(s.content.clone(), c.clone()))
            .link(SubscriptionEPersonLink::new(
                s.subscriptions.clone(),
                s.epersons.clone(),
                c.clone(),
            ))
            .link(SubscriptionResourceLink::new(
                s.subscriptions.clone(),
                s.content.clone(),
                c.clone(),
            ))
            .link(GroupEPersonsLink::new(s.epersons.clone(), c.clone()))
            .link(GroupSubgroupsLink::new(s.epersons.clone(), c.clone()))
            .link(EPersonGroupsLink::new(s.epersons.clone(), c.clone()))
            .link(ProcessFilesLink::new(s.processes.clone(), c.clone()))
            .link(VersionItemLink::new(
                s.versioning.clone(),
                s.content.clone(),
                c.clone(),
            ))
            .link(VersionHistoryLink::new(s.versioning.clone(), c.clone()))
            .link(VersionHistoryVersionsLink::new(
                s.versioning.clone(),
                c.clone(),
                history,
            ))
            .link(ClaimedTaskStepLink::new(s.workflow.clone(), c.clone()))
            .link(ClaimedTaskActionLink::new(s.workflow.clone(), c.clone()))
            .link(ClaimedTaskOwnerLink::new(
                s.workflow.clone(),
                s.epersons.clone(),
                c.clone(),
            ))
            .link(WorkflowStepActionsLink::new(s.workflow.clone(), c.clone()))
            .link(LicenseLabelLink::new(s.licenses.clone(), c))
            .build()
    }

    pub fn converter(&self) -> &ConverterService {
        &self.converter
    }

    pub fn entity(&self, category: &str, model: &str) -> Result<&Arc<dyn DynEntityRepository>> {
        self.entities
            .get(category)
            .and_then(|models| models.get(model))
            .ok_or_else(|| Error::NotFound(format!("{category}/{model} is not a known endpoint")))
    }

    pub fn link(
        &self,
        category: &str,
        model: &str,
        relation: &str,
    ) -> Result<&Arc<dyn DynLinkRepository>> {
        self.model_links(category, model)
            .iter()
            .find(|(name, _)| *name == relation)
            .map(|(_, repository)| repository)
            .ok_or_else(|| {
                Error::NotFound(format!("{category}/{model} has no relation '{relation}'"))
            })
    }

    /// Relations registered for a model, in registration order.
    pub fn relations(&self, category: &str, model: &str) -> Vec<&'static str> {
        self.model_links(category, model)
            .iter()
            .map(|(name, _)| *name)
            .collect()
    }

    fn model_links(
        &self,
        category: &str,
        model: &str,
    ) -> &[(&'static str, Arc<dyn DynLinkRepository>)] {
        self.links
            .get(category)
            .and_then(|models| models.get(model))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// `(category, model)` of every entity repository, sorted.
    pub fn endpoints(&self) -> Vec<(&'static str, &'static str)> {
        let mut endpoints: Vec<_> = self
            .entities
            .iter()
            .flat_map(|(category, models)| models.keys().map(move |model| (*category, *model)))
            .collect();
        endpoints.sort_unstable();
        endpoints
    }

    fn with_relation_links(&self, mut resource: HalResource) -> HalResource {
        for rel in self.relations(resource.category(), resource.model()) {
            let href = format!("{}/{rel}", resource.self_href());
            resource.add_link(rel, href);
        }
        resource
    }

    /// Render a resource with its relation links and requested embeds.
    pub async fn render(
        &self,
        ctx: &Context,
        resource: HalResource,
        projection: &Projection,
    ) -> Result<JsonValue> {
        let mut resource = self.with_relation_links(resource);
        if projection.is_default() {
            return Ok(resource.into_json());
        }

        let wanted: Vec<&'static str> = self
            .relations(resource.category(), resource.model())
            .into_iter()
            .filter(|rel| projection.embeds(rel))
            .collect();

        let embeds = try_join_all(
            wanted
                .into_iter()
                .map(|rel| self.resolve_embed(ctx, &resource, rel)),
        )
        .await?;
        for (rel, value) in embeds.into_iter().flatten() {
            resource.embed(rel, value);
        }
        Ok(resource.into_json())
    }

    async fn resolve_embed(
        &self,
        ctx: &Context,
        resource: &HalResource,
        rel: &'static str,
    ) -> Result<Option<(&'static str, JsonValue)>> {
        let link = self.link(resource.category(), resource.model(), rel)?;
        let pageable = Pageable::new(0, self.default_page_size);
        let href = format!("{}/{rel}", resource.self_href());

        match link.resolve(ctx, resource.id(), pageable).await {
            Ok(target) => Ok(Some((rel, self.render_link_target(target, rel, &href)))),
            // Embeds the caller may not see are left out rather than failing the parent.
            Err(Error::AuthorizationDenied { .. }) | Err(Error::ResourceNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn render_link_target(&self, target: LinkTarget, rel: &str, href: &str) -> JsonValue {
        match target {
            LinkTarget::Single(Some(resource)) => self.with_relation_links(resource).into_json(),
            LinkTarget::Single(None) => JsonValue::Null,
            LinkTarget::Page(page) => {
                let content = page
                    .content
                    .into_iter()
                    .map(|r| self.with_relation_links(r).into_json())
                    .collect();
                self.converter
                    .page_json(content, page.pageable, page.total, rel, href)
            }
        }
    }

    pub async fn render_page(
        &self,
        ctx: &Context,
        page: Page<HalResource>,
        projection: &Projection,
        key: &str,
        href: &str,
    ) -> Result<JsonValue> {
        let content = try_join_all(
            page.content
                .into_iter()
                .map(|resource| self.render(ctx, resource, projection)),
        )
        .await?;
        Ok(self
            .converter
            .page_json(content, page.pageable, page.total, key, href))
    }

    /// Render the result of a link endpoint. `None` when the relation has
    /// no target.
    pub async fn render_link(
        &self,
        ctx: &Context,
        target: LinkTarget,
        projection: &Projection,
        rel: &str,
        href: &str,
    ) -> Result<Option<JsonValue>> {
        match target {
            LinkTarget::Single(None) => Ok(None),
            LinkTarget::Single(Some(resource)) => {
                self.render(ctx, resource, projection).await.map(Some)
            }
            LinkTarget::Page(page) => self
                .render_page(ctx, page, projection, rel, href)
                .await
                .map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{authorize::ResourcePolicyEvaluator, db::MemoryPersistence, db::Persistence};

    fn standard() -> Registry {
        let config = Config::default();
        let store: Arc<dyn Persistence> = Arc::new(MemoryPersistence::new());
        let services = Services::new(store.clone(), &config);
        let gate = PermissionGate::new(Arc::new(ResourcePolicyEvaluator::new(store)));
        let converter = Arc::new(ConverterService::new("http://localhost:8080"));
        Registry::standard(&services, gate, converter, &config)
    }

    #[test]
    fn lookups_accept_request_owned_names() {
        let registry = standard();
        let category = String::from("core");
        let model = String::from("collections");
        let relation = String::from("parentCommunity");

        assert!(registry.entity(&category, &model).is_ok());
        assert!(registry.link(&category, &model, &relation).is_ok());
        assert!(matches!(
            registry.entity(&category, "nothing"),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            registry.link(&category, &model, "nothing"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn relations_keep_registration_order() {
        let registry = standard();
        assert_eq!(
            registry.relations("core", "communities"),
            vec!["parentCommunity", "subcommunities", "collections"]
        );
        assert!(registry.relations("core", "nothing").is_empty());
        assert_eq!(registry.endpoints().len(), 21);
    }
}

//! Entity repositories

pub mod authorization;
pub mod configuration;
pub mod statistics;
pub mod workflow;

use async_trait::async_trait;
use std::sync::Arc;

use super::{EntityRepository, Page, Pageable};
use crate::{
    authorize::{Permission, Preauthorize, TargetKind, TargetRef},
    context::Context,
    converter::{ConverterService, HalResource, RestModel, ToRest},
    models::DomainObject,
    services::Dao,
    Error, Result,
};

pub use authorization::AuthorizationRepository;
pub use configuration::{
    HarvesterMetadataRepository, PropertyRepository, SubmissionAccessOptionRepository,
};
pub use statistics::UsageReportRepository;
pub use workflow::{WorkflowActionRepository, WorkflowStepRepository};

/// Repository over a stored entity table.
///
/// `find_one` defaults to READ on the object; listing is disabled until
/// [`StoredObjectRepository::listable`] enables it.
pub struct StoredObjectRepository<T: DomainObject> {
    dao: Dao<T>,
    converter: Arc<ConverterService>,
    kind: Option<TargetKind>,
    find_one_rule: Preauthorize,
    find_all_rule: Option<Preauthorize>,
}

impl<T: DomainObject> StoredObjectRepository<T> {
    pub fn new(dao: Dao<T>, converter: Arc<ConverterService>) -> Self {
        Self {
            dao,
            converter,
            kind: None,
            find_one_rule: Preauthorize::HasPermission(Permission::Read),
            find_all_rule: None,
        }
    }

    /// Evaluate permissions against objects of `kind`.
    pub fn guarded_as(mut self, kind: TargetKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn find_one_rule(mut self, rule: Preauthorize) -> Self {
        self.find_one_rule = rule;
        self
    }

    pub fn listable(mut self, rule: Preauthorize) -> Self {
        self.find_all_rule = Some(rule);
        self
    }
}

#[async_trait]
impl<T> EntityRepository for StoredObjectRepository<T>
where
    T: DomainObject + ToRest,
{
    const CATEGORY: &'static str = <T::Rest as RestModel>::CATEGORY;
    const MODEL: &'static str = <T::Rest as RestModel>::PLURAL;

    type Id = T::Id;

    fn find_one_rule(&self) -> Preauthorize {
        self.find_one_rule
    }

    fn find_all_rule(&self) -> Preauthorize {
        self.find_all_rule.unwrap_or(Preauthorize::PermitAll)
    }

    fn target_for(&self, id: &T::Id) -> Option<TargetRef> {
        self.kind.map(|kind| TargetRef::new(kind, id))
    }

    async fn find_one(&self, ctx: &Context, id: T::Id) -> Result<Option<HalResource>> {
        self.dao
            .find(ctx, &id)
            .await?
            .map(|object| self.converter.to_rest(&object))
            .transpose()
    }

    async fn find_all(&self, ctx: &Context, pageable: Pageable) -> Result<Page<HalResource>> {
        if self.find_all_rule.is_none() {
            return Err(Error::NotImplemented(format!(
                "{}/{} does not support listing",
                Self::CATEGORY,
                Self::MODEL
            )));
        }

        let objects = self.dao.find_all(ctx, pageable.window()).await?;
        let total = self.dao.count(ctx).await?;
        self.converter.to_rest_page(&objects, pageable, total)
    }
}

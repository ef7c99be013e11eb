//! Authorization lookups.

use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    authorize::{AuthorizationFeatureService, Preauthorize},
    context::Context,
    converter::{ConverterService, HalResource},
    repository::EntityRepository,
    Result,
};

/// Answers whether an eperson holds a feature on an object. The
/// self-or-admin restriction is enforced by the feature service, since it
/// depends on the eperson named inside the id.
pub struct AuthorizationRepository {
    features: AuthorizationFeatureService,
    converter: Arc<ConverterService>,
}

impl AuthorizationRepository {
    pub fn new(features: AuthorizationFeatureService, converter: Arc<ConverterService>) -> Self {
        Self {
            features,
            converter,
        }
    }
}

#[async_trait]
impl EntityRepository for AuthorizationRepository {
    const CATEGORY: &'static str = "authz";
    const MODEL: &'static str = "authorizations";

    type Id = String;

    fn find_one_rule(&self) -> Preauthorize {
        Preauthorize::PermitAll
    }

    async fn find_one(&self, ctx: &Context, id: String) -> Result<Option<HalResource>> {
        let Some(authorization) = self.features.find(ctx, &id).await? else {
            return Ok(None);
        };

        let mut resource = self.converter.to_rest(&authorization)?;
        let object = &authorization.object;
        resource.add_link(
            "object",
            self.converter.entity_href(
                "core",
                object.plural_name(),
                &object.uuid().to_string(),
            ),
        );
        resource.add_link(
            "feature",
            self.converter
                .entity_href("authz", "features", authorization.key.feature.name()),
        );
        if let Some(eperson) = authorization.key.eperson {
            resource.add_link(
                "eperson",
                self.converter
                    .entity_href("eperson", "epersons", &eperson.to_string()),
            );
        }
        Ok(Some(resource))
    }
}

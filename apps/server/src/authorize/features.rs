//! Authorization features
//!
//! An authorization states that an eperson (or an anonymous caller) is
//! granted a named feature on a content object. Its id has the form
//! `{eperson}_{feature}_{type}_{object}`, or `{feature}_{type}_{object}`
//! for anonymous callers.

use std::{fmt, str::FromStr, sync::Arc};
use uuid::Uuid;

use super::{Permission, PermissionEvaluator, TargetRef};
use crate::{
    context::Context,
    models::DSpaceObject,
    services::{ContentService, EPersonService},
    Error, Result,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationFeature {
    AdministratorOf,
    CanViewUsageStatistics,
    CanSubscribeDso,
}

impl AuthorizationFeature {
    pub fn name(self) -> &'static str {
        match self {
            Self::AdministratorOf => "administratorOf",
            Self::CanViewUsageStatistics => "canViewUsageStatistics",
            Self::CanSubscribeDso => "canSubscribeDso",
        }
    }

    fn supports(self, object: &DSpaceObject) -> bool {
        match self {
            Self::CanSubscribeDso => matches!(
                object,
                DSpaceObject::Community(_) | DSpaceObject::Collection(_) | DSpaceObject::Item(_)
            ),
            Self::AdministratorOf | Self::CanViewUsageStatistics => true,
        }
    }
}

impl fmt::Display for AuthorizationFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AuthorizationFeature {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, ()> {
        match s {
            "administratorOf" => Ok(Self::AdministratorOf),
            "canViewUsageStatistics" => Ok(Self::CanViewUsageStatistics),
            "canSubscribeDso" => Ok(Self::CanSubscribeDso),
            _ => Err(()),
        }
    }
}

/// REST type string of a content object, e.g. `core.item`.
pub fn object_type(object: &DSpaceObject) -> String {
    format!("core.{}", object.type_name())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationKey {
    pub eperson: Option<Uuid>,
    pub feature: AuthorizationFeature,
    pub object_type: String,
    pub object_id: Uuid,
}

impl AuthorizationKey {
    pub fn parse(id: &str) -> Option<Self> {
        let parts: Vec<&str> = id.split('_').collect();
        let (eperson, rest) = match parts.as_slice() {
            [eperson, rest @ ..] if rest.len() == 3 => (Some(Uuid::parse_str(eperson).ok()?), rest),
            rest if rest.len() == 3 => (None, rest),
            _ => return None,
        };
        Some(Self {
            eperson,
            feature: rest[0].parse().ok()?,
            object_type: rest[1].to_string(),
            object_id: Uuid::parse_str(rest[2]).ok()?,
        })
    }
}

impl fmt::Display for AuthorizationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(eperson) = self.eperson {
            write!(f, "{eperson}_")?;
        }
        write!(f, "{}_{}_{}", self.feature, self.object_type, self.object_id)
    }
}

#[derive(Debug, Clone)]
pub struct Authorization {
    pub key: AuthorizationKey,
    pub object: DSpaceObject,
}

#[derive(Clone)]
pub struct AuthorizationFeatureService {
    evaluator: Arc<dyn PermissionEvaluator>,
    epersons: EPersonService,
    content: ContentService,
    statistics_admin_only: bool,
}

impl AuthorizationFeatureService {
    pub fn new(
        evaluator: Arc<dyn PermissionEvaluator>,
        epersons: EPersonService,
        content: ContentService,
        statistics_admin_only: bool,
    ) -> Self {
        Self {
            evaluator,
            epersons,
            content,
            statistics_admin_only,
        }
    }

    /// Resolve an authorization id. `Ok(None)` when the id is malformed,
    /// names unknown objects, or the feature is not granted.
    ///
    /// Only the named eperson or an administrator may ask about an eperson.
    pub async fn find(&self, ctx: &Context, id: &str) -> Result<Option<Authorization>> {
        let Some(key) = AuthorizationKey::parse(id) else {
            return Ok(None);
        };

        if let Some(eperson) = key.eperson {
            if ctx.current_user() != Some(eperson) && !self.evaluator.is_admin(ctx).await? {
                return Err(Error::AuthorizationDenied {
                    authenticated: ctx.is_authenticated(),
                });
            }
            if !self.epersons.epersons.exists(ctx, &eperson).await? {
                return Ok(None);
            }
        }

        let Some(object) = self.content.find_dso(ctx, &key.object_id).await? else {
            return Ok(None);
        };
        if object_type(&object) != key.object_type || !key.feature.supports(&object) {
            return Ok(None);
        }

        let subject = ctx.as_user(key.eperson);
        let target = TargetRef::from(&object);
        let granted = match key.feature {
            AuthorizationFeature::AdministratorOf => {
                self.evaluator
                    .has_permission(&subject, &target, Permission::Admin)
                    .await?
            }
            AuthorizationFeature::CanViewUsageStatistics if self.statistics_admin_only => {
                subject.is_authenticated() && self.evaluator.is_admin(&subject).await?
            }
            AuthorizationFeature::CanViewUsageStatistics => {
                self.evaluator
                    .has_permission(&subject, &target, Permission::Read)
                    .await?
            }
            AuthorizationFeature::CanSubscribeDso => {
                subject.is_authenticated()
                    && self
                        .evaluator
                        .has_permission(&subject, &target, Permission::Read)
                        .await?
            }
        };

        Ok(granted.then(|| Authorization { key, object }))
    }
}

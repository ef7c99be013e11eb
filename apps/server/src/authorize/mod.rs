//! Permission gate
//!
//! Every repository method declares a [`Preauthorize`] rule. The
//! [`PermissionGate`] evaluates that rule for the caller before the method
//! body runs; a denial never reaches the domain services.

pub mod features;
pub mod policy;

use async_trait::async_trait;
use std::{fmt, sync::Arc};

use crate::{context::Context, models::DSpaceObject, Error, Result};

pub use features::{Authorization, AuthorizationFeature, AuthorizationFeatureService, AuthorizationKey};
pub use policy::ResourcePolicyEvaluator;

/// Resource policy actions, with their stored action ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    Read,
    Write,
    Delete,
    Add,
    Remove,
    Admin,
}

impl Permission {
    pub fn action_id(self) -> i32 {
        match self {
            Self::Read => 0,
            Self::Write => 1,
            Self::Delete => 2,
            Self::Add => 3,
            Self::Remove => 4,
            Self::Admin => 11,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "READ",
            Self::Write => "WRITE",
            Self::Delete => "DELETE",
            Self::Add => "ADD",
            Self::Remove => "REMOVE",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule evaluated before a repository method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preauthorize {
    PermitAll,
    Authenticated,
    Admin,
    HasPermission(Permission),
}

/// Kinds of object a permission can be checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Community,
    Collection,
    Item,
    Bundle,
    Bitstream,
    EPerson,
    Group,
    Subscription,
    Process,
    Version,
    ClaimedTask,
    /// A content object of not yet known type.
    DSpaceObject,
}

impl TargetKind {
    pub fn is_content(self) -> bool {
        matches!(
            self,
            Self::Community
                | Self::Collection
                | Self::Item
                | Self::Bundle
                | Self::Bitstream
                | Self::DSpaceObject
        )
    }
}

/// The object a rule is evaluated against, by kind and key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRef {
    pub kind: TargetKind,
    pub id: String,
}

impl TargetRef {
    pub fn new(kind: TargetKind, id: impl ToString) -> Self {
        Self {
            kind,
            id: id.to_string(),
        }
    }
}

impl From<&DSpaceObject> for TargetRef {
    fn from(object: &DSpaceObject) -> Self {
        let kind = match object {
            DSpaceObject::Community(_) => TargetKind::Community,
            DSpaceObject::Collection(_) => TargetKind::Collection,
            DSpaceObject::Item(_) => TargetKind::Item,
            DSpaceObject::Bundle(_) => TargetKind::Bundle,
            DSpaceObject::Bitstream(_) => TargetKind::Bitstream,
        };
        Self::new(kind, object.uuid())
    }
}

#[async_trait]
pub trait PermissionEvaluator: Send + Sync {
    /// Whether the caller is a site administrator.
    async fn is_admin(&self, ctx: &Context) -> Result<bool>;

    /// Whether the caller holds `permission` on `target`. A target that does
    /// not exist is granted so that callers observe "not found".
    async fn has_permission(
        &self,
        ctx: &Context,
        target: &TargetRef,
        permission: Permission,
    ) -> Result<bool>;
}

#[derive(Clone)]
pub struct PermissionGate {
    evaluator: Arc<dyn PermissionEvaluator>,
}

impl PermissionGate {
    pub fn new(evaluator: Arc<dyn PermissionEvaluator>) -> Self {
        Self { evaluator }
    }

    pub fn evaluator(&self) -> &Arc<dyn PermissionEvaluator> {
        &self.evaluator
    }

    /// Evaluate `rule`. `target: None` means the key did not identify any
    /// object, so there is nothing to protect.
    pub async fn check(
        &self,
        ctx: &Context,
        target: Option<&TargetRef>,
        rule: Preauthorize,
    ) -> Result<()> {
        let granted = match rule {
            Preauthorize::PermitAll => true,
            Preauthorize::Authenticated => ctx.is_authenticated(),
            Preauthorize::Admin => ctx.is_authenticated() && self.evaluator.is_admin(ctx).await?,
            Preauthorize::HasPermission(permission) => match target {
                Some(target) => {
                    self.evaluator
                        .has_permission(ctx, target, permission)
                        .await?
                }
                None => true,
            },
        };

        if granted {
            Ok(())
        } else {
            tracing::debug!(
                request_id = %ctx.request_id(),
                ?rule,
                ?target,
                authenticated = ctx.is_authenticated(),
                "Permission denied"
            );
            Err(Error::AuthorizationDenied {
                authenticated: ctx.is_authenticated(),
            })
        }
    }
}

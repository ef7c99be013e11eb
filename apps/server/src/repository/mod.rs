//! REST repositories
//!
//! An entity repository answers `find_one`/`find_all` for one model; a link
//! repository resolves one named relation of a parent model. Both declare
//! their permission rules, and both are wrapped by the permission gate when
//! they are registered, so a handler can only reach them through the gate.

pub mod entities;
pub mod links;
pub mod registry;

use async_trait::async_trait;
use std::{fmt::Display, str::FromStr};

use crate::{
    authorize::{Permission, PermissionGate, Preauthorize, TargetRef},
    context::Context,
    converter::HalResource,
    db::Window,
    Error, Result,
};

pub use registry::Registry;

/// Requested slice of a list: 0-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pageable {
    pub page: u64,
    pub size: u64,
}

impl Pageable {
    pub fn new(page: u64, size: u64) -> Self {
        Self { page, size }
    }

    pub fn window(&self) -> Window {
        Window::new(self.page.saturating_mul(self.size), self.size)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        if self.size == 0 {
            0
        } else {
            total.div_ceil(self.size)
        }
    }
}

/// One page of results. `total` counts the whole result set.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub pageable: Pageable,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, pageable: Pageable, total: u64) -> Self {
        Self {
            content,
            pageable,
            total,
        }
    }
}

/// Which relations to embed, one level deep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    full: bool,
    embeds: Vec<String>,
}

impl Projection {
    pub fn full() -> Self {
        Self {
            full: true,
            embeds: Vec::new(),
        }
    }

    pub fn with_embeds(embeds: Vec<String>) -> Self {
        Self { full: false, embeds }
    }

    pub fn embeds(&self, rel: &str) -> bool {
        self.full || self.embeds.iter().any(|e| e == rel)
    }

    pub fn is_default(&self) -> bool {
        !self.full && self.embeds.is_empty()
    }
}

#[async_trait]
pub trait EntityRepository: Send + Sync + 'static {
    const CATEGORY: &'static str;
    const MODEL: &'static str;

    type Id: FromStr + Display + Send + Sync + 'static;

    fn find_one_rule(&self) -> Preauthorize {
        Preauthorize::HasPermission(Permission::Read)
    }

    fn find_all_rule(&self) -> Preauthorize {
        Preauthorize::PermitAll
    }

    /// The object `find_one_rule` is evaluated against.
    fn target_for(&self, _id: &Self::Id) -> Option<TargetRef> {
        None
    }

    async fn find_one(&self, ctx: &Context, id: Self::Id) -> Result<Option<HalResource>>;

    async fn find_all(&self, _ctx: &Context, _pageable: Pageable) -> Result<Page<HalResource>> {
        Err(Error::NotImplemented(format!(
            "{}/{} does not support listing",
            Self::CATEGORY,
            Self::MODEL
        )))
    }
}

/// Result of a link repository.
#[derive(Debug, Clone)]
pub enum LinkTarget {
    /// `None` when the relation legitimately has no target.
    Single(Option<HalResource>),
    Page(Page<HalResource>),
}

#[async_trait]
pub trait LinkRepository: Send + Sync + 'static {
    const CATEGORY: &'static str;
    const MODEL: &'static str;
    const RELATION: &'static str;

    type Id: FromStr + Display + Send + Sync + 'static;

    fn rule(&self) -> Preauthorize {
        Preauthorize::HasPermission(Permission::Read)
    }

    /// The parent object `rule` is evaluated against.
    fn target_for(&self, _parent: &Self::Id) -> Option<TargetRef> {
        None
    }

    /// Resolve the relation. A parent that does not exist is
    /// `Error::ResourceNotFound`.
    async fn resolve(&self, ctx: &Context, parent: Self::Id, pageable: Pageable)
        -> Result<LinkTarget>;
}

/// Object-safe entity repository, keyed by raw path segments.
#[async_trait]
pub trait DynEntityRepository: Send + Sync {
    fn category(&self) -> &'static str;
    fn model(&self) -> &'static str;

    async fn find_one(&self, ctx: &Context, id: &str) -> Result<Option<HalResource>>;
    async fn find_all(&self, ctx: &Context, pageable: Pageable) -> Result<Page<HalResource>>;
}

/// Object-safe link repository, keyed by raw path segments.
#[async_trait]
pub trait DynLinkRepository: Send + Sync {
    fn category(&self) -> &'static str;
    fn model(&self) -> &'static str;
    fn relation(&self) -> &'static str;

    async fn resolve(&self, ctx: &Context, parent: &str, pageable: Pageable) -> Result<LinkTarget>;
}

/// An entity repository behind the permission gate.
pub struct GuardedRepository<R> {
    inner: R,
    gate: PermissionGate,
}

impl<R: EntityRepository> GuardedRepository<R> {
    pub fn new(inner: R, gate: PermissionGate) -> Self {
        Self { inner, gate }
    }
}

#[async_trait]
impl<R: EntityRepository> DynEntityRepository for GuardedRepository<R> {
    fn category(&self) -> &'static str {
        R::CATEGORY
    }

    fn model(&self) -> &'static str {
        R::MODEL
    }

    async fn find_one(&self, ctx: &Context, id: &str) -> Result<Option<HalResource>> {
        let Ok(id) = id.parse::<R::Id>() else {
            tracing::debug!(model = R::MODEL, id, "Identifier does not parse; treating as absent");
            return Ok(None);
        };
        let target = self.inner.target_for(&id);
        self.gate
            .check(ctx, target.as_ref(), self.inner.find_one_rule())
            .await?;
        self.inner.find_one(ctx, id).await
    }

    async fn find_all(&self, ctx: &Context, pageable: Pageable) -> Result<Page<HalResource>> {
        self.gate
            .check(ctx, None, self.inner.find_all_rule())
            .await?;
        self.inner.find_all(ctx, pageable).await
    }
}

/// A link repository behind the permission gate.
pub struct GuardedLink<L> {
    inner: L,
    gate: PermissionGate,
}

impl<L: LinkRepository> GuardedLink<L> {
    pub fn new(inner: L, gate: PermissionGate) -> Self {
        Self { inner, gate }
    }
}

#[async_trait]
impl<L: LinkRepository> DynLinkRepository for GuardedLink<L> {
    fn category(&self) -> &'static str {
        L::CATEGORY
    }

    fn model(&self) -> &'static str {
        L::MODEL
    }

    fn relation(&self) -> &'static str {
        L::RELATION
    }

    async fn resolve(&self, ctx: &Context, parent: &str, pageable: Pageable) -> Result<LinkTarget> {
        let parent_id = parent
            .parse::<L::Id>()
            .map_err(|_| Error::resource_not_found(L::MODEL, parent))?;
        let target = self.inner.target_for(&parent_id);
        self.gate
            .check(ctx, target.as_ref(), self.inner.rule())
            .await?;
        self.inner.resolve(ctx, parent_id, pageable).await
    }
}

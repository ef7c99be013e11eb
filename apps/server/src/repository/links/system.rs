//! Relations of processes, versions and licenses.

use async_trait::async_trait;
use std::sync::Arc;

use super::{page, require, single};
use crate::{
    authorize::{Preauthorize, TargetKind, TargetRef},
    context::Context,
    converter::ConverterService,
    repository::{LinkRepository, LinkTarget, Pageable},
    services::{ContentService, LicenseService, ProcessService, VersioningService},
    Result,
};

/// `processes/{id}/files`
pub struct ProcessFilesLink {
    processes: ProcessService,
    converter: Arc<ConverterService>,
}

impl ProcessFilesLink {
    pub fn new(processes: ProcessService, converter: Arc<ConverterService>) -> Self {
        Self {
            processes,
            converter,
        }
    }
}

#[async_trait]
impl LinkRepository for ProcessFilesLink {
    const CATEGORY: &'static str = "system";
    const MODEL: &'static str = "processes";
    const RELATION: &'static str = "files";

    type Id = i32;

    fn target_for(&self, parent: &i32) -> Option<TargetRef> {
        Some(TargetRef::new(TargetKind::Process, parent))
    }

    async fn resolve(&self, ctx: &Context, id: i32, pageable: Pageable) -> Result<LinkTarget> {
        require(self.processes.processes.find(ctx, &id).await?, "process", id)?;
        let files = self.processes.files(ctx, id, pageable.window()).await?;
        page(&self.converter, files, pageable)
    }
}

/// `versions/{id}/item`; none once the item has been removed.
pub struct VersionItemLink {
    versioning: VersioningService,
    content: ContentService,
    converter: Arc<ConverterService>,
}

impl VersionItemLink {
    pub fn new(
        versioning: VersioningService,
        content: ContentService,
        converter: Arc<ConverterService>,
    ) -> Self {
        Self {
            versioning,
            content,
            converter,
        }
    }
}

#[async_trait]
impl LinkRepository for VersionItemLink {
    const CATEGORY: &'static str = "versioning";
    const MODEL: &'static str = "versions";
    const RELATION: &'static str = "item";

    type Id = i32;

    fn target_for(&self, parent: &i32) -> Option<TargetRef> {
        Some(TargetRef::new(TargetKind::Version, parent))
    }

    async fn resolve(&self, ctx: &Context, id: i32, _pageable: Pageable) -> Result<LinkTarget> {
        let version = require(self.versioning.versions.find(ctx, &id).await?, "version", id)?;
        let item = match version.item_id {
            Some(item) => self.content.items.find(ctx, &item).await?,
            None => None,
        };
        single(&self.converter, item)
    }
}

/// `versions/{id}/versionhistory`
pub struct VersionHistoryLink {
    versioning: VersioningService,
    converter: Arc<ConverterService>,
}

impl VersionHistoryLink {
    pub fn new(versioning: VersioningService, converter: Arc<ConverterService>) -> Self {
        Self {
            versioning,
            converter,
        }
    }
}

#[async_trait]
impl LinkRepository for VersionHistoryLink {
    const CATEGORY: &'static str = "versioning";
    const MODEL: &'static str = "versions";
    const RELATION: &'static str = "versionhistory";

    type Id = i32;

    fn target_for(&self, parent: &i32) -> Option<TargetRef> {
        Some(TargetRef::new(TargetKind::Version, parent))
    }

    async fn resolve(&self, ctx: &Context, id: i32, _pageable: Pageable) -> Result<LinkTarget> {
        let version = require(self.versioning.versions.find(ctx, &id).await?, "version", id)?;
        let history = self.versioning.history_of(ctx, &version).await?;
        single(&self.converter, history)
    }
}

/// `versionhistories/{id}/versions`
pub struct VersionHistoryVersionsLink {
    versioning: VersioningService,
    converter: Arc<ConverterService>,
    rule: Preauthorize,
}

impl VersionHistoryVersionsLink {
    /// `rule` is shared with `versionhistories` find_one.
    pub fn new(
        versioning: VersioningService,
        converter: Arc<ConverterService>,
        rule: Preauthorize,
    ) -> Self {
        Self {
            versioning,
            converter,
            rule,
        }
    }
}

#[async_trait]
impl LinkRepository for VersionHistoryVersionsLink {
    const CATEGORY: &'static str = "versioning";
    const MODEL: &'static str = "versionhistories";
    const RELATION: &'static str = "versions";

    type Id = i32;

    fn rule(&self) -> Preauthorize {
        self.rule
    }

    async fn resolve(&self, ctx: &Context, id: i32, pageable: Pageable) -> Result<LinkTarget> {
        require(
            self.versioning.histories.find(ctx, &id).await?,
            "versionhistory",
            id,
        )?;
        let versions = self.versioning.versions_of(ctx, id, pageable.window()).await?;
        page(&self.converter, versions, pageable)
    }
}

/// `clarinlicenses/{id}/clarinLicenseLabel`
pub struct LicenseLabelLink {
    licenses: LicenseService,
    converter: Arc<ConverterService>,
}

impl LicenseLabelLink {
    pub fn new(licenses: LicenseService, converter: Arc<ConverterService>) -> Self {
        Self {
            licenses,
            converter,
        }
    }
}

#[async_trait]
impl LinkRepository for LicenseLabelLink {
    const CATEGORY: &'static str = "core";
    const MODEL: &'static str = "clarinlicenses";
    const RELATION: &'static str = "clarinLicenseLabel";

    type Id = i32;

    fn rule(&self) -> Preauthorize {
        Preauthorize::PermitAll
    }

    async fn resolve(&self, ctx: &Context, id: i32, _pageable: Pageable) -> Result<LinkTarget> {
        let license = require(self.licenses.licenses.find(ctx, &id).await?, "clarinlicense", id)?;
        let label = self.licenses.label_of(ctx, &license).await?;
        single(&self.converter, label)
    }
}

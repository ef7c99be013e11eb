//! Link repositories, one per `(model, relation)` pair.

pub mod community;
pub mod eperson;
pub mod item;
pub mod system;
pub mod workflow;

use std::fmt::Display;

use super::{LinkTarget, Page, Pageable};
use crate::{
    converter::{ConverterService, ToRest},
    Error, Result,
};

pub use community::{
    CollectionParentCommunityLink, CommunityCollectionsLink, CommunityParentCommunityLink,
    SubcommunitiesLink,
};
pub use eperson::{
    EPersonGroupsLink, GroupEPersonsLink, GroupSubgroupsLink, SubscriptionEPersonLink,
    SubscriptionResourceLink,
};
pub use item::{
    BundleBitstreamsLink, BundleItemLink, ItemBundlesLink, ItemOwningCollectionLink, ItemVersionLink,
};
pub use system::{
    LicenseLabelLink, ProcessFilesLink, VersionHistoryLink, VersionHistoryVersionsLink,
    VersionItemLink,
};
pub use workflow::{
    ClaimedTaskActionLink, ClaimedTaskOwnerLink, ClaimedTaskStepLink, WorkflowStepActionsLink,
};

/// The loaded parent, or `ResourceNotFound`.
fn require<T>(parent: Option<T>, model: &str, id: impl Display) -> Result<T> {
    parent.ok_or_else(|| Error::resource_not_found(model, id))
}

fn single<T: ToRest>(converter: &ConverterService, target: Option<T>) -> Result<LinkTarget> {
    Ok(LinkTarget::Single(
        target.map(|t| converter.to_rest(&t)).transpose()?,
    ))
}

fn page<T: ToRest>(
    converter: &ConverterService,
    (rows, total): (Vec<T>, u64),
    pageable: Pageable,
) -> Result<LinkTarget> {
    let page: Page<_> = converter.to_rest_page(&rows, pageable, total)?;
    Ok(LinkTarget::Page(page))
}

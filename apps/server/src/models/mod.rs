//! Domain model
//!
//! Plain data types mirroring the stored rows. Entities are loaded through
//! the persistence layer and never mutated by the REST layer.

pub mod content;
pub mod eperson;
pub mod license;
pub mod system;
pub mod versioning;
pub mod workflow;

use serde::de::DeserializeOwned;
use std::{fmt::Display, str::FromStr};

use crate::db::Table;

pub use content::{Bitstream, Bundle, Collection, Community, DSpaceObject, Item};
pub use eperson::{EPerson, Group, Subscription};
pub use license::{ClarinLicense, ClarinLicenseLabel};
pub use system::{Process, ProcessStatus, ResourcePolicy, UsageEvent, UsageEventType};
pub use versioning::{Version, VersionHistory};
pub use workflow::{ClaimedTask, WorkflowAction, WorkflowStep};

/// A stored entity with a typed primary key.
pub trait DomainObject: DeserializeOwned + Send + Sync + 'static {
    type Id: Display + FromStr + Clone + Send + Sync + 'static;

    const TABLE: &'static Table;

    fn id(&self) -> Self::Id;
}

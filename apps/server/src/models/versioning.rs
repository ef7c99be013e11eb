//! Item versions and version histories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DomainObject;
use crate::db::{tables, Table};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Version {
    pub versionitem_id: i32,
    pub version_number: i32,
    /// Cleared when the versioned item has been deleted.
    pub item_id: Option<Uuid>,
    pub eperson_id: Option<Uuid>,
    pub version_date: DateTime<Utc>,
    pub version_summary: Option<String>,
    pub versionhistory_id: i32,
}

impl DomainObject for Version {
    type Id = i32;
    const TABLE: &'static Table = &tables::VERSION;

    fn id(&self) -> i32 {
        self.versionitem_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionHistory {
    pub versionhistory_id: i32,
}

impl DomainObject for VersionHistory {
    type Id = i32;
    const TABLE: &'static Table = &tables::VERSION_HISTORY;

    fn id(&self) -> i32 {
        self.versionhistory_id
    }
}

//! Communities, collections, items, bundles and bitstreams.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DomainObject;
use crate::db::{tables, Table};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Community {
    pub uuid: Uuid,
    pub name: String,
    pub handle: Option<String>,
    pub short_description: Option<String>,
    /// `None` for top-level communities.
    pub parent_community_id: Option<Uuid>,
    pub last_modified: Option<DateTime<Utc>>,
}

impl DomainObject for Community {
    type Id = Uuid;
    const TABLE: &'static Table = &tables::COMMUNITY;

    fn id(&self) -> Uuid {
        self.uuid
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub uuid: Uuid,
    pub name: String,
    pub handle: Option<String>,
    pub short_description: Option<String>,
    pub owning_community_id: Option<Uuid>,
    pub last_modified: Option<DateTime<Utc>>,
}

impl DomainObject for Collection {
    type Id = Uuid;
    const TABLE: &'static Table = &tables::COLLECTION;

    fn id(&self) -> Uuid {
        self.uuid
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub uuid: Uuid,
    pub name: String,
    pub handle: Option<String>,
    /// Unset while the item is still in submission or workflow.
    pub owning_collection_id: Option<Uuid>,
    #[serde(default)]
    pub in_archive: bool,
    #[serde(default)]
    pub withdrawn: bool,
    #[serde(default = "default_true")]
    pub discoverable: bool,
    pub last_modified: Option<DateTime<Utc>>,
}

impl DomainObject for Item {
    type Id = Uuid;
    const TABLE: &'static Table = &tables::ITEM;

    fn id(&self) -> Uuid {
        self.uuid
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bundle {
    pub uuid: Uuid,
    pub name: String,
    pub item_id: Uuid,
    pub primary_bitstream_id: Option<Uuid>,
}

impl DomainObject for Bundle {
    type Id = Uuid;
    const TABLE: &'static Table = &tables::BUNDLE;

    fn id(&self) -> Uuid {
        self.uuid
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bitstream {
    pub uuid: Uuid,
    pub name: String,
    pub bundle_id: Option<Uuid>,
    #[serde(default)]
    pub size_bytes: i64,
    pub checksum: Option<String>,
    pub checksum_algorithm: Option<String>,
    pub mime_type: Option<String>,
    pub sequence_id: Option<i32>,
}

impl DomainObject for Bitstream {
    type Id = Uuid;
    const TABLE: &'static Table = &tables::BITSTREAM;

    fn id(&self) -> Uuid {
        self.uuid
    }
}

fn default_true() -> bool {
    true
}

/// Any content object that resource policies, subscriptions and usage
/// statistics can point at.
#[derive(Debug, Clone)]
pub enum DSpaceObject {
    Community(Community),
    Collection(Collection),
    Item(Item),
    Bundle(Bundle),
    Bitstream(Bitstream),
}

impl DSpaceObject {
    pub fn uuid(&self) -> Uuid {
        match self {
            Self::Community(c) => c.uuid,
            Self::Collection(c) => c.uuid,
            Self::Item(i) => i.uuid,
            Self::Bundle(b) => b.uuid,
            Self::Bitstream(b) => b.uuid,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Community(c) => &c.name,
            Self::Collection(c) => &c.name,
            Self::Item(i) => &i.name,
            Self::Bundle(b) => &b.name,
            Self::Bitstream(b) => &b.name,
        }
    }

    /// Plural REST model name, e.g. `communities`.
    pub fn plural_name(&self) -> &'static str {
        match self {
            Self::Community(_) => "communities",
            Self::Collection(_) => "collections",
            Self::Item(_) => "items",
            Self::Bundle(_) => "bundles",
            Self::Bitstream(_) => "bitstreams",
        }
    }

    /// Lowercase type name, as used in REST type strings.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Community(_) => "community",
            Self::Collection(_) => "collection",
            Self::Item(_) => "item",
            Self::Bundle(_) => "bundle",
            Self::Bitstream(_) => "bitstream",
        }
    }
}

//! REST models for communities, collections, items, bundles and bitstreams.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

use super::{RestModel, ToRest};
use crate::models::{Bitstream, Bundle, Collection, Community, Item};

#[derive(Debug, Clone, Serialize)]
pub struct MetadataValueRest {
    pub value: String,
    pub language: Option<String>,
    pub authority: Option<String>,
    pub confidence: i32,
    pub place: usize,
}

pub type MetadataMap = BTreeMap<String, Vec<MetadataValueRest>>;

/// Build a metadata map from single-valued fields, skipping unset ones.
pub fn metadata(fields: &[(&str, Option<&str>)]) -> MetadataMap {
    fields
        .iter()
        .filter_map(|(key, value)| {
            value.map(|v| {
                (
                    key.to_string(),
                    vec![MetadataValueRest {
                        value: v.to_string(),
                        language: None,
                        authority: None,
                        confidence: -1,
                        place: 0,
                    }],
                )
            })
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityRest {
    pub id: Uuid,
    pub uuid: Uuid,
    pub name: String,
    pub handle: Option<String>,
    pub metadata: MetadataMap,
}

impl RestModel for CommunityRest {
    const CATEGORY: &'static str = "core";
    const TYPE: &'static str = "community";
    const PLURAL: &'static str = "communities";

    fn rest_id(&self) -> String {
        self.id.to_string()
    }
}

impl ToRest for Community {
    type Rest = CommunityRest;

    fn to_rest(&self) -> CommunityRest {
        CommunityRest {
            id: self.uuid,
            uuid: self.uuid,
            name: self.name.clone(),
            handle: self.handle.clone(),
            metadata: metadata(&[
                ("dc.title", Some(self.name.as_str())),
                ("dc.description.abstract", self.short_description.as_deref()),
            ]),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRest {
    pub id: Uuid,
    pub uuid: Uuid,
    pub name: String,
    pub handle: Option<String>,
    pub metadata: MetadataMap,
}

impl RestModel for CollectionRest {
    const CATEGORY: &'static str = "core";
    const TYPE: &'static str = "collection";
    const PLURAL: &'static str = "collections";

    fn rest_id(&self) -> String {
        self.id.to_string()
    }
}

impl ToRest for Collection {
    type Rest = CollectionRest;

    fn to_rest(&self) -> CollectionRest {
        CollectionRest {
            id: self.uuid,
            uuid: self.uuid,
            name: self.name.clone(),
            handle: self.handle.clone(),
            metadata: metadata(&[
                ("dc.title", Some(self.name.as_str())),
                ("dc.description.abstract", self.short_description.as_deref()),
            ]),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRest {
    pub id: Uuid,
    pub uuid: Uuid,
    pub name: String,
    pub handle: Option<String>,
    pub in_archive: bool,
    pub discoverable: bool,
    pub withdrawn: bool,
    pub last_modified: Option<DateTime<Utc>>,
    pub metadata: MetadataMap,
}

impl RestModel for ItemRest {
    const CATEGORY: &'static str = "core";
    const TYPE: &'static str = "item";
    const PLURAL: &'static str = "items";

    fn rest_id(&self) -> String {
        self.id.to_string()
    }
}

impl ToRest for Item {
    type Rest = ItemRest;

    fn to_rest(&self) -> ItemRest {
        ItemRest {
            id: self.uuid,
            uuid: self.uuid,
            name: self.name.clone(),
            handle: self.handle.clone(),
            in_archive: self.in_archive,
            discoverable: self.discoverable,
            withdrawn: self.withdrawn,
            last_modified: self.last_modified,
            metadata: metadata(&[("dc.title", Some(self.name.as_str()))]),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleRest {
    pub id: Uuid,
    pub uuid: Uuid,
    pub name: String,
    pub metadata: MetadataMap,
}

impl RestModel for BundleRest {
    const CATEGORY: &'static str = "core";
    const TYPE: &'static str = "bundle";
    const PLURAL: &'static str = "bundles";

    fn rest_id(&self) -> String {
        self.id.to_string()
    }
}

impl ToRest for Bundle {
    type Rest = BundleRest;

    fn to_rest(&self) -> BundleRest {
        BundleRest {
            id: self.uuid,
            uuid: self.uuid,
            name: self.name.clone(),
            metadata: metadata(&[("dc.title", Some(self.name.as_str()))]),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckSumRest {
    pub check_sum_algorithm: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BitstreamRest {
    pub id: Uuid,
    pub uuid: Uuid,
    pub name: String,
    pub size_bytes: i64,
    pub check_sum: CheckSumRest,
    pub sequence_id: Option<i32>,
    pub mime_type: Option<String>,
    pub metadata: MetadataMap,
}

impl RestModel for BitstreamRest {
    const CATEGORY: &'static str = "core";
    const TYPE: &'static str = "bitstream";
    const PLURAL: &'static str = "bitstreams";

    fn rest_id(&self) -> String {
        self.id.to_string()
    }
}

impl ToRest for Bitstream {
    type Rest = BitstreamRest;

    fn to_rest(&self) -> BitstreamRest {
        BitstreamRest {
            id: self.uuid,
            uuid: self.uuid,
            name: self.name.clone(),
            size_bytes: self.size_bytes,
            check_sum: CheckSumRest {
                check_sum_algorithm: self.checksum_algorithm.clone(),
                value: self.checksum.clone(),
            },
            sequence_id: self.sequence_id,
            mime_type: self.mime_type.clone(),
            metadata: metadata(&[("dc.title", Some(self.name.as_str()))]),
        }
    }
}

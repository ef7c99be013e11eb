//! Table descriptors for the DSpace schema (see `migrations/`).

use super::traits::{Column, JoinTable, KeyType, Table};

pub const COMMUNITY: Table = Table {
    name: "community",
    id_column: "uuid",
    id_type: KeyType::Uuid,
    order_by: "name",
};

pub const COLLECTION: Table = Table {
    name: "collection",
    id_column: "uuid",
    id_type: KeyType::Uuid,
    order_by: "name",
};

pub const ITEM: Table = Table {
    name: "item",
    id_column: "uuid",
    id_type: KeyType::Uuid,
    order_by: "name",
};

pub const BUNDLE: Table = Table {
    name: "bundle",
    id_column: "uuid",
    id_type: KeyType::Uuid,
    order_by: "name",
};

pub const BITSTREAM: Table = Table {
    name: "bitstream",
    id_column: "uuid",
    id_type: KeyType::Uuid,
    order_by: "sequence_id",
};

pub const EPERSON: Table = Table {
    name: "eperson",
    id_column: "uuid",
    id_type: KeyType::Uuid,
    order_by: "email",
};

pub const EPERSON_GROUP: Table = Table {
    name: "epersongroup",
    id_column: "uuid",
    id_type: KeyType::Uuid,
    order_by: "name",
};

pub const SUBSCRIPTION: Table = Table {
    name: "subscription",
    id_column: "subscription_id",
    id_type: KeyType::Integer,
    order_by: "subscription_id",
};

pub const PROCESS: Table = Table {
    name: "process",
    id_column: "process_id",
    id_type: KeyType::Integer,
    order_by: "process_id",
};

pub const VERSION: Table = Table {
    name: "versionitem",
    id_column: "versionitem_id",
    id_type: KeyType::Integer,
    order_by: "version_number",
};

pub const VERSION_HISTORY: Table = Table {
    name: "versionhistory",
    id_column: "versionhistory_id",
    id_type: KeyType::Integer,
    order_by: "versionhistory_id",
};

pub const CLAIMED_TASK: Table = Table {
    name: "cwf_claimtask",
    id_column: "claimtask_id",
    id_type: KeyType::Integer,
    order_by: "claimtask_id",
};

pub const LICENSE: Table = Table {
    name: "license_definition",
    id_column: "license_id",
    id_type: KeyType::Integer,
    order_by: "name",
};

pub const LICENSE_LABEL: Table = Table {
    name: "license_label",
    id_column: "label_id",
    id_type: KeyType::Integer,
    order_by: "label",
};

pub const RESOURCE_POLICY: Table = Table {
    name: "resourcepolicy",
    id_column: "policy_id",
    id_type: KeyType::Integer,
    order_by: "policy_id",
};

pub const USAGE_EVENT: Table = Table {
    name: "usage_event",
    id_column: "event_id",
    id_type: KeyType::BigInt,
    order_by: "event_id",
};

/// Direct eperson members of a group.
pub const GROUP_MEMBERS: JoinTable = JoinTable {
    name: "epersongroup2eperson",
    parent_column: "eperson_group_id",
    parent_type: KeyType::Uuid,
    child_column: "eperson_id",
    target: &EPERSON,
};

/// Groups an eperson is a direct member of.
pub const EPERSON_MEMBERSHIPS: JoinTable = JoinTable {
    name: "epersongroup2eperson",
    parent_column: "eperson_id",
    parent_type: KeyType::Uuid,
    child_column: "eperson_group_id",
    target: &EPERSON_GROUP,
};

/// Direct child groups of a group.
pub const SUBGROUPS: JoinTable = JoinTable {
    name: "group2group",
    parent_column: "parent_id",
    parent_type: KeyType::Uuid,
    child_column: "child_id",
    target: &EPERSON_GROUP,
};

/// Direct parent groups of a group.
pub const PARENT_GROUPS: JoinTable = JoinTable {
    name: "group2group",
    parent_column: "child_id",
    parent_type: KeyType::Uuid,
    child_column: "parent_id",
    target: &EPERSON_GROUP,
};

/// Output and input files attached to a script process.
pub const PROCESS_FILES: JoinTable = JoinTable {
    name: "process2bitstream",
    parent_column: "process_id",
    parent_type: KeyType::Integer,
    child_column: "bitstream_id",
    target: &BITSTREAM,
};

pub const COMMUNITY_PARENT: Column = Column {
    name: "parent_community_id",
    key: KeyType::Uuid,
};

pub const COLLECTION_OWNING_COMMUNITY: Column = Column {
    name: "owning_community_id",
    key: KeyType::Uuid,
};

pub const BUNDLE_ITEM: Column = Column {
    name: "item_id",
    key: KeyType::Uuid,
};

pub const BITSTREAM_BUNDLE: Column = Column {
    name: "bundle_id",
    key: KeyType::Uuid,
};

pub const GROUP_NAME: Column = Column {
    name: "name",
    key: KeyType::Text,
};

pub const VERSION_ITEM: Column = Column {
    name: "item_id",
    key: KeyType::Uuid,
};

pub const VERSION_HISTORY_KEY: Column = Column {
    name: "versionhistory_id",
    key: KeyType::Integer,
};

pub const POLICY_RESOURCE: Column = Column {
    name: "resource_id",
    key: KeyType::Uuid,
};

pub const USAGE_EVENT_OBJECT: Column = Column {
    name: "dspace_object_id",
    key: KeyType::Uuid,
};

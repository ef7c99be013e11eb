//! Script processes, resource policies and usage events.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DomainObject;
use crate::db::{tables, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessStatus {
    Scheduled,
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Process {
    pub process_id: i32,
    pub script_name: String,
    /// The eperson that started the process.
    pub user_id: Option<Uuid>,
    pub status: ProcessStatus,
    pub creation_time: DateTime<Utc>,
    pub start_time: Option<DateTime<Utc>>,
    pub finished_time: Option<DateTime<Utc>>,
    pub parameters: Option<String>,
}

impl DomainObject for Process {
    type Id = i32;
    const TABLE: &'static Table = &tables::PROCESS;

    fn id(&self) -> i32 {
        self.process_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcePolicy {
    pub policy_id: i32,
    pub resource_id: Uuid,
    pub action_id: i32,
    pub eperson_id: Option<Uuid>,
    pub epersongroup_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ResourcePolicy {
    pub fn is_active_on(&self, day: NaiveDate) -> bool {
        self.start_date.map_or(true, |start| start <= day)
            && self.end_date.map_or(true, |end| day <= end)
    }
}

impl DomainObject for ResourcePolicy {
    type Id = i32;
    const TABLE: &'static Table = &tables::RESOURCE_POLICY;

    fn id(&self) -> i32 {
        self.policy_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageEventType {
    View,
    Download,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageEvent {
    pub event_id: i64,
    pub dspace_object_id: Uuid,
    pub event_type: UsageEventType,
    pub occurred_at: DateTime<Utc>,
}

impl DomainObject for UsageEvent {
    type Id = i64;
    const TABLE: &'static Table = &tables::USAGE_EVENT;

    fn id(&self) -> i64 {
        self.event_id
    }
}

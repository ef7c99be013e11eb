//! Claimed workflow tasks and the configured steps/actions they point at.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DomainObject;
use crate::db::{tables, Table};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimedTask {
    pub claimtask_id: i32,
    pub workflowitem_id: i32,
    pub workflow_id: String,
    pub step_id: String,
    pub action_id: String,
    pub owner_id: Uuid,
}

impl DomainObject for ClaimedTask {
    type Id = i32;
    const TABLE: &'static Table = &tables::CLAIMED_TASK;

    fn id(&self) -> i32 {
        self.claimtask_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowStep {
    pub id: String,
    pub role: Option<String>,
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowAction {
    pub id: String,
    pub options: Vec<String>,
}

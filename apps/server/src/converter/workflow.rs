//! REST models for claimed tasks and workflow definitions.

use serde::Serialize;

use super::{RestModel, ToRest};
use crate::models::{ClaimedTask, WorkflowAction, WorkflowStep};

#[derive(Debug, Clone, Serialize)]
pub struct ClaimedTaskRest {
    pub id: i32,
}

impl RestModel for ClaimedTaskRest {
    const CATEGORY: &'static str = "workflow";
    const TYPE: &'static str = "claimedtask";
    const PLURAL: &'static str = "claimedtasks";

    fn rest_id(&self) -> String {
        self.id.to_string()
    }
}

impl ToRest for ClaimedTask {
    type Rest = ClaimedTaskRest;

    fn to_rest(&self) -> ClaimedTaskRest {
        ClaimedTaskRest {
            id: self.claimtask_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowStepRest {
    pub id: String,
}

impl RestModel for WorkflowStepRest {
    const CATEGORY: &'static str = "config";
    const TYPE: &'static str = "workflowstep";
    const PLURAL: &'static str = "workflowsteps";

    fn rest_id(&self) -> String {
        self.id.clone()
    }
}

impl ToRest for WorkflowStep {
    type Rest = WorkflowStepRest;

    fn to_rest(&self) -> WorkflowStepRest {
        WorkflowStepRest { id: self.id.clone() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowActionRest {
    pub id: String,
    pub options: Vec<String>,
    /// Actions with options beyond approve/reject need a dedicated UI.
    pub advanced: bool,
}

impl RestModel for WorkflowActionRest {
    const CATEGORY: &'static str = "config";
    const TYPE: &'static str = "workflowaction";
    const PLURAL: &'static str = "workflowactions";

    fn rest_id(&self) -> String {
        self.id.clone()
    }
}

impl ToRest for WorkflowAction {
    type Rest = WorkflowActionRest;

    fn to_rest(&self) -> WorkflowActionRest {
        WorkflowActionRest {
            id: self.id.clone(),
            options: self.options.clone(),
            advanced: self
                .options
                .iter()
                .any(|o| o != "submit_approve" && o != "submit_reject"),
        }
    }
}

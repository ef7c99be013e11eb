//! Relations of claimed tasks and workflow steps.

use async_trait::async_trait;
use std::sync::Arc;

use super::{require, single};
use crate::{
    authorize::{Preauthorize, TargetKind, TargetRef},
    context::Context,
    converter::ConverterService,
    repository::{LinkRepository, LinkTarget, Pageable},
    services::{EPersonService, WorkflowService},
    Result,
};

/// `claimedtasks/{id}/step`
pub struct ClaimedTaskStepLink {
    workflow: WorkflowService,
    converter: Arc<ConverterService>,
}

impl ClaimedTaskStepLink {
    pub fn new(workflow: WorkflowService, converter: Arc<ConverterService>) -> Self {
        Self { workflow, converter }
    }
}

#[async_trait]
impl LinkRepository for ClaimedTaskStepLink {
    const CATEGORY: &'static str = "workflow";
    const MODEL: &'static str = "claimedtasks";
    const RELATION: &'static str = "step";

    type Id = i32;

    fn target_for(&self, parent: &i32) -> Option<TargetRef> {
        Some(TargetRef::new(TargetKind::ClaimedTask, parent))
    }

    async fn resolve(&self, ctx: &Context, id: i32, _pageable: Pageable) -> Result<LinkTarget> {
        let task = require(self.workflow.claimed_tasks.find(ctx, &id).await?, "claimedtask", id)?;
        single(&self.converter, self.workflow.step(&task.step_id).cloned())
    }
}

/// `claimedtasks/{id}/action`
pub struct ClaimedTaskActionLink {
    workflow: WorkflowService,
    converter: Arc<ConverterService>,
}

impl ClaimedTaskActionLink {
    pub fn new(workflow: WorkflowService, converter: Arc<ConverterService>) -> Self {
        Self { workflow, converter }
    }
}

#[async_trait]
impl LinkRepository for ClaimedTaskActionLink {
    const CATEGORY: &'static str = "workflow";
    const MODEL: &'static str = "claimedtasks";
    const RELATION: &'static str = "action";

    type Id = i32;

    fn target_for(&self, parent: &i32) -> Option<TargetRef> {
        Some(TargetRef::new(TargetKind::ClaimedTask, parent))
    }

    async fn resolve(&self, ctx: &Context, id: i32, _pageable: Pageable) -> Result<LinkTarget> {
        let task = require(self.workflow.claimed_tasks.find(ctx, &id).await?, "claimedtask", id)?;
        single(&self.converter, self.workflow.action(&task.action_id).cloned())
    }
}

/// `claimedtasks/{id}/owner`
pub struct ClaimedTaskOwnerLink {
    workflow: WorkflowService,
    epersons: EPersonService,
    converter: Arc<ConverterService>,
}

impl ClaimedTaskOwnerLink {
    pub fn new(
        workflow: WorkflowService,
        epersons: EPersonService,
        converter: Arc<ConverterService>,
    ) -> Self {
        Self {
            workflow,
            epersons,
            converter,
        }
    }
}

#[async_trait]
impl LinkRepository for ClaimedTaskOwnerLink {
    const CATEGORY: &'static str = "workflow";
    const MODEL: &'static str = "claimedtasks";
    const RELATION: &'static str = "owner";

    type Id = i32;

    fn target_for(&self, parent: &i32) -> Option<TargetRef> {
        Some(TargetRef::new(TargetKind::ClaimedTask, parent))
    }

    async fn resolve(&self, ctx: &Context, id: i32, _pageable: Pageable) -> Result<LinkTarget> {
        let task = require(self.workflow.claimed_tasks.find(ctx, &id).await?, "claimedtask", id)?;
        let owner = self.epersons.epersons.find(ctx, &task.owner_id).await?;
        single(&self.converter, owner)
    }
}

/// `workflowsteps/{id}/workflowactions`
pub struct WorkflowStepActionsLink {
    workflow: WorkflowService,
    converter: Arc<ConverterService>,
}

impl WorkflowStepActionsLink {
    pub fn new(workflow: WorkflowService, converter: Arc<ConverterService>) -> Self {
        Self { workflow, converter }
    }
}

#[async_trait]
impl LinkRepository for WorkflowStepActionsLink {
    const CATEGORY: &'static str = "config";
    const MODEL: &'static str = "workflowsteps";
    const RELATION: &'static str = "workflowactions";

    type Id = String;

    fn rule(&self) -> Preauthorize {
        Preauthorize::Authenticated
    }

    async fn resolve(&self, _ctx: &Context, id: String, pageable: Pageable) -> Result<LinkTarget> {
        let step = require(self.workflow.step(&id), "workflowstep", &id)?;
        let actions = self.workflow.actions_of(step);
        Ok(LinkTarget::Page(
            self.converter.to_rest_page_in_memory(&actions, pageable)?,
        ))
    }
}

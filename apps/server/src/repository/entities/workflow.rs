//! Workflow step and action definitions.

use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    authorize::Preauthorize,
    context::Context,
    converter::{ConverterService, HalResource},
    repository::EntityRepository,
    services::WorkflowService,
    Result,
};

pub struct WorkflowStepRepository {
    workflow: WorkflowService,
    converter: Arc<ConverterService>,
}

impl WorkflowStepRepository {
    pub fn new(workflow: WorkflowService, converter: Arc<ConverterService>) -> Self {
        Self { workflow, converter }
    }
}

#[async_trait]
impl EntityRepository for WorkflowStepRepository {
    const CATEGORY: &'static str = "config";
    const MODEL: &'static str = "workflowsteps";

    type Id = String;

    fn find_one_rule(&self) -> Preauthorize {
        Preauthorize::Authenticated
    }

    async fn find_one(&self, _ctx: &Context, id: String) -> Result<Option<HalResource>> {
        self.workflow
            .step(&id)
            .map(|step| self.converter.to_rest(step))
            .transpose()
    }
}

pub struct WorkflowActionRepository {
    workflow: WorkflowService,
    converter: Arc<ConverterService>,
}

impl WorkflowActionRepository {
    pub fn new(workflow: WorkflowService, converter: Arc<ConverterService>) -> Self {
        Self { workflow, converter }
    }
}

#[async_trait]
impl EntityRepository for WorkflowActionRepository {
    const CATEGORY: &'static str = "config";
    const MODEL: &'static str = "workflowactions";

    type Id = String;

    fn find_one_rule(&self) -> Preauthorize {
        Preauthorize::Authenticated
    }

    async fn find_one(&self, _ctx: &Context, id: String) -> Result<Option<HalResource>> {
        self.workflow
            .action(&id)
            .map(|action| self.converter.to_rest(action))
            .transpose()
    }
}

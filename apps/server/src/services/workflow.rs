//! Workflow definitions and claimed tasks.
//!
//! Steps and actions are configuration; claimed tasks are stored rows that
//! reference them by id.

use std::sync::Arc;

use super::Dao;
use crate::{
    config::WorkflowConfig,
    db::Persistence,
    models::{ClaimedTask, WorkflowAction, WorkflowStep},
};

#[derive(Clone)]
pub struct WorkflowService {
    pub claimed_tasks: Dao<ClaimedTask>,
    steps: Arc<Vec<WorkflowStep>>,
    actions: Arc<Vec<WorkflowAction>>,
}

impl WorkflowService {
    pub fn new(store: Arc<dyn Persistence>, config: &WorkflowConfig) -> Self {
        let steps = config
            .steps
            .iter()
            .map(|s| WorkflowStep {
                id: s.id.clone(),
                role: s.role.clone(),
                actions: s.actions.clone(),
            })
            .collect();
        let actions = config
            .actions
            .iter()
            .map(|a| WorkflowAction {
                id: a.id.clone(),
                options: a.options.clone(),
            })
            .collect();

        Self {
            claimed_tasks: Dao::new(store),
            steps: Arc::new(steps),
            actions: Arc::new(actions),
        }
    }

    pub fn step(&self, id: &str) -> Option<&WorkflowStep> {
        self.steps.iter().find(|s| s.id == id)
    }

    pub fn action(&self, id: &str) -> Option<&WorkflowAction> {
        self.actions.iter().find(|a| a.id == id)
    }

    /// Actions of a step, in configured order.
    pub fn actions_of(&self, step: &WorkflowStep) -> Vec<WorkflowAction> {
        step.actions
            .iter()
            .filter_map(|id| self.action(id).cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryPersistence;

    #[test]
    fn default_review_step_exposes_its_actions() {
        let service = WorkflowService::new(
            Arc::new(MemoryPersistence::new()),
            &WorkflowConfig::default(),
        );

        let step = service.step("reviewstep").unwrap();
        let ids: Vec<_> = service
            .actions_of(step)
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["claimaction", "reviewaction"]);
        assert!(service.step("nosuchstep").is_none());
    }
}

//! Domain services
//!
//! One service per entity area. Services own typed `Dao`s over the shared
//! `Persistence` trait object and add relation navigation on top.

pub mod configuration;
pub mod content;
pub mod dao;
pub mod eperson;
pub mod license;
pub mod process;
pub mod statistics;
pub mod versioning;
pub mod workflow;

pub use configuration::{ConfigurationProperty, ConfigurationService};
pub use content::ContentService;
pub use dao::Dao;
pub use eperson::{EPersonService, SubscriptionService};
pub use license::LicenseService;
pub use process::ProcessService;
pub use statistics::{StatisticsService, UsageReport, UsageReportType};
pub use versioning::VersioningService;
pub use workflow::WorkflowService;

use std::sync::Arc;

use crate::{config::Config, db::Persistence};

/// Every domain service, built over one store.
#[derive(Clone)]
pub struct Services {
    pub content: ContentService,
    pub epersons: EPersonService,
    pub subscriptions: SubscriptionService,
    pub processes: ProcessService,
    pub versioning: VersioningService,
    pub workflow: WorkflowService,
    pub licenses: LicenseService,
    pub statistics: StatisticsService,
    pub configuration: ConfigurationService,
}

impl Services {
    pub fn new(store: Arc<dyn Persistence>, config: &Config) -> Self {
        let content = ContentService::new(store.clone());
        Self {
            epersons: EPersonService::new(store.clone()),
            subscriptions: SubscriptionService::new(store.clone()),
            processes: ProcessService::new(store.clone()),
            versioning: VersioningService::new(store.clone()),
            workflow: WorkflowService::new(store.clone(), &config.workflow),
            licenses: LicenseService::new(store.clone()),
            statistics: StatisticsService::new(store, content.clone()),
            configuration: ConfigurationService::new(config),
            content,
        }
    }
}

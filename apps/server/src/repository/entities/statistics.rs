//! Usage reports.

use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    authorize::{Permission, Preauthorize, TargetKind, TargetRef},
    context::Context,
    converter::{ConverterService, HalResource},
    repository::EntityRepository,
    services::{statistics::parse_report_id, StatisticsService},
    Result,
};

/// Serves `{uuid}_{reportType}`. Readers of the object may see its
/// statistics unless they are restricted to administrators.
pub struct UsageReportRepository {
    statistics: StatisticsService,
    converter: Arc<ConverterService>,
    admin_only: bool,
}

impl UsageReportRepository {
    pub fn new(statistics: StatisticsService, converter: Arc<ConverterService>, admin_only: bool) -> Self {
        Self {
            statistics,
            converter,
            admin_only,
        }
    }
}

#[async_trait]
impl EntityRepository for UsageReportRepository {
    const CATEGORY: &'static str = "statistics";
    const MODEL: &'static str = "usagereports";

    type Id = String;

    fn find_one_rule(&self) -> Preauthorize {
        if self.admin_only {
            Preauthorize::Admin
        } else {
            Preauthorize::HasPermission(Permission::Read)
        }
    }

    fn target_for(&self, id: &String) -> Option<TargetRef> {
        parse_report_id(id).map(|(object, _)| TargetRef::new(TargetKind::DSpaceObject, object))
    }

    async fn find_one(&self, ctx: &Context, id: String) -> Result<Option<HalResource>> {
        let Some((object, report_type)) = parse_report_id(&id) else {
            return Ok(None);
        };
        self.statistics
            .usage_report(ctx, &object, report_type)
            .await?
            .map(|report| self.converter.to_rest(&report))
            .transpose()
    }
}

//! Usage statistics computed from recorded usage events.

use std::{fmt, str::FromStr, sync::Arc};
use uuid::Uuid;

use super::{ContentService, Dao};
use crate::{
    context::Context,
    db::{tables::USAGE_EVENT_OBJECT, Persistence, Window},
    models::{DSpaceObject, UsageEvent, UsageEventType},
    Result,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageReportType {
    TotalVisits,
    TotalDownloads,
}

impl UsageReportType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TotalVisits => "TotalVisits",
            Self::TotalDownloads => "TotalDownloads",
        }
    }

    fn event_type(self) -> UsageEventType {
        match self {
            Self::TotalVisits => UsageEventType::View,
            Self::TotalDownloads => UsageEventType::Download,
        }
    }
}

impl fmt::Display for UsageReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UsageReportType {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, ()> {
        match s {
            "TotalVisits" => Ok(Self::TotalVisits),
            "TotalDownloads" => Ok(Self::TotalDownloads),
            _ => Err(()),
        }
    }
}

/// Split `{uuid}_{reportType}`.
pub fn parse_report_id(id: &str) -> Option<(Uuid, UsageReportType)> {
    let (object, report) = id.split_once('_')?;
    Some((Uuid::parse_str(object).ok()?, report.parse().ok()?))
}

#[derive(Debug, Clone)]
pub struct UsageReport {
    pub object: DSpaceObject,
    pub report_type: UsageReportType,
    pub count: u64,
}

impl UsageReport {
    pub fn id(&self) -> String {
        format!("{}_{}", self.object.uuid(), self.report_type)
    }
}

#[derive(Clone)]
pub struct StatisticsService {
    events: Dao<UsageEvent>,
    content: ContentService,
}

impl StatisticsService {
    pub fn new(store: Arc<dyn Persistence>, content: ContentService) -> Self {
        Self {
            events: Dao::new(store),
            content,
        }
    }

    pub async fn usage_report(
        &self,
        ctx: &Context,
        object_id: &Uuid,
        report_type: UsageReportType,
    ) -> Result<Option<UsageReport>> {
        let Some(object) = self.content.find_dso(ctx, object_id).await? else {
            return Ok(None);
        };

        let wanted = report_type.event_type();
        let count = self
            .events
            .find_by(ctx, &USAGE_EVENT_OBJECT, &object_id.to_string(), Window::unbounded())
            .await?
            .iter()
            .filter(|e| e.event_type == wanted)
            .count() as u64;

        Ok(Some(UsageReport {
            object,
            report_type,
            count,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_ids_need_uuid_and_known_type() {
        let id = Uuid::new_v4();
        assert_eq!(
            parse_report_id(&format!("{id}_TotalDownloads")),
            Some((id, UsageReportType::TotalDownloads))
        );
        assert_eq!(parse_report_id(&format!("{id}_TopCountries")), None);
        assert_eq!(parse_report_id("nope_TotalVisits"), None);
        assert_eq!(parse_report_id(&id.to_string()), None);
    }
}

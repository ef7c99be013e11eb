//! REST models for processes, versioning, usage reports and authorizations.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use super::{RestModel, ToRest};
use crate::{
    authorize::Authorization,
    models::{Process, ProcessStatus, Version, VersionHistory},
    services::UsageReport,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterValueRest {
    pub name: String,
    pub value: Option<String>,
}

/// Split a stored command line such as `-i 123 -f` into named parameters.
pub fn parse_parameters(raw: &str) -> Vec<ParameterValueRest> {
    let mut out: Vec<ParameterValueRest> = Vec::new();
    for token in raw.split_whitespace() {
        if token.starts_with('-') {
            out.push(ParameterValueRest {
                name: token.to_string(),
                value: None,
            });
        } else if let Some(last) = out.last_mut().filter(|p| p.value.is_none()) {
            last.value = Some(token.to_string());
        }
    }
    out
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRest {
    pub id: i32,
    pub process_id: i32,
    pub script_name: String,
    pub user_id: Option<Uuid>,
    pub process_status: ProcessStatus,
    pub creation_time: DateTime<Utc>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub parameters: Vec<ParameterValueRest>,
}

impl RestModel for ProcessRest {
    const CATEGORY: &'static str = "system";
    const TYPE: &'static str = "process";
    const PLURAL: &'static str = "processes";

    fn rest_id(&self) -> String {
        self.id.to_string()
    }
}

impl ToRest for Process {
    type Rest = ProcessRest;

    fn to_rest(&self) -> ProcessRest {
        ProcessRest {
            id: self.process_id,
            process_id: self.process_id,
            script_name: self.script_name.clone(),
            user_id: self.user_id,
            process_status: self.status,
            creation_time: self.creation_time,
            start_time: self.start_time,
            end_time: self.finished_time,
            parameters: self
                .parameters
                .as_deref()
                .map(parse_parameters)
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRest {
    pub id: i32,
    pub version: i32,
    pub created: DateTime<Utc>,
    pub summary: Option<String>,
}

impl RestModel for VersionRest {
    const CATEGORY: &'static str = "versioning";
    const TYPE: &'static str = "version";
    const PLURAL: &'static str = "versions";

    fn rest_id(&self) -> String {
        self.id.to_string()
    }
}

impl ToRest for Version {
    type Rest = VersionRest;

    fn to_rest(&self) -> VersionRest {
        VersionRest {
            id: self.versionitem_id,
            version: self.version_number,
            created: self.version_date,
            summary: self.version_summary.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VersionHistoryRest {
    pub id: i32,
}

impl RestModel for VersionHistoryRest {
    const CATEGORY: &'static str = "versioning";
    const TYPE: &'static str = "versionhistory";
    const PLURAL: &'static str = "versionhistories";

    fn rest_id(&self) -> String {
        self.id.to_string()
    }
}

impl ToRest for VersionHistory {
    type Rest = VersionHistoryRest;

    fn to_rest(&self) -> VersionHistoryRest {
        VersionHistoryRest {
            id: self.versionhistory_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UsageReportPointRest {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub point_type: String,
    pub values: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageReportRest {
    pub id: String,
    pub report_type: String,
    pub points: Vec<UsageReportPointRest>,
}

impl RestModel for UsageReportRest {
    const CATEGORY: &'static str = "statistics";
    const TYPE: &'static str = "usagereport";
    const PLURAL: &'static str = "usagereports";

    fn rest_id(&self) -> String {
        self.id.clone()
    }
}

impl ToRest for UsageReport {
    type Rest = UsageReportRest;

    fn to_rest(&self) -> UsageReportRest {
        UsageReportRest {
            id: self.id(),
            report_type: self.report_type.to_string(),
            points: vec![UsageReportPointRest {
                id: self.object.uuid().to_string(),
                label: self.object.name().to_string(),
                point_type: self.object.type_name().to_string(),
                values: json!({ "views": self.count }),
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationRest {
    pub id: String,
}

impl RestModel for AuthorizationRest {
    const CATEGORY: &'static str = "authz";
    const TYPE: &'static str = "authorization";
    const PLURAL: &'static str = "authorizations";

    fn rest_id(&self) -> String {
        self.id.clone()
    }
}

impl ToRest for Authorization {
    type Rest = AuthorizationRest;

    fn to_rest(&self) -> AuthorizationRest {
        AuthorizationRest {
            id: self.key.to_string(),
        }
    }
}

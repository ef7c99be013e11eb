//! REST models for configuration-backed resources.

use serde::Serialize;

use super::{RestModel, ToRest};
use crate::{
    config::{AccessOptionConfig, MetadataFormatConfig},
    services::ConfigurationProperty,
};

#[derive(Debug, Clone, Serialize)]
pub struct PropertyRest {
    pub name: String,
    pub values: Vec<String>,
}

impl RestModel for PropertyRest {
    const CATEGORY: &'static str = "config";
    const TYPE: &'static str = "property";
    const PLURAL: &'static str = "properties";

    fn rest_id(&self) -> String {
        self.name.clone()
    }
}

impl ToRest for ConfigurationProperty {
    type Rest = PropertyRest;

    fn to_rest(&self) -> PropertyRest {
        PropertyRest {
            name: self.name.clone(),
            values: self.values.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HarvesterMetadataRest {
    pub id: String,
    pub label: String,
    pub namespace: String,
}

impl RestModel for HarvesterMetadataRest {
    const CATEGORY: &'static str = "config";
    const TYPE: &'static str = "harvestermetadata";
    const PLURAL: &'static str = "harvestermetadata";

    fn rest_id(&self) -> String {
        self.id.clone()
    }
}

impl ToRest for MetadataFormatConfig {
    type Rest = HarvesterMetadataRest;

    fn to_rest(&self) -> HarvesterMetadataRest {
        HarvesterMetadataRest {
            id: self.id.clone(),
            label: self.label.clone(),
            namespace: self.namespace.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessConditionOptionRest {
    pub name: String,
    pub has_start_date: bool,
    pub has_end_date: bool,
    pub max_start_date: Option<String>,
    pub max_end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionAccessOptionRest {
    pub id: String,
    pub can_change_discoverable: bool,
    pub access_condition_options: Vec<AccessConditionOptionRest>,
}

impl RestModel for SubmissionAccessOptionRest {
    const CATEGORY: &'static str = "config";
    const TYPE: &'static str = "submissionaccessoption";
    const PLURAL: &'static str = "submissionaccessoptions";

    fn rest_id(&self) -> String {
        self.id.clone()
    }
}

impl ToRest for AccessOptionConfig {
    type Rest = SubmissionAccessOptionRest;

    fn to_rest(&self) -> SubmissionAccessOptionRest {
        SubmissionAccessOptionRest {
            id: self.name.clone(),
            can_change_discoverable: self.can_change_discoverable,
            access_condition_options: self
                .access_conditions
                .iter()
                .map(|c| AccessConditionOptionRest {
                    name: c.name.clone(),
                    has_start_date: c.has_start_date,
                    has_end_date: c.has_end_date,
                    max_start_date: c.max_start_date.clone(),
                    max_end_date: c.max_end_date.clone(),
                })
                .collect(),
        }
    }
}

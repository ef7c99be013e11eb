//! REST models for Clarin licenses and their labels.

use serde::Serialize;

use super::{RestModel, ToRest};
use crate::models::{ClarinLicense, ClarinLicenseLabel};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClarinLicenseRest {
    pub id: i32,
    pub name: String,
    pub definition: String,
    pub confirmation: i32,
    pub required_info: Vec<String>,
}

impl RestModel for ClarinLicenseRest {
    const CATEGORY: &'static str = "core";
    const TYPE: &'static str = "clarinlicense";
    const PLURAL: &'static str = "clarinlicenses";

    fn rest_id(&self) -> String {
        self.id.to_string()
    }
}

impl ToRest for ClarinLicense {
    type Rest = ClarinLicenseRest;

    fn to_rest(&self) -> ClarinLicenseRest {
        ClarinLicenseRest {
            id: self.license_id,
            name: self.name.clone(),
            definition: self.definition.clone(),
            confirmation: self.confirmation,
            required_info: self
                .required_info
                .as_deref()
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClarinLicenseLabelRest {
    pub id: i32,
    pub label: String,
    pub title: String,
    pub extended: bool,
}

impl RestModel for ClarinLicenseLabelRest {
    const CATEGORY: &'static str = "core";
    const TYPE: &'static str = "clarinlicenselabel";
    const PLURAL: &'static str = "clarinlicenselabels";

    fn rest_id(&self) -> String {
        self.id.to_string()
    }
}

impl ToRest for ClarinLicenseLabel {
    type Rest = ClarinLicenseLabelRest;

    fn to_rest(&self) -> ClarinLicenseLabelRest {
        ClarinLicenseLabelRest {
            id: self.label_id,
            label: self.label.clone(),
            title: self.title.clone(),
            extended: self.is_extended,
        }
    }
}

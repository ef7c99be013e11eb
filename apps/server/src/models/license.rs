//! Clarin license definitions and labels.

use serde::{Deserialize, Serialize};

use super::DomainObject;
use crate::db::{tables, Table};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClarinLicense {
    pub license_id: i32,
    pub name: String,
    /// URL of the license text.
    pub definition: String,
    /// 0 = none, 1 = ask once, 2 = ask always, 3 = allow anonymous
    #[serde(default)]
    pub confirmation: i32,
    /// Comma separated user fields required before download.
    pub required_info: Option<String>,
    pub label_id: Option<i32>,
}

impl DomainObject for ClarinLicense {
    type Id = i32;
    const TABLE: &'static Table = &tables::LICENSE;

    fn id(&self) -> i32 {
        self.license_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClarinLicenseLabel {
    pub label_id: i32,
    /// Short code such as `PUB`, `ACA` or `RES`.
    pub label: String,
    pub title: String,
    #[serde(default)]
    pub is_extended: bool,
}

impl DomainObject for ClarinLicenseLabel {
    type Id = i32;
    const TABLE: &'static Table = &tables::LICENSE_LABEL;

    fn id(&self) -> i32 {
        self.label_id
    }
}

//! EPeople, groups and subscriptions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DomainObject;
use crate::db::{tables, Table};

/// Name of the group whose members are site administrators.
pub const ADMINISTRATOR_GROUP: &str = "Administrator";
/// Name of the group every caller, including anonymous ones, belongs to.
pub const ANONYMOUS_GROUP: &str = "Anonymous";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EPerson {
    pub uuid: Uuid,
    pub email: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub netid: Option<String>,
    #[serde(default)]
    pub can_log_in: bool,
    #[serde(default)]
    pub require_certificate: bool,
    #[serde(default)]
    pub self_registered: bool,
    pub last_active: Option<DateTime<Utc>>,
}

impl EPerson {
    pub fn full_name(&self) -> String {
        match (&self.firstname, &self.lastname) {
            (Some(first), Some(last)) => format!("{last}, {first}"),
            (None, Some(last)) => last.clone(),
            (Some(first), None) => first.clone(),
            (None, None) => self.email.clone().unwrap_or_default(),
        }
    }
}

impl DomainObject for EPerson {
    type Id = Uuid;
    const TABLE: &'static Table = &tables::EPERSON;

    fn id(&self) -> Uuid {
        self.uuid
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub uuid: Uuid,
    pub name: String,
    #[serde(default)]
    pub permanent: bool,
}

impl DomainObject for Group {
    type Id = Uuid;
    const TABLE: &'static Table = &tables::EPERSON_GROUP;

    fn id(&self) -> Uuid {
        self.uuid
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub subscription_id: i32,
    /// e.g. `content` or `statistics`
    pub subscription_type: String,
    pub eperson_id: Uuid,
    /// The community, collection or item subscribed to.
    pub dspace_object_id: Uuid,
    /// Delivery frequencies: `D`, `W` or `M`.
    #[serde(default)]
    pub frequencies: Vec<String>,
}

impl DomainObject for Subscription {
    type Id = i32;
    const TABLE: &'static Table = &tables::SUBSCRIPTION;

    fn id(&self) -> i32 {
        self.subscription_id
    }
}

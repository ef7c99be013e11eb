//! REST models for epersons, groups and subscriptions.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{
    content::{metadata, MetadataMap},
    RestModel, ToRest,
};
use crate::models::{EPerson, Group, Subscription};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EPersonRest {
    pub id: Uuid,
    pub uuid: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub netid: Option<String>,
    pub last_active: Option<DateTime<Utc>>,
    pub can_log_in: bool,
    pub require_certificate: bool,
    pub self_registered: bool,
    pub metadata: MetadataMap,
}

impl RestModel for EPersonRest {
    const CATEGORY: &'static str = "eperson";
    const TYPE: &'static str = "eperson";
    const PLURAL: &'static str = "epersons";

    fn rest_id(&self) -> String {
        self.id.to_string()
    }
}

impl ToRest for EPerson {
    type Rest = EPersonRest;

    fn to_rest(&self) -> EPersonRest {
        EPersonRest {
            id: self.uuid,
            uuid: self.uuid,
            name: self.full_name(),
            email: self.email.clone(),
            netid: self.netid.clone(),
            last_active: self.last_active,
            can_log_in: self.can_log_in,
            require_certificate: self.require_certificate,
            self_registered: self.self_registered,
            metadata: metadata(&[
                ("eperson.firstname", self.firstname.as_deref()),
                ("eperson.lastname", self.lastname.as_deref()),
            ]),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRest {
    pub id: Uuid,
    pub uuid: Uuid,
    pub name: String,
    pub permanent: bool,
}

impl RestModel for GroupRest {
    const CATEGORY: &'static str = "eperson";
    const TYPE: &'static str = "group";
    const PLURAL: &'static str = "groups";

    fn rest_id(&self) -> String {
        self.id.to_string()
    }
}

impl ToRest for Group {
    type Rest = GroupRest;

    fn to_rest(&self) -> GroupRest {
        GroupRest {
            id: self.uuid,
            uuid: self.uuid,
            name: self.name.clone(),
            permanent: self.permanent,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionParameterRest {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRest {
    pub id: i32,
    pub subscription_type: String,
    pub subscription_parameter_list: Vec<SubscriptionParameterRest>,
}

impl RestModel for SubscriptionRest {
    const CATEGORY: &'static str = "core";
    const TYPE: &'static str = "subscription";
    const PLURAL: &'static str = "subscriptions";

    fn rest_id(&self) -> String {
        self.id.to_string()
    }
}

impl ToRest for Subscription {
    type Rest = SubscriptionRest;

    fn to_rest(&self) -> SubscriptionRest {
        SubscriptionRest {
            id: self.subscription_id,
            subscription_type: self.subscription_type.clone(),
            subscription_parameter_list: self
                .frequencies
                .iter()
                .map(|f| SubscriptionParameterRest {
                    name: "frequency".to_string(),
                    value: f.clone(),
                })
                .collect(),
        }
    }
}

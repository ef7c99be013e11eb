//! Configuration-backed lookups: exposed properties, harvester metadata
//! formats and submission access options.

use std::{collections::HashMap, sync::Arc};

use crate::config::{AccessOptionConfig, Config, MetadataFormatConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationProperty {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Clone)]
pub struct ConfigurationService {
    properties: Arc<HashMap<String, Vec<String>>>,
    exposed: Arc<Vec<String>>,
    metadata_formats: Arc<Vec<MetadataFormatConfig>>,
    access_options: Arc<Vec<AccessOptionConfig>>,
}

impl ConfigurationService {
    pub fn new(config: &Config) -> Self {
        let properties = config
            .properties
            .iter()
            .map(|p| (p.name.clone(), p.values.clone()))
            .collect();

        Self {
            properties: Arc::new(properties),
            exposed: Arc::new(config.rest.properties_exposed.clone()),
            metadata_formats: Arc::new(config.harvester.metadata_formats.clone()),
            access_options: Arc::new(config.access_options.clone()),
        }
    }

    /// An exposed property with at least one non-empty value.
    ///
    /// Hidden properties and exposed-but-unset properties are indistinguishable.
    pub fn property(&self, name: &str) -> Option<ConfigurationProperty> {
        if !self.exposed.iter().any(|p| p == name) {
            return None;
        }
        let values: Vec<String> = self
            .properties
            .get(name)?
            .iter()
            .filter(|v| !v.trim().is_empty())
            .cloned()
            .collect();
        if values.is_empty() {
            return None;
        }
        Some(ConfigurationProperty {
            name: name.to_string(),
            values,
        })
    }

    pub fn metadata_format(&self, id: &str) -> Option<&MetadataFormatConfig> {
        self.metadata_formats.iter().find(|f| f.id == id)
    }

    pub fn access_option(&self, name: &str) -> Option<&AccessOptionConfig> {
        self.access_options.iter().find(|o| o.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PropertyConfig;

    fn service() -> ConfigurationService {
        let mut config = Config::default();
        config.properties.push(PropertyConfig {
            name: "blank.value".to_string(),
            values: vec!["  ".to_string()],
        });
        config.rest.properties_exposed.push("blank.value".to_string());
        ConfigurationService::new(&config)
    }

    #[test]
    fn exposed_property_is_returned() {
        let prop = service().property("websvc.opensearch.enable").unwrap();
        assert_eq!(prop.values, vec!["true"]);
    }

    #[test]
    fn hidden_and_empty_properties_look_the_same() {
        let service = service();
        assert_eq!(service.property("dspace.name"), None);
        assert_eq!(service.property("google.analytics.key"), None);
        assert_eq!(service.property("blank.value"), None);
        assert_eq!(service.property("not.configured"), None);
    }

    #[test]
    fn harvester_formats_and_access_options_are_found_by_id() {
        let service = service();
        assert_eq!(service.metadata_format("qdc").unwrap().label, "Qualified Dublin Core");
        assert!(service.metadata_format("marc").is_none());
        assert_eq!(service.access_option("defaultAC").unwrap().access_conditions.len(), 4);
    }
}

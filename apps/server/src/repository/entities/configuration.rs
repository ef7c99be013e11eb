//! Configuration properties, harvester metadata formats and submission
//! access options.

use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    authorize::Preauthorize,
    context::Context,
    converter::{ConverterService, HalResource},
    repository::{EntityRepository, Page, Pageable},
    services::ConfigurationService,
    Error, Result,
};

/// Exposes allow-listed configuration properties by name.
pub struct PropertyRepository {
    configuration: ConfigurationService,
    converter: Arc<ConverterService>,
}

impl PropertyRepository {
    pub fn new(configuration: ConfigurationService, converter: Arc<ConverterService>) -> Self {
        Self {
            configuration,
            converter,
        }
    }
}

#[async_trait]
impl EntityRepository for PropertyRepository {
    const CATEGORY: &'static str = "config";
    const MODEL: &'static str = "properties";

    type Id = String;

    fn find_one_rule(&self) -> Preauthorize {
        Preauthorize::PermitAll
    }

    async fn find_one(&self, _ctx: &Context, name: String) -> Result<Option<HalResource>> {
        self.configuration
            .property(&name)
            .map(|property| self.converter.to_rest(&property))
            .transpose()
    }
}

pub struct HarvesterMetadataRepository {
    configuration: ConfigurationService,
    converter: Arc<ConverterService>,
}

impl HarvesterMetadataRepository {
    pub fn new(configuration: ConfigurationService, converter: Arc<ConverterService>) -> Self {
        Self {
            configuration,
            converter,
        }
    }
}

#[async_trait]
impl EntityRepository for HarvesterMetadataRepository {
    const CATEGORY: &'static str = "config";
    const MODEL: &'static str = "harvestermetadata";

    type Id = String;

    fn find_one_rule(&self) -> Preauthorize {
        Preauthorize::PermitAll
    }

    async fn find_one(&self, _ctx: &Context, id: String) -> Result<Option<HalResource>> {
        self.configuration
            .metadata_format(&id)
            .map(|format| self.converter.to_rest(format))
            .transpose()
    }

    async fn find_all(&self, _ctx: &Context, _pageable: Pageable) -> Result<Page<HalResource>> {
        Err(Error::NotImplemented(
            "harvester metadata formats are only available by id".to_string(),
        ))
    }
}

pub struct SubmissionAccessOptionRepository {
    configuration: ConfigurationService,
    converter: Arc<ConverterService>,
}

impl SubmissionAccessOptionRepository {
    pub fn new(configuration: ConfigurationService, converter: Arc<ConverterService>) -> Self {
        Self {
            configuration,
            converter,
        }
    }
}

#[async_trait]
impl EntityRepository for SubmissionAccessOptionRepository {
    const CATEGORY: &'static str = "config";
    const MODEL: &'static str = "submissionaccessoptions";

    type Id = String;

    fn find_one_rule(&self) -> Preauthorize {
        Preauthorize::Authenticated
    }

    async fn find_one(&self, _ctx: &Context, name: String) -> Result<Option<HalResource>> {
        self.configuration
            .access_option(&name)
            .map(|option| self.converter.to_rest(option))
            .transpose()
    }
}

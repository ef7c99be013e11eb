//! Clarin license service.

use std::sync::Arc;

use super::Dao;
use crate::{
    context::Context,
    db::Persistence,
    models::{ClarinLicense, ClarinLicenseLabel},
    Result,
};

#[derive(Clone)]
pub struct LicenseService {
    pub licenses: Dao<ClarinLicense>,
    pub labels: Dao<ClarinLicenseLabel>,
}

impl LicenseService {
    pub fn new(store: Arc<dyn Persistence>) -> Self {
        Self {
            licenses: Dao::new(store.clone()),
            labels: Dao::new(store),
        }
    }

    pub async fn label_of(
        &self,
        ctx: &Context,
        license: &ClarinLicense,
    ) -> Result<Option<ClarinLicenseLabel>> {
        match license.label_id {
            Some(label) => self.labels.find(ctx, &label).await,
            None => Ok(None),
        }
    }
}

//! Script process service.

use std::sync::Arc;

use super::Dao;
use crate::{
    context::Context,
    db::{tables::PROCESS_FILES, Persistence, Window},
    models::{Bitstream, Process},
    Result,
};

#[derive(Clone)]
pub struct ProcessService {
    pub processes: Dao<Process>,
    bitstreams: Dao<Bitstream>,
}

impl ProcessService {
    pub fn new(store: Arc<dyn Persistence>) -> Self {
        Self {
            processes: Dao::new(store.clone()),
            bitstreams: Dao::new(store),
        }
    }

    /// Input and output files attached to a process.
    pub async fn files(
        &self,
        ctx: &Context,
        process_id: i32,
        window: Window,
    ) -> Result<(Vec<Bitstream>, u64)> {
        let key = process_id.to_string();
        let rows = self
            .bitstreams
            .find_linked(ctx, &PROCESS_FILES, &key, window)
            .await?;
        let total = self.bitstreams.count_linked(ctx, &PROCESS_FILES, &key).await?;
        Ok((rows, total))
    }
}

//! Batch executor
//!
//! Runs compiled batches against the authoring service in three steps:
//! creation, region discovery, population. Batch updates are never
//! retried and there is no rollback; a failure leaves whatever the
//! service already applied in place and the pipeline reports it as a
//! partial or failed outcome.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::compiler::{Batch, RegionMap};
use crate::layout::Region;
use crate::service::{ServiceError, SlidesService};

/// Executes compiled batches against an authoring service
pub struct BatchExecutor {
    service: Arc<dyn SlidesService>,
}

impl BatchExecutor {
    pub fn new(service: Arc<dyn SlidesService>) -> Self {
        Self { service }
    }

    /// Create an empty presentation, returning its service-assigned id
    pub async fn create_presentation(&self, title: &str) -> Result<String, ServiceError> {
        debug!(title, "create_presentation: called");
        self.service.create_presentation(title).await
    }

    /// Run the creation batch and collect the assigned slide ids
    ///
    /// Replies are positional: reply `i` answers request `i`, so the
    /// returned ids line up with the slides that produced the batch.
    pub async fn run_creation(&self, presentation_id: &str, batch: &Batch) -> Result<Vec<String>, ServiceError> {
        debug!(presentation_id, op_count = batch.len(), "run_creation: called");
        let reply = self.service.batch_update(presentation_id, &batch.to_requests()).await?;

        let mut slide_ids = Vec::with_capacity(batch.len());
        for index in 0..batch.len() {
            let id = reply.created_object_id(index).ok_or_else(|| {
                ServiceError::InvalidReply(format!("creation reply {index} carried no object id"))
            })?;
            slide_ids.push(id.to_string());
        }

        info!(presentation_id, slide_count = slide_ids.len(), "run_creation: slides created");
        Ok(slide_ids)
    }

    /// Read each created slide back and map its placeholder regions
    ///
    /// Elements with an unrecognized placeholder type are skipped. When a
    /// slide exposes the same region twice the first element wins.
    pub async fn resolve_regions(
        &self,
        presentation_id: &str,
        slide_ids: &[String],
    ) -> Result<Vec<RegionMap>, ServiceError> {
        debug!(presentation_id, slide_count = slide_ids.len(), "resolve_regions: called");
        let mut maps = Vec::with_capacity(slide_ids.len());

        for slide_id in slide_ids {
            let page = self.service.get_page(presentation_id, slide_id).await?;
            let mut map = RegionMap::new(slide_id.clone());

            for element in &page.page_elements {
                let Some(placeholder_type) = element.placeholder_type() else {
                    continue;
                };
                match Region::from_placeholder_type(placeholder_type) {
                    Some(region) => {
                        if map.get(region).is_none() {
                            map.insert(region, element.object_id.clone());
                        }
                    }
                    None => {
                        debug!(slide_id, placeholder_type, "resolve_regions: unhandled placeholder type");
                    }
                }
            }

            if map.get(Region::Title).is_none() {
                warn!(slide_id, "resolve_regions: slide exposes no title region");
            }
            maps.push(map);
        }

        Ok(maps)
    }

    /// Run the population batch
    pub async fn run_population(&self, presentation_id: &str, batch: &Batch) -> Result<(), ServiceError> {
        if batch.is_empty() {
            debug!(presentation_id, "run_population: nothing to populate");
            return Ok(());
        }

        debug!(presentation_id, op_count = batch.len(), "run_population: called");
        self.service.batch_update(presentation_id, &batch.to_requests()).await?;
        info!(presentation_id, op_count = batch.len(), "run_population: applied");
        Ok(())
    }
}

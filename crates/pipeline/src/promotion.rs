//! Moving a result into the saved image collection.

use brush_core::types::RecordId;
use brush_db::models::image::Image;

use crate::error::PipelineResult;
use crate::Pipeline;

impl Pipeline {
    /// Promote result `id` to an image with the same id, creation time,
    /// parent and phrases. The attachment pair is left where it is and now
    /// belongs to the image.
    ///
    /// Returns `None` when there is no such result, which is also the
    /// outcome of promoting the same id twice.
    pub async fn promote_result(&self, id: RecordId) -> PipelineResult<Option<Image>> {
        let image = self.stores.results.promote(id).await?;

        match &image {
            Some(image) => tracing::info!(image_id = %image.id, "Result promoted"),
            None => tracing::debug!(result_id = %id, "Nothing to promote"),
        }
        Ok(image)
    }
}

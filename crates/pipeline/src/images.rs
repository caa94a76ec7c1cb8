//! Reading and deleting saved images.

use brush_core::error::CoreError;
use brush_core::pagination::PageRequest;
use brush_core::types::{RecordId, Timestamp};
use brush_db::models::image::{Image, ImageIndexEntry};

use crate::error::PipelineResult;
use crate::{Pipeline, WithAttachments};

impl Pipeline {
    /// Newest-first page of the global image index, strictly older than
    /// `cursor` (default now).
    pub async fn list_images(
        &self,
        cursor: Option<Timestamp>,
    ) -> PipelineResult<Vec<ImageIndexEntry>> {
        let page = PageRequest::new(cursor, None, self.settings.image_page_size);
        Ok(self.stores.images.list(&page).await?)
    }

    pub async fn get_image(&self, id: RecordId) -> PipelineResult<WithAttachments<Image>> {
        let (record, attachments) =
            tokio::join!(self.stores.images.find(id), self.attachments.get(id));

        let record = record?.ok_or_else(|| CoreError::not_found("Image", id))?;
        Ok(WithAttachments {
            record,
            attachments: attachments?,
        })
    }

    pub async fn delete_image(&self, id: RecordId) -> PipelineResult<()> {
        let image = self
            .stores
            .images
            .find(id)
            .await?
            .ok_or_else(|| CoreError::not_found("Image", id))?;

        let (record, blobs) = tokio::join!(
            self.stores.images.delete(&image),
            self.attachments.delete(id),
        );
        record?;
        blobs?;

        tracing::info!(image_id = %id, "Image deleted");
        Ok(())
    }
}

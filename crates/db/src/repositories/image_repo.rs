//! Repository for `images` and the global `image_index`.

use async_trait::async_trait;
use brush_core::pagination::{Direction, PageRequest};
use brush_core::types::RecordId;
use sqlx::PgPool;

use crate::models::image::{Image, ImageIndexEntry, IMAGE_PARTITION};
use crate::store::{ImageStore, StoreError};

pub struct ImageRepo {
    pool: PgPool,
}

impl ImageRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImageStore for ImageRepo {
    async fn find(&self, id: RecordId) -> Result<Option<Image>, StoreError> {
        let image = sqlx::query_as::<_, Image>(
            "SELECT id, created, parent, phrases FROM images WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(image)
    }

    async fn list(&self, page: &PageRequest) -> Result<Vec<ImageIndexEntry>, StoreError> {
        let query = match page.direction {
            Direction::Reverse => {
                "SELECT created, image_id FROM image_index \
                 WHERE partition = $1 AND created < $2 \
                 ORDER BY created DESC, image_id DESC \
                 LIMIT $3"
            }
            Direction::Forward => {
                "SELECT created, image_id FROM image_index \
                 WHERE partition = $1 AND created > $2 \
                 ORDER BY created ASC, image_id ASC \
                 LIMIT $3"
            }
        };
        let entries = sqlx::query_as::<_, ImageIndexEntry>(query)
            .bind(IMAGE_PARTITION)
            .bind(page.cursor)
            .bind(i64::from(page.limit))
            .fetch_all(&self.pool)
            .await?;
        Ok(entries)
    }

    async fn delete(&self, image: &Image) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM images WHERE id = $1")
            .bind(image.id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "DELETE FROM image_index WHERE partition = $1 AND created = $2 AND image_id = $3",
        )
        .bind(IMAGE_PARTITION)
        .bind(image.created)
        .bind(image.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}

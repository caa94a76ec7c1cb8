//! Repository for `job_results` and `job_result_index`.

use async_trait::async_trait;
use brush_core::pagination::{Direction, PageRequest};
use brush_core::types::RecordId;
use sqlx::PgPool;

use super::conflict_on_unique;
use crate::models::image::{Image, IMAGE_PARTITION};
use crate::models::job_result::{JobResult, ResultIndexEntry};
use crate::store::{ResultStore, StoreError};

/// Column list for `job_results` queries.
const COLUMNS: &str = "id, job_id, created, parent, phrases";

const DELETE_INDEX_ENTRY: &str =
    "DELETE FROM job_result_index WHERE job_id = $1 AND created = $2 AND result_id = $3";

pub struct JobResultRepo {
    pool: PgPool,
}

impl JobResultRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResultStore for JobResultRepo {
    async fn create(&self, result: &JobResult) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let query = format!("INSERT INTO job_results ({COLUMNS}) VALUES ($1, $2, $3, $4, $5)");
        sqlx::query(&query)
            .bind(result.id)
            .bind(result.job_id)
            .bind(result.created)
            .bind(&result.parent)
            .bind(&result.phrases)
            .execute(&mut *tx)
            .await
            .map_err(|e| conflict_on_unique(e, || format!("result {} already exists", result.id)))?;

        sqlx::query("INSERT INTO job_result_index (job_id, created, result_id) VALUES ($1, $2, $3)")
            .bind(result.job_id)
            .bind(result.created)
            .bind(result.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn find(&self, id: RecordId) -> Result<Option<JobResult>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM job_results WHERE id = $1");
        let result = sqlx::query_as::<_, JobResult>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(result)
    }

    async fn list(
        &self,
        job_id: RecordId,
        page: &PageRequest,
    ) -> Result<Vec<ResultIndexEntry>, StoreError> {
        let query = match page.direction {
            Direction::Reverse => {
                "SELECT job_id, created, result_id FROM job_result_index \
                 WHERE job_id = $1 AND created < $2 \
                 ORDER BY created DESC, result_id DESC \
                 LIMIT $3"
            }
            Direction::Forward => {
                "SELECT job_id, created, result_id FROM job_result_index \
                 WHERE job_id = $1 AND created > $2 \
                 ORDER BY created ASC, result_id ASC \
                 LIMIT $3"
            }
        };
        let entries = sqlx::query_as::<_, ResultIndexEntry>(query)
            .bind(job_id)
            .bind(page.cursor)
            .bind(i64::from(page.limit))
            .fetch_all(&self.pool)
            .await?;
        Ok(entries)
    }

    async fn record_index(&self, entry: &ResultIndexEntry) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO job_result_index (job_id, created, result_id) VALUES ($1, $2, $3) \
             ON CONFLICT DO NOTHING",
        )
        .bind(entry.job_id)
        .bind(entry.created)
        .bind(entry.result_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove_index(&self, entry: &ResultIndexEntry) -> Result<(), StoreError> {
        sqlx::query(DELETE_INDEX_ENTRY)
            .bind(entry.job_id)
            .bind(entry.created)
            .bind(entry.result_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, entry: &ResultIndexEntry) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM job_results WHERE id = $1")
            .bind(entry.result_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(DELETE_INDEX_ENTRY)
            .bind(entry.job_id)
            .bind(entry.created)
            .bind(entry.result_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn promote(&self, id: RecordId) -> Result<Option<Image>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM job_results WHERE id = $1 FOR UPDATE");
        let Some(result) = sqlx::query_as::<_, JobResult>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let image = Image::from_result(&result);

        sqlx::query("INSERT INTO images (id, created, parent, phrases) VALUES ($1, $2, $3, $4)")
            .bind(image.id)
            .bind(image.created)
            .bind(&image.parent)
            .bind(&image.phrases)
            .execute(&mut *tx)
            .await
            .map_err(|e| conflict_on_unique(e, || format!("image {id} already exists")))?;

        sqlx::query("INSERT INTO image_index (partition, created, image_id) VALUES ($1, $2, $3)")
            .bind(IMAGE_PARTITION)
            .bind(image.created)
            .bind(image.id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM job_results WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let removed = sqlx::query(DELETE_INDEX_ENTRY)
            .bind(result.job_id)
            .bind(result.created)
            .bind(result.id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed == 0 {
            tracing::error!(
                result_id = %id,
                job_id = %result.job_id,
                "Result has no index entry, promotion aborted"
            );
            return Err(StoreError::Inconsistent(format!(
                "result {id} has no index entry"
            )));
        }

        tx.commit().await?;
        Ok(Some(image))
    }
}

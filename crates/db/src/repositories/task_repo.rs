//! Repository for the `job_tasks` dispatch queue.

use async_trait::async_trait;
use brush_core::types::{new_id, RecordId};
use sqlx::PgPool;

use crate::models::task::Task;
use crate::store::{StoreError, TaskQueue};

pub struct TaskRepo {
    pool: PgPool,
}

impl TaskRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskQueue for TaskRepo {
    async fn enqueue(&self, job_id: RecordId, count: u32) -> Result<Vec<Task>, StoreError> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let ids: Vec<RecordId> = (0..count).map(|_| new_id()).collect();
        sqlx::query(
            "INSERT INTO job_tasks (id, job_id) \
             SELECT task_id, $2 FROM UNNEST($1::uuid[]) AS t(task_id)",
        )
        .bind(&ids)
        .bind(job_id)
        .execute(&self.pool)
        .await?;

        Ok(ids.into_iter().map(|id| Task { id, job_id }).collect())
    }

    /// Delete-and-return the oldest stub.
    ///
    /// `FOR UPDATE SKIP LOCKED` keeps two concurrent dequeuers from
    /// receiving the same stub.
    async fn pop(&self) -> Result<Option<Task>, StoreError> {
        let task = sqlx::query_as::<_, Task>(
            "DELETE FROM job_tasks \
             WHERE seq = ( \
                 SELECT seq FROM job_tasks \
                 ORDER BY seq ASC \
                 LIMIT 1 \
                 FOR UPDATE SKIP LOCKED \
             ) \
             RETURNING id, job_id",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    async fn pending(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM job_tasks")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

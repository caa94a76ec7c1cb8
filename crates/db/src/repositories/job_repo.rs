//! Repository for the `jobs` table.

use async_trait::async_trait;
use brush_core::types::{RecordId, Timestamp};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use super::conflict_on_unique;
use crate::models::job::Job;
use crate::store::{JobStore, StoreError};

/// Column list for `jobs` queries.
const COLUMNS: &str = "id, created, cancelled, count, parent, phrases, params";

#[derive(Debug, FromRow)]
struct JobRow {
    id: RecordId,
    created: Timestamp,
    cancelled: bool,
    count: i32,
    parent: Option<String>,
    phrases: Vec<String>,
    params: Json<Map<String, Value>>,
}

impl From<JobRow> for Job {
    fn from(row: JobRow) -> Self {
        Job {
            id: row.id,
            created: row.created,
            cancelled: row.cancelled,
            count: row.count,
            parent: row.parent,
            phrases: row.phrases,
            params: row.params.0,
        }
    }
}

pub struct JobRepo {
    pool: PgPool,
}

impl JobRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for JobRepo {
    async fn insert(&self, job: &Job) -> Result<(), StoreError> {
        let query = format!(
            "INSERT INTO jobs ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7)"
        );
        sqlx::query(&query)
            .bind(job.id)
            .bind(job.created)
            .bind(job.cancelled)
            .bind(job.count)
            .bind(&job.parent)
            .bind(&job.phrases)
            .bind(Json(&job.params))
            .execute(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, || format!("job {} already exists", job.id)))?;
        Ok(())
    }

    async fn find(&self, id: RecordId) -> Result<Option<Job>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
        let row = sqlx::query_as::<_, JobRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Job::from))
    }

    async fn list(&self) -> Result<Vec<Job>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM jobs ORDER BY created DESC, id DESC");
        let rows = sqlx::query_as::<_, JobRow>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Job::from).collect())
    }

    async fn cancel(&self, id: RecordId) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE jobs SET cancelled = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: RecordId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

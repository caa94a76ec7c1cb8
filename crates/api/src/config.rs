use std::path::PathBuf;

use brush_core::cascade::CascadeMode;
use brush_core::pagination::{clamp_page_size, DEFAULT_PAGE_SIZE};
use brush_pipeline::{PipelineSettings, DEFAULT_MAX_TASKS_PER_JOB};

/// Where job, queue, result and image records live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres { database_url: String },
    /// Process-local; everything is lost on restart.
    Memory,
}

/// Where attachment blobs live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobBackend {
    Local { root: PathBuf },
    S3 { bucket: String, prefix: String },
    Memory,
}

/// Server configuration loaded from environment variables.
///
/// Every field except the shared secret has a default suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Shared secret every API request must present.
    pub api_key: String,
    pub store: StoreBackend,
    pub blobs: BlobBackend,
    pub result_page_size: u32,
    pub image_page_size: u32,
    pub cascade: CascadeMode,
    pub max_tasks_per_job: i32,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `API_KEY`              | required                   |
    /// | `STORE_BACKEND`        | `postgres`                 |
    /// | `DATABASE_URL`         | required for `postgres`    |
    /// | `BLOB_BACKEND`         | `local`                    |
    /// | `BLOB_ROOT`            | `./data/blobs`             |
    /// | `S3_BUCKET`            | required for `s3`          |
    /// | `S3_PREFIX`            | empty                      |
    /// | `RESULT_PAGE_SIZE`     | `20`                       |
    /// | `IMAGE_PAGE_SIZE`      | `20`                       |
    /// | `JOB_DELETE_CASCADE`   | `exhaustive`               |
    /// | `MAX_TASKS_PER_JOB`    | `1000`                     |
    ///
    /// Panics on missing or malformed values; misconfiguration should stop
    /// the server before it binds.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let api_key = std::env::var("API_KEY").expect("API_KEY must be set");
        assert!(!api_key.trim().is_empty(), "API_KEY must not be empty");

        let store = match std::env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "postgres".into())
            .as_str()
        {
            "postgres" => StoreBackend::Postgres {
                database_url: std::env::var("DATABASE_URL")
                    .expect("DATABASE_URL must be set when STORE_BACKEND=postgres"),
            },
            "memory" => StoreBackend::Memory,
            other => panic!("STORE_BACKEND must be 'postgres' or 'memory', got '{other}'"),
        };

        let blobs = match std::env::var("BLOB_BACKEND")
            .unwrap_or_else(|_| "local".into())
            .as_str()
        {
            "local" => BlobBackend::Local {
                root: std::env::var("BLOB_ROOT")
                    .unwrap_or_else(|_| "./data/blobs".into())
                    .into(),
            },
            "s3" => BlobBackend::S3 {
                bucket: std::env::var("S3_BUCKET")
                    .expect("S3_BUCKET must be set when BLOB_BACKEND=s3"),
                prefix: std::env::var("S3_PREFIX").unwrap_or_default(),
            },
            "memory" => BlobBackend::Memory,
            other => panic!("BLOB_BACKEND must be 'local', 's3' or 'memory', got '{other}'"),
        };

        let result_page_size = page_size_var("RESULT_PAGE_SIZE");
        let image_page_size = page_size_var("IMAGE_PAGE_SIZE");

        let cascade = CascadeMode::from_name(
            &std::env::var("JOB_DELETE_CASCADE").unwrap_or_else(|_| "exhaustive".into()),
        )
        .unwrap_or_else(|e| panic!("JOB_DELETE_CASCADE: {e}"));

        let max_tasks_per_job: i32 = std::env::var("MAX_TASKS_PER_JOB")
            .map(|v| v.parse().expect("MAX_TASKS_PER_JOB must be a valid i32"))
            .unwrap_or(DEFAULT_MAX_TASKS_PER_JOB);
        assert!(max_tasks_per_job >= 1, "MAX_TASKS_PER_JOB must be at least 1");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            api_key,
            store,
            blobs,
            result_page_size,
            image_page_size,
            cascade,
            max_tasks_per_job,
        }
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            result_page_size: self.result_page_size,
            image_page_size: self.image_page_size,
            cascade: self.cascade,
            max_tasks_per_job: self.max_tasks_per_job,
        }
    }
}

fn page_size_var(name: &str) -> u32 {
    let size = std::env::var(name)
        .map(|v| {
            v.parse()
                .unwrap_or_else(|_| panic!("{name} must be a valid u32"))
        })
        .unwrap_or(DEFAULT_PAGE_SIZE);
    clamp_page_size(size)
}

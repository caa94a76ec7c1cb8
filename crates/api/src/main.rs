use std::net::SocketAddr;
use std::sync::Arc;

use brush_api::config::{BlobBackend, ServerConfig, StoreBackend};
use brush_api::router::build_app_router;
use brush_api::state::AppState;
use brush_db::Stores;
use brush_pipeline::Pipeline;
use brush_storage::{AttachmentStore, BlobStore, LocalBlobStore, MemoryBlobStore, S3BlobStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "brush_api=debug,brush_pipeline=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        cascade = config.cascade.name(),
        "Loaded server configuration",
    );

    // --- Record store ---
    let stores = match &config.store {
        StoreBackend::Postgres { database_url } => {
            let pool = brush_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            brush_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            brush_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            Stores::postgres(pool)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory record store; data is lost on restart");
            Stores::memory()
        }
    };

    // --- Blob store ---
    let blobs: Arc<dyn BlobStore> = match &config.blobs {
        BlobBackend::Local { root } => {
            tracing::info!(root = %root.display(), "Using local blob store");
            Arc::new(LocalBlobStore::new(root.clone()))
        }
        BlobBackend::S3 { bucket, prefix } => {
            tracing::info!(%bucket, %prefix, "Using S3 blob store");
            Arc::new(S3BlobStore::from_env(bucket.clone(), prefix.clone()).await)
        }
        BlobBackend::Memory => {
            tracing::warn!("Using in-memory blob store; attachments are lost on restart");
            Arc::new(MemoryBlobStore::new())
        }
    };

    // --- App state ---
    let pipeline = Pipeline::new(
        stores,
        AttachmentStore::new(blobs),
        config.pipeline_settings(),
    );
    let state = AppState {
        pipeline,
        config: Arc::new(config.clone()),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}

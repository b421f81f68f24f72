//! Grader - Application Entry Point

use std::{net::SocketAddr, sync::Arc};

use axum::{extract::DefaultBodyLimit, middleware, response::IntoResponse, Router};
use bollard::Docker;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use grader::{
    config::Config,
    constants::API_BASE_PATH,
    db::{self, AccountRepository, PermissionRepository, ProblemRepository},
    gateways::{AuthGateway, BlobStore, CodeGrader, PermissionGateway, ProblemStore},
    grader::DockerGrader,
    handlers,
    middleware::logging_middleware,
    services::{PdfAttachmentHandler, ProblemLifecycleService, TestcaseVersioner},
    state::AppState,
    storage::FsBlobStore,
};

/// Headroom for multipart framing on top of the PDF itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.server.rust_log.clone().into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.server.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting grader server...");

    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database).await?;

    tracing::info!("Running database migrations...");
    db::run_migrations(&db_pool).await?;

    tracing::info!("Connecting to Docker...");
    let docker = Docker::connect_with_socket(
        &config.grader.socket_path,
        120,
        bollard::API_DEFAULT_VERSION,
    )?;
    let docker_info = docker.version().await?;
    tracing::info!(
        "Connected to Docker version: {}",
        docker_info.version.unwrap_or_default()
    );

    let blobs = FsBlobStore::new(config.storage.pdf_path.clone());
    blobs.ensure_root().await?;

    // Adapters are only visible to the services through their gateway traits
    let auth: Arc<dyn AuthGateway> = Arc::new(AccountRepository::new(db_pool.clone()));
    let permissions: Arc<dyn PermissionGateway> =
        Arc::new(PermissionRepository::new(db_pool.clone()));
    let store: Arc<dyn ProblemStore> = Arc::new(ProblemRepository::new(db_pool.clone()));
    let code_grader: Arc<dyn CodeGrader> =
        Arc::new(DockerGrader::new(docker, config.grader.clone()));
    let blob_store: Arc<dyn BlobStore> = Arc::new(blobs);

    let problems = Arc::new(ProblemLifecycleService::new(
        auth.clone(),
        permissions.clone(),
        store.clone(),
        TestcaseVersioner::new(code_grader, config.grader.memory_limit_mb),
    ));
    let pdfs = Arc::new(PdfAttachmentHandler::new(
        auth,
        permissions,
        store,
        blob_store,
        config.storage.max_pdf_bytes(),
    ));

    let body_limit = config.storage.max_pdf_bytes() + MULTIPART_OVERHEAD_BYTES;
    let media_prefix = config.storage.pdf_media_prefix.clone();
    let media_dir = ServeDir::new(&config.storage.pdf_path);
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    let state = AppState::new(db_pool, problems, pdfs, config);

    // Build the router
    let app = Router::new()
        .nest(API_BASE_PATH, handlers::routes())
        .nest_service(&media_prefix, media_dir)
        .layer(middleware::from_fn(logging_middleware))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(CompressionLayer::new())
                .map_response(IntoResponse::into_response)
                .layer(RequestBodyLimitLayer::new(body_limit)),
        )
        .with_state(state);

    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::auth;
use crate::features::auth::clients::IdentityClient;
use crate::features::auth::routes as auth_routes;
use crate::features::auth::services::AuthService;
use crate::features::auth::session::SessionEvents;
use crate::features::categories::{routes as categories_routes, CategoryService};
use crate::features::dashboard::{routes as dashboard_routes, DashboardService};
use crate::features::map::{routes as map_routes, MapService};
use crate::features::profiles::{routes as profiles_routes, ProfileService};
use crate::features::reports::{
    routes as reports_routes, PgReportRepository, ReportRepository, ReportService,
};
use crate::features::submissions::{routes as submissions_routes, DraftStore, SubmissionService};
use crate::modules::storage::{MinIOClient, ObjectStorage};
use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

/// Liveness plus a database round-trip
async fn health_check(State(pool): State<PgPool>) -> StatusCode {
    match database::ping(&pool).await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );

    tracing::info!("Configuration loaded successfully");

    // Create database connection pool
    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    // Run migrations automatically
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Initialize auth
    let jwks_client = Arc::new(auth::JwksClient::new(
        &config.auth.jwks_url,
        config.auth.jwks_cache_ttl,
    ));
    let jwt_validator = Arc::new(auth::JwtValidator::new(
        jwks_client,
        config.auth.issuer.clone(),
        config.auth.audience.clone(),
        config.auth.jwt_leeway,
    ));
    tracing::info!("Auth configuration initialized");

    let profile_service = Arc::new(ProfileService::new(pool.clone()));
    let identity_client = Arc::new(IdentityClient::new(
        &config.identity,
        &config.app.frontend_url,
    ));
    let session_events = Arc::new(SessionEvents::new());
    let auth_service = Arc::new(AuthService::new(
        identity_client,
        profile_service.clone(),
        session_events,
    ));
    tracing::info!(
        "Auth service initialized (identity provider: {})",
        config.identity.api_url
    );

    // Initialize MinIO client for report photos
    let storage: Arc<dyn ObjectStorage> = Arc::new(
        MinIOClient::new(config.minio.clone())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to initialize MinIO client: {}", e))?,
    );

    let category_service = Arc::new(CategoryService::new(pool.clone()));
    tracing::info!("Category service initialized");

    // Reports and the submission wizard share one repository
    let report_repository: Arc<dyn ReportRepository> =
        Arc::new(PgReportRepository::new(pool.clone()));
    let report_service = Arc::new(ReportService::new(Arc::clone(&report_repository)));
    let draft_store = Arc::new(DraftStore::new(config.wizard.draft_ttl));
    let submission_service = Arc::new(SubmissionService::new(
        draft_store,
        Arc::clone(&report_service),
        Arc::clone(&report_repository),
        storage,
    ));
    tracing::info!(
        "Report services initialized (draft ttl: {}s)",
        config.wizard.draft_ttl.as_secs()
    );

    let map_service = Arc::new(MapService::new(Arc::clone(&report_repository)));
    let dashboard_service = Arc::new(DashboardService::new(pool.clone()));
    tracing::info!("Map and dashboard services initialized");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    // Build swagger router
    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn_with_state(
                Arc::new(credentials),
                middleware::basic_auth_middleware,
            ))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Protected routes (require JWT authentication)
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes(Arc::clone(&auth_service)))
        .merge(profiles_routes::routes(profile_service))
        .merge(reports_routes::protected_routes(Arc::clone(&report_service)))
        .merge(submissions_routes::protected_routes(submission_service))
        .merge(dashboard_routes::routes(dashboard_service))
        .route_layer(from_fn_with_state(
            jwt_validator.clone(),
            middleware::auth_middleware,
        ));

    let health_route = Router::new()
        .route("/health", axum::routing::get(health_check))
        .with_state(pool.clone());

    // Public routes (no auth required)
    let public_routes = Router::new()
        .merge(auth_routes::public_routes(auth_service))
        .merge(categories_routes::routes(category_service))
        .merge(reports_routes::public_routes(report_service))
        .merge(map_routes::public_routes(map_service));

    let app = Router::new()
        .merge(swagger)
        .merge(protected_routes)
        .merge(public_routes)
        .merge(health_route)
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    socket.set_recv_buffer_size(256 * 1024)?;
    socket.set_send_buffer_size(256 * 1024)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(65535)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}

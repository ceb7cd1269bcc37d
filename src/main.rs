use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, Level};
use tracing_subscriber;

use cluster_registry_backend::{
    auth::AuthService,
    config::Config,
    handlers::{cluster_handler, health_handler},
    middleware::auth_middleware,
    services::ClusterService,
    storage::{PgClusterStore, PgIdentityLinkStore},
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    info!("🚀 Starting Cluster Registry Backend...");

    // Load configuration
    let config = match Config::load() {
        Ok(config) => {
            info!("✅ Configuration loaded");
            config
        }
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Initialize auth service
    let auth_service = match AuthService::new(&config) {
        Ok(auth_service) => {
            info!("✅ Auth service initialized");
            auth_service
        }
        Err(e) => {
            eprintln!("❌ Failed to initialize auth service: {}", e);
            return Err(e.into());
        }
    };

    // Connect to the database
    let pool = match PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            info!("✅ Connected to database");
            pool
        }
        Err(e) => {
            eprintln!("❌ Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    let cluster_service = ClusterService::new(
        Arc::new(PgClusterStore::new(pool.clone())),
        Arc::new(PgIdentityLinkStore::new(pool)),
        &config,
    );

    // Create app state
    let app_state = AppState {
        config: config.clone(),
        auth_service,
        cluster_service,
    };

    // Cluster routes: all require an authenticated service-account token.
    // Порядок важен: статические сегменты должны победить захват :cluster_id
    let clusters = Router::new()
        .route(
            "/clusters",
            get(cluster_handler::list).post(cluster_handler::create),
        )
        .route(
            "/clusters/foundauthclient",
            get(cluster_handler::list_for_auth_client),
        )
        .route(
            "/clusters/identitylink",
            post(cluster_handler::link_identity_to_cluster)
                .delete(cluster_handler::remove_identity_to_cluster_link),
        )
        .route(
            "/clusters/:cluster_id",
            get(cluster_handler::show).delete(cluster_handler::delete),
        )
        .route(
            "/clusters/:cluster_id/authclient",
            get(cluster_handler::show_for_auth_client),
        )
        .layer(from_fn_with_state(app_state.clone(), auth_middleware));

    // Build the application router
    let app = Router::new()
        // Health check (no auth required)
        .route("/health", get(health_handler::health_check))
        // Merge subrouters
        .merge(clusters)
        // Add CORS and tracing middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(app_state.clone());

    // Start the server
    let listener = match tokio::net::TcpListener::bind(&config.server_address).await {
        Ok(listener) => {
            info!("🌐 Server listening on {}", config.server_address);
            listener
        }
        Err(e) => {
            eprintln!("❌ Failed to bind to {}: {}", config.server_address, e);
            return Err(e.into());
        }
    };

    info!("🚀 Starting server...");
    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("❌ Server error: {}", e);
        return Err(e.into());
    }

    info!("✅ Server stopped gracefully");
    Ok(())
}

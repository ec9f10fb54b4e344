// Server module - HTTP server setup and routing
pub mod error;
pub mod handlers;
pub mod state;

use axum::http::{header, HeaderValue, Method};
use axum::middleware::from_fn_with_state;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::{optional_auth, require_auth};
use crate::config::ServerSettings;
use crate::ServiceError;
use self::state::AppState;

/// Path prefix of the versioned API.
pub const API_PREFIX: &str = "/api/v1";

/// Create CORS layer from the configured origins. `*` allows any origin.
pub fn create_cors_layer(origins: &[String]) -> Result<CorsLayer, ServiceError> {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let values = origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| ServiceError::config(format!("Invalid CORS origin '{}': {}", o, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(values)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}

/// Create the Axum application router with all routes and middleware
pub fn create_app(state: AppState, settings: &ServerSettings) -> Result<Router, ServiceError> {
    let public = Router::new()
        .route("/encaje-legal", get(handlers::reserve::grouped_report))
        .route(
            "/indicators/:indicator_code",
            get(handlers::indicators::indicator_details),
        )
        .route(
            "/indicators/:indicator_code/entities",
            get(handlers::indicators::indicator_entities_details),
        );

    let optionally_authenticated = Router::new()
        .route(
            "/indicators/search",
            get(handlers::indicators::search_indicators),
        )
        .route_layer(from_fn_with_state(state.clone(), optional_auth));

    let authenticated = Router::new()
        .route("/favorites", get(handlers::favorites::list_favorites))
        .route("/favorites/toggle", post(handlers::favorites::toggle_favorite))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let api = public.merge(optionally_authenticated).merge(authenticated);

    Ok(Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest(API_PREFIX, api)
        .layer(TimeoutLayer::new(settings.request_timeout))
        .layer(create_cors_layer(&settings.cors_allowed_origins)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Run the server on the specified address until Ctrl-C or SIGTERM
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), ServiceError> {
    info!("Server listening on {}", addr);
    info!("- API: http://{}{}", addr, API_PREFIX);
    info!("- Health endpoint: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

//! Gateway Server - Axum HTTP server

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::proxy::handlers::{places, users};
use crate::proxy::upstream::client::build_http_client;
use crate::proxy::upstream::{IdentityClient, PlacesClient};

/// Headers added to every response unless the handler already set them
const SECURITY_HEADERS: [(&str, &str); 8] = [
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "SAMEORIGIN"),
    ("referrer-policy", "no-referrer"),
    ("x-dns-prefetch-control", "off"),
    ("strict-transport-security", "max-age=15552000; includeSubDomains"),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "same-origin"),
    ("x-xss-protection", "0"),
];

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<IdentityClient>,
    pub places: Arc<PlacesClient>,
}

impl AppState {
    /// Build upstream clients once from the resolved configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http_client = build_http_client(&config.timeouts)?;

        Ok(Self {
            identity: Arc::new(IdentityClient::new(http_client.clone(), &config.identity)),
            places: Arc::new(PlacesClient::new(http_client, &config.places)),
        })
    }
}

/// Build the gateway router with CORS, security headers and request tracing.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        // Health check
        .route("/healthz", get(health_check_handler))
        .route("/health", get(health_check_handler))

        // Identity provider
        .route("/api/getUsers", get(users::handle_get_users))
        .route("/api/deleteUser/:id", delete(users::handle_delete_user))
        .route("/api/changeUserRole/:id", patch(users::handle_change_user_role))
        .route("/api/getActiveUsers", get(users::handle_get_active_users))

        // Places provider
        .route("/api/place-photo", get(places::handle_place_photo))
        .route("/api/place-details", post(places::handle_place_details))

        .with_state(state)
        .layer(cors);

    // Outside CORS so preflight answers carry the headers too
    SECURITY_HEADERS
        .into_iter()
        .fold(app, |app, (name, value)| {
            app.layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            ))
        })
        .layer(TraceLayer::new_for_http())
}

/// Gateway server instance
pub struct GatewayServer {
    host: String,
    port: u16,
    state: AppState,
}

impl GatewayServer {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let state = AppState::from_config(config)?;

        Ok(Self {
            host: config.server.host.clone(),
            port: config.server.port,
            state,
        })
    }

    /// Run the gateway server (blocking)
    pub async fn run(self) -> anyhow::Result<()> {
        if !self.state.identity.is_configured() {
            tracing::warn!("Identity provider secret key missing; user routes will answer 500");
        }
        if !self.state.places.is_configured() {
            tracing::warn!("Places API key missing; place routes will answer 500");
        }

        let app = router(self.state);

        let addr = format!("{}:{}", self.host, self.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        tracing::info!("Gateway listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Gateway stopped");
        Ok(())
    }
}

/// Health check handler
async fn health_check_handler() -> Response {
    (
        StatusCode::OK,
        [(header::CACHE_CONTROL, "no-store")],
        Json(serde_json::json!({"status": "ok"})),
    )
        .into_response()
}

/// Shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received");
}

//! # Server Configuration
//!
//! This module contains the server setup and configuration for the
//! Cantine API.

use std::sync::Arc;

use axum::{
    Router,
    extract::FromRef,
    middleware,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::handlers;
use crate::telemetry;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        Arc::clone(&app_state.config)
    }
}

/// Creates an application state for tests
pub fn create_test_app_state(config: AppConfig, db: DatabaseConnection) -> AppState {
    AppState {
        db,
        config: Arc::new(config),
    }
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/api/register", post(handlers::auth::register))
        .route("/api/login", post(handlers::auth::login))
        .route("/api/logout", post(handlers::auth::logout))
        .route(
            "/api/commande",
            get(handlers::commandes::index).post(handlers::commandes::create),
        )
        .route(
            "/api/commande/{id}",
            get(handlers::commandes::show)
                .put(handlers::commandes::update)
                .delete(handlers::commandes::delete),
        )
        .route("/api/plat/filtered", get(handlers::plats::filtered))
        .route("/api/plat/details/{id}", get(handlers::plats::details))
        .route("/api/plat/available", get(handlers::plats::available))
        .route("/api/utilisateur/me", get(handlers::utilisateurs::me))
        .route("/api/utilisateur", post(handlers::utilisateurs::create))
        .route(
            "/api/utilisateur/{id}",
            get(handlers::utilisateurs::show).put(handlers::utilisateurs::update),
        )
        .layer(middleware::from_fn(telemetry::trace_context_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
}

/// Starts the server with the given configuration
pub async fn run_server(
    config: AppConfig,
    db: DatabaseConnection,
) -> Result<(), Box<dyn std::error::Error>> {
    // Resolve the configured bind address before moving the config
    let addr = config
        .bind_addr()
        .map_err(|e| format!("Invalid server address: {}", e))?;
    let profile = config.profile.clone();

    let state = AppState {
        db,
        config: Arc::new(config),
    };
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, profile, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::auth::logout,
        crate::handlers::commandes::index,
        crate::handlers::commandes::create,
        crate::handlers::commandes::show,
        crate::handlers::commandes::update,
        crate::handlers::commandes::delete,
        crate::handlers::plats::filtered,
        crate::handlers::plats::details,
        crate::handlers::plats::available,
        crate::handlers::utilisateurs::me,
        crate::handlers::utilisateurs::show,
        crate::handlers::utilisateurs::create,
        crate::handlers::utilisateurs::update,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::error::ApiError,
            crate::handlers::types::UtilisateurView,
            crate::handlers::types::AllergeneView,
            crate::handlers::types::PlatView,
            crate::handlers::types::CommandeView,
            crate::handlers::types::AuthResponse,
            crate::handlers::auth::RegisterRequest,
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::LogoutResponse,
            crate::handlers::commandes::CreateCommandeRequest,
            crate::handlers::commandes::UpdateCommandeBody,
            crate::handlers::utilisateurs::CreateUtilisateurBody,
            crate::handlers::utilisateurs::UpdateUtilisateurBody,
        )
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Cantine API",
        description = "REST backend for the corporate meal-ordering application",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

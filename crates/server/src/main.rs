mod auth;
mod config;
mod doc;
mod dtos;
mod error;
mod mailer;
mod routes;
mod state;
mod utils;

use axum::Router;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use config::ServerConfig;
use doc::ApiDoc;
use log::{error, info, warn};
use mailer::Mailer;
use migration::{Migrator, MigratorTrait};
use state::AppState;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_oauth2_resource_server::server::OAuth2ResourceServer;
use utils::shutdown::shutdown_signal;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

const CORS_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::OPTIONS,
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("configuration error: {err}");
            std::process::exit(1);
        }
    };

    let db = database::db::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let mailer = match &config.smtp {
        Some(smtp) => match Mailer::from_config(smtp) {
            Ok(mailer) => Some(Arc::new(mailer)),
            Err(err) => {
                warn!("invalid SMTP configuration, fee reminders disabled: {err}");
                None
            }
        },
        None => {
            info!("SMTP not configured, fee reminders disabled");
            None
        }
    };

    let oauth2_resource_server = <OAuth2ResourceServer>::builder()
        .issuer_url(config.oidc_issuer_url.as_str())
        .build()
        .await
        .expect("Failed to build OAuth2ResourceServer");

    let cors = match &config.frontend_url {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<HeaderValue>().expect("Invalid FRONTEND_URL"))
            .allow_methods(CORS_METHODS)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(CORS_METHODS)
            .allow_headers(Any),
    };

    let state = AppState { db, mailer };

    // Health stays outside the bearer-token layer so load balancers can
    // probe it unauthenticated.
    let api = routes::api_router()
        .layer(ServiceBuilder::new().layer(oauth2_resource_server.into_layer()));

    let app = Router::new()
        .route("/api/health", get(routes::health::health))
        .nest("/api", api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(CompressionLayer::new())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(config.http_addr)
        .await
        .expect("Failed to bind HTTP address");
    info!("Server running on http://{}", config.http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

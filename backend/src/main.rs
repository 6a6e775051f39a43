use axum::{
    http::{header, Method, StatusCode},
    routing::{delete, get, post, put},
    Router,
};
use std::net::SocketAddr;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod db;
mod error;
mod handlers;
mod models;
mod schema;
mod sweep;
mod sync;

use crate::config::AppConfig;
use crate::sweep::SweepScheduler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arsana_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let app_config = AppConfig::from_env()?;

    tracing::info!("Starting Arsana letter-tracking backend");

    let pool = db::establish_connection_pool(&app_config.database_url)?;
    tracing::info!("Database connection pool initialized");

    // The daily reminder sweep runs in this process. Keeping the handle lets
    // shutdown cancel it, and avoids a second timer on hot reload.
    let scheduler = SweepScheduler::new(pool.clone(), app_config.sweep_hour);
    let sweep_handle = tokio::spawn(async move {
        scheduler.run().await;
    });

    let app = Router::new()
        .route("/health", get(health_check))
        // Incoming letter routes
        .route(
            "/api/letters/incoming",
            get(handlers::incoming::list_incoming_letters),
        )
        .route(
            "/api/letters/incoming",
            post(handlers::incoming::create_incoming_letter),
        )
        .route(
            "/api/letters/incoming/:id",
            get(handlers::incoming::get_incoming_letter),
        )
        .route(
            "/api/letters/incoming/:id",
            put(handlers::incoming::update_incoming_letter),
        )
        .route(
            "/api/letters/incoming/:id",
            delete(handlers::incoming::delete_incoming_letter),
        )
        // Outgoing letter routes
        .route(
            "/api/letters/outgoing",
            get(handlers::outgoing::list_outgoing_letters),
        )
        .route(
            "/api/letters/outgoing",
            post(handlers::outgoing::create_outgoing_letter),
        )
        .route(
            "/api/letters/outgoing/:id",
            get(handlers::outgoing::get_outgoing_letter),
        )
        .route(
            "/api/letters/outgoing/:id",
            put(handlers::outgoing::update_outgoing_letter),
        )
        .route(
            "/api/letters/outgoing/:id",
            delete(handlers::outgoing::delete_outgoing_letter),
        )
        // Calendar event routes
        .route(
            "/api/calendar-events",
            get(handlers::calendar::list_calendar_events),
        )
        .route(
            "/api/calendar-events",
            post(handlers::calendar::create_calendar_event),
        )
        .route(
            "/api/calendar-events/upcoming",
            get(handlers::calendar::list_upcoming_events),
        )
        .route(
            "/api/calendar-events/:id",
            get(handlers::calendar::get_calendar_event),
        )
        .route(
            "/api/calendar-events/:id",
            delete(handlers::calendar::delete_calendar_event),
        )
        // Notification routes
        .route(
            "/api/notifications",
            get(handlers::notifications::list_notifications),
        )
        .route(
            "/api/notifications/read-all",
            post(handlers::notifications::mark_all_notifications_read),
        )
        .route(
            "/api/notifications/:id/read",
            post(handlers::notifications::mark_notification_read),
        )
        .route(
            "/api/notifications/:id",
            delete(handlers::notifications::delete_notification),
        )
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(
            app_config.cors_allowed_origins.as_deref(),
        ))
        .with_state(pool);

    let addr = SocketAddr::from(([0, 0, 0, 0], app_config.port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweep_handle.abort();
    tracing::info!("Arsana backend stopped");

    Ok(())
}

async fn health_check() -> StatusCode {
    StatusCode::OK
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

/// Build CORS layer based on environment configuration.
///
/// If CORS_ALLOWED_ORIGINS is set, only those origins are allowed.
/// If not set, defaults to permissive CORS (for development only).
fn build_cors_layer(allowed_origins: Option<&str>) -> CorsLayer {
    match allowed_origins {
        Some(origins) => {
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();

            if origins.is_empty() {
                tracing::warn!(
                    "CORS_ALLOWED_ORIGINS is set but empty, using permissive CORS (not recommended for production)"
                );
                CorsLayer::permissive()
            } else {
                tracing::info!("CORS configured for origins: {:?}", origins);
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods([
                        Method::GET,
                        Method::POST,
                        Method::PUT,
                        Method::DELETE,
                        Method::OPTIONS,
                    ])
                    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
                    .allow_credentials(true)
            }
        }
        None => {
            tracing::warn!(
                "CORS_ALLOWED_ORIGINS not set, using permissive CORS (not recommended for production)"
            );
            CorsLayer::permissive()
        }
    }
}

//! Chat thread service
//!
//! Serves a single conversation with an automated responder: a pure
//! conversation state machine driven by a background runtime, observable
//! over HTTP and Server-Sent Events.

mod api;
mod config;
mod conversation;
mod locale;
mod responder;
mod runtime;
mod state_machine;

use api::{create_router, AppState};
use config::ChatConfig;
use responder::{LoggingResponder, SimulatedResponder};
use runtime::{spawn_conversation, RuntimeOptions};
use state_machine::ConvContext;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat_thread=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = ChatConfig::from_env()?;
    tracing::info!(
        port = config.port,
        locale = %config.locale,
        delay_min_ms = %config.response_delay_min.as_millis(),
        delay_max_ms = %config.response_delay_max.as_millis(),
        failure_rate = config.failure_rate,
        timeout_ms = ?config.response_timeout.map(|t| t.as_millis()),
        "Configuration loaded"
    );
    if config.response_timeout.is_none() {
        tracing::info!("No response timeout configured; a stalled responder keeps the conversation busy");
    }

    // Start the conversation
    let responder = LoggingResponder::new(Arc::new(SimulatedResponder::from_config(&config)));
    let context = ConvContext::new("main", config.locale.fallback_text());
    let conversation = spawn_conversation(
        context,
        config.locale.greeting(),
        responder,
        RuntimeOptions {
            response_timeout: config.response_timeout,
        },
    );

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let shutdown = CancellationToken::new();
    let app = create_router(AppState::new(conversation, shutdown.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Chat thread server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
            // Ends open event streams so their connections can drain
            shutdown.cancel();
        })
        .await?;

    Ok(())
}

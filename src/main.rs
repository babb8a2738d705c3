use axum::{Extension, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use support_chat::{gemini_client::GeminiClient, handlers, middleware, AppState};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_logging().expect("Failed to initialize logging");

    // Initialize Gemini client if API key is provided. A missing key is not
    // fatal: the site still serves, and the relay reports the
    // misconfiguration per request.
    let gemini_client = match std::env::var("GEMINI_API_KEY").ok() {
        Some(api_key) if !api_key.is_empty() => {
            let client = GeminiClient::new(api_key);
            let client = match std::env::var("GEMINI_MODEL").ok() {
                Some(model) if !model.is_empty() => client.with_model(model),
                _ => client,
            };
            tracing::info!("Initializing Gemini AI client for the support assistant...");
            Some(client)
        }
        _ => {
            tracing::warn!("GEMINI_API_KEY not found. Chat relay will reject requests.");
            None
        }
    };

    let shared_state = Arc::new(AppState { gemini_client });

    // Build our application with all routes and shared state
    let app = Router::new()
        .merge(handlers::ui::ui_routes())
        .merge(handlers::chat::chat_routes())
        .route("/api/status", axum::routing::get(api_status))
        .layer(axum::middleware::from_fn(
            middleware::logging::request_logging_middleware,
        ))
        .layer(CorsLayer::permissive())
        .layer(Extension(shared_state));

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000")
        .await
        .expect("Failed to bind 0.0.0.0:3000");
    tracing::info!("listening on {}", listener.local_addr().expect("listener has no local addr"));
    axum::serve(listener, app)
        .await
        .expect("server exited with an error");
}

// Production-grade logging configuration
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, fmt, Layer};

    // Get log level from environment or default to INFO for production
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "debug,support_chat=trace,reqwest=info,hyper=info,tower=info".to_string()
        } else {
            "info,support_chat=info,reqwest=warn,hyper=warn,tower=warn".to_string()
        }
    });

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&log_level))?;

    // JSON logging for aggregation, human-readable otherwise
    let fmt_layer = if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("💬 Abhaya support chat starting up...");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Build mode: {}",
        if cfg!(debug_assertions) { "development" } else { "production" }
    );
    tracing::info!("Log level: {}", log_level);

    let gemini_configured = std::env::var("GEMINI_API_KEY").is_ok();
    tracing::info!(
        "Configuration - Gemini AI: {}",
        if gemini_configured { "✅" } else { "❌" }
    );

    Ok(())
}

async fn api_status(
    Extension(state): Extension<Arc<AppState>>,
) -> axum::response::Json<serde_json::Value> {
    use serde_json::json;

    let gemini_status = if state.gemini_client.is_some() {
        "configured"
    } else {
        "not_configured"
    };

    axum::response::Json(json!({
        "status": "operational",
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "gemini_ai": gemini_status
        }
    }))
}

//! Lawyrs Crew HTTP server.

use std::sync::Arc;

use http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use lawyrs_crew::adapters::ai::OpenAIProviderFactory;
use lawyrs_crew::adapters::http::{crew_router, CrewAppState};
use lawyrs_crew::config::{AppConfig, ServerConfig};
use lawyrs_crew::domain::llm::LlmSettingsStore;

/// Installs the global subscriber; `RUST_LOG` wins over `server.log_level`.
fn init_tracing(server: &ServerConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.is_production() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer())
            .try_init()
            .ok();
    }
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let settings = config.llm_settings();
    tracing::info!(
        model = %settings.model,
        base_url = %settings.redacted_base_url(),
        environment = ?config.server.environment,
        "Lawyrs crew starting"
    );
    if settings.has_api_key() {
        tracing::info!("LLM API key configured");
    } else {
        tracing::warn!(
            "LLM API key NOT CONFIGURED: chat will return 503. Set OPENAI_API_KEY or NOVITA_API_KEY."
        );
    }

    let state = CrewAppState::new(
        Arc::new(LlmSettingsStore::new(settings)),
        Arc::new(OpenAIProviderFactory),
    );

    let app = crew_router()
        .with_state(state)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app).await?;
    Ok(())
}

//! Route definitions for crew endpoints

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{chat, classify, configure, get_config, health, CrewAppState};

/// Create crew router with all endpoints
///
/// # Endpoints
///
/// - `GET /health` - Engine health report
/// - `GET /api/crew/config` - Redacted engine configuration
/// - `POST /api/crew/chat` - Run one role or the full crew
/// - `POST /api/crew/configure` - Replace engine credentials
/// - `GET /api/crew/classify` - Preview role routing
pub fn routes() -> Router<CrewAppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/crew/config", get(get_config))
        .route("/api/crew/chat", post(chat))
        .route("/api/crew/configure", post(configure))
        .route("/api/crew/classify", get(classify))
}

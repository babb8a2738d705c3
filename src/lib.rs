// lib.rs - Main library file that exports all modules
pub mod gemini_client;
pub mod handlers;
pub mod middleware;
pub mod model;
pub mod models;
pub mod persona;
pub mod widget;

// AppState holds the upstream model client. It is None when GEMINI_API_KEY
// is not configured; the relay then reports the misconfiguration per request.
pub struct AppState {
    pub gemini_client: Option<gemini_client::GeminiClient>,
}

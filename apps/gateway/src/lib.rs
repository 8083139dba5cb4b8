#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod extractors;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod trace_ctx;
pub mod upstream;

// Re-exports for public API
pub use auth::claims::UserClaims;
pub use auth::verifier::TokenVerifier;
pub use config::auth::AuthConfig;
pub use config::upstreams::{Upstream, UpstreamConfig};
pub use error::AppError;
pub use extractors::auth_token::AuthToken;
pub use extractors::current_user::CurrentUser;
pub use middleware::auth::{OptionalAuth, RequireAuth};
pub use middleware::cors::cors_middleware;
pub use middleware::request_trace::RequestTrace;
pub use middleware::security_headers::SecurityHeaders;
pub use middleware::structured_logger::StructuredLogger;
pub use state::app_state::AppState;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    gateway_test_support::logging::init();
}

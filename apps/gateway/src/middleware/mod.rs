pub mod auth;
pub mod cors;
pub mod rate_limit;
pub mod request_trace;
pub mod security_headers;
pub mod structured_logger;

pub use auth::{OptionalAuth, RequireAuth};
pub use cors::cors_middleware;
pub use request_trace::RequestTrace;
pub use security_headers::SecurityHeaders;
pub use structured_logger::StructuredLogger;

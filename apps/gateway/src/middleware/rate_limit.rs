//! Rate limiting configuration helpers.
//!
//! The gateway applies one fixed-window limiter across all routes:
//! 100 requests per minute per client IP. `main` builds the limiter from
//! this input function with a shared in-memory backend.

use std::time::Duration;

use actix_extensible_rate_limit::backend::SimpleInputFunctionBuilder;

/// Input function for the gateway-wide limiter.
/// Limits: 100 requests per 60 seconds per IP address.
pub fn gateway_rate_limit_config() -> SimpleInputFunctionBuilder {
    SimpleInputFunctionBuilder::new(Duration::from_secs(60), 100).real_ip_key()
}

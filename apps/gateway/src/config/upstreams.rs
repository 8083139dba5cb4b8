use std::env;

/// The four backend services the gateway fronts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    Users,
    Stores,
    Bookings,
    Payments,
}

impl Upstream {
    /// Service name as it appears in logs and error details.
    pub fn name(self) -> &'static str {
        match self {
            Upstream::Users => "user-service",
            Upstream::Stores => "store-service",
            Upstream::Bookings => "booking-service",
            Upstream::Payments => "payment-service",
        }
    }
}

/// Base URLs of the backend services.
///
/// Each is configurable via environment and defaults to the Docker-compose
/// hostname of the service. Trailing slashes are trimmed so URL assembly can
/// always join with a leading `/`.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub users: String,
    pub stores: String,
    pub bookings: String,
    pub payments: String,
}

impl UpstreamConfig {
    pub fn from_env() -> Self {
        Self {
            users: env_or("REST_API_URL", "http://user-service:3001"),
            stores: env_or("STORE_API_URL", "http://store-service:4001"),
            bookings: env_or("BOOKING_API_URL", "http://booking-service:4002"),
            payments: env_or("PAYMENT_API_URL", "http://payment-service:4000"),
        }
    }

    pub fn base_url(&self, upstream: Upstream) -> &str {
        match upstream {
            Upstream::Users => &self.users,
            Upstream::Stores => &self.stores,
            Upstream::Bookings => &self.bookings,
            Upstream::Payments => &self.payments,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::{Upstream, UpstreamConfig};

    #[test]
    #[serial]
    fn defaults_to_compose_hostnames() {
        for key in [
            "REST_API_URL",
            "STORE_API_URL",
            "BOOKING_API_URL",
            "PAYMENT_API_URL",
        ] {
            std::env::remove_var(key);
        }

        let config = UpstreamConfig::from_env();
        assert_eq!(config.base_url(Upstream::Users), "http://user-service:3001");
        assert_eq!(
            config.base_url(Upstream::Payments),
            "http://payment-service:4000"
        );
    }

    #[test]
    #[serial]
    fn env_override_trims_trailing_slash() {
        std::env::set_var("STORE_API_URL", "http://localhost:4001/");
        let config = UpstreamConfig::from_env();
        assert_eq!(config.base_url(Upstream::Stores), "http://localhost:4001");
        std::env::remove_var("STORE_API_URL");
    }
}

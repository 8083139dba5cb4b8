use actix_web::{web, HttpResponse};

use crate::config::upstreams::Upstream;
use crate::error::AppError;
use crate::middleware::auth::{OptionalAuth, RequireAuth};
use crate::upstream::proxy::{forward, ProxyTarget};

pub mod dashboard;
pub mod health;

/// Routes listed in the 404 catch-all payload.
pub const AVAILABLE_ROUTES: &[&str] = &[
    "/health",
    "/api/* (proxied to the user service)",
    "/api/seller/dashboard (aggregated)",
    "/graphql-store, /graphql-booking, /graphql-payment (proxied to the GraphQL services)",
];

async fn not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::not_found())
}

/// Configure the gateway's routes.
///
/// Registration order matters: the public user-service routes and the
/// aggregated dashboard must come before the protected catch-all `/api`
/// scope that proxies everything else to the user service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    cfg.route("/health", web::get().to(health::health));

    // Public routes, proxied without authentication
    cfg.service(
        web::scope("/api/auth")
            .app_data(web::Data::new(ProxyTarget::passthrough(Upstream::Users)))
            .default_service(web::to(forward)),
    );
    cfg.service(
        web::resource("/api/public-key")
            .app_data(web::Data::new(ProxyTarget::passthrough(Upstream::Users)))
            .route(web::route().to(forward)),
    );

    // Aggregated seller dashboard
    cfg.service(
        web::resource("/api/seller/dashboard")
            .wrap(RequireAuth)
            .route(web::get().to(dashboard::seller_dashboard)),
    );

    // Protected user-service proxy: /api/**
    cfg.service(
        web::scope("/api")
            .wrap(RequireAuth)
            .app_data(web::Data::new(ProxyTarget::passthrough(Upstream::Users)))
            .default_service(web::to(forward)),
    );

    // GraphQL proxies, each rewritten to the backend's canonical /graphql
    cfg.service(
        web::scope("/graphql-payment")
            .wrap(RequireAuth)
            .app_data(web::Data::new(ProxyTarget::rewritten(
                Upstream::Payments,
                "/graphql-payment",
                "/graphql",
            )))
            .default_service(web::to(forward)),
    );
    cfg.service(
        web::scope("/graphql-store")
            .wrap(OptionalAuth)
            .app_data(web::Data::new(ProxyTarget::rewritten(
                Upstream::Stores,
                "/graphql-store",
                "/graphql",
            )))
            .default_service(web::to(forward)),
    );
    cfg.service(
        web::scope("/graphql-booking")
            .wrap(RequireAuth)
            .app_data(web::Data::new(ProxyTarget::rewritten(
                Upstream::Bookings,
                "/graphql-booking",
                "/graphql",
            )))
            .default_service(web::to(forward)),
    );

    // Catch-all: 404 with the static route list
    cfg.default_service(web::to(not_found));
}

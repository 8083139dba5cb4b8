use actix_extensible_rate_limit::backend::memory::InMemoryBackend;
use actix_extensible_rate_limit::RateLimiter;
use actix_web::{web, App, HttpServer};
use gateway::config::auth::AuthConfig;
use gateway::config::upstreams::UpstreamConfig;
use gateway::middleware::cors::cors_middleware;
use gateway::middleware::rate_limit::gateway_rate_limit_config;
use gateway::middleware::request_trace::RequestTrace;
use gateway::middleware::security_headers::SecurityHeaders;
use gateway::middleware::structured_logger::StructuredLogger;
use gateway::routes;
use gateway::state::app_state::AppState;
use tracing::warn;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let host = std::env::var("GATEWAY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("GATEWAY_PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse::<u16>()
        .unwrap_or_else(|_| {
            eprintln!("GATEWAY_PORT must be a valid port number");
            std::process::exit(1);
        });

    let auth = match AuthConfig::from_env() {
        Ok(auth) => auth,
        Err(e) => {
            eprintln!("Invalid auth configuration: {e}");
            std::process::exit(1);
        }
    };
    if auth.dev_secret.is_some() {
        warn!("insecure dev-secret fallback is ENABLED; tokens signed with the public development secret will be accepted");
    }

    let upstreams = UpstreamConfig::from_env();
    let app_state = AppState::new(upstreams, auth);

    // One eager fetch so the common case never pays the lazy-fetch latency.
    // Failure is not fatal: the verifier retries on first use.
    if let Err(e) = app_state.verifier.refresh_public_key().await {
        warn!(error = %e, "public key not available at startup");
    }

    let data = web::Data::new(app_state);
    let limiter_backend = InMemoryBackend::builder().build();

    tracing::info!(%host, port, "starting laundry marketplace gateway");

    HttpServer::new(move || {
        let rate_limiter = RateLimiter::builder(
            limiter_backend.clone(),
            gateway_rate_limit_config().build(),
        )
        .add_headers()
        .build();

        App::new()
            .wrap(cors_middleware())
            .wrap(SecurityHeaders)
            .wrap(rate_limiter)
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}

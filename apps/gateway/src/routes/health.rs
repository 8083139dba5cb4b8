use actix_web::{web, HttpResponse};
use serde::Serialize;
use time::OffsetDateTime;

use crate::error::AppError;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    app_version: String,
    public_key_loaded: bool,
    services: ServiceUrls,
    time: String,
}

#[derive(Debug, Serialize)]
struct ServiceUrls {
    #[serde(rename = "user-service")]
    users: String,
    #[serde(rename = "store-service")]
    stores: String,
    #[serde(rename = "booking-service")]
    bookings: String,
    #[serde(rename = "payment-service")]
    payments: String,
}

pub async fn health(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let now = OffsetDateTime::now_utc();
    let time = now
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    let response = HealthResponse {
        status: "healthy".to_string(),
        app_version: env!("CARGO_PKG_VERSION").to_string(),
        public_key_loaded: state.verifier.key_loaded(),
        services: ServiceUrls {
            users: state.upstreams.users.clone(),
            stores: state.upstreams.stores.clone(),
            bookings: state.upstreams.bookings.clone(),
            payments: state.upstreams.payments.clone(),
        },
        time,
    };

    Ok(HttpResponse::Ok().json(response))
}

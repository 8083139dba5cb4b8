use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::routes::AVAILABLE_ROUTES;
use crate::trace_ctx;

/// RFC 7807 style error body returned for every failed request.
#[derive(Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
    /// Only present on the 404 catch-all, listing the routes the gateway serves.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_routes: Option<&'static [&'static str]>,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthenticated: {detail}")]
    Unauthenticated { detail: String },
    #[error("{service} unavailable: {detail}")]
    UpstreamUnavailable {
        service: &'static str,
        detail: String,
    },
    #[error("Route not found")]
    NotFound,
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::Unauthenticated { .. } => "UNAUTHENTICATED",
            AppError::UpstreamUnavailable { .. } => "UPSTREAM_UNAVAILABLE",
            AppError::NotFound => "NOT_FOUND",
            AppError::Config { .. } => "CONFIG_ERROR",
            AppError::Internal { .. } => "INTERNAL",
        }
    }

    fn detail(&self) -> String {
        match self {
            // The underlying verification error is surfaced to the caller,
            // matching the behavior of the service this gateway fronts.
            AppError::Unauthenticated { detail } => detail.clone(),
            AppError::UpstreamUnavailable { service, detail } => {
                format!("{service} unavailable: {detail}")
            }
            AppError::NotFound => "Route not found".to_string(),
            AppError::Config { detail } => detail.clone(),
            AppError::Internal { detail } => detail.clone(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            AppError::UpstreamUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn unauthenticated(detail: impl Into<String>) -> Self {
        Self::Unauthenticated {
            detail: detail.into(),
        }
    }

    pub fn upstream(service: &'static str, detail: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            service,
            detail: detail.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<std::env::VarError> for AppError {
    fn from(e: std::env::VarError) -> Self {
        AppError::config(format!("env var error: {e}"))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.code();
        let detail = self.detail();
        let trace_id = trace_ctx::current();

        let available_routes = match self {
            AppError::NotFound => Some(AVAILABLE_ROUTES),
            _ => None,
        };

        let problem_details = ProblemDetails {
            type_: format!("https://laundrymarket.dev/errors/{code}"),
            title: Self::humanize_code(code),
            status: status.as_u16(),
            detail,
            code: code.to_string(),
            trace_id: trace_id.clone(),
            available_routes,
        };

        HttpResponse::build(status)
            .content_type("application/problem+json")
            .insert_header(("x-trace-id", trace_id))
            .json(problem_details)
    }
}

//! Minimal GraphQL-over-HTTP client for the backend services.
//!
//! Backends speak standard `POST /graphql` with a `{query, variables}` body
//! and a `{data, errors}` envelope. The caller's Authorization header is
//! forwarded so backends see the original identity. Transport failures,
//! non-success statuses, GraphQL errors, and missing data all collapse into
//! `UpstreamUnavailable`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::upstreams::Upstream;
use crate::error::AppError;
use crate::state::app_state::AppState;

#[derive(Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: serde_json::Value,
}

#[derive(Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

/// Execute `query` against `upstream` and decode the `data` payload into `T`.
pub async fn execute<T>(
    state: &AppState,
    upstream: Upstream,
    query: &str,
    variables: serde_json::Value,
    authorization: &str,
) -> Result<T, AppError>
where
    T: DeserializeOwned,
{
    let service = upstream.name();
    let url = format!("{}/graphql", state.upstreams.base_url(upstream));

    let response = state
        .http
        .post(url.as_str())
        .header(reqwest::header::AUTHORIZATION, authorization)
        .json(&GraphqlRequest { query, variables })
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|e| AppError::upstream(service, e.to_string()))?;

    let envelope: GraphqlResponse<T> = response
        .json()
        .await
        .map_err(|e| AppError::upstream(service, e.to_string()))?;

    if let Some(errors) = envelope.errors {
        if let Some(first) = errors.into_iter().next() {
            return Err(AppError::upstream(service, first.message));
        }
    }

    envelope
        .data
        .ok_or_else(|| AppError::upstream(service, "empty GraphQL response"))
}

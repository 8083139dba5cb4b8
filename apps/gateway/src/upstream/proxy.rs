//! Reverse proxy to the backend services.
//!
//! Each proxied scope registers a [`ProxyTarget`] as scope-level data; the
//! shared [`forward`] handler rewrites the path, replays method, query
//! string and body against the target service, and forwards the
//! Authorization and internal `user` headers. Upstream responses pass
//! through verbatim (status, body, content type); only transport failures
//! become gateway errors. No retries and no timeout beyond the client's own.

use actix_web::http::{header, StatusCode};
use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};
use tracing::debug;

use crate::auth::claims::UserClaims;
use crate::config::upstreams::Upstream;
use crate::error::AppError;
use crate::middleware::auth::FORWARD_HEADER;
use crate::state::app_state::AppState;

/// Where a proxied scope sends its traffic.
#[derive(Debug, Clone)]
pub struct ProxyTarget {
    pub upstream: Upstream,
    /// Prefix rewrite, e.g. `("/graphql-store", "/graphql")`. `None` passes
    /// the path through unchanged.
    pub rewrite: Option<(&'static str, &'static str)>,
}

impl ProxyTarget {
    pub fn passthrough(upstream: Upstream) -> Self {
        Self {
            upstream,
            rewrite: None,
        }
    }

    pub fn rewritten(upstream: Upstream, prefix: &'static str, replacement: &'static str) -> Self {
        Self {
            upstream,
            rewrite: Some((prefix, replacement)),
        }
    }

    fn rewrite_path(&self, path: &str) -> String {
        match self.rewrite {
            Some((prefix, replacement)) => match path.strip_prefix(prefix) {
                Some(rest) => format!("{replacement}{rest}"),
                None => path.to_string(),
            },
            None => path.to_string(),
        }
    }
}

/// Forward the current request to the scope's proxy target.
pub async fn forward(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<AppState>,
    target: web::Data<ProxyTarget>,
) -> Result<HttpResponse, AppError> {
    let service = target.upstream.name();
    let base = state.upstreams.base_url(target.upstream);

    let mut url = format!("{}{}", base, target.rewrite_path(req.path()));
    if !req.query_string().is_empty() {
        url.push('?');
        url.push_str(req.query_string());
    }

    let method = reqwest::Method::from_bytes(req.method().as_str().as_bytes())
        .map_err(|e| AppError::internal(format!("invalid method: {e}")))?;

    debug!(%url, method = %req.method(), service, "proxying request");

    let mut upstream_req = state.http.request(method, url.as_str());
    for name in [
        header::AUTHORIZATION.as_str(),
        header::CONTENT_TYPE.as_str(),
        header::ACCEPT.as_str(),
    ] {
        if let Some(value) = req.headers().get(name).and_then(|v| v.to_str().ok()) {
            upstream_req = upstream_req.header(name, value);
        }
    }

    // The internal `user` header only travels when this gateway verified the
    // caller; on unauthenticated scopes a client-supplied value stays behind.
    if req.extensions().get::<UserClaims>().is_some() {
        if let Some(value) = req.headers().get(FORWARD_HEADER).and_then(|v| v.to_str().ok()) {
            upstream_req = upstream_req.header(FORWARD_HEADER, value);
        }
    }

    let upstream_res = upstream_req
        .body(body.to_vec())
        .send()
        .await
        .map_err(|e| AppError::upstream(service, e.to_string()))?;

    let status = StatusCode::from_u16(upstream_res.status().as_u16())
        .map_err(|e| AppError::upstream(service, e.to_string()))?;
    let content_type = upstream_res
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/json")
        .to_string();
    let bytes = upstream_res
        .bytes()
        .await
        .map_err(|e| AppError::upstream(service, e.to_string()))?;

    Ok(HttpResponse::build(status)
        .content_type(content_type)
        .body(bytes.to_vec()))
}

//! Authentication middleware.
//!
//! `RequireAuth` guards protected routes: it parses the bearer token, runs it
//! through the verifier, inserts the decoded claims into request extensions,
//! and re-serializes them into the internal `user` header forwarded to
//! backends. Requests without a valid token get a 401 problem response.
//!
//! `OptionalAuth` runs the same pipeline but treats a missing or invalid
//! token as an anonymous request rather than an error.
//!
//! Both variants strip any client-supplied `user` header first, so the
//! internal header can only ever originate from this gateway.

use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::ResponseError;
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::debug;

use crate::error::AppError;
use crate::logging::security;
use crate::state::app_state::AppState;

/// Name of the internal header carrying serialized claims to backends.
pub const FORWARD_HEADER: &str = "user";

fn bearer_token(headers: &header::HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Verify `token` and attach claims to the request (extensions + header).
async fn verify_and_attach(req: &mut ServiceRequest, token: &str) -> Result<(), AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| AppError::internal("AppState not available"))?;

    let claims = state.verifier.verify(token).await?;

    let serialized = claims.to_forward_header()?;
    let value = header::HeaderValue::from_str(&serialized)
        .map_err(|_| AppError::internal("claims are not representable as a header"))?;
    req.headers_mut()
        .insert(header::HeaderName::from_static(FORWARD_HEADER), value);
    req.extensions_mut().insert(claims);
    Ok(())
}

pub struct RequireAuth;

impl<S, B> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            req.headers_mut().remove(FORWARD_HEADER);

            let outcome = match bearer_token(req.headers()) {
                None => Err(AppError::unauthenticated("No token provided")),
                Some(token) => verify_and_attach(&mut req, &token).await,
            };

            match outcome {
                Ok(()) => service
                    .call(req)
                    .await
                    .map(ServiceResponse::map_into_left_body),
                Err(err) => {
                    security::auth_failed(&err.to_string());
                    // Render here, inside the request's trace scope, so the
                    // problem body carries the right trace id.
                    let response = err.error_response().map_into_right_body();
                    Ok(req.into_response(response))
                }
            }
        })
    }
}

pub struct OptionalAuth;

impl<S, B> Transform<S, ServiceRequest> for OptionalAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = OptionalAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(OptionalAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct OptionalAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for OptionalAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            req.headers_mut().remove(FORWARD_HEADER);

            if let Some(token) = bearer_token(req.headers()) {
                if let Err(err) = verify_and_attach(&mut req, &token).await {
                    // Not an error on optional routes: the request simply
                    // proceeds unauthenticated.
                    debug!(error = %err, "optional token verification failed");
                }
            }

            service.call(req).await
        })
    }
}

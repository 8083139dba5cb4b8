use actix_web::{dev::Payload, http::header, FromRequest, HttpRequest};

use crate::error::AppError;

/// Raw bearer token from the Authorization header.
///
/// The dashboard aggregator forwards it to the GraphQL backends on the
/// caller's behalf.
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub token: String,
}

impl AuthToken {
    /// The value to send as a downstream Authorization header.
    pub fn authorization_value(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl FromRequest for AuthToken {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let token = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .ok_or_else(|| AppError::unauthenticated("No token provided"))?
                .to_string();

            Ok(AuthToken { token })
        })
    }
}

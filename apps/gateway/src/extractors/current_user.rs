use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};

use crate::auth::claims::UserClaims;
use crate::error::AppError;

/// The authenticated caller, extracted from the claims that `RequireAuth`
/// stored in request extensions. Only usable behind that middleware.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: String,
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<UserClaims>().cloned();

        Box::pin(async move {
            let claims = claims.ok_or_else(|| AppError::unauthenticated("No token provided"))?;
            Ok(CurrentUser {
                id: claims.id,
                email: claims.email,
                name: claims.name,
                role: claims.role,
            })
        })
    }
}

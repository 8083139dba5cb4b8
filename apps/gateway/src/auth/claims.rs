//! Identity claims carried by tokens issued by the user service.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Claims embedded in a marketplace bearer token.
///
/// Issued by the user service at login, consumed read-only by the gateway,
/// and forwarded verbatim to backend services as a JSON-serialized `user`
/// header. Backends trust the header without re-verification.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserClaims {
    /// User id in the user service database.
    pub id: i64,
    pub email: String,
    pub name: String,
    /// CUSTOMER, SELLER or ADMIN.
    pub role: String,
    /// Issued-at (seconds since epoch)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<usize>,
    /// Expiry (seconds since epoch)
    pub exp: usize,
}

impl UserClaims {
    /// Serialize the claims into the internal `user` header value.
    pub fn to_forward_header(&self) -> Result<String, AppError> {
        serde_json::to_string(self)
            .map_err(|e| AppError::internal(format!("failed to serialize claims: {e}")))
    }
}

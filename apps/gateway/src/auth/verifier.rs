//! Bearer token verification against the user service's signing key.
//!
//! Tokens are normally signed RS256 by the user service; the matching public
//! key is served at `GET /api/public-key` and fetched lazily on first use.
//! Concurrent requests that find the key missing coalesce on a single fetch
//! rather than each issuing their own.
//!
//! When `GATEWAY_INSECURE_DEV_SECRET` is set, verification additionally falls
//! back to HS256 with the fixed development secret the user service signs
//! with when its keypair is missing. The secret is public knowledge, so this
//! mode accepts forgeable tokens and must never be enabled outside local
//! development. With the flag unset the gateway fails closed.

use std::sync::Arc;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use parking_lot::RwLock;
use serde::Deserialize;
use tracing::{info, warn};

use crate::auth::claims::UserClaims;
use crate::error::AppError;
use crate::logging::security;

#[derive(Deserialize)]
struct PublicKeyResponse {
    #[serde(rename = "publicKey")]
    public_key: String,
}

/// Verifies bearer tokens for the gateway.
///
/// Held in `AppState`; shared by the auth middleware across all requests.
pub struct TokenVerifier {
    http: reqwest::Client,
    /// Base URL of the user service, which issues tokens and serves the key.
    identity_base: String,
    /// HS256 fallback secret, present only in insecure-fallback mode.
    dev_secret: Option<String>,
    key: RwLock<Option<Arc<DecodingKey>>>,
    /// Serializes key fetches so a cold cache triggers one refresh, not N.
    refresh: tokio::sync::Mutex<()>,
}

impl TokenVerifier {
    pub fn new(http: reqwest::Client, identity_base: String, dev_secret: Option<String>) -> Self {
        Self {
            http,
            identity_base,
            dev_secret,
            key: RwLock::new(None),
            refresh: tokio::sync::Mutex::new(()),
        }
    }

    /// Whether an RS256 public key is currently loaded.
    pub fn key_loaded(&self) -> bool {
        self.key.read().is_some()
    }

    /// Install a PEM-encoded RSA public key directly, bypassing the fetch.
    pub fn install_public_key(&self, pem: &str) -> Result<(), AppError> {
        let decoding = DecodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|e| AppError::config(format!("invalid RSA public key: {e}")))?;
        *self.key.write() = Some(Arc::new(decoding));
        Ok(())
    }

    /// Fetch the public key from the user service and cache it.
    ///
    /// Single-flight: callers queue on the refresh lock, and whoever enters
    /// after a successful fetch returns without a second request.
    pub async fn refresh_public_key(&self) -> Result<(), AppError> {
        let _guard = self.refresh.lock().await;
        if self.key.read().is_some() {
            return Ok(());
        }

        let url = format!("{}/api/public-key", self.identity_base);
        let response = self
            .http
            .get(url.as_str())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| AppError::upstream("user-service", e.to_string()))?;

        let body: PublicKeyResponse = response
            .json()
            .await
            .map_err(|e| AppError::upstream("user-service", e.to_string()))?;

        self.install_public_key(&body.public_key)?;
        info!("public key loaded from user service");
        Ok(())
    }

    /// Verify a bearer token and return its claims.
    ///
    /// RS256 against the loaded public key first; if no key is loaded a fetch
    /// is attempted before giving up on the asymmetric path. Any RS256
    /// failure falls through to the HS256 dev secret when insecure-fallback
    /// mode is on. The final error carries the underlying verification
    /// message, which the caller surfaces to the client.
    pub async fn verify(&self, token: &str) -> Result<UserClaims, AppError> {
        if !self.key_loaded() {
            if let Err(e) = self.refresh_public_key().await {
                warn!(error = %e, "public key fetch failed; continuing without RS256 key");
            }
        }

        let key = self.key.read().clone();
        let mut last_error: Option<jsonwebtoken::errors::Error> = None;

        if let Some(key) = key {
            match decode::<UserClaims>(token, &key, &Validation::new(Algorithm::RS256)) {
                Ok(data) => return Ok(data.claims),
                Err(e) => {
                    warn!(error = %e, "RS256 verification failed");
                    last_error = Some(e);
                }
            }
        }

        if let Some(secret) = &self.dev_secret {
            security::insecure_fallback_attempted();
            match decode::<UserClaims>(
                token,
                &DecodingKey::from_secret(secret.as_bytes()),
                &Validation::new(Algorithm::HS256),
            ) {
                Ok(data) => return Ok(data.claims),
                Err(e) => last_error = Some(e),
            }
        }

        Err(match last_error {
            Some(e) => AppError::unauthenticated(e.to_string()),
            None => AppError::unauthenticated("no verification key available"),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

    use super::TokenVerifier;
    use crate::auth::claims::UserClaims;
    use crate::config::auth::DEV_SECRET;

    const TEST_PUBLIC_PEM: &str = include_str!("../../tests/fixtures/test_rsa_public.pem");
    const TEST_PRIVATE_PEM: &str = include_str!("../../tests/fixtures/test_rsa_private.pem");

    fn claims() -> UserClaims {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as usize;
        UserClaims {
            id: 42,
            email: "owner@example.test".to_string(),
            name: "Owner".to_string(),
            role: "SELLER".to_string(),
            iat: Some(now),
            exp: now + 24 * 60 * 60,
        }
    }

    fn rs256_token(claims: &UserClaims) -> String {
        let key = EncodingKey::from_rsa_pem(TEST_PRIVATE_PEM.as_bytes()).unwrap();
        encode(&Header::new(Algorithm::RS256), claims, &key).unwrap()
    }

    fn dev_secret_token(claims: &UserClaims) -> String {
        let key = EncodingKey::from_secret(DEV_SECRET.as_bytes());
        encode(&Header::new(Algorithm::HS256), claims, &key).unwrap()
    }

    // Points at a closed port so lazy refresh fails fast instead of hanging.
    fn verifier(dev_secret: Option<String>) -> TokenVerifier {
        TokenVerifier::new(
            reqwest::Client::new(),
            "http://127.0.0.1:9".to_string(),
            dev_secret,
        )
    }

    #[tokio::test]
    async fn rs256_roundtrip_with_installed_key() {
        let verifier = verifier(None);
        verifier.install_public_key(TEST_PUBLIC_PEM).unwrap();

        let claims = claims();
        let verified = verifier.verify(&rs256_token(&claims)).await.unwrap();

        assert_eq!(verified.id, claims.id);
        assert_eq!(verified.email, claims.email);
        assert_eq!(verified.role, claims.role);
    }

    #[tokio::test]
    async fn dev_secret_accepted_when_fallback_enabled_and_no_key() {
        let verifier = verifier(Some(DEV_SECRET.to_string()));
        let verified = verifier.verify(&dev_secret_token(&claims())).await.unwrap();
        assert_eq!(verified.id, 42);
    }

    #[tokio::test]
    async fn dev_secret_accepted_even_when_rs256_key_rejects_it() {
        // The flagged weakness of fallback mode: a loaded public key that
        // rejects a token does not stop the HS256 branch from accepting it.
        let verifier = verifier(Some(DEV_SECRET.to_string()));
        verifier.install_public_key(TEST_PUBLIC_PEM).unwrap();

        let verified = verifier.verify(&dev_secret_token(&claims())).await.unwrap();
        assert_eq!(verified.email, "owner@example.test");
    }

    #[tokio::test]
    async fn fails_closed_without_fallback() {
        let verifier = verifier(None);
        let result = verifier.verify(&dev_secret_token(&claims())).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn rs256_rejects_garbage_and_reports_reason() {
        let verifier = verifier(None);
        verifier.install_public_key(TEST_PUBLIC_PEM).unwrap();

        let err = verifier.verify("not.a.token").await.unwrap_err();
        assert_eq!(
            err.status(),
            actix_web::http::StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn expired_token_rejected() {
        let verifier = verifier(None);
        verifier.install_public_key(TEST_PUBLIC_PEM).unwrap();

        let mut expired = claims();
        expired.exp = 1_000_000; // 1970
        let result = verifier.verify(&rs256_token(&expired)).await;
        assert!(result.is_err());
    }
}

use std::sync::Arc;

use crate::auth::verifier::TokenVerifier;
use crate::config::auth::AuthConfig;
use crate::config::upstreams::UpstreamConfig;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Shared HTTP client; connection pooling comes from reqwest itself.
    pub http: reqwest::Client,
    /// Backend service base URLs.
    pub upstreams: UpstreamConfig,
    /// Token verifier, including the cached public key.
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    /// Create a new AppState from resolved configuration.
    pub fn new(upstreams: UpstreamConfig, auth: AuthConfig) -> Self {
        let http = reqwest::Client::new();
        let verifier = Arc::new(TokenVerifier::new(
            http.clone(),
            upstreams.users.clone(),
            auth.dev_secret,
        ));
        Self {
            http,
            upstreams,
            verifier,
        }
    }
}

use crate::error::AppError;

/// Development signing secret, shared with the user service.
///
/// The user service signs HS256 tokens with this value when its RSA keypair
/// is missing. It is committed to both codebases and therefore public; any
/// token signed with it is forgeable.
pub const DEV_SECRET: &str = "dev-secret-key-123";

/// Opt-in flag for the insecure HS256 fallback.
pub const INSECURE_FALLBACK_ENV: &str = "GATEWAY_INSECURE_DEV_SECRET";

/// Token verification configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 fallback secret. `None` means fail closed when RS256 is
    /// unavailable or rejects a token.
    pub dev_secret: Option<String>,
}

impl AuthConfig {
    /// Read the configuration from the environment.
    ///
    /// The fallback is never on by default: it requires
    /// `GATEWAY_INSECURE_DEV_SECRET` set to `1` or `true`. Any other
    /// non-empty value is rejected rather than silently ignored.
    pub fn from_env() -> Result<Self, AppError> {
        let dev_secret = match std::env::var(INSECURE_FALLBACK_ENV) {
            Err(std::env::VarError::NotPresent) => None,
            Err(e) => return Err(e.into()),
            Ok(raw) => match raw.trim() {
                "" | "0" | "false" => None,
                "1" | "true" => Some(DEV_SECRET.to_string()),
                other => {
                    return Err(AppError::config(format!(
                        "{INSECURE_FALLBACK_ENV} must be 0/1/true/false, got {other:?}"
                    )))
                }
            },
        };

        Ok(Self { dev_secret })
    }

    /// Fail-closed configuration: RS256 only.
    pub fn strict() -> Self {
        Self { dev_secret: None }
    }

    /// Insecure-fallback configuration, as used by local development.
    pub fn with_dev_secret() -> Self {
        Self {
            dev_secret: Some(DEV_SECRET.to_string()),
        }
    }
}

use tracing::warn;

use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// Log a rejected authentication attempt.
pub fn auth_failed(reason: &str) {
    let trace_id = trace_ctx::current();

    warn!(
        event = "SECURITY_AUTH_FAILED",
        %trace_id,
        reason = %Redacted(reason),
        "Token verification failed"
    );
}

/// Log that the HS256 development-secret branch was reached.
///
/// Every hit is worth a warning: in fallback mode a token signed with the
/// publicly known secret will be accepted here.
pub fn insecure_fallback_attempted() {
    let trace_id = trace_ctx::current();

    warn!(
        event = "SECURITY_INSECURE_FALLBACK",
        %trace_id,
        "Verifying with the development secret"
    );
}

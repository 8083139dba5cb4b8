use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap()
});

// Base64-ish runs of 16+ chars; long enough to catch JWT segments.
static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\b[A-Za-z0-9+/_-]{16,}={0,2}\b").unwrap()
});

/// Mask emails and token-like runs before a string reaches the logs.
///
/// Emails keep the first character of the local part and the full domain.
/// Token-like runs are replaced wholesale.
pub fn redact(input: &str) -> String {
    let emails_masked = EMAIL.replace_all(input, |caps: &regex::Captures| {
        let matched = &caps[0];
        match matched.find('@') {
            Some(at) if at > 0 => format!("{}***{}", &matched[..1], &matched[at..]),
            _ => matched.to_string(),
        }
    });

    TOKEN.replace_all(&emails_masked, "[REDACTED]").to_string()
}

/// Wrapper that redacts on `Display`/`Debug`, for use in tracing fields.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", redact(self.0))
    }
}

use thiserror::Error;

/// Failure kinds surfaced by lookups and batch runs.
///
/// Per-subject failures (`InvalidInput`, `LookupFailed`) are skipped in
/// batch mode and fatal in single-subject mode. `Configuration` is
/// always fatal.
#[derive(Debug, Error)]
pub enum IntelError {
    /// Subject failed the strict format check before any network call.
    #[error("invalid subject {0:?}")]
    InvalidInput(String),

    /// The lookup service was unreachable, timed out, or returned an
    /// empty or unusable response.
    #[error("lookup failed for {subject}: {reason}")]
    LookupFailed { subject: String, reason: String },

    /// Missing input file or other unrecoverable setup problem.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl IntelError {
    pub fn lookup_failed(subject: &str, reason: impl ToString) -> Self {
        IntelError::LookupFailed {
            subject: subject.to_string(),
            reason: reason.to_string(),
        }
    }
}

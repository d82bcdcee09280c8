//! Error codes shared by every domain error.
//!
//! DESIGN
//! ======
//! Each error enum maps its variants to a stable, grepable `E_*` code. The
//! route layer logs the code next to the message before translating the error
//! into an HTTP body, so log searches never depend on message wording.

/// Trait implemented by all domain error types.
pub trait ErrorCode: std::fmt::Display {
    /// Stable identifier for log searches (e.g. `E_RESPONSE_JSON`).
    fn error_code(&self) -> &'static str;

    /// Whether an identical call could plausibly succeed later.
    ///
    /// Informational only: the service never retries on its own.
    fn retryable(&self) -> bool {
        false
    }
}

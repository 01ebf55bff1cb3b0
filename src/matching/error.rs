use thiserror::Error;

/// Errors returned by a matching strategy.
///
/// Only the oracle strategy can fail at query time; the instrumented matcher recovers every
/// variant into an empty, uncached result.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The remote ranking oracle could not be reached or refused the request.
    #[error("ranking oracle failed: {reason}")]
    Oracle { reason: String },

    /// Match options are unusable (e.g. `top_n` of zero where a positive count is required).
    #[error("invalid match options: {reason}")]
    InvalidOptions { reason: String },
}

/// Convenience result type for matching operations.
pub type MatchResult<T> = Result<T, MatchError>;

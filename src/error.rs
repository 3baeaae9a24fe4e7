//! Error types for countdown-pad
//!
//! The timer core itself never fails: out-of-range requests are silently
//! ignored. Errors only exist at the edges, where raw characters enter the
//! digit buffer and where the session mutex is shared with the ticker.

use thiserror::Error;

/// Errors surfaced at the boundaries of the timer core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CountdownError {
    /// A character that is not a decimal digit reached the keypad boundary
    #[error("Not a decimal digit: {0:?}")]
    InvalidDigit(char),

    /// A digit string longer than the keypad allows
    #[error("Digit input holds at most {max} digits, got {len}")]
    TooManyDigits { len: usize, max: usize },

    /// A session mutex was poisoned by a panicking holder
    #[error("Failed to lock {0}")]
    LockPoisoned(&'static str),
}

/// Standard Result type for countdown-pad operations
pub type Result<T> = std::result::Result<T, CountdownError>;

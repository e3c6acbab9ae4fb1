//! Error types for choreust.

/// Top-level error type for storage, configuration and command failures.
///
/// Recurrence expansion itself never fails; malformed rules are skipped there.
#[derive(Debug, thiserror::Error)]
pub enum ChoreError {
    /// I/O error while reading or writing the data files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Data file could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file is unreadable or invalid.
    #[error("config error: {0}")]
    Config(String),

    /// A date string was not `YYYY-MM-DD`.
    #[error("invalid date '{input}': {reason}. Use YYYY-MM-DD.")]
    InvalidDate { input: String, reason: String },

    /// A recurrence label could not be parsed.
    #[error("invalid recurrence: {0}")]
    InvalidRecurrence(String),

    /// A color was not a `#rrggbb` hex string.
    #[error("invalid color '{0}': expected #rrggbb")]
    InvalidColor(String),

    #[error("invalid status '{0}': expected pending, in-progress, completed or cancelled")]
    InvalidStatus(String),

    #[error("chore {0} not found")]
    ChoreNotFound(u64),

    #[error("team member {0} not found")]
    MemberNotFound(u64),

    /// Another team member already uses this email.
    #[error("a team member with email '{0}' already exists")]
    DuplicateEmail(String),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ChoreError>;

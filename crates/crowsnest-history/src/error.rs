/// Errors that can occur within the history layer.
///
/// Callers of [`crate::HistoryStore`] rarely see these: the store logs
/// durable-storage failures and carries on in memory. The type is public for
/// code driving the lower-level persistence helpers directly (e.g. the JSON
/// export).
///
/// # Examples
///
/// ```rust
/// use crowsnest_history::HistoryError;
///
/// let err = HistoryError::Other("history file locked".to_string());
/// assert!(err.to_string().contains("locked"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// An underlying SQLite error.
    #[error("History: SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// JSON serialization failure (history export).
    #[error("History: JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic history error for cases not covered by other variants.
    #[error("History: {0}")]
    Other(String),
}

/// Convenience `Result` alias for history operations.
pub type Result<T> = std::result::Result<T, HistoryError>;

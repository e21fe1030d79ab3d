/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when building characters or content.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A character must have a non-empty name.
    #[error("character name must not be empty")]
    EmptyName,

    /// Attribute values fell outside [1,5] or did not sum to 15.
    #[error("invalid attributes: {0}")]
    InvalidAttributes(String),

    /// A content-table lookup by name failed.
    #[error("unknown {table}: \"{name}\"")]
    UnknownContent {
        /// Which table was searched (e.g. "race", "class").
        table: &'static str,
        /// The name that did not match.
        name: String,
    },
}

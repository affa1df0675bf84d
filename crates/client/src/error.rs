use monynha_core::error::CoreError;

/// Error type for client operations.
///
/// Wraps [`CoreError`] for domain errors and adds store/config variants.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A domain-level error from `monynha_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Whether the store rejected a vote the user already cast.
    pub fn is_duplicate_vote(&self) -> bool {
        matches!(self, Self::Core(CoreError::DuplicateVote { .. }))
    }

    /// Whether the action needs a signed-in user.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Core(CoreError::Unauthenticated(_)))
    }
}

/// Convenience type alias for client return values.
pub type ClientResult<T> = Result<T, ClientError>;

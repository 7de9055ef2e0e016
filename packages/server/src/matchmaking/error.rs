use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    AlreadyDone(String),

    #[error("{0}")]
    Invalid(String),

    /// A ticket claimed for pairing changed under us; nothing was written.
    #[error("Tickets were claimed by a concurrent pairing attempt")]
    Contention,

    #[error("Database error: {0}")]
    Db(#[from] DbErr),
}

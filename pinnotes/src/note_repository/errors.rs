use thiserror::Error;
use crate::author_address::AuthorAddressParseError;
use crate::content_store::ContentStoreError;

#[derive(Debug, Error)]
pub enum NoteRepositoryError {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    #[error(transparent)]
    Store(#[from] ContentStoreError),

    #[error("failed to serialize note: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<AuthorAddressParseError> for NoteRepositoryError {
    fn from(_: AuthorAddressParseError) -> Self {
        NoteRepositoryError::InvalidInput("author address is empty")
    }
}

/// Why a pinned blob was left out of a scan. Never leaves the repository.
#[derive(Debug, Error)]
pub(super) enum ParseSkipped {
    #[error(transparent)]
    Fetch(#[from] ContentStoreError),

    #[error("not a note blob: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("note blob has an empty {0}")]
    EmptyField(&'static str),

    #[error("not a note blob (cached)")]
    CachedNotANote,
}

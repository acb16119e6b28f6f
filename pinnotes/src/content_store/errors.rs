use thiserror::Error;
use crate::data::Cid;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum ContentStoreError {
    #[error("content store is unavailable: {0}")]
    Unavailable(#[source] BoxError),

    #[error("failed to add content: {0}")]
    WriteFailed(String),

    #[error("failed to pin content: {0}")]
    PinFailed(String),

    #[error("content {0} not found")]
    NotFound(Cid),

    #[error("content {cid} is larger than {limit} bytes")]
    TooLarge {
        cid: Cid,
        limit: u64,
    },

    #[error("unexpected content store response: {0}")]
    Unexpected(String),
}

impl ContentStoreError {
    pub fn unavailable(e: impl Into<BoxError>) -> Self {
        ContentStoreError::Unavailable(e.into())
    }
}

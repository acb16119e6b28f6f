use async_trait::async_trait;
use crate::data::Note;

mod errors;
mod internal;

pub use errors::NoteRepositoryError;
pub use internal::{NoteRepositoryImpl, ProductionNoteRepository};

/// Stores notes as pinned blobs and finds them again by author.
///
/// The store's pinned set is the only source of truth: nothing written
/// through one repository instance is visible to reads unless it is still
/// pinned.
#[async_trait]
pub trait NoteRepository: Send + Sync + 'static {
    /// Adds and pins a note blob.
    ///
    /// A failed pin after a successful add is reported as
    /// [`ContentStoreError::PinFailed`](crate::content_store::ContentStoreError::PinFailed),
    /// the blob may still be reachable by its identifier until the store
    /// collects it.
    async fn submit(
        &self,
        text: &str,
        author_address: &str,
    ) -> Result<Note, NoteRepositoryError>;

    /// Scans everything pinned and returns the notes of one author,
    /// in no particular order.
    async fn list_by_author(
        &self,
        author_address: &str,
    ) -> Result<Vec<Note>, NoteRepositoryError>;
}

use async_trait::async_trait;
use futures::stream::BoxStream;
use crate::data::Cid;

mod errors;
mod ipfs;

pub use errors::{BoxError, ContentStoreError};
pub use ipfs::IpfsContentStore;

/// Lazy enumeration of pinned content identifiers.
///
/// An error item ends the enumeration.
pub type PinnedCids = BoxStream<'static, Result<Cid, ContentStoreError>>;

/// A content-addressed blob store.
///
/// Knows nothing about notes: blobs are opaque bytes named by the
/// identifier the store derives from them. Implementations are shared
/// between concurrent requests.
#[async_trait]
pub trait ContentStore: Send + Sync + 'static {
    /// Stores the bytes without pinning them.
    async fn put(&self, bytes: Vec<u8>) -> Result<Cid, ContentStoreError>;

    /// Pins an identifier. Pinning an already pinned one succeeds.
    async fn pin(&self, cid: &Cid) -> Result<(), ContentStoreError>;

    async fn get(&self, cid: &Cid) -> Result<Vec<u8>, ContentStoreError>;

    /// Fails with [`ContentStoreError::TooLarge`] if the blob is longer
    /// than `max_len`.
    async fn get_bounded(
        &self,
        cid: &Cid,
        max_len: u64,
    ) -> Result<Vec<u8>, ContentStoreError> {
        let bytes = self.get(cid).await?;
        if bytes.len() as u64 > max_len {
            return Err(ContentStoreError::TooLarge {
                cid: cid.clone(),
                limit: max_len,
            })
        }
        Ok(bytes)
    }

    /// Starts a fresh enumeration of everything pinned, in store order.
    async fn list_pinned(&self) -> Result<PinnedCids, ContentStoreError>;
}

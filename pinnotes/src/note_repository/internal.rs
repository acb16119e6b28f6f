use std::num::NonZeroUsize;
use std::str::FromStr;
use async_trait::async_trait;
use futures::{future, StreamExt, TryStreamExt};
use log::{debug, error, trace, warn};

use crate::author_address::AuthorAddress;
use crate::config::app_config::AppConfig;
use crate::content_store::{ContentStore, ContentStoreError, IpfsContentStore};
use crate::data::{Cid, Note};
use crate::note_repository::errors::{NoteRepositoryError, ParseSkipped};
use crate::note_repository::NoteRepository;
use crate::util::send_fut_lifetime_workaround;
use blob::NoteBlob;
use blob_cache::{BlobCache, CachedBlob};

mod blob;
mod blob_cache;

pub type ProductionNoteRepository = NoteRepositoryImpl<IpfsContentStore>;

pub struct NoteRepositoryImpl<S: ContentStore> {
    store: S,
    cache: BlobCache,
    scan_concurrency: NonZeroUsize,
    max_blob_size: u64,
}

impl ProductionNoteRepository {
    pub fn new(
        app_config: &AppConfig,
    ) -> Result<ProductionNoteRepository, reqwest::Error> {
        Ok(Self::with_store(IpfsContentStore::new(app_config)?, app_config))
    }
}

impl<S: ContentStore> NoteRepositoryImpl<S> {
    pub fn with_store(store: S, app_config: &AppConfig) -> NoteRepositoryImpl<S> {
        debug!(
            "creating note repository, scan concurrency {}, blob cache capacity {} ({} bytes)",
            app_config.scan_concurrency,
            app_config.blob_cache_capacity,
            app_config.blob_cache_max_bytes,
        );
        NoteRepositoryImpl {
            store,
            cache: BlobCache::new(
                app_config.blob_cache_capacity,
                app_config.blob_cache_max_bytes,
            ),
            scan_concurrency: app_config.scan_concurrency,
            max_blob_size: app_config.max_blob_size,
        }
    }

    async fn load_blob(&self, cid: &Cid) -> Result<NoteBlob, ParseSkipped> {
        match self.cache.get(cid).await {
            Some(CachedBlob::Note(blob)) => return Ok(blob),
            Some(CachedBlob::NotANote) => return Err(ParseSkipped::CachedNotANote),
            None => {},
        }

        // fetch failures may be transient and are not cached
        let bytes = self.store.get_bounded(cid, self.max_blob_size).await?;
        let decoded = NoteBlob::decode(&bytes);
        self.cache.insert(
            cid.clone(),
            match decoded {
                Ok(ref blob) => CachedBlob::Note(blob.clone()),
                Err(_) => CachedBlob::NotANote,
            },
        ).await;
        decoded
    }

    async fn scan_one(&self, cid: Cid) -> Option<(Cid, NoteBlob)> {
        match self.load_blob(&cid).await {
            Ok(blob) => Some((cid, blob)),
            Err(ParseSkipped::Fetch(e)) => {
                warn!("skipping pinned {cid}: {e}");
                None
            },
            Err(e) => {
                trace!("skipping pinned {cid}: {e}");
                None
            },
        }
    }
}

#[async_trait]
impl<S: ContentStore> NoteRepository for NoteRepositoryImpl<S> {
    async fn submit(
        &self,
        text: &str,
        author_address: &str,
    ) -> Result<Note, NoteRepositoryError> {
        if text.is_empty() {
            return Err(NoteRepositoryError::InvalidInput("note text is empty"))
        }
        let author_address = AuthorAddress::from_str(author_address)?;
        debug!("submitting a note of {} bytes by \"{author_address}\"", text.len());

        let blob = NoteBlob::new(text, author_address);
        let cid = self.store.put(blob.encode()?)
            .await
            .inspect_err(|e| error!(
                "failed to add a note by \"{}\": {e}",
                blob.metadata.user_address,
            ))?;
        self.store.pin(&cid)
            .await
            .inspect_err(|e| error!("note {cid} was added but not pinned: {e}"))?;
        debug!("note {cid} pinned");

        self.cache.insert(cid.clone(), CachedBlob::Note(blob.clone())).await;
        Ok(blob.into_note(cid))
    }

    async fn list_by_author(
        &self,
        author_address: &str,
    ) -> Result<Vec<Note>, NoteRepositoryError> {
        let author_address = AuthorAddress::from_str(author_address)?;
        debug!("listing notes by \"{author_address}\"");

        let pinned = self.store.list_pinned()
            .await
            .inspect_err(|e| error!("failed to list pinned content: {e}"))?;
        let author = &author_address;
        let notes: Vec<Note> = send_fut_lifetime_workaround(
            pinned
                .map(move |listed| async move {
                    let cid = listed?;
                    Ok::<_, ContentStoreError>(self.scan_one(cid).await)
                })
                .buffer_unordered(self.scan_concurrency.get())
                .try_filter_map(move |scanned| future::ready(Ok(
                    scanned
                        .filter(|(_, blob)| blob.is_authored_by(author))
                        .map(|(cid, blob)| blob.into_note(cid))
                )))
                .try_collect()
        )
            .await
            .inspect_err(|e| error!("pinned content listing broke off: {e}"))?;

        debug!("found {} notes by \"{author_address}\"", notes.len());
        Ok(notes)
    }
}

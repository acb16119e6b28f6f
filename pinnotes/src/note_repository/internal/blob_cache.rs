use std::num::NonZeroUsize;
use log::trace;
use lru::LruCache;
use tokio::sync::Mutex;
use crate::data::Cid;
use crate::note_repository::internal::blob::NoteBlob;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CachedBlob {
    Note(NoteBlob),
    NotANote,
}

impl CachedBlob {
    fn weight(&self) -> usize {
        match self {
            CachedBlob::Note(blob) => blob.text.len() + blob.metadata.user_address.len(),
            CachedBlob::NotANote => 0,
        }
    }
}

/// Parse outcomes of fetched blobs, keyed by content identifier.
///
/// An identifier always names the same bytes, so entries never go stale
/// and are only dropped on eviction. Whether an entry is still pinned is
/// not tracked here.
///
/// Bounded both by entry count and by the bytes of note text and address
/// held; the least recently used entries go first when either is exceeded.
pub struct BlobCache {
    entries: Option<Mutex<CacheEntries>>,
    max_bytes: usize,
}

struct CacheEntries {
    lru: LruCache<Cid, CachedBlob>,
    bytes: usize,
}

impl BlobCache {
    pub fn new(capacity: usize, max_bytes: usize) -> Self {
        BlobCache {
            entries: NonZeroUsize::new(capacity)
                .filter(|_| max_bytes > 0)
                .map(|capacity| Mutex::new(CacheEntries {
                    lru: LruCache::new(capacity),
                    bytes: 0,
                })),
            max_bytes,
        }
    }

    pub async fn get(&self, cid: &Cid) -> Option<CachedBlob> {
        self.entries.as_ref()?
            .lock().await
            .lru.get(cid)
            .cloned()
    }

    pub async fn insert(&self, cid: Cid, blob: CachedBlob) {
        let Some(ref entries) = self.entries else {
            return
        };
        let weight = blob.weight();
        if weight > self.max_bytes {
            trace!("{cid} is too large to cache ({weight} bytes)");
            return
        }
        let mut entries = entries.lock().await;
        // push hands back the replaced entry or the one evicted by count
        if let Some((_, old)) = entries.lru.push(cid, blob) {
            entries.bytes -= old.weight();
        }
        entries.bytes += weight;
        while entries.bytes > self.max_bytes {
            match entries.lru.pop_lru() {
                Some((_, old)) => entries.bytes -= old.weight(),
                None => break,
            }
        }
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        match self.entries {
            Some(ref entries) => entries.lock().await.lru.len(),
            None => 0,
        }
    }

    #[cfg(test)]
    pub async fn bytes(&self) -> usize {
        match self.entries {
            Some(ref entries) => entries.lock().await.bytes,
            None => 0,
        }
    }
}

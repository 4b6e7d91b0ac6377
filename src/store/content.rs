//! Content store: downloads attachment bodies by id with LRU caching.

use std::num::NonZeroUsize;

use lru::LruCache;
use tracing::debug;

use crate::client::HttpClient;
use crate::error::Result;
use crate::model::attachment::AttachmentId;

/// Default number of downloaded bodies to keep in the LRU cache.
pub const DEFAULT_CACHE_SIZE: usize = 16;

/// Downloads attachment content from the backend.
///
/// Keeps an LRU cache of raw bodies keyed by `(id, preview)` so that going
/// back and forth between the viewer and the grid, or saving what is on
/// screen, does not download the same bytes twice.
pub struct ContentStore {
    client: HttpClient,
    cache: LruCache<(AttachmentId, bool), Vec<u8>>,
}

impl ContentStore {
    pub fn new(client: HttpClient, cache_size: usize) -> Self {
        let cache_size = NonZeroUsize::new(cache_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            client,
            cache: LruCache::new(cache_size),
        }
    }

    /// Fetch the body of an attachment, or its preview rendition.
    /// Cached results are returned without a request.
    pub async fn get_content(&mut self, id: &AttachmentId, preview: bool) -> Result<Vec<u8>> {
        let key = (id.clone(), preview);
        if let Some(bytes) = self.cache.get(&key) {
            debug!(%id, preview, "Content cache hit");
            return Ok(bytes.clone());
        }
        let bytes = self.client.fetch_content(id, preview).await?;
        debug!(%id, preview, len = bytes.len(), "Downloaded attachment content");
        self.cache.put(key, bytes.clone());
        Ok(bytes)
    }

    /// Forget both cached renditions of `id` (after a delete).
    pub fn invalidate(&mut self, id: &AttachmentId) {
        self.cache.pop(&(id.clone(), false));
        self.cache.pop(&(id.clone(), true));
    }

    /// Number of cached bodies.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

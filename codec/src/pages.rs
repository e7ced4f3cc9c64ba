//! Texture-page access for block-composited sprites.
//!
//! [`TextureSource`] is what [`BlockDecoder`](crate::BlockDecoder) renders
//! from. [`CachedPages`] implements it on top of any [`PageLoader`] with a
//! bounded [`PageCache`] that can be shared between decoders.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};

use crate::bitmap::Bitmap;
use crate::error::{CodecError, CodecResult};
use crate::types::PageRect;

/// Supplies pixel rectangles from texture pages.
pub trait TextureSource {
    /// Returns the pixels of `rect` within `page`.
    fn read_block(&self, page: u32, rect: PageRect) -> CodecResult<Bitmap>;
}

/// Loads whole texture pages by id.
pub trait PageLoader {
    fn load_page(&self, page: u32) -> CodecResult<Bitmap>;
}

/// A texture source that has no pages; every request fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPages;

impl TextureSource for NoPages {
    fn read_block(&self, page: u32, _rect: PageRect) -> CodecResult<Bitmap> {
        Err(CodecError::ResourceNotFound {
            name: format!("page {page}"),
        })
    }
}

/// A capacity-bounded page cache with least-recently-requested eviction.
///
/// Lookups and inserts happen under one lock, so concurrent requests for the
/// same page load it once.
#[derive(Debug)]
pub struct PageCache {
    state: Mutex<CacheState>,
    capacity: NonZeroUsize,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: Vec<CacheEntry>,
    clock: u64,
}

#[derive(Debug)]
struct CacheEntry {
    page: u32,
    bitmap: Arc<Bitmap>,
    last_used: u64,
}

impl PageCache {
    /// Creates a cache holding at most `capacity` pages.
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: Vec::with_capacity(capacity.get()),
                clock: 0,
            }),
            capacity,
        }
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Number of cached pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `page` is cached. Does not count as a request.
    #[must_use]
    pub fn contains(&self, page: u32) -> bool {
        self.lock().entries.iter().any(|entry| entry.page == page)
    }

    /// Drops every cached page.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    /// Returns the cached page, or loads, caches and returns it.
    ///
    /// A failed load caches nothing. When full, the least recently requested
    /// page is evicted.
    pub fn get_or_insert_with<F>(&self, page: u32, load: F) -> CodecResult<Arc<Bitmap>>
    where
        F: FnOnce() -> CodecResult<Bitmap>,
    {
        let mut state = self.lock();
        state.clock += 1;
        let now = state.clock;

        if let Some(entry) = state.entries.iter_mut().find(|entry| entry.page == page) {
            entry.last_used = now;
            return Ok(Arc::clone(&entry.bitmap));
        }

        let bitmap = Arc::new(load()?);
        if state.entries.len() >= self.capacity.get() {
            if let Some(oldest) = state
                .entries
                .iter()
                .enumerate()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(index, _)| index)
            {
                state.entries.swap_remove(oldest);
            }
        }
        state.entries.push(CacheEntry {
            page,
            bitmap: Arc::clone(&bitmap),
            last_used: now,
        });
        Ok(bitmap)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A [`TextureSource`] backed by a page loader and a shared cache.
#[derive(Debug)]
pub struct CachedPages<L> {
    loader: L,
    cache: Arc<PageCache>,
}

impl<L: PageLoader> CachedPages<L> {
    /// Creates a source with its own cache of `capacity` pages.
    #[must_use]
    pub fn new(loader: L, capacity: NonZeroUsize) -> Self {
        Self::with_cache(loader, Arc::new(PageCache::new(capacity)))
    }

    /// Creates a source sharing an existing cache.
    #[must_use]
    pub const fn with_cache(loader: L, cache: Arc<PageCache>) -> Self {
        Self { loader, cache }
    }

    #[must_use]
    pub const fn cache(&self) -> &Arc<PageCache> {
        &self.cache
    }
}

impl<L: PageLoader> TextureSource for CachedPages<L> {
    fn read_block(&self, page: u32, rect: PageRect) -> CodecResult<Bitmap> {
        let bitmap = self
            .cache
            .get_or_insert_with(page, || self.loader.load_page(page))?;
        Ok(bitmap.crop(rect))
    }
}

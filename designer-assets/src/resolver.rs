//! File and data-URI image resolver.
//!
//! Implements [`AssetResolver`] for local files and inline data URIs. File
//! reads go through `tokio::fs` so the UI executor is never blocked. Decoded
//! dimensions are cached by source string.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use designer_core::{AssetResolver, CanvasResult, ResolvedAsset};

use crate::decode::{self, ImageInfo};
use image::ImageFormat;
use crate::error::{AssetError, AssetResult};
use crate::source::ImageSource;

/// Default number of cached sources.
pub const DEFAULT_CACHE_ENTRIES: usize = 256;

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
}

#[derive(Debug, Default)]
struct Cache {
    entries: HashMap<String, ImageInfo>,
    stats: CacheStats,
}

/// Resolves file paths, `file://` URLs and `data:` URIs to image dimensions.
#[derive(Debug)]
pub struct ImageResolver {
    base_dir: Option<PathBuf>,
    max_entries: usize,
    cache: RefCell<Cache>,
}

impl Default for ImageResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageResolver {
    /// Create a resolver that reads relative paths from the working directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_dir: None,
            max_entries: DEFAULT_CACHE_ENTRIES,
            cache: RefCell::new(Cache::default()),
        }
    }

    /// Resolve relative paths against `dir`.
    #[must_use]
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Cap the number of cached sources. Zero disables caching.
    #[must_use]
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Directory relative paths are resolved against.
    #[must_use]
    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    /// Cache hit/miss counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.cache.borrow().stats
    }

    /// Number of cached sources.
    #[must_use]
    pub fn cached_count(&self) -> usize {
        self.cache.borrow().entries.len()
    }

    /// Drop every cached entry.
    pub fn clear_cache(&self) {
        self.cache.borrow_mut().entries.clear();
    }

    /// Load and decode a source.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError`] if the source is unsupported, unreadable, or not
    /// an image.
    pub async fn load(&self, source: &str) -> AssetResult<ImageInfo> {
        let parsed = ImageSource::parse(source)?.relative_to(self.base_dir());

        if let Some(info) = self.cached(source) {
            return Ok(info);
        }

        let info = match &parsed {
            ImageSource::DataUri(uri) => decode::decode_data_uri(uri)?,
            ImageSource::File(path) => {
                let bytes = tokio::fs::read(path).await?;
                decode::decode_info(&bytes, ImageFormat::from_path(path).ok())?
            }
            ImageSource::Remote(url) => {
                return Err(AssetError::UnsupportedSource(format!(
                    "remote sources must be fetched by the host: {url}"
                )));
            }
        };

        tracing::debug!(
            "Decoded image {}x{} ({:?})",
            info.width,
            info.height,
            info.format
        );
        if parsed.is_cacheable() {
            self.store(source, info);
        }
        Ok(info)
    }

    fn cached(&self, source: &str) -> Option<ImageInfo> {
        let mut cache = self.cache.borrow_mut();
        let hit = cache.entries.get(source).copied();
        if hit.is_some() {
            cache.stats.hits += 1;
        } else {
            cache.stats.misses += 1;
        }
        hit
    }

    fn store(&self, source: &str, info: ImageInfo) {
        if self.max_entries == 0 {
            return;
        }
        let mut cache = self.cache.borrow_mut();
        if cache.entries.len() >= self.max_entries && !cache.entries.contains_key(source) {
            // no access order is tracked; start over rather than grow unbounded
            tracing::debug!("Image cache full ({} entries), clearing", cache.entries.len());
            cache.entries.clear();
        }
        cache.entries.insert(source.to_string(), info);
    }
}

#[async_trait(?Send)]
impl AssetResolver for ImageResolver {
    async fn resolve(&self, source: &str) -> CanvasResult<ResolvedAsset> {
        let info = self.load(source).await?;
        Ok(ResolvedAsset {
            source: source.to_string(),
            width: info.width,
            height: info.height,
        })
    }
}

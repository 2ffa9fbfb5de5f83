//! Asset resolution seam.
//!
//! Image sources arrive as opaque references from the upload collaborator.
//! A resolver turns them into dimensions the scene can place; the
//! `designer-assets` crate provides the concrete file and data-URI resolver.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::{CanvasError, CanvasResult};
use crate::geometry::Size;

/// A resolved image, ready for placement.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAsset {
    /// The source reference that was resolved.
    pub source: String,
    /// Natural width in pixels.
    pub width: u32,
    /// Natural height in pixels.
    pub height: u32,
}

impl ResolvedAsset {
    /// Natural size as scene units.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn natural_size(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }
}

/// Resolves image source references.
///
/// Resolution runs on the UI thread's executor, so futures need not be `Send`.
#[async_trait(?Send)]
pub trait AssetResolver {
    /// Fetch and decode enough of `source` to know its dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Resource`] if the source cannot be fetched or decoded.
    async fn resolve(&self, source: &str) -> CanvasResult<ResolvedAsset>;
}

/// Resolver backed by a fixed table, for hosts that already know dimensions.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    assets: HashMap<String, (u32, u32)>,
}

impl StaticResolver {
    /// Create an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source with its dimensions.
    #[must_use]
    pub fn with(mut self, source: impl Into<String>, width: u32, height: u32) -> Self {
        self.assets.insert(source.into(), (width, height));
        self
    }
}

#[async_trait(?Send)]
impl AssetResolver for StaticResolver {
    async fn resolve(&self, source: &str) -> CanvasResult<ResolvedAsset> {
        let (width, height) = self
            .assets
            .get(source)
            .copied()
            .ok_or_else(|| CanvasError::Resource(format!("unknown asset: {source}")))?;
        Ok(ResolvedAsset {
            source: source.to_string(),
            width,
            height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_resolver() {
        let resolver = StaticResolver::new().with("logo.png", 400, 100);
        let asset = resolver.resolve("logo.png").await.expect("known asset");
        assert_eq!(asset.natural_size(), Size::new(400.0, 100.0));

        let missing = resolver.resolve("missing.png").await;
        assert!(matches!(missing, Err(CanvasError::Resource(_))));
    }
}

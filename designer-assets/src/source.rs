//! Image source references.
//!
//! The upload collaborator hands over opaque strings. This module classifies
//! them before any I/O happens.

use std::path::{Path, PathBuf};

use crate::error::{AssetError, AssetResult};

/// A classified image source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Inline `data:` URI.
    DataUri(String),
    /// Local file, from a plain path or a `file://` URL.
    File(PathBuf),
    /// Network URL; classified so it can be rejected with a clear error.
    Remote(String),
}

impl ImageSource {
    /// Classify a source string.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::UnsupportedSource`] for an empty reference.
    pub fn parse(source: &str) -> AssetResult<Self> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(AssetError::UnsupportedSource("empty source".to_string()));
        }

        if trimmed.starts_with("data:") {
            return Ok(Self::DataUri(trimmed.to_string()));
        }
        if let Some(path) = trimmed.strip_prefix("file://") {
            // file://localhost/tmp/a.png and file:///tmp/a.png name the same file
            let path = path.strip_prefix("localhost").unwrap_or(path);
            return Ok(Self::File(PathBuf::from(path)));
        }
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("blob:") {
            return Ok(Self::Remote(trimmed.to_string()));
        }
        Ok(Self::File(PathBuf::from(trimmed)))
    }

    /// Resolve a relative file path against `base`. Other sources are unchanged.
    #[must_use]
    pub fn relative_to(self, base: Option<&Path>) -> Self {
        match (self, base) {
            (Self::File(path), Some(base)) if path.is_relative() => Self::File(base.join(path)),
            (other, _) => other,
        }
    }

    /// Whether this source can be cached by its string form.
    #[must_use]
    pub fn is_cacheable(&self) -> bool {
        !matches!(self, Self::Remote(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_classifies_sources() {
        assert!(matches!(
            ImageSource::parse("data:image/png;base64,AAAA"),
            Ok(ImageSource::DataUri(_))
        ));
        assert_eq!(
            ImageSource::parse("file:///tmp/logo.png").expect("valid"),
            ImageSource::File(PathBuf::from("/tmp/logo.png"))
        );
        assert_eq!(
            ImageSource::parse("file://localhost/tmp/logo.png").expect("valid"),
            ImageSource::File(PathBuf::from("/tmp/logo.png"))
        );
        assert_eq!(
            ImageSource::parse("  assets/logo.png ").expect("valid"),
            ImageSource::File(PathBuf::from("assets/logo.png"))
        );
        assert!(matches!(
            ImageSource::parse("HTTPS://cdn.example.com/a.png"),
            Ok(ImageSource::Remote(_))
        ));
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(
            ImageSource::parse("   "),
            Err(AssetError::UnsupportedSource(_))
        ));
    }

    #[test]
    fn test_relative_to_base() {
        let base = Path::new("/srv/uploads");
        let source = ImageSource::parse("a.png").expect("valid").relative_to(Some(base));
        assert_eq!(source, ImageSource::File(PathBuf::from("/srv/uploads/a.png")));

        let absolute = ImageSource::parse("/tmp/b.png")
            .expect("valid")
            .relative_to(Some(base));
        assert_eq!(absolute, ImageSource::File(PathBuf::from("/tmp/b.png")));
    }
}

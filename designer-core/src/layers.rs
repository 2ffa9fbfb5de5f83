//! Layer directory: the user-facing, top-first view of editable elements.

use serde::{Deserialize, Serialize};

use crate::element::{DesignElement, ElementId, ElementKind, DEFAULT_TEXT_CONTENT};
use crate::scene::Scene;
use crate::selection::Selection;

/// Fallback name for images whose source has no usable file name.
const IMAGE_FALLBACK_NAME: &str = "Image";

/// Element kind as shown in the layer list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// Text element.
    Text,
    /// Image element.
    Image,
}

/// One row of the layer list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerEntry {
    /// Element id.
    pub id: ElementId,
    /// Element kind.
    pub kind: LayerKind,
    /// Label shown to the user.
    pub display_name: String,
    /// Visibility flag.
    pub visible: bool,
    /// Lock flag.
    pub locked: bool,
    /// Whether this is the active element.
    pub is_active: bool,
}

impl LayerEntry {
    fn from_element(element: &DesignElement, active: Option<ElementId>) -> Self {
        let (kind, display_name) = match &element.kind {
            ElementKind::Text(text) => (LayerKind::Text, text_name(&text.content)),
            ElementKind::Image(image) => (LayerKind::Image, image_name(&image.source)),
        };
        Self {
            id: element.id,
            kind,
            display_name,
            visible: element.visible,
            locked: element.locked,
            is_active: active == Some(element.id),
        }
    }
}

fn text_name(content: &str) -> String {
    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or(DEFAULT_TEXT_CONTENT)
        .to_string()
}

fn image_name(source: &str) -> String {
    if source.starts_with("data:") {
        return IMAGE_FALLBACK_NAME.to_string();
    }
    let path = source.split(['?', '#']).next().unwrap_or_default();
    path.rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty())
        .map_or_else(|| IMAGE_FALLBACK_NAME.to_string(), str::to_string)
}

/// Derive the layer list, topmost first, excluding guides.
#[must_use]
pub fn layers(scene: &Scene, selection: &Selection) -> Vec<LayerEntry> {
    let active = selection.active();
    scene
        .elements()
        .rev()
        .map(|element| LayerEntry::from_element(element, active))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ImageStyle, TextStyle};
    use crate::geometry::Size;

    #[test]
    fn test_layers_are_top_first_with_active_flag() {
        let mut scene = Scene::new(800.0, 600.0);
        let bottom = scene.insert(DesignElement::text(
            "Bottom",
            TextStyle::default(),
            Size::new(1.0, 1.0),
        ));
        let top = scene.insert(DesignElement::image(
            "uploads/logo.png",
            ImageStyle::default(),
            Size::new(1.0, 1.0),
        ));
        let mut selection = Selection::new();
        selection.select_only(bottom);

        let entries = layers(&scene, &selection);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, top);
        assert_eq!(entries[0].kind, LayerKind::Image);
        assert_eq!(entries[0].display_name, "logo.png");
        assert!(!entries[0].is_active);
        assert_eq!(entries[1].display_name, "Bottom");
        assert!(entries[1].is_active);
    }

    #[test]
    fn test_text_name_uses_first_line() {
        assert_eq!(text_name("Hello\nWorld"), "Hello");
        assert_eq!(text_name("  Hi  "), "Hi");
    }

    #[test]
    fn test_text_name_skips_blank_lines() {
        assert_eq!(text_name("\nHello"), "Hello");
        assert_eq!(text_name("\n   \n\tSecond\nThird"), "Second");
        assert_eq!(text_name(""), DEFAULT_TEXT_CONTENT);
        assert_eq!(text_name("\n \n"), DEFAULT_TEXT_CONTENT);
    }

    #[test]
    fn test_image_name_variants() {
        assert_eq!(image_name("https://cdn.test/a/b/shirt.jpg?v=2"), "shirt.jpg");
        assert_eq!(image_name("C:\\art\\logo.png"), "logo.png");
        assert_eq!(image_name("data:image/png;base64,AAAA"), "Image");
        assert_eq!(image_name("https://cdn.test/"), "Image");
    }
}

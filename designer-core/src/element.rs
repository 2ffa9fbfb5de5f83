//! Design elements - the editable text and image items of a scene.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{normalize_degrees, Point, Rect, Size};

/// Placeholder content used when text is added with blank content.
pub const DEFAULT_TEXT_CONTENT: &str = "New Text";

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse an element ID from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Horizontal text alignment within the text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Left aligned.
    Left,
    /// Centered.
    #[default]
    Center,
    /// Right aligned.
    Right,
    /// Justified.
    Justify,
}

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Normal,
    /// Bold weight.
    Bold,
}

/// Font style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    /// Upright.
    #[default]
    Normal,
    /// Italic.
    Italic,
}

/// Text outline. Only rendered while the outline is enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Outline color.
    pub color: String,
    /// Outline width in scene units.
    pub width: f32,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            color: "#000000".to_string(),
            width: 1.0,
        }
    }
}

/// Drop shadow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    /// Shadow color (any CSS color string).
    pub color: String,
    /// Blur radius.
    pub blur: f32,
    /// Horizontal offset.
    pub offset_x: f32,
    /// Vertical offset.
    pub offset_y: f32,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            color: "rgba(0,0,0,0.3)".to_string(),
            blur: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

/// Visual style of a text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct TextStyle {
    /// Font family name.
    pub font_family: String,
    /// Font size in scene units.
    pub font_size: f32,
    /// Fill color.
    pub fill: String,
    /// Alignment.
    pub align: TextAlign,
    /// Weight.
    pub weight: FontWeight,
    /// Style.
    pub style: FontStyle,
    /// Underline flag.
    pub underline: bool,
    /// Letter spacing in 1/1000 em.
    pub letter_spacing: f32,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
    /// Stored outline color and width.
    pub stroke: Stroke,
    /// Whether the outline is rendered.
    pub outline_enabled: bool,
    /// Drop shadow, if any.
    pub shadow: Option<Shadow>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Inter".to_string(),
            font_size: 40.0,
            fill: "#000000".to_string(),
            align: TextAlign::Center,
            weight: FontWeight::Normal,
            style: FontStyle::Normal,
            underline: false,
            letter_spacing: 0.0,
            line_height: 1.16,
            stroke: Stroke::default(),
            outline_enabled: false,
            shadow: None,
        }
    }
}

impl TextStyle {
    /// Stroke width as rendered: zero while the outline is disabled.
    #[must_use]
    pub fn rendered_stroke_width(&self) -> f32 {
        if self.outline_enabled {
            self.stroke.width
        } else {
            0.0
        }
    }
}

/// Placement options for an image element.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageStyle {
    /// Mirror horizontally.
    pub flip_x: bool,
    /// Mirror vertically.
    pub flip_y: bool,
}

/// Content of a text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    /// The text itself.
    pub content: String,
    /// Visual style.
    pub style: TextStyle,
}

/// Content of an image element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageContent {
    /// Source reference as supplied by the upload collaborator.
    pub source: String,
    /// Flip flags.
    pub style: ImageStyle,
}

/// The type of content an element contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ElementKind {
    /// Editable text.
    Text(TextContent),
    /// A placed image.
    Image(ImageContent),
}

impl ElementKind {
    /// Check whether two kinds are the same variant.
    #[must_use]
    pub fn same_variant(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Text(_), Self::Text(_)) | (Self::Image(_), Self::Image(_))
        )
    }
}

/// Center-anchored placement of an element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Center point in scene coordinates.
    pub center: Point,
    /// Rotation in degrees, kept in `[0, 360)`.
    pub angle: f32,
    /// Horizontal scale factor.
    pub scale_x: f32,
    /// Vertical scale factor.
    pub scale_y: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            center: Point::default(),
            angle: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl Transform {
    /// Return a copy with the angle set and normalized.
    #[must_use]
    pub fn with_angle(mut self, degrees: f32) -> Self {
        self.angle = normalize_degrees(degrees);
        self
    }
}

/// Clip region applied to an element's rendered content.
///
/// Expressed in scene coordinates so pan and zoom never perturb it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipRegion {
    /// The visible rectangle.
    pub rect: Rect,
}

/// A single editable text or image item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignElement {
    /// Unique identifier.
    pub id: ElementId,
    /// Element content.
    pub kind: ElementKind,
    /// Position, rotation and scale.
    pub transform: Transform,
    /// Unscaled width and height.
    pub natural_size: Size,
    /// Whether the element is drawn.
    pub visible: bool,
    /// Whether interaction may change the geometry.
    pub locked: bool,
    /// Clip region, synced from the print area.
    pub clip: Option<ClipRegion>,
}

impl DesignElement {
    /// Create a new element with the given kind and natural size.
    #[must_use]
    pub fn new(kind: ElementKind, natural_size: Size) -> Self {
        Self {
            id: ElementId::new(),
            kind,
            transform: Transform::default(),
            natural_size,
            visible: true,
            locked: false,
            clip: None,
        }
    }

    /// Create a text element.
    #[must_use]
    pub fn text(content: impl Into<String>, style: TextStyle, natural_size: Size) -> Self {
        Self::new(
            ElementKind::Text(TextContent {
                content: content.into(),
                style,
            }),
            natural_size,
        )
    }

    /// Create an image element.
    #[must_use]
    pub fn image(source: impl Into<String>, style: ImageStyle, natural_size: Size) -> Self {
        Self::new(
            ElementKind::Image(ImageContent {
                source: source.into(),
                style,
            }),
            natural_size,
        )
    }

    /// Set the transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Size after applying the scale factors, before rotation.
    #[must_use]
    pub fn scaled_size(&self) -> Size {
        Size::new(
            self.natural_size.width * self.transform.scale_x.abs(),
            self.natural_size.height * self.transform.scale_y.abs(),
        )
    }

    /// The four corners after scale and rotation, clockwise from top-left.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        let size = self.scaled_size();
        let c = self.transform.center;
        let hw = size.width / 2.0;
        let hh = size.height / 2.0;
        [
            Point::new(c.x - hw, c.y - hh),
            Point::new(c.x + hw, c.y - hh),
            Point::new(c.x + hw, c.y + hh),
            Point::new(c.x - hw, c.y + hh),
        ]
        .map(|p| p.rotate_around(c, self.transform.angle))
    }

    /// Axis-aligned bounding box in scene coordinates.
    #[must_use]
    pub fn bounding_box(&self) -> Rect {
        let size = self.scaled_size();
        let (sin, cos) = self.transform.angle.to_radians().sin_cos();
        let width = (size.width * cos).abs() + (size.height * sin).abs();
        let height = (size.width * sin).abs() + (size.height * cos).abs();
        Rect::from_center(self.transform.center, Size::new(width, height))
    }

    /// Map a scene point into the element's unrotated frame, relative to its center.
    #[must_use]
    pub fn to_local(&self, p: Point) -> Point {
        let c = self.transform.center;
        p.rotate_around(c, -self.transform.angle) - c
    }

    /// Check if a scene point is within the rotated element.
    #[must_use]
    pub fn contains_point(&self, p: Point) -> bool {
        let local = self.to_local(p);
        let size = self.scaled_size();
        local.x.abs() <= size.width / 2.0 && local.y.abs() <= size.height / 2.0
    }

    /// Text content, if this is a text element.
    #[must_use]
    pub fn as_text(&self) -> Option<&TextContent> {
        match &self.kind {
            ElementKind::Text(text) => Some(text),
            ElementKind::Image(_) => None,
        }
    }

    /// Image content, if this is an image element.
    #[must_use]
    pub fn as_image(&self) -> Option<&ImageContent> {
        match &self.kind {
            ElementKind::Image(image) => Some(image),
            ElementKind::Text(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_text() -> DesignElement {
        DesignElement::text("Hello", TextStyle::default(), Size::new(100.0, 40.0)).with_transform(
            Transform {
                center: Point::new(200.0, 200.0),
                ..Transform::default()
            },
        )
    }

    #[test]
    fn test_element_ids_are_unique() {
        assert_ne!(ElementId::new(), ElementId::new());
    }

    #[test]
    fn test_element_id_parse_roundtrip() {
        let id = ElementId::new();
        let parsed = ElementId::parse(&id.to_string()).expect("valid uuid");
        assert_eq!(id, parsed);
        assert!(ElementId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn test_bounding_box_unrotated() {
        let element = sample_text();
        let bbox = element.bounding_box();
        assert_eq!(bbox, Rect::new(150.0, 180.0, 100.0, 40.0));
    }

    #[test]
    fn test_bounding_box_quarter_turn_swaps_axes() {
        let mut element = sample_text();
        element.transform.angle = 90.0;
        let bbox = element.bounding_box();
        assert!((bbox.width - 40.0).abs() < 1e-3);
        assert!((bbox.height - 100.0).abs() < 1e-3);
        assert_eq!(bbox.center(), element.transform.center);
    }

    #[test]
    fn test_scale_keeps_center_anchor() {
        let mut element = sample_text();
        element.transform.scale_x = 2.0;
        element.transform.scale_y = 0.5;
        let bbox = element.bounding_box();
        assert_eq!(bbox.center(), Point::new(200.0, 200.0));
        assert!((bbox.width - 200.0).abs() < f32::EPSILON);
        assert!((bbox.height - 20.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_contains_point_respects_rotation() {
        let mut element = sample_text();
        // 100 wide, 40 tall: (240, 200) is inside unrotated
        assert!(element.contains_point(Point::new(240.0, 200.0)));
        element.transform.angle = 90.0;
        // now 40 wide, 100 tall
        assert!(!element.contains_point(Point::new(240.0, 200.0)));
        assert!(element.contains_point(Point::new(200.0, 240.0)));
    }

    #[test]
    fn test_rendered_stroke_width_follows_outline_flag() {
        let mut style = TextStyle::default();
        style.stroke.width = 4.0;
        assert!(style.rendered_stroke_width().abs() < f32::EPSILON);
        style.outline_enabled = true;
        assert!((style.rendered_stroke_width() - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_with_angle_normalizes() {
        let t = Transform::default().with_angle(-30.0);
        assert!((t.angle - 330.0).abs() < 1e-4);
    }

    #[test]
    fn test_kind_accessors() {
        let text = sample_text();
        assert!(text.as_text().is_some());
        assert!(text.as_image().is_none());

        let image = DesignElement::image("logo.png", ImageStyle::default(), Size::new(10.0, 10.0));
        assert!(image.as_image().is_some());
        assert!(!image.kind.same_variant(&text.kind));
    }
}

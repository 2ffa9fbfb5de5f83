//! Property edits and their translation into scene commands.
//!
//! Panels send a typed [`Property`] (or a loosely typed key/value pair parsed
//! with [`Property::parse`]). [`plan_update`] turns it into the commands that
//! realize it, including text re-measurement and clip re-sync.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clip::ClipManager;
use crate::command::Command;
use crate::element::{
    DesignElement, ElementKind, FontStyle, FontWeight, ImageContent, Shadow, TextAlign,
    TextContent, Transform,
};
use crate::error::{CanvasError, CanvasResult};
use crate::geometry::{normalize_degrees, Point, Size};
use crate::measure::TextMeasurer;

/// A single property edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "key", content = "value")]
pub enum Property {
    /// Text content.
    Content(String),
    /// Font family.
    FontFamily(String),
    /// Font size.
    FontSize(f32),
    /// Fill color.
    Fill(String),
    /// Text alignment.
    TextAlign(TextAlign),
    /// Font weight.
    FontWeight(FontWeight),
    /// Font style.
    FontStyle(FontStyle),
    /// Underline flag.
    Underline(bool),
    /// Letter spacing in 1/1000 em.
    LetterSpacing(f32),
    /// Line height multiple.
    LineHeight(f32),
    /// Outline color.
    Stroke(String),
    /// Outline width.
    StrokeWidth(f32),
    /// Whether the outline is rendered.
    OutlineEnabled(bool),
    /// Drop shadow; `None` clears it.
    Shadow(Option<Shadow>),
    /// Mirror an image horizontally.
    FlipX(bool),
    /// Mirror an image vertically.
    FlipY(bool),
    /// Displayed width in pixels; becomes `scale_x`.
    Width(f32),
    /// Displayed height in pixels; becomes `scale_y`.
    Height(f32),
    /// Horizontal scale factor.
    ScaleX(f32),
    /// Vertical scale factor.
    ScaleY(f32),
    /// Rotation in degrees.
    Angle(f32),
    /// Center point in scene coordinates.
    Position(Point),
    /// Visibility flag.
    Visible(bool),
    /// Lock flag.
    Locked(bool),
}

/// Shadow as sent by panels, with camelCase keys and optional fields.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ShadowSpec {
    color: String,
    blur: f32,
    offset_x: f32,
    offset_y: f32,
}

impl Default for ShadowSpec {
    fn default() -> Self {
        let shadow = Shadow::default();
        Self {
            color: shadow.color,
            blur: shadow.blur,
            offset_x: shadow.offset_x,
            offset_y: shadow.offset_y,
        }
    }
}

impl From<ShadowSpec> for Shadow {
    fn from(spec: ShadowSpec) -> Self {
        Self {
            color: spec.color,
            blur: spec.blur,
            offset_x: spec.offset_x,
            offset_y: spec.offset_y,
        }
    }
}

fn value_of<T: DeserializeOwned>(key: &str, value: &Value) -> CanvasResult<T> {
    T::deserialize(value).map_err(|e| CanvasError::InvalidProperty {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

impl Property {
    /// Parse a panel-style key/value pair.
    ///
    /// Keys follow the panel vocabulary (`text`, `fontSize`, `charSpacing`,
    /// `shadow`, `flipX`, `angle`, ...). The result is validated.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidProperty`] for unknown keys, values of the
    /// wrong type, and out-of-range numbers.
    pub fn parse(key: &str, value: &Value) -> CanvasResult<Self> {
        let property = match key {
            "text" | "content" => Self::Content(value_of(key, value)?),
            "fontFamily" => Self::FontFamily(value_of(key, value)?),
            "fontSize" => Self::FontSize(value_of(key, value)?),
            "fill" => Self::Fill(value_of(key, value)?),
            "textAlign" => Self::TextAlign(value_of(key, value)?),
            "fontWeight" => Self::FontWeight(value_of(key, value)?),
            "fontStyle" => Self::FontStyle(value_of(key, value)?),
            "underline" => Self::Underline(value_of(key, value)?),
            "charSpacing" | "letterSpacing" => Self::LetterSpacing(value_of(key, value)?),
            "lineHeight" => Self::LineHeight(value_of(key, value)?),
            "stroke" => Self::Stroke(value_of(key, value)?),
            "strokeWidth" => Self::StrokeWidth(value_of(key, value)?),
            "outlineEnabled" => Self::OutlineEnabled(value_of(key, value)?),
            "shadow" => {
                let spec: Option<ShadowSpec> = value_of(key, value)?;
                Self::Shadow(spec.map(Shadow::from))
            }
            "flipX" => Self::FlipX(value_of(key, value)?),
            "flipY" => Self::FlipY(value_of(key, value)?),
            "width" => Self::Width(value_of(key, value)?),
            "height" => Self::Height(value_of(key, value)?),
            "scaleX" => Self::ScaleX(value_of(key, value)?),
            "scaleY" => Self::ScaleY(value_of(key, value)?),
            "angle" => Self::Angle(value_of(key, value)?),
            "position" => Self::Position(value_of(key, value)?),
            "visible" => Self::Visible(value_of(key, value)?),
            "locked" => Self::Locked(value_of(key, value)?),
            _ => {
                return Err(CanvasError::InvalidProperty {
                    key: key.to_string(),
                    reason: "unknown property".to_string(),
                })
            }
        };
        property.validate()?;
        Ok(property)
    }

    /// Short name used in logs and errors.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Content(_) => "content",
            Self::FontFamily(_) => "fontFamily",
            Self::FontSize(_) => "fontSize",
            Self::Fill(_) => "fill",
            Self::TextAlign(_) => "textAlign",
            Self::FontWeight(_) => "fontWeight",
            Self::FontStyle(_) => "fontStyle",
            Self::Underline(_) => "underline",
            Self::LetterSpacing(_) => "charSpacing",
            Self::LineHeight(_) => "lineHeight",
            Self::Stroke(_) => "stroke",
            Self::StrokeWidth(_) => "strokeWidth",
            Self::OutlineEnabled(_) => "outlineEnabled",
            Self::Shadow(_) => "shadow",
            Self::FlipX(_) => "flipX",
            Self::FlipY(_) => "flipY",
            Self::Width(_) => "width",
            Self::Height(_) => "height",
            Self::ScaleX(_) => "scaleX",
            Self::ScaleY(_) => "scaleY",
            Self::Angle(_) => "angle",
            Self::Position(_) => "position",
            Self::Visible(_) => "visible",
            Self::Locked(_) => "locked",
        }
    }

    /// Reject non-finite numbers and sizes that cannot be rendered.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidProperty`] describing the bad value.
    pub fn validate(&self) -> CanvasResult<()> {
        let invalid = |reason: &str| CanvasError::InvalidProperty {
            key: self.key().to_string(),
            reason: reason.to_string(),
        };
        match self {
            Self::FontSize(v) | Self::LineHeight(v) | Self::Width(v) | Self::Height(v) => {
                if !(v.is_finite() && *v > 0.0) {
                    return Err(invalid("must be a positive number"));
                }
            }
            Self::StrokeWidth(v) => {
                if !(v.is_finite() && *v >= 0.0) {
                    return Err(invalid("must be a non-negative number"));
                }
            }
            Self::ScaleX(v) | Self::ScaleY(v) => {
                if !(v.is_finite() && v.abs() > f32::EPSILON) {
                    return Err(invalid("must be a non-zero number"));
                }
            }
            Self::LetterSpacing(v) | Self::Angle(v) => {
                if !v.is_finite() {
                    return Err(invalid("must be a finite number"));
                }
            }
            Self::Position(p) => {
                if !(p.x.is_finite() && p.y.is_finite()) {
                    return Err(invalid("must be a finite point"));
                }
            }
            Self::Shadow(Some(shadow)) => {
                if !(shadow.blur.is_finite() && shadow.blur >= 0.0) {
                    return Err(invalid("blur must be a non-negative number"));
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Whether the edit changes the measured size of text.
    #[must_use]
    pub fn affects_text_metrics(&self) -> bool {
        matches!(
            self,
            Self::Content(_)
                | Self::FontFamily(_)
                | Self::FontSize(_)
                | Self::FontWeight(_)
                | Self::FontStyle(_)
                | Self::LetterSpacing(_)
                | Self::LineHeight(_)
                | Self::StrokeWidth(_)
                | Self::OutlineEnabled(_)
        )
    }
}

/// Apply a text-only property to text content. Returns `false` for other keys.
fn apply_text(text: &mut TextContent, property: &Property) -> bool {
    let style = &mut text.style;
    match property {
        Property::Content(content) => text.content.clone_from(content),
        Property::FontFamily(family) => style.font_family.clone_from(family),
        Property::FontSize(size) => style.font_size = *size,
        Property::Fill(fill) => style.fill.clone_from(fill),
        Property::TextAlign(align) => style.align = *align,
        Property::FontWeight(weight) => style.weight = *weight,
        Property::FontStyle(font_style) => style.style = *font_style,
        Property::Underline(underline) => style.underline = *underline,
        Property::LetterSpacing(spacing) => style.letter_spacing = *spacing,
        Property::LineHeight(height) => style.line_height = *height,
        Property::Stroke(color) => style.stroke.color.clone_from(color),
        Property::StrokeWidth(width) => style.stroke.width = *width,
        Property::OutlineEnabled(enabled) => style.outline_enabled = *enabled,
        Property::Shadow(shadow) => style.shadow.clone_from(shadow),
        _ => return false,
    }
    true
}

/// Apply an image-only property to image content. Returns `false` for other keys.
fn apply_image(image: &mut ImageContent, property: &Property) -> bool {
    match property {
        Property::FlipX(flip) => image.style.flip_x = *flip,
        Property::FlipY(flip) => image.style.flip_y = *flip,
        _ => return false,
    }
    true
}

/// Apply a geometry property. Returns `None` for non-geometry keys.
fn apply_geometry(element: &DesignElement, property: &Property) -> Option<Transform> {
    let mut transform = element.transform;
    let natural = element.natural_size;
    match property {
        Property::Width(px) if natural.width > 0.0 => transform.scale_x = px / natural.width,
        Property::Height(px) if natural.height > 0.0 => transform.scale_y = px / natural.height,
        Property::ScaleX(scale) => transform.scale_x = *scale,
        Property::ScaleY(scale) => transform.scale_y = *scale,
        Property::Angle(degrees) => transform.angle = normalize_degrees(*degrees),
        Property::Position(center) => transform.center = *center,
        _ => return None,
    }
    Some(transform)
}

/// Translate a property edit into commands for `element`.
///
/// Returns an empty list when the property does not apply to the element's
/// kind. Text metric changes emit a natural-size update; every geometry
/// change re-syncs the clip region.
#[must_use]
pub fn plan_update(
    element: &DesignElement,
    property: &Property,
    measurer: &dyn TextMeasurer,
    clip: &ClipManager,
) -> Vec<Command> {
    let id = element.id;
    let mut commands = Vec::new();
    let mut geometry_changed = false;

    match property {
        Property::Visible(visible) => commands.push(Command::SetFlags {
            id,
            visible: *visible,
            locked: element.locked,
        }),
        Property::Locked(locked) => commands.push(Command::SetFlags {
            id,
            visible: element.visible,
            locked: *locked,
        }),
        _ => {
            if let Some(transform) = apply_geometry(element, property) {
                commands.push(Command::SetTransform { id, transform });
                geometry_changed = true;
            } else {
                let mut kind = element.kind.clone();
                let applied = match &mut kind {
                    ElementKind::Text(text) => apply_text(text, property),
                    ElementKind::Image(image) => apply_image(image, property),
                };
                if !applied {
                    return commands;
                }
                if let ElementKind::Text(text) = &kind {
                    if property.affects_text_metrics() {
                        let size: Size = measurer.measure(&text.content, &text.style);
                        if size != element.natural_size {
                            commands.push(Command::SetNaturalSize { id, size });
                            geometry_changed = true;
                        }
                    }
                }
                commands.insert(0, Command::SetStyle { id, kind });
            }
        }
    }

    if geometry_changed {
        commands.push(Command::SetClip {
            id,
            clip: clip.region(),
        });
    }
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::PrintArea;
    use crate::element::{ImageStyle, TextStyle};
    use crate::measure::HeuristicMeasurer;
    use crate::scene::Scene;
    use serde_json::json;

    fn text_element() -> DesignElement {
        let style = TextStyle::default();
        let size = HeuristicMeasurer::default().measure("Hello", &style);
        DesignElement::text("Hello", style, size)
    }

    fn apply_all(element: &DesignElement, property: &Property) -> DesignElement {
        let mut scene = Scene::new(800.0, 600.0);
        let id = scene.insert(element.clone());
        let mut clip = ClipManager::new();
        clip.update(&PrintArea::new(Point::new(400.0, 300.0), 200.0, 200.0));
        for command in plan_update(element, property, &HeuristicMeasurer::default(), &clip) {
            assert!(command.apply(&mut scene));
        }
        scene.get(id).cloned().expect("element still present")
    }

    #[test]
    fn test_parse_panel_keys() {
        assert_eq!(
            Property::parse("fontSize", &json!(24)).expect("valid"),
            Property::FontSize(24.0)
        );
        assert_eq!(
            Property::parse("charSpacing", &json!(-50)).expect("valid"),
            Property::LetterSpacing(-50.0)
        );
        assert_eq!(
            Property::parse("textAlign", &json!("right")).expect("valid"),
            Property::TextAlign(TextAlign::Right)
        );
        assert_eq!(
            Property::parse("shadow", &Value::Null).expect("valid"),
            Property::Shadow(None)
        );
    }

    #[test]
    fn test_parse_shadow_defaults_color() {
        let property = Property::parse("shadow", &json!({ "blur": 5, "offsetX": 2 })).expect("valid");
        let Property::Shadow(Some(shadow)) = property else {
            panic!("expected a shadow");
        };
        assert_eq!(shadow.color, "rgba(0,0,0,0.3)");
        assert!((shadow.offset_x - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        assert!(matches!(
            Property::parse("fontSize", &json!("big")),
            Err(CanvasError::InvalidProperty { .. })
        ));
        assert!(matches!(
            Property::parse("fontSize", &json!(0)),
            Err(CanvasError::InvalidProperty { .. })
        ));
        assert!(matches!(
            Property::parse("sparkle", &json!(true)),
            Err(CanvasError::InvalidProperty { .. })
        ));
    }

    #[test]
    fn test_content_change_remeasures() {
        let element = text_element();
        let updated = apply_all(&element, &Property::Content("Hello, world".to_string()));
        assert!(updated.natural_size.width > element.natural_size.width);
        assert_eq!(updated.as_text().map(|t| t.content.as_str()), Some("Hello, world"));
        assert!(updated.clip.is_some());
    }

    #[test]
    fn test_fill_does_not_remeasure() {
        let element = text_element();
        let commands = plan_update(
            &element,
            &Property::Fill("#ff0000".to_string()),
            &HeuristicMeasurer::default(),
            &ClipManager::new(),
        );
        assert_eq!(commands.len(), 1);
        assert!(matches!(commands[0], Command::SetStyle { .. }));
    }

    #[test]
    fn test_width_becomes_scale() {
        let element = DesignElement::image("a.png", ImageStyle::default(), Size::new(200.0, 100.0));
        let updated = apply_all(&element, &Property::Width(50.0));
        assert!((updated.transform.scale_x - 0.25).abs() < f32::EPSILON);
        assert!((updated.transform.scale_y - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_angle_normalized() {
        let updated = apply_all(&text_element(), &Property::Angle(-45.0));
        assert!((updated.transform.angle - 315.0).abs() < 1e-4);
    }

    #[test]
    fn test_kind_mismatch_is_empty_plan() {
        let image = DesignElement::image("a.png", ImageStyle::default(), Size::new(1.0, 1.0));
        let commands = plan_update(
            &image,
            &Property::FontSize(12.0),
            &HeuristicMeasurer::default(),
            &ClipManager::new(),
        );
        assert!(commands.is_empty());

        let commands = plan_update(
            &text_element(),
            &Property::FlipX(true),
            &HeuristicMeasurer::default(),
            &ClipManager::new(),
        );
        assert!(commands.is_empty());
    }

    #[test]
    fn test_outline_toggle_preserves_stroke() {
        let element = text_element();
        let element = apply_all(&element, &Property::OutlineEnabled(true));
        let element = apply_all(&element, &Property::Stroke("#00ff00".to_string()));
        let element = apply_all(&element, &Property::StrokeWidth(6.0));
        let stroke_before = element.as_text().map(|t| t.style.stroke.clone());

        let disabled = apply_all(&element, &Property::OutlineEnabled(false));
        let style = &disabled.as_text().expect("text").style;
        assert!(style.rendered_stroke_width().abs() < f32::EPSILON);

        let enabled = apply_all(&disabled, &Property::OutlineEnabled(true));
        let style = &enabled.as_text().expect("text").style;
        assert_eq!(Some(style.stroke.clone()), stroke_before);
        assert!((style.rendered_stroke_width() - 6.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_locked_element_accepts_programmatic_edit() {
        let mut element = text_element();
        element.locked = true;
        let updated = apply_all(&element, &Property::Position(Point::new(5.0, 6.0)));
        assert_eq!(updated.transform.center, Point::new(5.0, 6.0));
        assert!(updated.locked);
    }
}

//! Engine configuration.
//!
//! Every field has a default, so a partial JSON document is a valid config:
//!
//! ```
//! use designer_core::CanvasConfig;
//!
//! let config = CanvasConfig::from_json(r#"{ "max_zoom": 2.5 }"#).unwrap();
//! assert!((config.max_zoom - 2.5).abs() < f32::EPSILON);
//! assert!((config.min_zoom - 1.0).abs() < f32::EPSILON);
//! ```

use serde::{Deserialize, Serialize};

use crate::element::TextStyle;
use crate::error::{CanvasError, CanvasResult};
use crate::event::PointerButton;

/// Widest zoom range a session may be configured with.
pub const ZOOM_LIMITS: (f32, f32) = (1.0, 3.0);

/// Configuration for a canvas session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Initial canvas width in pixels.
    pub canvas_width: f32,
    /// Initial canvas height in pixels.
    pub canvas_height: f32,
    /// Lower zoom bound.
    pub min_zoom: f32,
    /// Upper zoom bound.
    pub max_zoom: f32,
    /// Per-unit wheel decay; `zoom * decay^delta`. Must be in `(0, 1)`.
    pub wheel_decay: f32,
    /// Button that starts a pan gesture. Must not be the primary button.
    pub pan_button: PointerButton,
    /// Side length of transform handles in screen pixels.
    pub handle_size: f32,
    /// Distance of the rotate handle above the top edge, in screen pixels.
    pub rotate_handle_offset: f32,
    /// Screen distance a pointer must travel before a press becomes a drag.
    pub drag_threshold: f32,
    /// Inset of the dashed inner guide from the print-area edge.
    pub guide_inset: f32,
    /// Images wider than this are scaled down on placement.
    pub max_image_width: f32,
    /// Distance from the print-area edge below which an element is "near edge".
    pub safety_margin: f32,
    /// Style used for text added without an explicit style.
    pub default_text: TextStyle,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 600.0,
            min_zoom: 1.0,
            max_zoom: 3.0,
            wheel_decay: 0.999,
            pan_button: PointerButton::Secondary,
            handle_size: 12.0,
            rotate_handle_offset: 30.0,
            drag_threshold: 3.0,
            guide_inset: 8.0,
            max_image_width: 200.0,
            safety_margin: 10.0,
            default_text: TextStyle::default(),
        }
    }
}

impl CanvasConfig {
    /// Parse and validate a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Serialization`] if the JSON is malformed and
    /// [`CanvasError::InvalidConfig`] if a value is out of range.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that all values are usable.
    ///
    /// Zoom bounds must lie within [`ZOOM_LIMITS`]. NaN and infinite values
    /// are rejected everywhere.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidConfig`] describing the first bad value.
    pub fn validate(&self) -> CanvasResult<()> {
        positive("canvas_width", self.canvas_width)?;
        positive("canvas_height", self.canvas_height)?;

        let (lower, upper) = ZOOM_LIMITS;
        if !(lower <= self.min_zoom && self.min_zoom <= self.max_zoom && self.max_zoom <= upper) {
            return Err(CanvasError::InvalidConfig(format!(
                "zoom bounds must satisfy {lower} <= min <= max <= {upper}, got [{}, {}]",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.wheel_decay > 0.0 && self.wheel_decay < 1.0) {
            return Err(CanvasError::InvalidConfig(format!(
                "wheel_decay must be in (0, 1), got {}",
                self.wheel_decay
            )));
        }
        if self.pan_button == PointerButton::Primary {
            return Err(CanvasError::InvalidConfig(
                "pan_button must differ from the primary selection button".to_string(),
            ));
        }

        non_negative("handle_size", self.handle_size)?;
        non_negative("rotate_handle_offset", self.rotate_handle_offset)?;
        non_negative("drag_threshold", self.drag_threshold)?;
        non_negative("guide_inset", self.guide_inset)?;
        non_negative("safety_margin", self.safety_margin)?;
        positive("max_image_width", self.max_image_width)?;
        positive("default_text.font_size", self.default_text.font_size)?;
        Ok(())
    }
}

fn positive(name: &str, value: f32) -> CanvasResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CanvasError::InvalidConfig(format!(
            "{name} must be a positive number, got {value}"
        )))
    }
}

fn non_negative(name: &str, value: f32) -> CanvasResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CanvasError::InvalidConfig(format!(
            "{name} must be a non-negative number, got {value}"
        )))
    }
}

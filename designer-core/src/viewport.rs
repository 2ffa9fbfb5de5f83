//! Viewport transform between screen and scene coordinates.
//!
//! ```text
//! screen = scene * zoom + pan
//! scene  = (screen - pan) / zoom
//! ```
//!
//! Hit testing, clipping, and alignment all run in scene coordinates, so a
//! pan or zoom never perturbs element geometry.

use std::fmt;

use crate::config::{CanvasConfig, ZOOM_LIMITS};
use crate::geometry::{Point, Rect, Size};

/// Zoom and pan state.
#[derive(Debug, Clone)]
pub struct Viewport {
    zoom: f32,
    pan: Point,
    min_zoom: f32,
    max_zoom: f32,
    wheel_decay: f32,
    /// Last screen point of an active pan gesture.
    pan_anchor: Option<Point>,
}

impl Viewport {
    /// Create a viewport at the lower zoom bound with no pan.
    ///
    /// The config's zoom bounds are narrowed to [`ZOOM_LIMITS`], so an
    /// unvalidated config can never widen the range.
    #[must_use]
    pub fn new(config: &CanvasConfig) -> Self {
        let (lower, upper) = ZOOM_LIMITS;
        let min_zoom = if config.min_zoom.is_nan() {
            lower
        } else {
            config.min_zoom.clamp(lower, upper)
        };
        let max_zoom = if config.max_zoom.is_nan() {
            upper
        } else {
            config.max_zoom.clamp(min_zoom, upper)
        };
        Self {
            zoom: min_zoom,
            pan: Point::default(),
            min_zoom,
            max_zoom,
            wheel_decay: config.wheel_decay,
            pan_anchor: None,
        }
    }

    /// Current zoom factor.
    #[must_use]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Current pan offset in screen pixels.
    #[must_use]
    pub fn pan(&self) -> Point {
        self.pan
    }

    /// Zoom bounds as `(min, max)`.
    #[must_use]
    pub fn zoom_bounds(&self) -> (f32, f32) {
        (self.min_zoom, self.max_zoom)
    }

    /// Set the pan offset.
    pub fn set_pan(&mut self, pan: Point) {
        self.pan = pan;
    }

    /// Pan by a screen-space delta.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.pan.x += dx;
        self.pan.y += dy;
    }

    /// Scene point to screen point.
    #[must_use]
    pub fn to_screen(&self, p: Point) -> Point {
        p * self.zoom + self.pan
    }

    /// Screen point to scene point.
    #[must_use]
    pub fn to_scene(&self, p: Point) -> Point {
        (p - self.pan) / self.zoom
    }

    /// Scene length to screen length.
    #[must_use]
    pub fn to_screen_size(&self, size: Size) -> Size {
        size.scaled(self.zoom)
    }

    /// Screen length to scene length.
    #[must_use]
    pub fn to_scene_len(&self, len: f32) -> f32 {
        len / self.zoom
    }

    /// Scene rectangle to screen rectangle.
    #[must_use]
    pub fn rect_to_screen(&self, rect: &Rect) -> Rect {
        let origin = self.to_screen(Point::new(rect.x, rect.y));
        Rect::new(
            origin.x,
            origin.y,
            rect.width * self.zoom,
            rect.height * self.zoom,
        )
    }

    /// Zoom to `new_zoom` (clamped), keeping the scene point under `anchor` fixed.
    ///
    /// A NaN zoom or non-finite anchor is ignored and `false` is returned.
    pub fn zoom_to_point(&mut self, anchor: Point, new_zoom: f32) -> bool {
        if new_zoom.is_nan() || !anchor.is_finite() {
            tracing::debug!("Ignoring zoom to {} at ({}, {})", new_zoom, anchor.x, anchor.y);
            return false;
        }
        let scene = self.to_scene(anchor);
        self.zoom = new_zoom.clamp(self.min_zoom, self.max_zoom);
        self.pan = anchor - scene * self.zoom;
        true
    }

    /// Apply a wheel step at a screen point.
    ///
    /// Positive deltas zoom out, negative deltas zoom in. Non-finite input
    /// leaves the viewport untouched and returns `false`.
    pub fn wheel(&mut self, anchor: Point, delta: f32) -> bool {
        if !delta.is_finite() {
            tracing::debug!("Ignoring non-finite wheel delta {}", delta);
            return false;
        }
        let factor = self.wheel_decay.powf(delta);
        self.zoom_to_point(anchor, self.zoom * factor)
    }

    /// Start a pan gesture at a screen point.
    pub fn begin_pan(&mut self, at: Point) {
        self.pan_anchor = Some(at);
    }

    /// Continue a pan gesture; returns `false` when no pan is active or the
    /// point is not finite.
    pub fn pan_to(&mut self, at: Point) -> bool {
        let Some(last) = self.pan_anchor else {
            return false;
        };
        if !at.is_finite() {
            return false;
        }
        self.pan_by(at.x - last.x, at.y - last.y);
        self.pan_anchor = Some(at);
        true
    }

    /// Finish a pan gesture.
    pub fn end_pan(&mut self) {
        self.pan_anchor = None;
    }

    /// Whether a pan gesture is active.
    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.pan_anchor.is_some()
    }

    /// Back to the lower zoom bound with no pan.
    pub fn reset(&mut self) {
        self.zoom = self.min_zoom;
        self.pan = Point::default();
        self.pan_anchor = None;
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(&CanvasConfig::default())
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Zoom: {:.2}x | Pan: ({:.1}, {:.1})",
            self.zoom, self.pan.x, self.pan.y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_scene_roundtrip() {
        let mut viewport = Viewport::default();
        viewport.zoom_to_point(Point::default(), 2.0);
        viewport.set_pan(Point::new(30.0, -10.0));
        let p = Point::new(123.0, 45.0);
        let back = viewport.to_scene(viewport.to_screen(p));
        assert!((back.x - p.x).abs() < 1e-3);
        assert!((back.y - p.y).abs() < 1e-3);
    }

    #[test]
    fn test_wheel_keeps_point_under_cursor() {
        let mut viewport = Viewport::default();
        let cursor = Point::new(300.0, 200.0);
        let before = viewport.to_scene(cursor);
        viewport.wheel(cursor, -500.0);
        assert!(viewport.zoom() > 1.0);
        let after = viewport.to_scene(cursor);
        assert!((before.x - after.x).abs() < 1e-3);
        assert!((before.y - after.y).abs() < 1e-3);
    }

    #[test]
    fn test_wheel_clamps_zoom() {
        let mut viewport = Viewport::default();
        viewport.wheel(Point::default(), -100_000.0);
        assert!((viewport.zoom() - 3.0).abs() < f32::EPSILON);
        viewport.wheel(Point::default(), 100_000.0);
        assert!((viewport.zoom() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_non_finite_wheel_is_ignored() {
        let mut viewport = Viewport::default();
        assert!(viewport.wheel(Point::new(100.0, 100.0), -200.0));
        let zoom = viewport.zoom();
        let pan = viewport.pan();

        assert!(!viewport.wheel(Point::new(100.0, 100.0), f32::NAN));
        assert!(!viewport.wheel(Point::new(100.0, 100.0), f32::INFINITY));
        assert!(!viewport.wheel(Point::new(f32::NAN, 0.0), -10.0));
        assert!(!viewport.wheel(Point::new(0.0, f32::NEG_INFINITY), -10.0));
        assert!((viewport.zoom() - zoom).abs() < f32::EPSILON);
        assert_eq!(viewport.pan(), pan);

        assert!(viewport.wheel(Point::new(100.0, 100.0), -100.0));
        assert!(viewport.zoom().is_finite());
        assert!(viewport.zoom() > zoom);
    }

    #[test]
    fn test_unvalidated_config_cannot_widen_zoom_range() {
        let config = CanvasConfig {
            min_zoom: 0.1,
            max_zoom: 20.0,
            ..CanvasConfig::default()
        };
        let mut viewport = Viewport::new(&config);
        let (min, max) = viewport.zoom_bounds();
        assert!((min - 1.0).abs() < f32::EPSILON);
        assert!((max - 3.0).abs() < f32::EPSILON);
        viewport.wheel(Point::default(), -100_000.0);
        assert!((viewport.zoom() - 3.0).abs() < f32::EPSILON);
        viewport.wheel(Point::default(), 100_000.0);
        assert!((viewport.zoom() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_pan_gesture_accumulates_deltas() {
        let mut viewport = Viewport::default();
        assert!(!viewport.pan_to(Point::new(5.0, 5.0)));

        viewport.begin_pan(Point::new(10.0, 10.0));
        assert!(viewport.is_panning());
        assert!(viewport.pan_to(Point::new(15.0, 20.0)));
        assert!(viewport.pan_to(Point::new(25.0, 20.0)));
        viewport.end_pan();

        assert_eq!(viewport.pan(), Point::new(15.0, 10.0));
        assert!(!viewport.is_panning());
    }

    #[test]
    fn test_rect_to_screen_scales() {
        let mut viewport = Viewport::default();
        viewport.zoom_to_point(Point::default(), 2.0);
        let rect = viewport.rect_to_screen(&Rect::new(10.0, 10.0, 5.0, 5.0));
        assert_eq!(rect, Rect::new(20.0, 20.0, 10.0, 10.0));
    }

    #[test]
    fn test_display() {
        let viewport = Viewport::default();
        assert_eq!(viewport.to_string(), "Zoom: 1.00x | Pan: (0.0, 0.0)");
    }
}

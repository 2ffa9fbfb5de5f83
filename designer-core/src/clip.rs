//! Print-area geometry, clip derivation, and alignment.

use serde::{Deserialize, Serialize};

use crate::element::{ClipRegion, DesignElement};
use crate::geometry::{Point, Rect, Size};

/// The printable region of the product, in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrintArea {
    /// Center point.
    pub center: Point,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl PrintArea {
    /// Create a print area from its center and size.
    #[must_use]
    pub const fn new(center: Point, width: f32, height: f32) -> Self {
        Self {
            center,
            width,
            height,
        }
    }

    /// Build a print area from fractions of the canvas size.
    ///
    /// `left` and `top` locate the top-left corner; all values are in `[0, 1]`.
    #[must_use]
    pub fn from_relative(canvas: Size, left: f32, top: f32, width: f32, height: f32) -> Self {
        let rect = Rect::new(
            canvas.width * left,
            canvas.height * top,
            canvas.width * width,
            canvas.height * height,
        );
        Self::new(rect.center(), rect.width, rect.height)
    }

    /// Default front-of-garment preset.
    #[must_use]
    pub fn front(canvas: Size) -> Self {
        Self::from_relative(canvas, 0.28, 0.25, 0.44, 0.50)
    }

    /// Bounding rectangle.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.center, Size::new(self.width, self.height))
    }
}

/// Derives the canonical clip region and hands out copies of it.
#[derive(Debug, Clone, Default)]
pub struct ClipManager {
    canonical: Option<ClipRegion>,
}

impl ClipManager {
    /// Create a manager with no print area.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the canonical region from a new print area.
    pub fn update(&mut self, area: &PrintArea) -> ClipRegion {
        let region = ClipRegion { rect: area.rect() };
        self.canonical = Some(region);
        region
    }

    /// The current canonical region.
    #[must_use]
    pub fn region(&self) -> Option<ClipRegion> {
        self.canonical
    }

    /// Copy the canonical region onto an element.
    pub fn apply(&self, element: &mut DesignElement) {
        element.clip = self.canonical;
    }
}

/// Horizontal alignment target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    /// Left edge on the print-area left edge.
    Left,
    /// Center on the print-area center.
    Center,
    /// Right edge on the print-area right edge.
    Right,
}

/// Vertical alignment target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    /// Top edge on the print-area top edge.
    Top,
    /// Middle on the print-area middle.
    Middle,
    /// Bottom edge on the print-area bottom edge.
    Bottom,
}

/// Compute the aligned center for an element.
///
/// `screen_bbox` is the element's bounding box measured on screen; it is
/// divided by `zoom` before any scene arithmetic. Axes with no requested
/// alignment keep the current coordinate.
#[must_use]
pub fn aligned_center(
    current: Point,
    screen_bbox: Size,
    zoom: f32,
    area: &PrintArea,
    horizontal: Option<HorizontalAlign>,
    vertical: Option<VerticalAlign>,
) -> Point {
    let half_w = screen_bbox.width / zoom / 2.0;
    let half_h = screen_bbox.height / zoom / 2.0;
    let rect = area.rect();

    let x = match horizontal {
        Some(HorizontalAlign::Left) => rect.left() + half_w,
        Some(HorizontalAlign::Center) => area.center.x,
        Some(HorizontalAlign::Right) => rect.right() - half_w,
        None => current.x,
    };
    let y = match vertical {
        Some(VerticalAlign::Top) => rect.top() + half_h,
        Some(VerticalAlign::Middle) => area.center.y,
        Some(VerticalAlign::Bottom) => rect.bottom() - half_h,
        None => current.y,
    };
    Point::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::TextStyle;

    #[test]
    fn test_front_preset_geometry() {
        let area = PrintArea::front(Size::new(1000.0, 800.0));
        let rect = area.rect();
        assert!((rect.left() - 280.0).abs() < 1e-3);
        assert!((rect.top() - 200.0).abs() < 1e-3);
        assert!((rect.width - 440.0).abs() < 1e-3);
        assert!((rect.height - 400.0).abs() < 1e-3);
    }

    #[test]
    fn test_clip_applied_by_value() {
        let mut clip = ClipManager::new();
        let mut element =
            DesignElement::text("a", TextStyle::default(), Size::new(10.0, 10.0));
        clip.apply(&mut element);
        assert!(element.clip.is_none());

        let first = clip.update(&PrintArea::new(Point::new(50.0, 50.0), 20.0, 20.0));
        clip.apply(&mut element);
        assert_eq!(element.clip, Some(first));

        clip.update(&PrintArea::new(Point::new(90.0, 90.0), 20.0, 20.0));
        // the element keeps its own copy until re-applied
        assert_eq!(element.clip, Some(first));
    }

    #[test]
    fn test_align_center_middle_is_exact() {
        let area = PrintArea::new(Point::new(400.0, 300.0), 200.0, 300.0);
        let p = aligned_center(
            Point::new(13.0, 999.0),
            Size::new(77.0, 31.0),
            2.0,
            &area,
            Some(HorizontalAlign::Center),
            Some(VerticalAlign::Middle),
        );
        assert_eq!(p, area.center);
    }

    #[test]
    fn test_align_edges_divide_by_zoom() {
        let area = PrintArea::new(Point::new(400.0, 300.0), 200.0, 300.0);
        // 100x60 on screen at zoom 2 is 50x30 in the scene
        let size = Size::new(100.0, 60.0);
        let left_top = aligned_center(
            Point::default(),
            size,
            2.0,
            &area,
            Some(HorizontalAlign::Left),
            Some(VerticalAlign::Top),
        );
        assert!((left_top.x - 325.0).abs() < 1e-4);
        assert!((left_top.y - 165.0).abs() < 1e-4);

        let right_bottom = aligned_center(
            Point::default(),
            size,
            2.0,
            &area,
            Some(HorizontalAlign::Right),
            Some(VerticalAlign::Bottom),
        );
        assert!((right_bottom.x - 475.0).abs() < 1e-4);
        assert!((right_bottom.y - 435.0).abs() < 1e-4);
    }

    #[test]
    fn test_align_single_axis_keeps_other() {
        let area = PrintArea::new(Point::new(400.0, 300.0), 200.0, 300.0);
        let p = aligned_center(
            Point::new(10.0, 20.0),
            Size::new(10.0, 10.0),
            1.0,
            &area,
            Some(HorizontalAlign::Center),
            None,
        );
        assert_eq!(p, Point::new(400.0, 20.0));
    }
}

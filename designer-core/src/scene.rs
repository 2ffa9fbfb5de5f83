//! Scene store: the ordered element collection, print-area guides, and background.
//!
//! Z-order is the concatenation of the guide list (system elements) and the
//! editable element list, both bottom-first. Guides therefore occupy z indices
//! `[0, k)` and editable elements `[k, n)` by construction; no operation on
//! editable elements can move a guide.

use serde::{Deserialize, Serialize};

use crate::clip::PrintArea;
use crate::element::{DesignElement, ElementId};
use crate::geometry::{Point, Rect, Size};

/// Which print-area guide a system element represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideKind {
    /// Solid outline on the print-area boundary.
    Outer,
    /// Dashed safe-zone outline inside the boundary.
    Inner,
}

/// A non-editable guide rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    /// Outer or inner guide.
    pub kind: GuideKind,
    /// Rectangle in scene coordinates.
    pub rect: Rect,
    /// Whether the outline is dashed.
    pub dashed: bool,
}

impl Guide {
    /// Build the outer and inner guides for a print area, bottom-first.
    #[must_use]
    pub fn pair_for(area: &PrintArea, inset: f32) -> [Self; 2] {
        let rect = area.rect();
        [
            Self {
                kind: GuideKind::Outer,
                rect,
                dashed: false,
            },
            Self {
                kind: GuideKind::Inner,
                rect: rect.inset(inset),
                dashed: true,
            },
        ]
    }
}

/// Canvas background (the product photo).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Background {
    /// Source reference.
    pub source: String,
    /// Unscaled size of the image.
    pub natural_size: Size,
    /// Uniform scale applied so the image fits the canvas width.
    pub scale: f32,
}

impl Background {
    /// Create a background scaled to fit `canvas_width`.
    #[must_use]
    pub fn fit_width(source: impl Into<String>, natural_size: Size, canvas_width: f32) -> Self {
        let mut background = Self {
            source: source.into(),
            natural_size,
            scale: 1.0,
        };
        background.fit_to(canvas_width);
        background
    }

    /// Rescale so the image spans `canvas_width`.
    pub fn fit_to(&mut self, canvas_width: f32) {
        if self.natural_size.width > 0.0 {
            self.scale = canvas_width / self.natural_size.width;
        }
    }
}

/// A scene containing all canvas elements.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    /// System elements, bottom-first.
    guides: Vec<Guide>,
    /// Editable elements, bottom-first.
    elements: Vec<DesignElement>,
    /// Current print area.
    print_area: Option<PrintArea>,
    /// Background image.
    background: Option<Background>,
    /// Canvas surface size in pixels.
    canvas_size: Size,
}

impl Scene {
    /// Create a new empty scene with the given canvas size.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            canvas_size: Size::new(width, height),
            ..Self::default()
        }
    }

    /// Append an element as the topmost editable element.
    pub fn insert(&mut self, element: DesignElement) -> ElementId {
        let id = element.id;
        self.elements.push(element);
        id
    }

    /// Remove an element. Returns `None` if it was already gone.
    pub fn remove(&mut self, id: ElementId) -> Option<DesignElement> {
        let index = self.index_of(id)?;
        Some(self.elements.remove(index))
    }

    /// Remove every editable element, leaving guides untouched.
    pub fn clear(&mut self) -> Vec<ElementId> {
        self.elements.drain(..).map(|e| e.id).collect()
    }

    /// Move an element within the editable range.
    ///
    /// `new_index` is editable-relative and bottom-first; values past the top
    /// clamp to the top. Returns the resulting index, or `None` if the element
    /// does not exist.
    pub fn reorder(&mut self, id: ElementId, new_index: usize) -> Option<usize> {
        let from = self.index_of(id)?;
        let element = self.elements.remove(from);
        let to = new_index.min(self.elements.len());
        self.elements.insert(to, element);
        Some(to)
    }

    /// Editable-relative, bottom-first index of an element.
    #[must_use]
    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    /// Absolute z index of an editable element (guides included below it).
    #[must_use]
    pub fn z_index(&self, id: ElementId) -> Option<usize> {
        self.index_of(id).map(|i| self.guides.len() + i)
    }

    /// Number of system elements, i.e. the first editable z index.
    #[must_use]
    pub fn system_count(&self) -> usize {
        self.guides.len()
    }

    /// Get an element by ID.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&DesignElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Get a mutable reference to an element by ID.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut DesignElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Check whether an element exists.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.index_of(id).is_some()
    }

    /// Editable elements, bottom-first.
    pub fn elements(&self) -> impl DoubleEndedIterator<Item = &DesignElement> {
        self.elements.iter()
    }

    /// Mutable editable elements, bottom-first.
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut DesignElement> {
        self.elements.iter_mut()
    }

    /// Guides, bottom-first.
    #[must_use]
    pub fn guides(&self) -> &[Guide] {
        &self.guides
    }

    /// Replace the guides.
    pub fn set_guides(&mut self, guides: Vec<Guide>) {
        self.guides = guides;
    }

    /// Get the number of editable elements.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Check if there are no editable elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Current print area.
    #[must_use]
    pub fn print_area(&self) -> Option<&PrintArea> {
        self.print_area.as_ref()
    }

    /// Store a new print area.
    pub fn set_print_area(&mut self, area: PrintArea) {
        self.print_area = Some(area);
    }

    /// Current background.
    #[must_use]
    pub fn background(&self) -> Option<&Background> {
        self.background.as_ref()
    }

    /// Replace the background.
    pub fn set_background(&mut self, background: Option<Background>) {
        self.background = background;
    }

    /// Canvas surface size.
    #[must_use]
    pub fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    /// Resize the canvas, refitting the background to the new width.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.canvas_size = Size::new(width, height);
        if let Some(background) = self.background.as_mut() {
            background.fit_to(width);
        }
    }

    /// Where new elements are placed: the print-area center, else the canvas center.
    #[must_use]
    pub fn placement_center(&self) -> Point {
        self.print_area.as_ref().map_or_else(
            || Point::new(self.canvas_size.width / 2.0, self.canvas_size.height / 2.0),
            |area| area.center,
        )
    }

    /// Find the topmost visible element containing a scene point.
    #[must_use]
    pub fn element_at(&self, p: Point) -> Option<ElementId> {
        self.elements
            .iter()
            .rev()
            .find(|e| e.visible && e.contains_point(p))
            .map(|e| e.id)
    }

    /// Visible elements whose bounding box intersects `rect`, bottom-first.
    #[must_use]
    pub fn elements_in(&self, rect: &Rect) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|e| e.visible && e.bounding_box().intersects(rect))
            .map(|e| e.id)
            .collect()
    }
}

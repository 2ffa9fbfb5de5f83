//! Explicit scene edits.
//!
//! Every mutation the session performs is expressed as a [`Command`], applied
//! to the owned scene first and then handed to the render surface so it can
//! materialize the same change.

use serde::{Deserialize, Serialize};

use crate::clip::PrintArea;
use crate::element::{ClipRegion, DesignElement, ElementId, ElementKind, Transform};
use crate::geometry::Size;
use crate::scene::{Background, Guide, Scene};

/// A single scene edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Command {
    /// Append a new topmost element.
    Insert(Box<DesignElement>),
    /// Remove an element.
    Remove {
        /// Target element.
        id: ElementId,
    },
    /// Replace an element's transform.
    SetTransform {
        /// Target element.
        id: ElementId,
        /// New transform.
        transform: Transform,
    },
    /// Replace an element's content and style. The variant must not change.
    SetStyle {
        /// Target element.
        id: ElementId,
        /// New content.
        kind: ElementKind,
    },
    /// Replace an element's unscaled size after re-measurement.
    SetNaturalSize {
        /// Target element.
        id: ElementId,
        /// New natural size.
        size: Size,
    },
    /// Replace visibility and lock flags.
    SetFlags {
        /// Target element.
        id: ElementId,
        /// Visibility.
        visible: bool,
        /// Lock.
        locked: bool,
    },
    /// Move an element within the editable z range.
    Reorder {
        /// Target element.
        id: ElementId,
        /// Editable-relative, bottom-first index.
        index: usize,
    },
    /// Replace an element's clip region.
    SetClip {
        /// Target element.
        id: ElementId,
        /// New clip region.
        clip: Option<ClipRegion>,
    },
    /// Store a new print area.
    SetPrintArea(PrintArea),
    /// Replace the guide elements.
    SetGuides(Vec<Guide>),
    /// Replace the background.
    SetBackground(Option<Background>),
    /// Resize the canvas surface, refitting the background.
    ResizeCanvas(Size),
}

impl Command {
    /// The element this command targets, if any.
    #[must_use]
    pub fn target(&self) -> Option<ElementId> {
        match self {
            Self::Insert(element) => Some(element.id),
            Self::Remove { id }
            | Self::SetTransform { id, .. }
            | Self::SetStyle { id, .. }
            | Self::SetNaturalSize { id, .. }
            | Self::SetFlags { id, .. }
            | Self::Reorder { id, .. }
            | Self::SetClip { id, .. } => Some(*id),
            Self::SetPrintArea(_)
            | Self::SetGuides(_)
            | Self::SetBackground(_)
            | Self::ResizeCanvas(_) => None,
        }
    }

    /// Apply the command to a scene.
    ///
    /// Returns `false` when the target no longer exists, or when a style edit
    /// would change the element's variant; the scene is untouched in both cases.
    pub fn apply(&self, scene: &mut Scene) -> bool {
        match self {
            Self::Insert(element) => {
                scene.insert((**element).clone());
                true
            }
            Self::Remove { id } => scene.remove(*id).is_some(),
            Self::SetTransform { id, transform } => scene
                .get_mut(*id)
                .map(|e| e.transform = *transform)
                .is_some(),
            Self::SetStyle { id, kind } => match scene.get_mut(*id) {
                Some(e) if e.kind.same_variant(kind) => {
                    e.kind = kind.clone();
                    true
                }
                _ => false,
            },
            Self::SetNaturalSize { id, size } => scene
                .get_mut(*id)
                .map(|e| e.natural_size = *size)
                .is_some(),
            Self::SetFlags {
                id,
                visible,
                locked,
            } => scene
                .get_mut(*id)
                .map(|e| {
                    e.visible = *visible;
                    e.locked = *locked;
                })
                .is_some(),
            Self::Reorder { id, index } => scene.reorder(*id, *index).is_some(),
            Self::SetClip { id, clip } => scene.get_mut(*id).map(|e| e.clip = *clip).is_some(),
            Self::SetPrintArea(area) => {
                scene.set_print_area(*area);
                true
            }
            Self::SetGuides(guides) => {
                scene.set_guides(guides.clone());
                true
            }
            Self::SetBackground(background) => {
                scene.set_background(background.clone());
                true
            }
            Self::ResizeCanvas(size) => {
                scene.resize(size.width, size.height);
                true
            }
        }
    }
}

//! Pointer, wheel, and keyboard interaction state machine.
//!
//! ```text
//!            primary down on element           move past threshold
//!   Idle ──────────────────────────► Selecting ─────────────────────► Dragging
//!    │  primary down on handle                                          │
//!    ├────────────────────────────► Rotating | Scaling                  │
//!    │  primary down on empty canvas                                    │
//!    ├────────────────────────────► Marquee                             │
//!    │  pan button down                                                 │
//!    └────────────────────────────► Panning        pointer up ──► Idle ◄┘
//! ```
//!
//! The handler never mutates the scene directly. It returns commands for the
//! session to commit, and updates the selection and viewport in place.

use crate::command::Command;
use crate::config::CanvasConfig;
use crate::element::{DesignElement, ElementId};
use crate::event::{InputEvent, KeyEvent, PointerButton, PointerEvent, PointerPhase, WheelEvent};
use crate::geometry::{normalize_degrees, Point, Rect};
use crate::scene::Scene;
use crate::selection::Selection;
use crate::viewport::Viewport;

/// A transform handle on the active element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    /// Corner scale handle, clockwise from top-left (`0..4`).
    Corner(usize),
    /// Rotation handle above the top edge.
    Rotate,
}

/// Current gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Primary button down on an element body, not yet moved far enough to drag.
    Selecting {
        /// Element under the pointer.
        id: ElementId,
        /// Press position in screen coordinates.
        origin: Point,
        /// Press position in scene coordinates.
        last: Point,
    },
    /// Moving every selected, unlocked element.
    Dragging {
        /// Last pointer position in scene coordinates.
        last: Point,
    },
    /// Rotating an element around its center. Ends if the element is
    /// removed or locked mid-gesture.
    Rotating {
        /// Target element.
        id: ElementId,
        /// Pointer angle around the center at press time.
        start_pointer: f32,
        /// Element angle at press time.
        start_angle: f32,
    },
    /// Uniformly scaling an element around its center. Ends if the element
    /// is removed or locked mid-gesture.
    Scaling {
        /// Target element.
        id: ElementId,
        /// Pointer distance from the center at press time.
        start_distance: f32,
        /// Scale factors at press time.
        start_scale: (f32, f32),
    },
    /// Panning the viewport.
    Panning,
    /// Rubber-band selection.
    Marquee {
        /// Press position in scene coordinates.
        origin: Point,
        /// Current position in scene coordinates.
        current: Point,
    },
}

/// What an input event changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionResponse {
    /// Scene edits to commit.
    pub commands: Vec<Command>,
    /// Whether the selection changed.
    pub selection_changed: bool,
    /// Whether zoom or pan changed.
    pub viewport_changed: bool,
}

impl InteractionResponse {
    /// Whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && !self.selection_changed && !self.viewport_changed
    }

    fn selection(changed: bool) -> Self {
        Self {
            selection_changed: changed,
            ..Self::default()
        }
    }

    fn viewport() -> Self {
        Self {
            viewport_changed: true,
            ..Self::default()
        }
    }
}

/// Mutable state the handler operates on.
pub struct InteractionContext<'a> {
    /// The scene, read-only.
    pub scene: &'a Scene,
    /// Current selection.
    pub selection: &'a mut Selection,
    /// Current viewport.
    pub viewport: &'a mut Viewport,
}

/// Interaction state machine.
#[derive(Debug, Clone)]
pub struct InteractionHandler {
    state: InteractionState,
    pan_button: PointerButton,
    handle_size: f32,
    rotate_handle_offset: f32,
    drag_threshold: f32,
}

impl InteractionHandler {
    /// Create an idle handler.
    #[must_use]
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            state: InteractionState::Idle,
            pan_button: config.pan_button,
            handle_size: config.handle_size,
            rotate_handle_offset: config.rotate_handle_offset,
            drag_threshold: config.drag_threshold,
        }
    }

    /// Current gesture.
    #[must_use]
    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// Abandon any gesture in progress.
    pub fn reset(&mut self, viewport: &mut Viewport) {
        self.state = InteractionState::Idle;
        viewport.end_pan();
    }

    /// Process one input event.
    pub fn handle(&mut self, event: &InputEvent, ctx: &mut InteractionContext<'_>) -> InteractionResponse {
        match event {
            InputEvent::Pointer(pointer) => match pointer.phase {
                PointerPhase::Down => self.pointer_down(pointer, ctx),
                PointerPhase::Move => self.pointer_move(pointer, ctx),
                PointerPhase::Up => self.pointer_up(pointer, ctx),
            },
            InputEvent::Wheel(wheel) => Self::wheel(wheel, ctx),
            InputEvent::Key(key) => self.key(key, ctx),
        }
    }

    fn pointer_down(&mut self, event: &PointerEvent, ctx: &mut InteractionContext<'_>) -> InteractionResponse {
        if self.state != InteractionState::Idle {
            tracing::debug!("Ignoring press during {:?}", self.state);
            return InteractionResponse::default();
        }
        let screen = Point::new(event.x, event.y);

        if event.button == self.pan_button {
            let cleared = ctx.selection.clear();
            ctx.viewport.begin_pan(screen);
            self.state = InteractionState::Panning;
            return InteractionResponse::selection(cleared);
        }
        if event.button != PointerButton::Primary {
            return InteractionResponse::default();
        }

        let scene_pt = ctx.viewport.to_scene(screen);

        if let Some((element, handle)) = self.handle_at(scene_pt, ctx) {
            self.state = match handle {
                Handle::Rotate => InteractionState::Rotating {
                    id: element.id,
                    start_pointer: pointer_angle(element.transform.center, scene_pt),
                    start_angle: element.transform.angle,
                },
                Handle::Corner(_) => InteractionState::Scaling {
                    id: element.id,
                    start_distance: element.transform.center.distance(scene_pt),
                    start_scale: (element.transform.scale_x, element.transform.scale_y),
                },
            };
            return InteractionResponse::default();
        }

        let Some(id) = ctx.scene.element_at(scene_pt) else {
            let cleared = ctx.selection.clear();
            self.state = InteractionState::Marquee {
                origin: scene_pt,
                current: scene_pt,
            };
            return InteractionResponse::selection(cleared);
        };

        if event.modifiers.shift {
            ctx.selection.toggle(id);
            if !ctx.selection.contains(id) {
                return InteractionResponse::selection(true);
            }
            self.state = InteractionState::Selecting {
                id,
                origin: screen,
                last: scene_pt,
            };
            return InteractionResponse::selection(true);
        }

        let changed = if ctx.selection.contains(id) {
            // keep a multi-selection so the whole group can be dragged
            let ids = ctx.selection.ids().to_vec();
            ctx.selection.set(ids, Some(id))
        } else {
            ctx.selection.select_only(id)
        };
        self.state = InteractionState::Selecting {
            id,
            origin: screen,
            last: scene_pt,
        };
        InteractionResponse::selection(changed)
    }

    fn pointer_move(&mut self, event: &PointerEvent, ctx: &mut InteractionContext<'_>) -> InteractionResponse {
        let screen = Point::new(event.x, event.y);
        let scene_pt = ctx.viewport.to_scene(screen);

        match self.state {
            InteractionState::Idle => InteractionResponse::default(),
            InteractionState::Panning => {
                if ctx.viewport.pan_to(screen) {
                    InteractionResponse::viewport()
                } else {
                    InteractionResponse::default()
                }
            }
            InteractionState::Selecting { origin, last, .. } => {
                if origin.distance(screen) < self.drag_threshold {
                    return InteractionResponse::default();
                }
                self.state = InteractionState::Dragging { last: scene_pt };
                Self::drag(last, scene_pt, ctx)
            }
            InteractionState::Dragging { last } => {
                self.state = InteractionState::Dragging { last: scene_pt };
                Self::drag(last, scene_pt, ctx)
            }
            InteractionState::Rotating {
                id,
                start_pointer,
                start_angle,
            } => {
                let Some(element) = ctx.scene.get(id).filter(|e| !e.locked) else {
                    self.state = InteractionState::Idle;
                    return InteractionResponse::default();
                };
                let current = pointer_angle(element.transform.center, scene_pt);
                let transform = element
                    .transform
                    .with_angle(start_angle + current - start_pointer);
                InteractionResponse {
                    commands: vec![Command::SetTransform { id, transform }],
                    ..InteractionResponse::default()
                }
            }
            InteractionState::Scaling {
                id,
                start_distance,
                start_scale,
            } => {
                let Some(element) = ctx.scene.get(id).filter(|e| !e.locked) else {
                    self.state = InteractionState::Idle;
                    return InteractionResponse::default();
                };
                if start_distance <= f32::EPSILON {
                    return InteractionResponse::default();
                }
                let ratio = element.transform.center.distance(scene_pt) / start_distance;
                if ratio <= f32::EPSILON {
                    return InteractionResponse::default();
                }
                let mut transform = element.transform;
                transform.scale_x = start_scale.0 * ratio;
                transform.scale_y = start_scale.1 * ratio;
                InteractionResponse {
                    commands: vec![Command::SetTransform { id, transform }],
                    ..InteractionResponse::default()
                }
            }
            InteractionState::Marquee { origin, .. } => {
                self.state = InteractionState::Marquee {
                    origin,
                    current: scene_pt,
                };
                InteractionResponse::default()
            }
        }
    }

    fn pointer_up(&mut self, event: &PointerEvent, ctx: &mut InteractionContext<'_>) -> InteractionResponse {
        let state = std::mem::take(&mut self.state);
        match state {
            InteractionState::Panning => {
                ctx.viewport.end_pan();
                InteractionResponse::default()
            }
            InteractionState::Marquee { origin, .. } => {
                let current = ctx.viewport.to_scene(Point::new(event.x, event.y));
                let rect = Rect::from_points(origin, current);
                if rect.width <= f32::EPSILON && rect.height <= f32::EPSILON {
                    return InteractionResponse::default();
                }
                let ids = ctx.scene.elements_in(&rect);
                let active = ids.last().copied();
                InteractionResponse::selection(ctx.selection.set(ids, active))
            }
            _ => InteractionResponse::default(),
        }
    }

    fn wheel(event: &WheelEvent, ctx: &mut InteractionContext<'_>) -> InteractionResponse {
        if ctx.viewport.wheel(Point::new(event.x, event.y), event.delta) {
            InteractionResponse::viewport()
        } else {
            InteractionResponse::default()
        }
    }

    fn key(&mut self, event: &KeyEvent, ctx: &mut InteractionContext<'_>) -> InteractionResponse {
        if !event.is_canvas_delete() || ctx.selection.is_empty() {
            return InteractionResponse::default();
        }
        let commands = ctx
            .selection
            .ids()
            .iter()
            .map(|id| Command::Remove { id: *id })
            .collect();
        ctx.selection.clear();
        self.state = InteractionState::Idle;
        InteractionResponse {
            commands,
            selection_changed: true,
            viewport_changed: false,
        }
    }

    fn drag(from: Point, to: Point, ctx: &InteractionContext<'_>) -> InteractionResponse {
        let delta = to - from;
        let commands = ctx
            .selection
            .ids()
            .iter()
            .filter_map(|id| ctx.scene.get(*id))
            .filter(|element| !element.locked)
            .map(|element| {
                let mut transform = element.transform;
                transform.center = transform.center + delta;
                Command::SetTransform {
                    id: element.id,
                    transform,
                }
            })
            .collect();
        InteractionResponse {
            commands,
            ..InteractionResponse::default()
        }
    }

    /// Handle of the single selected, unlocked element under a scene point.
    fn handle_at<'s>(&self, p: Point, ctx: &InteractionContext<'s>) -> Option<(&'s DesignElement, Handle)> {
        let [id] = ctx.selection.ids() else {
            return None;
        };
        let element = ctx.scene.get(*id).filter(|e| !e.locked && e.visible)?;
        let zoom = ctx.viewport.zoom();
        let half = self.handle_size / zoom / 2.0;
        let hit = |handle: Point| (p.x - handle.x).abs() <= half && (p.y - handle.y).abs() <= half;

        if hit(rotate_handle(element, self.rotate_handle_offset / zoom)) {
            return Some((element, Handle::Rotate));
        }
        element
            .corners()
            .iter()
            .position(|corner| hit(*corner))
            .map(|index| (element, Handle::Corner(index)))
    }
}

impl Default for InteractionHandler {
    fn default() -> Self {
        Self::new(&CanvasConfig::default())
    }
}

/// Position of the rotate handle, `offset` scene units above the top edge.
#[must_use]
pub fn rotate_handle(element: &DesignElement, offset: f32) -> Point {
    let [top_left, top_right, ..] = element.corners();
    let top_mid = (top_left + top_right) / 2.0;
    top_mid + Point::new(0.0, -offset).rotate_around(Point::default(), element.transform.angle)
}

fn pointer_angle(center: Point, p: Point) -> f32 {
    normalize_degrees((p.y - center.y).atan2(p.x - center.x).to_degrees())
}

//! A live canvas session.
//!
//! The session owns the scene, selection, viewport, and interaction state,
//! and is the only place mutations happen. Every mutation runs through
//! [`Command`]s: applied to the scene, mirrored to the render surface, then
//! announced to subscribers with a bumped version number.

use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::Value;

use crate::assist::{self, MarginStatus, Suggestion};
use crate::asset::ResolvedAsset;
use crate::clip::{aligned_center, ClipManager, HorizontalAlign, PrintArea, VerticalAlign};
use crate::command::Command;
use crate::config::CanvasConfig;
use crate::element::{DesignElement, ElementId, ImageStyle, TextStyle, Transform, DEFAULT_TEXT_CONTENT};
use crate::error::CanvasResult;
use crate::event::InputEvent;
use crate::geometry::Size;
use crate::interaction::{InteractionContext, InteractionHandler, InteractionResponse};
use crate::layers::{self, LayerEntry};
use crate::measure::TextMeasurer;
use crate::notify::{Notifier, Subscription};
use crate::property::{self, Property};
use crate::scene::{Background, Guide, Scene};
use crate::selection::Selection;
use crate::surface::RenderSurface;
use crate::viewport::Viewport;

/// An asset request started by a session, to be completed after resolution.
///
/// Holds only a weak reference to the session, so a disposed session
/// silently rejects the result.
#[derive(Debug, Clone)]
pub struct PendingAsset {
    source: String,
    style: ImageStyle,
    owner: Weak<()>,
}

impl PendingAsset {
    /// The source being resolved.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// The design-canvas engine for one mounted canvas.
pub struct CanvasSession {
    scene: Scene,
    clip: ClipManager,
    viewport: Viewport,
    selection: Selection,
    interaction: InteractionHandler,
    notifier: Notifier<CanvasSession>,
    surface: Box<dyn RenderSurface>,
    measurer: Box<dyn TextMeasurer>,
    config: CanvasConfig,
    version: u64,
    liveness: Rc<()>,
}

impl CanvasSession {
    /// Create a session drawing to `surface` and measuring text with `measurer`.
    #[must_use]
    pub fn new(
        config: CanvasConfig,
        surface: Box<dyn RenderSurface>,
        measurer: Box<dyn TextMeasurer>,
    ) -> Self {
        Self {
            scene: Scene::new(config.canvas_width, config.canvas_height),
            clip: ClipManager::new(),
            viewport: Viewport::new(&config),
            selection: Selection::new(),
            interaction: InteractionHandler::new(&config),
            notifier: Notifier::new(),
            surface,
            measurer,
            config,
            version: 0,
            liveness: Rc::new(()),
        }
    }

    // ---------------------------------------------------------------------
    // Commit pipeline
    // ---------------------------------------------------------------------

    /// Apply commands to the scene and mirror them. Returns how many applied.
    fn apply(&mut self, commands: Vec<Command>) -> usize {
        let mut applied = 0;
        for command in commands {
            if command.apply(&mut self.scene) {
                self.surface.materialize(&command, &self.scene);
                applied += 1;
            } else {
                tracing::debug!("Skipped stale command {:?}", command.target());
            }
        }
        let scene = &self.scene;
        self.selection.retain(|id| scene.contains(id));
        if applied > 0 {
            self.surface.request_render();
        }
        applied
    }

    /// Bump the version and notify subscribers.
    fn changed(&mut self) {
        self.version += 1;
        self.notifier.notify(&*self);
    }

    // ---------------------------------------------------------------------
    // Scene store
    // ---------------------------------------------------------------------

    /// Add a text element at the print-area center, selected and active.
    ///
    /// Blank content becomes the placeholder text; `None` uses the configured
    /// default style.
    pub fn add_text(&mut self, content: &str, style: Option<TextStyle>) -> ElementId {
        let content = if content.trim().is_empty() {
            DEFAULT_TEXT_CONTENT
        } else {
            content
        };
        let style = style.unwrap_or_else(|| self.config.default_text.clone());
        let size = self.measurer.measure(content, &style);
        let mut element = DesignElement::text(content, style, size).with_transform(Transform {
            center: self.scene.placement_center(),
            ..Transform::default()
        });
        self.clip.apply(&mut element);
        let id = element.id;

        self.apply(vec![Command::Insert(Box::new(element))]);
        self.selection.select_only(id);
        tracing::debug!("Added text element {}", id);
        self.changed();
        id
    }

    /// Start adding an image. Resolve the source, then call [`Self::place_image`].
    #[must_use]
    pub fn begin_image(&self, source: impl Into<String>, style: ImageStyle) -> PendingAsset {
        PendingAsset {
            source: source.into(),
            style,
            owner: Rc::downgrade(&self.liveness),
        }
    }

    /// Whether a pending request was started by this session.
    #[must_use]
    pub fn owns(&self, pending: &PendingAsset) -> bool {
        pending.owner.ptr_eq(&Rc::downgrade(&self.liveness))
    }

    /// Place a resolved image, selected and active.
    ///
    /// Returns `None` if the request belongs to another session. Images wider
    /// than the configured maximum are scaled down uniformly.
    pub fn place_image(&mut self, pending: PendingAsset, asset: &ResolvedAsset) -> Option<ElementId> {
        if !self.owns(&pending) {
            tracing::info!("Discarding image {} for a disposed session", pending.source);
            return None;
        }
        let natural = asset.natural_size();
        let scale = if natural.width > self.config.max_image_width {
            self.config.max_image_width / natural.width
        } else {
            1.0
        };
        let mut element = DesignElement::image(pending.source, pending.style, natural)
            .with_transform(Transform {
                center: self.scene.placement_center(),
                scale_x: scale,
                scale_y: scale,
                ..Transform::default()
            });
        self.clip.apply(&mut element);
        let id = element.id;

        self.apply(vec![Command::Insert(Box::new(element))]);
        self.selection.select_only(id);
        tracing::debug!("Placed image element {} ({}x{})", id, asset.width, asset.height);
        self.changed();
        Some(id)
    }

    /// Remove an element. Returns `false` if it was already gone.
    pub fn remove(&mut self, id: ElementId) -> bool {
        if self.apply(vec![Command::Remove { id }]) == 0 {
            tracing::debug!("Remove ignored for missing element {}", id);
            return false;
        }
        self.changed();
        true
    }

    /// Remove every selected element. Returns how many were removed.
    pub fn remove_selected(&mut self) -> usize {
        let commands: Vec<Command> = self
            .selection
            .ids()
            .iter()
            .map(|id| Command::Remove { id: *id })
            .collect();
        if commands.is_empty() {
            return 0;
        }
        let removed = self.apply(commands);
        self.selection.clear();
        self.changed();
        removed
    }

    /// Remove every editable element; guides stay. Returns how many were removed.
    pub fn clear_all(&mut self) -> usize {
        let commands: Vec<Command> = self
            .scene
            .elements()
            .map(|e| Command::Remove { id: e.id })
            .collect();
        if commands.is_empty() {
            return 0;
        }
        let removed = self.apply(commands);
        self.selection.clear();
        tracing::debug!("Cleared {} elements", removed);
        self.changed();
        removed
    }

    /// Move an element to an editable-relative, bottom-first index.
    ///
    /// Indices past the top clamp to the top; guides are never displaced.
    pub fn reorder(&mut self, id: ElementId, index: usize) -> bool {
        if self.apply(vec![Command::Reorder { id, index }]) == 0 {
            tracing::debug!("Reorder ignored for missing element {}", id);
            return false;
        }
        self.changed();
        true
    }

    /// Editable-relative, bottom-first index of an element.
    #[must_use]
    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.scene.index_of(id)
    }

    /// Absolute z index of an element, guides included.
    #[must_use]
    pub fn z_index(&self, id: ElementId) -> Option<usize> {
        self.scene.z_index(id)
    }

    // ---------------------------------------------------------------------
    // Print area and clipping
    // ---------------------------------------------------------------------

    /// Upsert the print area: refresh the guides and re-clip every element.
    pub fn set_print_area(&mut self, area: PrintArea) {
        let region = self.clip.update(&area);
        let mut commands = vec![
            Command::SetPrintArea(area),
            Command::SetGuides(Guide::pair_for(&area, self.config.guide_inset).to_vec()),
        ];
        commands.extend(self.scene.elements().map(|e| Command::SetClip {
            id: e.id,
            clip: Some(region),
        }));
        self.apply(commands);
        tracing::debug!(
            "Print area set to {}x{} at ({}, {})",
            area.width,
            area.height,
            area.center.x,
            area.center.y
        );
        self.changed();
    }

    /// Current print area.
    #[must_use]
    pub fn print_area(&self) -> Option<&PrintArea> {
        self.scene.print_area()
    }

    /// Align an element against the print area on either or both axes.
    ///
    /// Returns `false` if the element is missing or no print area is set.
    pub fn align_object(
        &mut self,
        id: ElementId,
        horizontal: Option<HorizontalAlign>,
        vertical: Option<VerticalAlign>,
    ) -> bool {
        let Some(area) = self.scene.print_area().copied() else {
            tracing::debug!("Align ignored: no print area");
            return false;
        };
        let Some(element) = self.scene.get(id) else {
            tracing::debug!("Align ignored for missing element {}", id);
            return false;
        };
        let screen_bbox = self.viewport.rect_to_screen(&element.bounding_box()).size();
        let mut transform = element.transform;
        transform.center = aligned_center(
            transform.center,
            screen_bbox,
            self.viewport.zoom(),
            &area,
            horizontal,
            vertical,
        );
        let clip = self.clip.region();
        self.apply(vec![
            Command::SetTransform { id, transform },
            Command::SetClip { id, clip },
        ]);
        self.changed();
        true
    }

    // ---------------------------------------------------------------------
    // Property mutator
    // ---------------------------------------------------------------------

    /// Apply a property edit.
    ///
    /// Returns `Ok(false)` if the element is gone or the property does not
    /// apply to its kind.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CanvasError::InvalidProperty`] for out-of-range values.
    pub fn update_property(&mut self, id: ElementId, property: Property) -> CanvasResult<bool> {
        property.validate()?;
        Ok(self.apply_property(id, &property))
    }

    /// Parse and apply a panel-style key/value edit.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CanvasError::InvalidProperty`] if the pair cannot be parsed.
    pub fn update_property_value(&mut self, id: ElementId, key: &str, value: &Value) -> CanvasResult<bool> {
        let property = Property::parse(key, value)?;
        Ok(self.apply_property(id, &property))
    }

    /// Set an element's angle back to zero.
    pub fn reset_rotation(&mut self, id: ElementId) -> bool {
        self.apply_property(id, &Property::Angle(0.0))
    }

    /// Flip an element's visibility.
    pub fn toggle_visibility(&mut self, id: ElementId) -> bool {
        let Some(visible) = self.scene.get(id).map(|e| e.visible) else {
            tracing::debug!("Visibility toggle ignored for missing element {}", id);
            return false;
        };
        self.apply_property(id, &Property::Visible(!visible))
    }

    /// Flip an element's lock.
    pub fn toggle_lock(&mut self, id: ElementId) -> bool {
        let Some(locked) = self.scene.get(id).map(|e| e.locked) else {
            tracing::debug!("Lock toggle ignored for missing element {}", id);
            return false;
        };
        self.apply_property(id, &Property::Locked(!locked))
    }

    /// Apply an assistant suggestion to the active element.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CanvasError::InvalidProperty`] if the suggestion is invalid.
    pub fn apply_suggestion(&mut self, suggestion: Suggestion) -> CanvasResult<bool> {
        let Some(id) = self.selection.active() else {
            tracing::debug!("Suggestion ignored: nothing active");
            return Ok(false);
        };
        self.update_property(id, suggestion.into())
    }

    fn apply_property(&mut self, id: ElementId, property: &Property) -> bool {
        let Some(element) = self.scene.get(id) else {
            tracing::debug!("Property {} ignored for missing element {}", property.key(), id);
            return false;
        };
        let commands = property::plan_update(element, property, self.measurer.as_ref(), &self.clip);
        if commands.is_empty() {
            tracing::debug!("Property {} does not apply to element {}", property.key(), id);
            return false;
        }
        self.apply(commands);
        self.changed();
        true
    }

    // ---------------------------------------------------------------------
    // Selection and layers
    // ---------------------------------------------------------------------

    /// Make an element the only selected and active one.
    pub fn select(&mut self, id: ElementId) -> bool {
        if !self.scene.contains(id) {
            tracing::debug!("Select ignored for missing element {}", id);
            return false;
        }
        if self.selection.select_only(id) {
            self.changed();
        }
        true
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self) -> bool {
        let changed = self.selection.clear();
        if changed {
            self.changed();
        }
        changed
    }

    /// The active element.
    #[must_use]
    pub fn active_element(&self) -> Option<&DesignElement> {
        self.selection.active().and_then(|id| self.scene.get(id))
    }

    /// All selected ids.
    #[must_use]
    pub fn selected_ids(&self) -> &[ElementId] {
        self.selection.ids()
    }

    /// Layer list, topmost first, guides excluded.
    #[must_use]
    pub fn get_layers(&self) -> Vec<LayerEntry> {
        layers::layers(&self.scene, &self.selection)
    }

    /// Number of editable elements.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.scene.element_count()
    }

    /// Register a change observer.
    ///
    /// Observers run synchronously after each mutation with a shared
    /// reference to this session.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&CanvasSession) + 'static,
    {
        self.notifier.subscribe(observer)
    }

    /// Number of registered observers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.notifier.subscriber_count()
    }

    // ---------------------------------------------------------------------
    // Input and viewport
    // ---------------------------------------------------------------------

    /// Feed a pointer, wheel, or key event through the interaction handler.
    pub fn handle_input(&mut self, event: &InputEvent) -> InteractionResponse {
        let mut ctx = InteractionContext {
            scene: &self.scene,
            selection: &mut self.selection,
            viewport: &mut self.viewport,
        };
        let response = self.interaction.handle(event, &mut ctx);

        let applied = self.apply(response.commands.clone());
        if applied > 0 || response.selection_changed {
            self.changed();
        } else if response.viewport_changed {
            self.surface.request_render();
        }
        response
    }

    /// Current viewport.
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Reset zoom and pan.
    pub fn reset_viewport(&mut self) {
        self.interaction.reset(&mut self.viewport);
        self.viewport.reset();
        self.surface.request_render();
    }

    // ---------------------------------------------------------------------
    // Background and canvas size
    // ---------------------------------------------------------------------

    /// Start loading a background image.
    #[must_use]
    pub fn begin_background(&self, source: impl Into<String>) -> PendingAsset {
        self.begin_image(source, ImageStyle::default())
    }

    /// Install a resolved background, fit to the canvas width.
    pub fn place_background(&mut self, pending: PendingAsset, asset: &ResolvedAsset) -> bool {
        if !self.owns(&pending) {
            tracing::info!("Discarding background {} for a disposed session", pending.source);
            return false;
        }
        let background = Background::fit_width(
            pending.source,
            asset.natural_size(),
            self.scene.canvas_size().width,
        );
        self.apply(vec![Command::SetBackground(Some(background))]);
        self.changed();
        true
    }

    /// Remove the background.
    pub fn clear_background(&mut self) {
        self.apply(vec![Command::SetBackground(None)]);
        self.changed();
    }

    /// Resize the canvas; the background is refit to the new width.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.apply(vec![Command::ResizeCanvas(Size::new(width, height))]);
        self.changed();
    }

    // ---------------------------------------------------------------------
    // Assist
    // ---------------------------------------------------------------------

    /// Margin status of every visible element against the print area.
    ///
    /// Empty when no print area is set.
    #[must_use]
    pub fn margin_report(&self) -> Vec<(ElementId, MarginStatus)> {
        self.scene.print_area().map_or_else(Vec::new, |area| {
            assist::margin_report(&self.scene, area, self.config.safety_margin)
        })
    }

    // ---------------------------------------------------------------------
    // Queries and lifecycle
    // ---------------------------------------------------------------------

    /// Monotonic change counter.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The scene.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The session's configuration.
    #[must_use]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Tear down: drop observers and abandon any gesture.
    pub(crate) fn dispose(&mut self) {
        self.notifier.clear();
        self.interaction.reset(&mut self.viewport);
    }
}

impl fmt::Debug for CanvasSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasSession")
            .field("elements", &self.scene.element_count())
            .field("selection", &self.selection)
            .field("viewport", &self.viewport)
            .field("version", &self.version)
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::measure::HeuristicMeasurer;
    use crate::surface::{NullSurface, RecordingSurface};
    use std::cell::Cell;

    fn session() -> CanvasSession {
        CanvasSession::new(
            CanvasConfig::default(),
            Box::new(NullSurface),
            Box::new(HeuristicMeasurer::default()),
        )
    }

    fn asset(source: &str, width: u32, height: u32) -> ResolvedAsset {
        ResolvedAsset {
            source: source.to_string(),
            width,
            height,
        }
    }

    #[test]
    fn test_add_text_selects_and_names_layer() {
        let mut s = session();
        let id = s.add_text("Hello", None);
        let layers = s.get_layers();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].id, id);
        assert_eq!(layers[0].display_name, "Hello");
        assert!(layers[0].is_active);
        assert_eq!(s.version(), 1);
    }

    #[test]
    fn test_blank_text_gets_placeholder() {
        let mut s = session();
        s.add_text("   ", None);
        assert_eq!(s.get_layers()[0].display_name, DEFAULT_TEXT_CONTENT);
    }

    #[test]
    fn test_text_placed_at_print_area_center_and_clipped() {
        let mut s = session();
        let area = PrintArea::new(Point::new(300.0, 250.0), 200.0, 200.0);
        s.set_print_area(area);
        let id = s.add_text("Hi", None);
        let element = s.scene().get(id).expect("exists");
        assert_eq!(element.transform.center, area.center);
        assert_eq!(element.clip.map(|c| c.rect), Some(area.rect()));
    }

    #[test]
    fn test_oversized_image_scaled_to_max_width() {
        let mut s = session();
        let pending = s.begin_image("big.png", ImageStyle::default());
        let id = s
            .place_image(pending, &asset("big.png", 800, 400))
            .expect("placed");
        let element = s.scene().get(id).expect("exists");
        assert!((element.scaled_size().width - 200.0).abs() < 1e-3);
        assert!((element.scaled_size().height - 100.0).abs() < 1e-3);
        assert_eq!(s.active_element().map(|e| e.id), Some(id));
    }

    #[test]
    fn test_foreign_pending_is_rejected() {
        let other = session();
        let pending = other.begin_image("a.png", ImageStyle::default());
        let mut s = session();
        assert!(!s.owns(&pending));
        assert!(s.place_image(pending, &asset("a.png", 10, 10)).is_none());
        assert_eq!(s.layer_count(), 0);
    }

    #[test]
    fn test_stale_ids_are_noops() {
        let mut s = session();
        let ghost = ElementId::new();
        assert!(!s.remove(ghost));
        assert!(!s.reorder(ghost, 0));
        assert!(!s.toggle_lock(ghost));
        assert!(!s.select(ghost));
        assert!(!s.update_property(ghost, Property::FontSize(10.0)).expect("valid"));
        assert_eq!(s.version(), 0);
    }

    #[test]
    fn test_remove_drops_selection() {
        let mut s = session();
        let id = s.add_text("x", None);
        assert!(s.remove(id));
        assert!(s.selected_ids().is_empty());
        assert!(s.active_element().is_none());
    }

    #[test]
    fn test_notifier_fires_per_mutation() {
        let mut s = session();
        let calls = Rc::new(Cell::new(0_u64));
        let seen = Rc::clone(&calls);
        let sub = s.subscribe(move |session| {
            seen.set(seen.get() + 1);
            assert_eq!(seen.get(), session.version());
        });

        let id = s.add_text("a", None);
        s.toggle_visibility(id);
        s.clear_selection();
        assert_eq!(calls.get(), 3);

        drop(sub);
        s.add_text("b", None);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_align_center_middle_exact_under_zoom() {
        let mut s = session();
        let area = PrintArea::new(Point::new(400.0, 300.0), 200.0, 300.0);
        s.set_print_area(area);
        let id = s.add_text("Rotated", None);
        s.update_property(id, Property::Angle(33.0)).expect("valid");
        s.update_property(id, Property::ScaleX(1.7)).expect("valid");
        s.update_property(id, Property::Position(Point::new(10.0, 10.0)))
            .expect("valid");
        s.handle_input(&InputEvent::Wheel(crate::event::WheelEvent {
            x: 50.0,
            y: 50.0,
            delta: -400.0,
        }));

        assert!(s.align_object(id, Some(HorizontalAlign::Center), Some(VerticalAlign::Middle)));
        let center = s.scene().get(id).expect("exists").transform.center;
        assert!((center.x - 400.0).abs() < 1e-3);
        assert!((center.y - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_align_left_edge_touches_area() {
        let mut s = session();
        let area = PrintArea::new(Point::new(400.0, 300.0), 200.0, 300.0);
        s.set_print_area(area);
        let id = s.add_text("Edge", None);
        assert!(s.align_object(id, Some(HorizontalAlign::Left), None));
        let bbox = s.scene().get(id).expect("exists").bounding_box();
        assert!((bbox.left() - area.rect().left()).abs() < 1e-3);
    }

    #[test]
    fn test_align_without_print_area_is_noop() {
        let mut s = session();
        let id = s.add_text("x", None);
        assert!(!s.align_object(id, Some(HorizontalAlign::Center), None));
    }

    #[test]
    fn test_surface_sees_commands_and_renders() {
        let surface = RecordingSurface::new();
        let log = surface.log();
        let mut s = CanvasSession::new(
            CanvasConfig::default(),
            Box::new(surface),
            Box::new(HeuristicMeasurer::default()),
        );
        let id = s.add_text("x", None);
        s.update_property(id, Property::Fill("#ff0000".to_string()))
            .expect("valid");
        let log = log.borrow();
        assert!(matches!(log.commands[0], Command::Insert(_)));
        assert!(matches!(log.commands[1], Command::SetStyle { .. }));
        assert_eq!(log.renders, 2);
    }

    #[test]
    fn test_suggestion_targets_active_element() {
        let mut s = session();
        assert!(!s
            .apply_suggestion(Suggestion::Color("#1a472a".to_string()))
            .expect("valid"));
        let id = s.add_text("x", None);
        assert!(s
            .apply_suggestion(Suggestion::Font("Roboto".to_string()))
            .expect("valid"));
        let element = s.scene().get(id).expect("exists");
        assert_eq!(
            element.as_text().map(|t| t.style.font_family.as_str()),
            Some("Roboto")
        );
    }

    #[test]
    fn test_background_fits_width_and_follows_resize() {
        let mut s = session();
        let pending = s.begin_background("shirt.png");
        assert!(s.place_background(pending, &asset("shirt.png", 1600, 1600)));
        let scale = s.scene().background().expect("set").scale;
        assert!((scale - 0.5).abs() < f32::EPSILON);

        s.resize(400.0, 400.0);
        let scale = s.scene().background().expect("set").scale;
        assert!((scale - 0.25).abs() < f32::EPSILON);

        s.clear_background();
        assert!(s.scene().background().is_none());
    }
}

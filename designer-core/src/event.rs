//! Input events for canvas interaction.
//!
//! Pointer and wheel coordinates are in screen space; the interaction handler
//! maps them into scene space through the viewport.

use serde::{Deserialize, Serialize};

/// Pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerButton {
    /// Primary (usually left) button, used for selection.
    Primary,
    /// Middle button / wheel click.
    Middle,
    /// Secondary (usually right) button.
    Secondary,
}

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button pressed.
    Down,
    /// Pointer moved.
    Move,
    /// Button released.
    Up,
}

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct KeyModifiers {
    /// Shift key pressed.
    pub shift: bool,
    /// Control key pressed.
    pub ctrl: bool,
    /// Alt/Option key pressed.
    pub alt: bool,
    /// Meta/Command key pressed.
    pub meta: bool,
}

/// A pointer (mouse, pen, single touch) event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Phase of this event.
    pub phase: PointerPhase,
    /// X position in screen coordinates.
    pub x: f32,
    /// Y position in screen coordinates.
    pub y: f32,
    /// Button that changed state (for `Move`, the button held, if any).
    pub button: PointerButton,
    /// Active modifier keys.
    pub modifiers: KeyModifiers,
}

impl PointerEvent {
    /// Primary button press.
    #[must_use]
    pub fn down(x: f32, y: f32) -> Self {
        Self::with_button(PointerPhase::Down, x, y, PointerButton::Primary)
    }

    /// Pointer move.
    #[must_use]
    pub fn moved(x: f32, y: f32) -> Self {
        Self::with_button(PointerPhase::Move, x, y, PointerButton::Primary)
    }

    /// Primary button release.
    #[must_use]
    pub fn up(x: f32, y: f32) -> Self {
        Self::with_button(PointerPhase::Up, x, y, PointerButton::Primary)
    }

    /// Event for an explicit button.
    #[must_use]
    pub fn with_button(phase: PointerPhase, x: f32, y: f32, button: PointerButton) -> Self {
        Self {
            phase,
            x,
            y,
            button,
            modifiers: KeyModifiers::default(),
        }
    }

    /// Set the modifier keys.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Scroll-wheel event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelEvent {
    /// X position in screen coordinates.
    pub x: f32,
    /// Y position in screen coordinates.
    pub y: f32,
    /// Vertical scroll delta; positive scrolls down (zooms out).
    pub delta: f32,
}

/// Where keyboard focus was when a key event fired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusTarget {
    /// The canvas or a non-text control.
    #[default]
    Canvas,
    /// A text input or textarea.
    TextEntry,
}

/// Keyboard event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// Key name (`"Delete"`, `"Backspace"`, `"a"`, ...).
    pub key: String,
    /// Whether the key is pressed.
    pub pressed: bool,
    /// Active modifier keys.
    pub modifiers: KeyModifiers,
    /// Focus target at the time of the event.
    pub focus: FocusTarget,
}

impl KeyEvent {
    /// Key press with canvas focus.
    #[must_use]
    pub fn pressed(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            pressed: true,
            modifiers: KeyModifiers::default(),
            focus: FocusTarget::Canvas,
        }
    }

    /// Set the focus target.
    #[must_use]
    pub fn with_focus(mut self, focus: FocusTarget) -> Self {
        self.focus = focus;
        self
    }

    /// Whether this is a delete gesture that should act on the canvas.
    #[must_use]
    pub fn is_canvas_delete(&self) -> bool {
        self.pressed
            && self.focus != FocusTarget::TextEntry
            && matches!(self.key.as_str(), "Delete" | "Backspace")
    }
}

/// All input events the canvas can receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum InputEvent {
    /// Pointer event.
    Pointer(PointerEvent),
    /// Scroll-wheel event.
    Wheel(WheelEvent),
    /// Keyboard event.
    Key(KeyEvent),
}

impl From<PointerEvent> for InputEvent {
    fn from(event: PointerEvent) -> Self {
        Self::Pointer(event)
    }
}

impl From<WheelEvent> for InputEvent {
    fn from(event: WheelEvent) -> Self {
        Self::Wheel(event)
    }
}

impl From<KeyEvent> for InputEvent {
    fn from(event: KeyEvent) -> Self {
        Self::Key(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_keys_act_on_canvas() {
        assert!(KeyEvent::pressed("Delete").is_canvas_delete());
        assert!(KeyEvent::pressed("Backspace").is_canvas_delete());
        assert!(!KeyEvent::pressed("a").is_canvas_delete());
    }

    #[test]
    fn test_delete_suppressed_in_text_entry() {
        let event = KeyEvent::pressed("Backspace").with_focus(FocusTarget::TextEntry);
        assert!(!event.is_canvas_delete());
    }

    #[test]
    fn test_key_release_is_not_delete() {
        let mut event = KeyEvent::pressed("Delete");
        event.pressed = false;
        assert!(!event.is_canvas_delete());
    }

    #[test]
    fn test_input_event_serde_tagging() {
        let event: InputEvent = WheelEvent {
            x: 1.0,
            y: 2.0,
            delta: -100.0,
        }
        .into();
        let json = serde_json::to_string(&event).expect("serialize");
        assert!(json.contains("\"type\":\"Wheel\""));
        let back: InputEvent = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, event);
    }
}

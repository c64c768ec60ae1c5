#![forbid(unsafe_code)]

//! Canonical pointer event types.
//!
//! Host adapters (a webview bridge, a native window, a test harness) translate
//! their platform mouse events into [`PointerEvent`] before handing them to
//! the gesture and resize controllers.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Pointer button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    /// Left mouse button / primary touch.
    Primary,
    /// Right mouse button.
    Secondary,
    /// Middle mouse button (scroll wheel click).
    Middle,
}

/// The type of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "button", rename_all = "snake_case")]
pub enum PointerEventKind {
    /// Button pressed down.
    Down(PointerButton),
    /// Button released.
    Up(PointerButton),
    /// Pointer moved (with or without a button held).
    Move,
}

/// A pointer event in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub position: Point,
}

impl PointerEvent {
    /// Create a new pointer event.
    #[must_use]
    pub const fn new(kind: PointerEventKind, position: Point) -> Self {
        Self { kind, position }
    }

    /// Button-down at `(x, y)`.
    #[must_use]
    pub const fn down(button: PointerButton, x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Down(button), Point::new(x, y))
    }

    /// Button-up at `(x, y)`.
    #[must_use]
    pub const fn up(button: PointerButton, x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Up(button), Point::new(x, y))
    }

    /// Move to `(x, y)`.
    #[must_use]
    pub const fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Move, Point::new(x, y))
    }

    /// The button involved, if this is a press or release.
    #[must_use]
    pub const fn button(&self) -> Option<PointerButton> {
        match self.kind {
            PointerEventKind::Down(button) | PointerEventKind::Up(button) => Some(button),
            PointerEventKind::Move => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_kind_and_position() {
        let down = PointerEvent::down(PointerButton::Primary, 3.0, 4.0);
        assert_eq!(down.kind, PointerEventKind::Down(PointerButton::Primary));
        assert_eq!(down.position, Point::new(3.0, 4.0));
        assert_eq!(down.button(), Some(PointerButton::Primary));
        assert_eq!(PointerEvent::moved(1.0, 1.0).button(), None);
    }

    #[test]
    fn serializes_with_snake_case_tags() {
        let event = PointerEvent::up(PointerButton::Middle, 0.0, 0.0);
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"up\""));
        assert!(json.contains("\"button\":\"middle\""));
    }
}

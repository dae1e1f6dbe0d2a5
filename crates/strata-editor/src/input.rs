use serde::{Deserialize, Serialize};
use strata_core::math::Vec2;

/// Pointer buttons, named by role rather than index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    Primary,
    Middle,
    Secondary,
}

/// A keyboard key by its code, e.g. `"Escape"` or `"KeyR"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key(pub String);

impl Key {
    pub fn new(code: &str) -> Self {
        Self(code.to_string())
    }

    pub fn escape() -> Self {
        Self::new("Escape")
    }

    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }
}

/// Input delivered to the world. Positions are canvas pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown { screen: Vec2, button: Button },
    PointerMove { screen: Vec2 },
    PointerUp { screen: Vec2, button: Button },
    Wheel { delta_y: f64 },
    KeyDown { key: Key },
    ContextMenu { screen: Vec2 },
}

impl InputEvent {
    pub fn click(screen: Vec2) -> Self {
        InputEvent::PointerDown {
            screen,
            button: Button::Primary,
        }
    }

    pub fn key(code: &str) -> Self {
        InputEvent::KeyDown { key: Key::new(code) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json() {
        let text = r#"{"type":"pointer_down","screen":[1,2],"button":"secondary"}"#;
        let event: InputEvent = serde_json::from_str(text).unwrap();
        assert_eq!(
            event,
            InputEvent::PointerDown {
                screen: Vec2::new(1.0, 2.0),
                button: Button::Secondary
            }
        );
        assert!(Key::escape().is_escape());
        assert!(!Key::new("KeyR").is_escape());
    }
}

//! Translates winit input events into pathviz [`Msg`] values.

use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, KeyEvent, MouseButton};
use winit::keyboard::{Key as WKey, NamedKey};

use pathviz_core::{Key, MouseAction, Msg, Point};

// ---------------------------------------------------------------------------
// Keyboard
// ---------------------------------------------------------------------------

pub(crate) fn translate_keyboard(event: &KeyEvent) -> Option<Msg> {
    // Only key-down (pressed) events.
    if event.state != ElementState::Pressed {
        return None;
    }

    let key = match &event.logical_key {
        WKey::Named(named) => match named {
            NamedKey::Escape => Key::Escape,
            NamedKey::Enter => Key::Enter,
            NamedKey::Space => Key::Space,
            NamedKey::Backspace => Key::Backspace,
            _ => return None,
        },
        WKey::Character(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(' '), None) => Key::Space,
                (Some(c), None) => Key::Char(c),
                _ => return None,
            }
        }
        _ => return None,
    };

    Some(Msg::key(key))
}

// ---------------------------------------------------------------------------
// Mouse
// ---------------------------------------------------------------------------

/// Tracks the cursor and held button, since winit reports them separately.
#[derive(Debug, Default)]
pub(crate) struct MouseTracker {
    cursor: Point,
    held: Option<MouseAction>,
}

impl MouseTracker {
    pub(crate) fn button(&mut self, state: ElementState, button: MouseButton) -> Option<Msg> {
        let action = match (state, button) {
            (ElementState::Pressed, MouseButton::Left) => MouseAction::Main,
            (ElementState::Pressed, MouseButton::Right) => MouseAction::Secondary,
            (ElementState::Released, MouseButton::Left | MouseButton::Right) => {
                self.held = None;
                MouseAction::Release
            }
            _ => return None,
        };
        if action != MouseAction::Release {
            self.held = Some(action);
        }
        Some(Msg::Mouse {
            action,
            pos: self.cursor,
        })
    }

    /// A move while a button is held repeats that button's action, so
    /// dragging paints.
    pub(crate) fn moved(&mut self, position: PhysicalPosition<f64>) -> Msg {
        self.cursor = Point::new(position.x as i32, position.y as i32);
        Msg::Mouse {
            action: self.held.unwrap_or(MouseAction::Move),
            pos: self.cursor,
        }
    }
}

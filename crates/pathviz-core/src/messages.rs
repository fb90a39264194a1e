//! Input events: [`Msg`], [`Key`], [`MouseAction`].

use crate::geom::Point;

/// A keyboard key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Key {
    Escape,
    Enter,
    Space,
    Backspace,
    /// A printable character.
    Char(char),
}

/// A mouse action.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MouseAction {
    /// Primary (left) button pressed, or moved while held.
    Main,
    /// Secondary (right) button pressed, or moved while held.
    Secondary,
    /// Button released.
    Release,
    /// Moved with no button held.
    Move,
}

/// An input message delivered to the application.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Msg {
    /// A key was pressed.
    KeyDown { key: Key },
    /// A mouse event. `pos` is in the grid's pixel space.
    Mouse { action: MouseAction, pos: Point },
    /// Sent once when the application starts.
    Init,
    /// Request to quit.
    Quit,
}

impl Msg {
    /// Convenience: a `KeyDown` for `key`.
    #[inline]
    pub fn key(key: Key) -> Self {
        Self::KeyDown { key }
    }

    /// Convenience: a mouse event at pixel `(x, y)`.
    #[inline]
    pub fn mouse(action: MouseAction, x: i32, y: i32) -> Self {
        Self::Mouse {
            action,
            pos: Point::new(x, y),
        }
    }

    /// Whether this message asks the application to stop: an explicit
    /// [`Msg::Quit`], Escape, or `q`.
    #[inline]
    pub fn is_quit(&self) -> bool {
        matches!(
            self,
            Self::Quit
                | Self::KeyDown {
                    key: Key::Escape | Key::Char('q')
                }
        )
    }
}

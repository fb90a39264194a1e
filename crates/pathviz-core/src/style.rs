//! Colours and the fixed palette used to paint cell states.

use crate::cell::CellState;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// An RGB colour packed into a `u32` (0x00RRGGBB).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Self = Self::from_rgb(255, 255, 255);
    pub const BLACK: Self = Self::from_rgb(0, 0, 0);
    pub const RED: Self = Self::from_rgb(255, 0, 0);
    pub const GREEN: Self = Self::from_rgb(0, 255, 0);
    pub const PURPLE: Self = Self::from_rgb(128, 0, 128);
    pub const ORANGE: Self = Self::from_rgb(255, 165, 0);
    pub const TURQUOISE: Self = Self::from_rgb(65, 225, 210);
    pub const GREY: Self = Self::from_rgb(133, 133, 133);

    /// Construct from individual RGB components.
    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }

    /// Red component.
    #[inline]
    pub const fn r(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    /// Green component.
    #[inline]
    pub const fn g(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    /// Blue component.
    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Opaque `0xFFRRGGBB` pixel, the layout softbuffer expects.
    #[inline]
    pub const fn to_pixel(self) -> u32 {
        0xFF00_0000 | self.0
    }
}

/// Colour of the lines separating cells.
pub const GRID_LINE: Color = Color::GREY;

impl CellState {
    /// Display colour of this state.
    pub const fn color(self) -> Color {
        match self {
            CellState::Empty => Color::WHITE,
            CellState::Open => Color::GREEN,
            CellState::Closed => Color::RED,
            CellState::Barrier => Color::BLACK,
            CellState::Start => Color::ORANGE,
            CellState::End => Color::PURPLE,
            CellState::Path => Color::TURQUOISE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_components() {
        let c = Color::from_rgb(0xAB, 0xCD, 0xEF);
        assert_eq!(c.r(), 0xAB);
        assert_eq!(c.g(), 0xCD);
        assert_eq!(c.b(), 0xEF);
        assert_eq!(c.to_pixel(), 0xFFAB_CDEF);
    }

    #[test]
    fn every_state_has_a_distinct_color() {
        let states = [
            CellState::Empty,
            CellState::Open,
            CellState::Closed,
            CellState::Barrier,
            CellState::Start,
            CellState::End,
            CellState::Path,
        ];
        for (i, a) in states.iter().enumerate() {
            for b in &states[i + 1..] {
                assert_ne!(a.color(), b.color(), "{a:?} and {b:?} share a colour");
            }
        }
    }
}

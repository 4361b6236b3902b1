// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

/// Geometry values shared by the sizer, centerer and host adapters.
///
/// All rectangles are in device pixels with a top-left origin. Sizes in the
/// configured list are logical (unscaled) and only become pixels once a
/// scale factor is applied.

use std::fmt;

/// Configured target dimension, unscaled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Multiply by the display scale factor, rounding to whole pixels
    pub fn scaled(&self, scale: f64) -> ScaledSize {
        ScaledSize {
            width: (self.width as f64 * scale).round() as i32,
            height: (self.height as f64 * scale).round() as i32,
        }
    }
}

/// A Size after scaling, in device pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaledSize {
    pub width: i32,
    pub height: i32,
}

impl ScaledSize {
    pub fn fits_within(&self, area: &Rect) -> bool {
        self.width <= area.width && self.height <= area.height
    }
}

/// Axis-aligned rectangle (window frame or monitor work area)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn with_origin(&self, x: i32, y: i32) -> Self {
        Self { x, y, ..*self }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{},{})", self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn from_backward(backward: bool) -> Self {
        if backward { Direction::Backward } else { Direction::Forward }
    }

    pub fn step(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// Which axes the host reports as maximized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MaximizeState {
    pub horizontal: bool,
    pub vertical: bool,
}

impl MaximizeState {
    pub const NONE: Self = Self { horizontal: false, vertical: false };
    pub const BOTH: Self = Self { horizontal: true, vertical: true };

    pub fn any(&self) -> bool {
        self.horizontal || self.vertical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_rounds_fractional_scale() {
        let s = Size::new(1280, 720).scaled(1.25);
        assert_eq!(s, ScaledSize { width: 1600, height: 900 });

        let odd = Size::new(1001, 3).scaled(1.5);
        assert_eq!(odd, ScaledSize { width: 1502, height: 5 });
    }

    #[test]
    fn test_fits_within_is_inclusive() {
        let area = Rect::new(100, 50, 1600, 900);
        assert!(ScaledSize { width: 1600, height: 900 }.fits_within(&area));
        assert!(!ScaledSize { width: 1601, height: 900 }.fits_within(&area));
        assert!(!ScaledSize { width: 1600, height: 901 }.fits_within(&area));
    }

    #[test]
    fn test_maximize_state_any() {
        assert!(!MaximizeState::NONE.any());
        assert!(MaximizeState { horizontal: false, vertical: true }.any());
        assert!(MaximizeState::BOTH.any());
    }
}

// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

use crate::sbgc_core::Rect;

/// Center a frame on the work area, keeping its size.
/// A frame larger than the work area is not clamped and may overhang.
pub fn center(frame: &Rect, work_area: &Rect) -> Rect {
    let x = work_area.x + (work_area.width - frame.width) / 2;
    let y = work_area.y + (work_area.height - frame.height) / 2;
    frame.with_origin(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_exact() {
        let area = Rect::new(0, 25, 1920, 1055);
        let frame = Rect::new(10, 900, 1280, 720);
        let centered = center(&frame, &area);

        assert_eq!(centered, Rect::new(320, 192, 1280, 720));
        // Midpoints agree within integer rounding
        assert!((centered.x + centered.width / 2 - (area.x + area.width / 2)).abs() <= 1);
        assert!((centered.y + centered.height / 2 - (area.y + area.height / 2)).abs() <= 1);
    }

    #[test]
    fn test_center_on_offset_monitor() {
        let area = Rect::new(-1440, 0, 1440, 900);
        let frame = Rect::new(0, 0, 800, 600);
        assert_eq!(center(&frame, &area), Rect::new(-1120, 150, 800, 600));
    }

    #[test]
    fn test_center_oversized_overhangs() {
        let area = Rect::new(0, 0, 1000, 800);
        let frame = Rect::new(0, 0, 1200, 900);
        let centered = center(&frame, &area);
        assert_eq!(centered, Rect::new(-100, -50, 1200, 900));
    }
}

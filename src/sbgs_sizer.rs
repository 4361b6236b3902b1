// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

/// Size Cycler
///
/// Picks the next preferred size for a window and where to put it.
///
/// Steps, all recomputed per key press from live geometry:
/// 1. Scale every configured size and keep those that fit the work area
/// 2. Find the candidate nearest to the current frame size (Manhattan
///    distance, earliest index wins ties)
/// 3. Step one candidate forward or backward, wrapping at both ends
/// 4. Keep the current top-left unless the new size would overflow the
///    right/bottom edge of the work area, in which case shift back

use crate::sbgc_core::{Direction, Rect, ScaledSize, Size};
use crate::sbge_error::ActionError;

/// Result of a cycle step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleTarget {
    pub index: usize,
    pub rect: Rect,
}

/// Scale each size and retain those fitting the work area, preserving order
pub fn candidates(sizes: &[Size], work_area: &Rect, scale: f64) -> Vec<ScaledSize> {
    sizes.iter()
        .map(|s| s.scaled(scale))
        .filter(|c| c.fits_within(work_area))
        .collect()
}

/// Index of the candidate closest to (width, height); None for an empty list
pub fn nearest_index(candidates: &[ScaledSize], width: i32, height: i32) -> Option<usize> {
    let mut best: Option<(usize, i64)> = None;

    for (idx, c) in candidates.iter().enumerate() {
        let error = (c.width as i64 - width as i64).abs() + (c.height as i64 - height as i64).abs();
        match best {
            // Only a strictly smaller error replaces, so ties keep the earlier index
            Some((_, best_error)) if error >= best_error => {}
            _ => best = Some((idx, error)),
        }
    }

    best.map(|(idx, _)| idx)
}

/// Step one position in `direction`, wrapping; `len` must be non-zero
pub fn advance_index(index: usize, len: usize, direction: Direction) -> usize {
    debug_assert!(len > 0);
    (index as isize + direction.step()).rem_euclid(len as isize) as usize
}

/// Shift a proposed origin so the far edge stays inside the work area,
/// without ever moving it before the work area origin
pub fn clamp_origin(x: i32, y: i32, width: i32, height: i32, work_area: &Rect) -> (i32, i32) {
    let mut new_x = x;
    let mut new_y = y;

    if x + width > work_area.right() {
        new_x = work_area.x.max(work_area.right() - width);
    }
    if y + height > work_area.bottom() {
        new_y = work_area.y.max(work_area.bottom() - height);
    }

    (new_x, new_y)
}

/// Compute the next size and position for a window frame
pub fn cycle(
    frame: &Rect,
    work_area: &Rect,
    sizes: &[Size],
    scale: f64,
    direction: Direction,
) -> Result<CycleTarget, ActionError> {
    let list = candidates(sizes, work_area, scale);

    let nearest = nearest_index(&list, frame.width, frame.height)
        .ok_or(ActionError::NoFittingCandidate { work_area: *work_area, scale })?;

    let index = advance_index(nearest, list.len(), direction);
    let size = list[index];
    let (x, y) = clamp_origin(frame.x, frame.y, size.width, size.height, work_area);

    tracing::debug!(
        "SIZE: cycle nearest={} next={} of {} candidates → {}x{} at ({},{})",
        nearest, index, list.len(), size.width, size.height, x, y
    );

    Ok(CycleTarget {
        index,
        rect: Rect::new(x, y, size.width, size.height),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed_sizes() -> Vec<Size> {
        vec![
            Size::new(1280, 720),
            Size::new(1280, 900),
            Size::new(1440, 900),
            Size::new(1600, 900),
        ]
    }

    #[test]
    fn test_forward_from_exact_match() {
        let frame = Rect::new(0, 0, 1280, 720);
        let area = Rect::new(0, 0, 2000, 1200);

        let target = cycle(&frame, &area, &mixed_sizes(), 1.0, Direction::Forward).unwrap();
        assert_eq!(target.index, 1);
        assert_eq!(target.rect, Rect::new(0, 0, 1280, 900));
    }

    #[test]
    fn test_nothing_fits_at_high_scale() {
        let frame = Rect::new(0, 0, 800, 600);
        let area = Rect::new(0, 0, 1000, 800);

        let err = cycle(&frame, &area, &mixed_sizes(), 2.0, Direction::Forward).unwrap_err();
        assert!(matches!(err, ActionError::NoFittingCandidate { .. }));
    }

    #[test]
    fn test_candidates_filter_keeps_order() {
        let area = Rect::new(0, 0, 1440, 900);
        let list = candidates(&mixed_sizes(), &area, 1.0);
        assert_eq!(list, vec![
            ScaledSize { width: 1280, height: 720 },
            ScaledSize { width: 1280, height: 900 },
            ScaledSize { width: 1440, height: 900 },
        ]);
    }

    #[test]
    fn test_candidates_are_scaled() {
        let area = Rect::new(0, 0, 4000, 4000);
        let list = candidates(&[Size::new(1280, 720)], &area, 2.0);
        assert_eq!(list, vec![ScaledSize { width: 2560, height: 1440 }]);
    }

    #[test]
    fn test_nearest_tie_prefers_earlier_index() {
        // 1300x720 is 20 from the first and 20 from the second
        let list = vec![
            ScaledSize { width: 1280, height: 720 },
            ScaledSize { width: 1320, height: 720 },
        ];
        assert_eq!(nearest_index(&list, 1300, 720), Some(0));
    }

    #[test]
    fn test_nearest_uses_manhattan_distance() {
        let list = vec![
            ScaledSize { width: 1000, height: 1000 },
            ScaledSize { width: 1200, height: 700 },
        ];
        // First: 150 + 300 = 450, second: 50 + 0 = 50
        assert_eq!(nearest_index(&list, 1150, 700), Some(1));
        assert_eq!(nearest_index(&[], 1150, 700), None);
    }

    #[test]
    fn test_advance_wraps_both_ways() {
        assert_eq!(advance_index(3, 4, Direction::Forward), 0);
        assert_eq!(advance_index(0, 4, Direction::Backward), 3);
        assert_eq!(advance_index(1, 4, Direction::Forward), 2);
        assert_eq!(advance_index(0, 1, Direction::Backward), 0);
    }

    #[test]
    fn test_cycle_then_reverse_returns_to_start() {
        let area = Rect::new(0, 0, 2000, 1200);
        let sizes = mixed_sizes();
        let start = Rect::new(40, 30, 1440, 900);

        let fwd = cycle(&start, &area, &sizes, 1.0, Direction::Forward).unwrap();
        assert_eq!(fwd.index, 3);

        let back = cycle(&fwd.rect, &area, &sizes, 1.0, Direction::Backward).unwrap();
        assert_eq!(back.index, 2);
        assert_eq!(back.rect, start);
    }

    #[test]
    fn test_clamp_shifts_left_and_up() {
        let area = Rect::new(0, 30, 1920, 1050);
        let (x, y) = clamp_origin(1000, 500, 1600, 900, &area);
        assert_eq!((x, y), (320, 180));
    }

    #[test]
    fn test_clamp_never_passes_work_area_origin() {
        let area = Rect::new(100, 40, 1000, 700);
        let (x, y) = clamp_origin(500, 300, 1200, 900, &area);
        assert_eq!((x, y), (100, 40));
    }

    #[test]
    fn test_clamp_leaves_fitting_window_alone() {
        let area = Rect::new(0, 0, 1920, 1080);
        assert_eq!(clamp_origin(200, 100, 1280, 720, &area), (200, 100));
        // Exactly flush with the far edge still fits
        assert_eq!(clamp_origin(640, 360, 1280, 720, &area), (640, 360));
    }

    #[test]
    fn test_cycle_clamps_against_offset_work_area() {
        // Second monitor to the right with a panel at the top
        let area = Rect::new(1920, 32, 2560, 1408);
        let frame = Rect::new(3000, 600, 1280, 720);
        let sizes = vec![Size::new(1280, 720), Size::new(1920, 1080)];

        let target = cycle(&frame, &area, &sizes, 1.0, Direction::Forward).unwrap();
        assert_eq!(target.rect, Rect::new(2560, 360, 1920, 1080));
        assert!(target.rect.right() <= area.right());
        assert!(target.rect.bottom() <= area.bottom());
    }
}

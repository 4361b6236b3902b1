// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

/// Notice text for a resized window
///
/// Reports the logical size, and the actual N:9 ratio whenever the host
/// settled on a frame that is off the 16:9 family (apps that snap to a
/// character cell grid are the usual cause).

use crate::sbgc_core::Rect;

const NOMINAL_RATIO: f64 = 16.0;
const RATIO_TOLERANCE: f64 = 0.01;

/// The "N" in N:9 for a frame; None for a degenerate height
pub fn ratio_numerator(width: i32, height: i32) -> Option<f64> {
    if height == 0 {
        return None;
    }
    Some(9.0 * width as f64 / height as f64)
}

/// Format the confirmed frame (device pixels) as logical `W×H`, plus
/// ` (N.NN:9)` when the ratio is off nominal
pub fn format_size_message(frame: &Rect, scale: f64) -> String {
    let logical_w = (frame.width as f64 / scale).round() as i64;
    let logical_h = (frame.height as f64 / scale).round() as i64;
    let mut message = format!("{}×{}", logical_w, logical_h);

    if let Some(n) = ratio_numerator(frame.width, frame.height) {
        if (n - NOMINAL_RATIO).abs() > RATIO_TOLERANCE {
            message.push_str(&format!(" ({:.2}:9)", n));
        }
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nominal_ratio_has_no_suffix() {
        let frame = Rect::new(0, 0, 1600, 900);
        assert_eq!(format_size_message(&frame, 1.0), "1600×900");
    }

    #[test]
    fn test_snapped_height_reports_ratio() {
        let frame = Rect::new(0, 0, 1600, 894);
        assert_eq!(format_size_message(&frame, 1.0), "1600×894 (16.11:9)");
    }

    #[test]
    fn test_logical_size_divides_by_scale() {
        let frame = Rect::new(0, 0, 2560, 1440);
        assert_eq!(format_size_message(&frame, 2.0), "1280×720");

        // 1601/2 = 800.5 rounds up
        let frame = Rect::new(0, 0, 1601, 900);
        assert!(format_size_message(&frame, 2.0).starts_with("801×450"));
    }

    #[test]
    fn test_non_sixteen_nine_sizes() {
        let frame = Rect::new(0, 0, 1280, 900);
        assert_eq!(format_size_message(&frame, 1.0), "1280×900 (12.80:9)");
    }

    #[test]
    fn test_zero_height_has_no_ratio() {
        assert_eq!(ratio_numerator(100, 0), None);
        assert_eq!(format_size_message(&Rect::new(0, 0, 100, 0), 1.0), "100×0");
    }
}

// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

#![cfg(target_os = "macos")]

use objc2::msg_send;
use objc2::encode::{Encode, RefEncode};
use objc2_foundation::{MainThreadMarker, NSString};
use objc2_app_kit::NSScreen;

use crate::sbgc_core::{Rect, Size};
use crate::sbgs_sizer::candidates;

/// Rectangle in points, global top-left coordinates (the AX convention)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl PointRect {
    fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }

    /// Scale to device pixels
    pub fn to_device(&self, scale: f64) -> Rect {
        Rect::new(
            (self.x * scale).round() as i32,
            (self.y * scale).round() as i32,
            (self.w * scale).round() as i32,
            (self.h * scale).round() as i32,
        )
    }

    pub fn from_device(rect: &Rect, scale: f64) -> Self {
        PointRect {
            x: rect.x as f64 / scale,
            y: rect.y as f64 / scale,
            w: rect.width as f64 / scale,
            h: rect.height as f64 / scale,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone)]
struct Pt {
    x: f64,
    y: f64,
}

// NSRect structure for Objective-C interop
#[repr(C)]
#[derive(Copy, Clone)]
struct NSRect {
    origin: Pt,
    size: Pt,  // reuse Pt for {width, height}
}

// Note: Must use "CGRect" not "NSRect" - the Objective-C runtime uses CoreGraphics naming
unsafe impl Encode for NSRect {
    const ENCODING: objc2::encode::Encoding = objc2::encode::Encoding::Struct(
        "CGRect",
        &[
            objc2::encode::Encoding::Struct("CGPoint", &[<f64 as Encode>::ENCODING, <f64 as Encode>::ENCODING]),
            objc2::encode::Encoding::Struct("CGSize", &[<f64 as Encode>::ENCODING, <f64 as Encode>::ENCODING]),
        ],
    );
}

unsafe impl RefEncode for NSRect {
    const ENCODING_REF: objc2::encode::Encoding = Self::ENCODING;
}

/// One monitor as seen from AX coordinates
#[derive(Clone, Debug)]
pub struct ScreenGeometry {
    pub index: usize,
    pub name: String,
    pub frame: PointRect,
    /// Frame minus menu bar and Dock
    pub visible: PointRect,
    pub scale: f64,
}

// Cocoa is bottom-left relative to the primary screen; AX is top-left
fn flip(rect: NSRect, primary_height: f64) -> PointRect {
    PointRect {
        x: rect.origin.x,
        y: primary_height - (rect.origin.y + rect.size.y),
        w: rect.size.x,
        h: rect.size.y,
    }
}

// Get all screens in NSScreen enumeration order
#[allow(unexpected_cfgs)]
pub unsafe fn all_screens() -> Vec<ScreenGeometry> {
    // SAFETY: only called from the main runloop thread
    let mtm = unsafe { MainThreadMarker::new_unchecked() };
    let screens = NSScreen::screens(mtm);
    if screens.len() == 0 {
        return Vec::new();
    }

    // The first screen carries the menu bar and anchors the coordinate space
    let primary = screens.objectAtIndex(0);
    let primary_frame: NSRect = msg_send![&primary, frame];
    let primary_height = primary_frame.size.y;

    let mut result = Vec::new();
    for i in 0..screens.len() {
        let screen = screens.objectAtIndex(i);
        let frame: NSRect = msg_send![&screen, frame];
        let visible: NSRect = msg_send![&screen, visibleFrame];
        let scale: f64 = msg_send![&screen, backingScaleFactor];

        let name_ptr: *const NSString = msg_send![&screen, localizedName];
        let name = if !name_ptr.is_null() {
            let name_str = unsafe { &*name_ptr };
            name_str.to_string()
        } else {
            format!("Display {}", i)
        };

        result.push(ScreenGeometry {
            index: i,
            name,
            frame: flip(frame, primary_height),
            visible: flip(visible, primary_height),
            scale: if scale > 0.0 { scale } else { 1.0 },
        });
    }
    result
}

/// Screen holding the window's center, else the primary screen
pub unsafe fn screen_for_window(window: &PointRect) -> Option<ScreenGeometry> {
    let screens = all_screens();
    let cx = window.x + window.w / 2.0;
    let cy = window.y + window.h / 2.0;

    let found = screens.iter().position(|s| s.frame.contains(cx, cy));
    match found {
        Some(idx) => screens.into_iter().nth(idx),
        None => {
            tracing::debug!("SIZE: window center ({:.0},{:.0}) off every screen, using primary", cx, cy);
            screens.into_iter().next()
        }
    }
}

/// Log each display and the sizes that can be cycled on it
pub unsafe fn print_display_summary(sizes: &[Size]) {
    let screens = all_screens();
    if screens.is_empty() {
        tracing::warn!("No displays detected");
        return;
    }

    for s in &screens {
        let work_area = s.visible.to_device(s.scale);
        let fitting = candidates(sizes, &work_area, s.scale);
        let listed: Vec<String> = fitting.iter().map(|c| format!("{}x{}", c.width, c.height)).collect();

        tracing::info!(
            "DISPLAY {}: {} frame=({:.0},{:.0},{:.0},{:.0}) scale={:.1}x work_area={}",
            s.index, s.name, s.frame.x, s.frame.y, s.frame.w, s.frame.h, s.scale, work_area
        );
        if listed.is_empty() {
            tracing::warn!("DISPLAY {}: no configured size fits", s.index);
        } else {
            tracing::info!("DISPLAY {}: cycle [{}]", s.index, listed.join(", "));
        }
    }
}

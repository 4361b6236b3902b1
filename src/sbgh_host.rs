// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

//! Host window provider interface
//!
//! The platform layer (AX on macOS) implements these for whatever window has
//! focus when a binding fires. Everything is read live on each call; nothing
//! here is cached between key presses.

use crate::sbgc_core::{MaximizeState, Rect};
use crate::sbge_error::HostError;
use crate::sbgr_resize::ResizeSignal;

pub trait HostWindow {
    /// Frame including decorations, device pixels
    fn frame_rect(&self) -> Result<Rect, HostError>;

    /// Usable area of the monitor holding this window, device pixels
    fn work_area(&self) -> Result<Rect, HostError>;

    /// Pixel scale of the output showing this window
    fn scale_factor(&self) -> f64;

    fn maximize_state(&self) -> MaximizeState;

    /// Leave every maximized state, both axes
    fn unmaximize(&mut self) -> Result<(), HostError>;

    /// Apply position and size as one request. Completion is reported
    /// through `resize_signal`, possibly after this returns.
    fn move_resize_frame(&mut self, frame: Rect) -> Result<(), HostError>;

    fn resize_signal(&self) -> ResizeSignal;

    /// Short label for log lines
    fn describe(&self) -> String {
        String::from("<window>")
    }
}

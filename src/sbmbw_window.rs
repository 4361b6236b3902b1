// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

#![cfg(target_os = "macos")]

//! Focused window as seen through Accessibility
//!
//! AX speaks points; the sizing core speaks device pixels. Geometry is
//! multiplied by the backing scale of the window's screen on the way in and
//! divided on the way out. A `MacWindow` is built fresh for each key press.

use core_foundation_sys::base::CFTypeRef;
use std::ffi::c_void;

use crate::sbgc_core::{MaximizeState, Rect};
use crate::sbge_error::HostError;
use crate::sbgh_host::HostWindow;
use crate::sbgr_resize::ResizeSignal;
use crate::sbmba_ax::{ax_attr_full_screen, AxElement};
use crate::sbmbd_display::{screen_for_window, PointRect, ScreenGeometry};

pub struct MacWindow {
    element: AxElement,
    pid: u32,
    title: Option<String>,
    screen: ScreenGeometry,
    signal: ResizeSignal,
}

impl MacWindow {
    /// Focused window of the given app, or None if it has none
    pub unsafe fn focused(pid: u32) -> Result<Option<Self>, HostError> {
        let app = AxElement::from_pid(pid)?;
        let element = match app.focused_window() {
            Ok(element) => element,
            Err(HostError::Permission) => return Err(HostError::Permission),
            Err(e) => {
                tracing::debug!("SIZE: pid={} has no focused window ({})", pid, e);
                return Ok(None);
            }
        };

        let rect = element.get_current_rect().ok_or(HostError::WindowGone)?;
        let screen = screen_for_window(&rect).ok_or(HostError::Platform(-1))?;
        let title = element.get_title();

        Ok(Some(MacWindow {
            element,
            pid,
            title,
            screen,
            signal: ResizeSignal::new(),
        }))
    }

    unsafe fn points(&self) -> Result<PointRect, HostError> {
        self.element.get_current_rect().ok_or(HostError::WindowGone)
    }

    fn is_full_screen(&self) -> bool {
        unsafe { self.element.get_bool(&ax_attr_full_screen()) }
    }
}

impl HostWindow for MacWindow {
    fn frame_rect(&self) -> Result<Rect, HostError> {
        let rect = unsafe { self.points()? };
        Ok(rect.to_device(self.screen.scale))
    }

    fn work_area(&self) -> Result<Rect, HostError> {
        Ok(self.screen.visible.to_device(self.screen.scale))
    }

    fn scale_factor(&self) -> f64 {
        self.screen.scale
    }

    // macOS has no per-axis maximize; full screen is the only state that
    // blocks a resize
    fn maximize_state(&self) -> MaximizeState {
        if self.is_full_screen() { MaximizeState::BOTH } else { MaximizeState::NONE }
    }

    fn unmaximize(&mut self) -> Result<(), HostError> {
        unsafe { self.element.set_bool(&ax_attr_full_screen(), false) }
    }

    fn move_resize_frame(&mut self, frame: Rect) -> Result<(), HostError> {
        let target = PointRect::from_device(&frame, self.screen.scale);
        tracing::debug!(
            "SIZE: AX set ({:.0},{:.0},{:.0},{:.0}) points",
            target.x, target.y, target.w, target.h
        );

        // Position first, then size
        let landed = unsafe {
            self.element.set_position(target.x, target.y)?;
            self.element.set_size(target.w, target.h)?;
            self.points()?
        };

        let confirmed = landed.to_device(self.screen.scale);
        if confirmed != frame {
            tracing::debug!("SIZE: window settled at {} instead of {}", confirmed, frame);
        }

        unsafe { defer_resize_emit(self.signal.clone(), confirmed) };
        Ok(())
    }

    fn resize_signal(&self) -> ResizeSignal {
        self.signal.clone()
    }

    fn describe(&self) -> String {
        match &self.title {
            Some(title) => format!("\"{}\" (pid={})", title, self.pid),
            None => format!("<untitled> (pid={})", self.pid),
        }
    }
}

// AX applies geometry synchronously; report it on the next runloop pass so
// completion always arrives after the request returns
unsafe fn defer_resize_emit(signal: ResizeSignal, frame: Rect) {
    use block2::StackBlock;

    let block = StackBlock::new(move || {
        signal.emit(frame);
    });

    let main_runloop = crate::sbmba_ax::CFRunLoopGetMain();
    crate::sbmba_ax::CFRunLoopPerformBlock(
        main_runloop,
        core_foundation::runloop::kCFRunLoopDefaultMode as CFTypeRef,
        &*block as *const _ as *const c_void,
    );
    crate::sbmba_ax::CFRunLoopWakeUp(main_runloop);
}

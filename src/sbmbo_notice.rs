// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

#![cfg(target_os = "macos")]

//! On-screen size label backed by the Swift panel in sbmbo_notice.swift

use std::ffi::CString;
use std::os::raw::c_char;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lazy_static::lazy_static;

use crate::sbgo_notice::{LabelSurface, Notice};
use crate::sbmbe_eventtap::CONFIG;

// Implemented in sbmbo_notice.swift; main thread only
extern "C" {
    fn sbmbo_label_create();
    fn sbmbo_label_set_text(text: *const c_char);
    fn sbmbo_label_begin_fade(generation: u64, hold_secs: f64, fade_secs: f64, done: extern "C" fn(u64));
    fn sbmbo_label_cancel_fade();
    fn sbmbo_label_destroy();
}

lazy_static! {
    pub static ref NOTICE: Arc<Mutex<Notice<MacLabel>>> =
        Arc::new(Mutex::new(Notice::new(MacLabel, CONFIG.notice)));
}

/// Swift delivers this asynchronously on the main queue, never from inside
/// one of the calls below
extern "C" fn label_fade_done(generation: u64) {
    let mut notice = NOTICE.lock().unwrap_or_else(|e| e.into_inner());
    notice.fade_complete(generation);
}

pub struct MacLabel;

impl LabelSurface for MacLabel {
    fn create(&mut self) {
        unsafe { sbmbo_label_create() }
    }

    fn set_text(&mut self, text: &str) {
        let c_text = CString::new(text).unwrap_or_default();
        unsafe { sbmbo_label_set_text(c_text.as_ptr()) }
    }

    fn begin_fade(&mut self, generation: u64, hold: Duration, fade: Duration) {
        unsafe {
            sbmbo_label_begin_fade(generation, hold.as_secs_f64(), fade.as_secs_f64(), label_fade_done)
        }
    }

    fn cancel_fade(&mut self) {
        unsafe { sbmbo_label_cancel_fade() }
    }

    fn destroy(&mut self) {
        unsafe { sbmbo_label_destroy() }
    }
}

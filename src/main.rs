// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

// Generic modules (cross-platform)
mod sbgc_core;
mod sbge_error;
mod sbgs_sizer;
mod sbgn_center;
mod sbgm_message;
mod sbgb_binding;
mod sbgfc_config;
mod sbgh_host;
mod sbgr_resize;
mod sbgo_notice;
mod sbga_actions;
mod sbgl_logging;

// macOS base modules
#[cfg(target_os = "macos")] mod sbmba_ax;
#[cfg(target_os = "macos")] mod sbmbd_display;
#[cfg(target_os = "macos")] mod sbmbk_keymap;
#[cfg(target_os = "macos")] mod sbmbo_notice;
#[cfg(target_os = "macos")] mod sbmbw_window;
#[cfg(target_os = "macos")] mod sbmbe_eventtap;

#[cfg(not(target_os = "macos"))]
fn main() {
    sbgl_logging::init_logging();
    tracing::error!("sizeboard currently only supports macOS");
    std::process::exit(1);
}

#[cfg(target_os = "macos")]
fn main() {
    sbgl_logging::init_logging();

    let instance = match single_instance::SingleInstance::new("com.scaleinvariant.sizeboard") {
        Ok(instance) => instance,
        Err(e) => {
            tracing::error!("FATAL: single-instance check failed: {}", e);
            std::process::exit(1);
        }
    };
    if !instance.is_single() {
        tracing::error!("FATAL: another sizeboard is already running");
        std::process::exit(1);
    }

    unsafe { sbmbe_eventtap::run_sizeboard(); }
}

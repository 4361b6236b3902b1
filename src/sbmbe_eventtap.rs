// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

#![cfg(target_os = "macos")]

use core_foundation::base::kCFAllocatorDefault;
use core_foundation::runloop::kCFRunLoopDefaultMode;
use std::ffi::c_void;
use std::sync::atomic::{AtomicBool, AtomicPtr, Ordering};
use std::sync::{Arc, Mutex};

use lazy_static::lazy_static;

use crate::sbga_actions::{ActionRegistry, Dispatcher};
use crate::sbgb_binding::ActionName;
use crate::sbge_error::HostError;
use crate::sbgfc_config::Config;
use crate::sbgl_logging::key_logging_enabled;
use crate::sbmbk_keymap::*;
use crate::sbmbd_display::print_display_summary;
use crate::sbmbo_notice::{MacLabel, NOTICE};
use crate::sbmbw_window::MacWindow;
use crate::sbmba_ax::{
    ax_trusted_or_die, get_frontmost_app_info,
    CFRunLoopGetCurrent, CFRunLoopRun, CFRunLoopAddSource,
    CGEventTapCreate, CGEventTapEnable, CGEventTapIsEnabled,
    CGEventGetIntegerValueField, CGEventGetFlags,
    CFMachPortCreateRunLoopSource,
    CFAbsoluteTimeGetCurrent, CFRunLoopTimerCreate, CFRunLoopAddTimer, CFRunLoopTimerContext,
};

lazy_static! {
    pub static ref CONFIG: Config = Config::load_from_file();

    static ref DISPATCHER: Mutex<Dispatcher<MacLabel>> = Mutex::new(Dispatcher::new(
        ActionRegistry::from_config(&CONFIG),
        Arc::clone(&NOTICE),
    ));
}

static WARNED_UNKNOWN_ONCE: AtomicBool = AtomicBool::new(false);

// Global tap pointer for health check timer
static EVENT_TAP_PTR: AtomicPtr<c_void> = AtomicPtr::new(std::ptr::null_mut());

extern "C" fn tap_cb(_proxy: *mut c_void, event_type: u32, event: *mut c_void, _user: *mut c_void) -> *mut c_void {
    unsafe {
        if event_type == K_CG_EVENT_TAP_DISABLED_BY_TIMEOUT || event_type == K_CG_EVENT_TAP_DISABLED_BY_USER_INPUT {
            tracing::warn!("TAP: disabled by macOS (type=0x{:x}), re-enabling", event_type);
            let tap = EVENT_TAP_PTR.load(Ordering::Acquire);
            if !tap.is_null() {
                CGEventTapEnable(tap, true);
            }
            return event;
        }

        if event_type != K_CG_EVENT_KEY_DOWN {
            return event;
        }

        let keycode = CGEventGetIntegerValueField(event, K_CG_KEYCODE_FIELD_KEYCODE) as u16;
        let Some(key) = vk_to_key_name(keycode) else {
            if key_logging_enabled() && !WARNED_UNKNOWN_ONCE.swap(true, Ordering::AcqRel) {
                tracing::info!("KEY: unmapped keycode 0x{:02x} (further unmapped keys not reported)", keycode);
            }
            return event;
        };
        let pressed = flags_to_modifiers(CGEventGetFlags(event));

        let mut dispatcher = DISPATCHER.lock().unwrap_or_else(|e| e.into_inner());
        let Some(binding) = dispatcher.registry().match_chord(key, pressed) else {
            return event;
        };

        if key_logging_enabled() {
            tracing::info!(
                "KEY: {} cmd={} ctrl={} opt={} shift={} -> {} reversed={}",
                key, pressed.super_key, pressed.ctrl, pressed.alt, pressed.shift,
                binding.action, binding.reversed
            );
        }

        let mut window = match focused_window() {
            Ok(window) => window,
            Err(e) => {
                tracing::warn!("SIZE: {} | FAILED reason={}", binding.action, e);
                return std::ptr::null_mut();
            }
        };

        if !binding.scope.claims_chord(window.is_some()) {
            tracing::debug!("SIZE: {} skipped, no focused window", binding.action);
            return event;
        }

        // Holding a chord does not keep cycling
        if CGEventGetIntegerValueField(event, K_CG_KEYBOARD_EVENT_AUTOREPEAT) != 0 {
            return std::ptr::null_mut();
        }

        // Outcome is logged by the dispatcher
        let _ = dispatcher.invoke(window.as_mut(), &binding);

        std::ptr::null_mut() // <- swallow the event
    }
}

unsafe fn focused_window() -> Result<Option<MacWindow>, HostError> {
    match get_frontmost_app_info() {
        Some(frontmost) => {
            tracing::debug!("SIZE: frontmost {} (pid={})", frontmost.bundle_id, frontmost.pid);
            MacWindow::focused(frontmost.pid)
        }
        None => Ok(None),
    }
}

// Timer callback to check event tap health
extern "C" fn tap_health_check_timer(_timer: *mut c_void, _info: *mut c_void) {
    unsafe {
        let tap = EVENT_TAP_PTR.load(Ordering::Acquire);
        if tap.is_null() {
            return; // Not initialized yet
        }

        if !CGEventTapIsEnabled(tap) {
            tracing::warn!("TAP: disabled by macOS, re-enabling");
            CGEventTapEnable(tap, true);

            if CGEventTapIsEnabled(tap) {
                tracing::info!("TAP: re-enabled");
            } else {
                tracing::error!("TAP: could not re-enable; bindings are inactive");
            }
        }
    }
}

pub unsafe fn run_sizeboard() -> ! {
    ax_trusted_or_die();

    tracing::info!("sizeboard: resize and center the focused window");

    // Force config load and binding registration before the first key press
    lazy_static::initialize(&DISPATCHER);
    {
        let dispatcher = DISPATCHER.lock().unwrap_or_else(|e| e.into_inner());
        for registered in dispatcher.registry().actions() {
            tracing::info!("  {} -> {} ({:?})", registered.accel, registered.action, registered.scope);
        }
        if !dispatcher.registry().is_registered(ActionName::CycleSizes)
            && !dispatcher.registry().is_registered(ActionName::CycleSizesBackward)
        {
            tracing::warn!("No cycle binding registered; only centering is available");
        }
    }

    print_display_summary(&CONFIG.sizes);

    let tap = CGEventTapCreate(
        K_CG_SESSION_EVENT_TAP,
        K_CG_HEAD_INSERT_EVENT_TAP,
        K_CG_EVENT_TAP_OPTION_DEFAULT,
        CG_EVENT_MASK_KEY_DOWN,
        tap_cb,
        std::ptr::null_mut(),
    );
    if tap.is_null() {
        tracing::error!("TAP: FAILED to create CGEventTap");
        std::process::exit(1);
    }

    CGEventTapEnable(tap, true);
    let src = CFMachPortCreateRunLoopSource(kCFAllocatorDefault as *const c_void, tap, 0);
    CFRunLoopAddSource(CFRunLoopGetCurrent(), src, kCFRunLoopDefaultMode as *mut c_void);

    EVENT_TAP_PTR.store(tap, Ordering::Release);

    let timer_context = CFRunLoopTimerContext {
        version: 0,
        info: std::ptr::null_mut(),
        retain: None,
        release: None,
        copy_description: None,
    };

    let now = CFAbsoluteTimeGetCurrent();
    let health_check_timer = CFRunLoopTimerCreate(
        kCFAllocatorDefault as *const c_void,
        now + 0.5,                    // First fire after 500ms
        0.5,                          // Repeat every 500ms
        0,                            // flags
        0,                            // order
        tap_health_check_timer,
        &timer_context as *const _,
    );

    if !health_check_timer.is_null() {
        CFRunLoopAddTimer(
            CFRunLoopGetCurrent(),
            health_check_timer,
            kCFRunLoopDefaultMode as *mut c_void,
        );
        tracing::debug!("TAP: health monitoring enabled (500ms interval)");
    } else {
        tracing::warn!("TAP: failed to create health check timer; auto-recovery disabled");
    }

    tracing::info!("Ctrl-C to quit...");

    CFRunLoopRun();
    std::process::exit(0);
}

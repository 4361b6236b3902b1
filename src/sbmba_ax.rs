// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

#![cfg(target_os = "macos")]

use core_foundation::base::{CFRelease, TCFType};
use core_foundation::string::CFString;
use core_foundation_sys::base::CFTypeRef;
use std::ffi::c_void;

use objc2::runtime::Bool;
use objc2::msg_send;
use objc2_app_kit::NSWorkspace;

use crate::sbge_error::HostError;
use crate::sbmbd_display::PointRect;

// Frontmost app information structure
#[derive(Clone, Debug)]
pub struct FrontmostInfo {
    pub pid: u32,
    pub bundle_id: String,
}

// AX types
#[repr(C)]
pub struct __AXUIElement(std::ffi::c_void);
pub type AXUIElementRef = *const __AXUIElement;

#[repr(C)]
pub struct __AXValue(std::ffi::c_void);
pub type AXValueRef = *const __AXValue;

// ApplicationServices linking
#[link(name = "ApplicationServices", kind = "framework")]
#[link(name = "System", kind = "dylib")]
extern "C" {
    // AX trust check
    fn AXIsProcessTrustedWithOptions(options: CFTypeRef) -> Bool;

    // AX basics
    pub fn AXUIElementCreateApplication(pid: u32) -> AXUIElementRef;
    pub fn AXUIElementCopyAttributeValue(element: AXUIElementRef, attr: CFTypeRef, out: *mut CFTypeRef) -> i32;
    pub fn AXUIElementSetAttributeValue(element: AXUIElementRef, attr: CFTypeRef, value: CFTypeRef) -> i32;

    // AXValue
    fn AXValueCreate(theType: i32, valuePtr: *const std::ffi::c_void) -> AXValueRef;
    fn AXValueGetValue(value: AXValueRef, theType: i32, valuePtr: *mut std::ffi::c_void) -> bool;

    // CFRunLoop functions
    pub fn CFRunLoopGetCurrent() -> *mut c_void;
    pub fn CFRunLoopGetMain() -> *mut c_void;
    pub fn CFRunLoopRun();
    pub fn CFRunLoopPerformBlock(rl: *mut c_void, mode: CFTypeRef, block: *const c_void);
    pub fn CFRunLoopWakeUp(rl: *mut c_void);
    pub fn CFRunLoopAddSource(rl: *mut c_void, source: *mut c_void, mode: CFTypeRef);

    // CFAbsoluteTime
    pub fn CFAbsoluteTimeGetCurrent() -> f64;

    // CFRunLoopTimer
    pub fn CFRunLoopTimerCreate(
        allocator: *const c_void,
        fireDate: f64,
        interval: f64,
        flags: u32,
        order: i32,
        callout: extern "C" fn(*mut c_void, *mut c_void),
        context: *const CFRunLoopTimerContext,
    ) -> *mut c_void;
    pub fn CFRunLoopAddTimer(rl: *mut c_void, timer: *mut c_void, mode: CFTypeRef);

    // CFBoolean constants
    pub static kCFBooleanTrue: CFTypeRef;
    pub static kCFBooleanFalse: CFTypeRef;

    // Event tap functions
    pub fn CGEventTapCreate(
        tap: u32,
        place: u32,
        options: u32,
        events_of_interest: u64,
        callback: extern "C" fn(proxy: *mut c_void, event_type: u32, event: *mut c_void, context: *mut c_void) -> *mut c_void,
        context: *mut c_void,
    ) -> *mut c_void;
    pub fn CGEventTapEnable(tap: *mut c_void, enable: bool);
    pub fn CGEventTapIsEnabled(tap: *mut c_void) -> bool;
    pub fn CGEventGetIntegerValueField(event: *mut c_void, field: u32) -> i64;
    pub fn CGEventGetFlags(event: *mut c_void) -> u64;
    pub fn CFMachPortCreateRunLoopSource(allocator: *const c_void, port: *const c_void, order: i32) -> *mut c_void;
}

// AppKit linking
#[link(name = "AppKit", kind = "framework")]
extern "C" {}

// AX constants
pub const KAX_ERROR_SUCCESS: i32 = 0;
pub const KAX_ERROR_PERMISSION_DENIED: i32 = -25204;
const KAX_VALUE_TYPE_CGPOINT: i32 = 1;
const KAX_VALUE_TYPE_CGSIZE: i32 = 2;

// CFRunLoopTimerContext structure for timers
#[repr(C)]
pub struct CFRunLoopTimerContext {
    pub version: i32,
    pub info: *mut c_void,
    pub retain: Option<extern "C" fn(*const c_void) -> *const c_void>,
    pub release: Option<extern "C" fn(*const c_void)>,
    pub copy_description: Option<extern "C" fn(*const c_void) -> *mut c_void>,
}

// Point structure used for both position and size in AX APIs
#[repr(C)]
#[derive(Copy, Clone, Debug)]
struct Pt { x: f64, y: f64 }

fn host_error(rc: i32) -> HostError {
    if rc == KAX_ERROR_PERMISSION_DENIED { HostError::Permission } else { HostError::Platform(rc) }
}

// RAII wrapper for AXUIElement
pub struct AxElement(pub AXUIElementRef);

// Only touched on the main runloop thread
unsafe impl Send for AxElement {}

impl AxElement {
    pub unsafe fn from_pid(pid: u32) -> Result<Self, HostError> {
        let app = AXUIElementCreateApplication(pid);
        if app.is_null() {
            Err(HostError::Platform(-1))
        } else {
            Ok(AxElement(app))
        }
    }

    pub unsafe fn focused_window(&self) -> Result<Self, HostError> {
        let mut win_ref: CFTypeRef = std::ptr::null();
        let attr = ax_attr_focused_window();
        let rc = AXUIElementCopyAttributeValue(self.0, attr.as_concrete_TypeRef() as CFTypeRef, &mut win_ref);
        if rc != KAX_ERROR_SUCCESS || win_ref.is_null() {
            Err(host_error(rc))
        } else {
            Ok(AxElement(win_ref as AXUIElementRef))
        }
    }

    pub unsafe fn set_size(&self, w: f64, h: f64) -> Result<(), HostError> {
        let size = Pt { x: w, y: h };
        let size_val = AXValueCreate(KAX_VALUE_TYPE_CGSIZE, &size as *const _ as *const _);
        if size_val.is_null() {
            return Err(HostError::Platform(-1));
        }

        let attr = ax_attr_size();
        let rc = AXUIElementSetAttributeValue(self.0, attr.as_concrete_TypeRef() as CFTypeRef, size_val as CFTypeRef);
        CFRelease(size_val as CFTypeRef);

        if rc != KAX_ERROR_SUCCESS {
            Err(if rc == KAX_ERROR_PERMISSION_DENIED { HostError::Permission } else { HostError::Constrained })
        } else {
            Ok(())
        }
    }

    pub unsafe fn set_position(&self, x: f64, y: f64) -> Result<(), HostError> {
        let pos = Pt { x, y };
        let pos_val = AXValueCreate(KAX_VALUE_TYPE_CGPOINT, &pos as *const _ as *const _);
        if pos_val.is_null() {
            return Err(HostError::Platform(-1));
        }

        let attr = ax_attr_position();
        let rc = AXUIElementSetAttributeValue(self.0, attr.as_concrete_TypeRef() as CFTypeRef, pos_val as CFTypeRef);
        CFRelease(pos_val as CFTypeRef);

        if rc != KAX_ERROR_SUCCESS { Err(host_error(rc)) } else { Ok(()) }
    }

    pub unsafe fn get_title(&self) -> Option<String> {
        let mut title_ref: CFTypeRef = std::ptr::null();
        let attr = ax_attr_title();
        let rc = AXUIElementCopyAttributeValue(self.0, attr.as_concrete_TypeRef() as CFTypeRef, &mut title_ref);

        if rc == KAX_ERROR_SUCCESS && !title_ref.is_null() {
            let cf_string = CFString::wrap_under_create_rule(title_ref as *const _);
            Some(cf_string.to_string())
        } else {
            None
        }
    }

    /// Frame in global top-left points
    pub unsafe fn get_current_rect(&self) -> Option<PointRect> {
        let mut pos_ref: CFTypeRef = std::ptr::null();
        let pos_attr = ax_attr_position();
        let pos_rc = AXUIElementCopyAttributeValue(self.0, pos_attr.as_concrete_TypeRef() as CFTypeRef, &mut pos_ref);

        let mut size_ref: CFTypeRef = std::ptr::null();
        let size_attr = ax_attr_size();
        let size_rc = AXUIElementCopyAttributeValue(self.0, size_attr.as_concrete_TypeRef() as CFTypeRef, &mut size_ref);

        if pos_rc == KAX_ERROR_SUCCESS && size_rc == KAX_ERROR_SUCCESS && !pos_ref.is_null() && !size_ref.is_null() {
            let mut pos = Pt { x: 0.0, y: 0.0 };
            let pos_ok = AXValueGetValue(pos_ref as AXValueRef, KAX_VALUE_TYPE_CGPOINT, &mut pos as *mut _ as *mut _);

            let mut size = Pt { x: 0.0, y: 0.0 };
            let size_ok = AXValueGetValue(size_ref as AXValueRef, KAX_VALUE_TYPE_CGSIZE, &mut size as *mut _ as *mut _);

            CFRelease(pos_ref);
            CFRelease(size_ref);

            if pos_ok && size_ok {
                Some(PointRect { x: pos.x, y: pos.y, w: size.x, h: size.y })
            } else {
                None
            }
        } else {
            if !pos_ref.is_null() { CFRelease(pos_ref); }
            if !size_ref.is_null() { CFRelease(size_ref); }
            None
        }
    }

    /// Read a boolean attribute; missing or unsupported reads as false
    pub unsafe fn get_bool(&self, attr: &CFString) -> bool {
        let mut value: CFTypeRef = std::ptr::null();
        let rc = AXUIElementCopyAttributeValue(self.0, attr.as_concrete_TypeRef() as CFTypeRef, &mut value);
        if rc != KAX_ERROR_SUCCESS || value.is_null() {
            return false;
        }
        let is_true = value == kCFBooleanTrue;
        CFRelease(value);
        is_true
    }

    pub unsafe fn set_bool(&self, attr: &CFString, on: bool) -> Result<(), HostError> {
        let value = if on { kCFBooleanTrue } else { kCFBooleanFalse };
        let rc = AXUIElementSetAttributeValue(self.0, attr.as_concrete_TypeRef() as CFTypeRef, value);
        if rc != KAX_ERROR_SUCCESS { Err(host_error(rc)) } else { Ok(()) }
    }
}

impl Drop for AxElement {
    fn drop(&mut self) {
        unsafe {
            if !self.0.is_null() {
                CFRelease(self.0 as CFTypeRef);
            }
        }
    }
}

// CFString helpers - create on demand to avoid static initialization issues
pub unsafe fn ax_attr_focused_window() -> CFString {
    CFString::from_static_string("AXFocusedWindow")
}

pub unsafe fn ax_attr_position() -> CFString {
    CFString::from_static_string("AXPosition")
}

pub unsafe fn ax_attr_size() -> CFString {
    CFString::from_static_string("AXSize")
}

pub unsafe fn ax_attr_title() -> CFString {
    CFString::from_static_string("AXTitle")
}

pub unsafe fn ax_attr_full_screen() -> CFString {
    CFString::from_static_string("AXFullScreen")
}

// Get frontmost app PID and bundle ID via NSWorkspace
pub unsafe fn get_frontmost_app_info() -> Option<FrontmostInfo> {
    let workspace = NSWorkspace::sharedWorkspace();

    let frontmost_app = workspace.frontmostApplication()?;

    // processIdentifier returns pid_t, which is i32 on macOS
    let pid: i32 = msg_send![&frontmost_app, processIdentifier];
    if pid <= 0 {
        return None;
    }

    let bundle_id = match frontmost_app.bundleIdentifier() {
        Some(ns_str) => ns_str.to_string(),
        None => "<no_bundle_id>".to_string(),
    };

    Some(FrontmostInfo {
        pid: pid as u32,
        bundle_id,
    })
}

pub fn check_ax_permissions() -> bool {
    unsafe {
        AXIsProcessTrustedWithOptions(std::ptr::null()).as_bool()
    }
}

pub unsafe fn ax_trusted_or_die() {
    if !check_ax_permissions() {
        tracing::error!("Accessibility permission required. Grant it in System Settings → Privacy & Security → Accessibility, then restart.");
        std::process::exit(1);
    }
}

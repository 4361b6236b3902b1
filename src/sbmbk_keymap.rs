// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

#![cfg(target_os = "macos")]

use crate::sbgb_binding::Modifiers;

// CGEvent constants
pub const K_CG_KEYBOARD_EVENT_AUTOREPEAT: u32 = 8;
pub const K_CG_SESSION_EVENT_TAP: u32 = 1;
pub const K_CG_HEAD_INSERT_EVENT_TAP: u32 = 0;
pub const K_CG_EVENT_TAP_OPTION_DEFAULT: u32 = 0;
pub const K_CG_EVENT_KEY_DOWN: u32 = 10;
pub const K_CG_EVENT_TAP_DISABLED_BY_TIMEOUT: u32 = 0xFFFF_FFFE;
pub const K_CG_EVENT_TAP_DISABLED_BY_USER_INPUT: u32 = 0xFFFF_FFFF;
pub const CG_EVENT_MASK_KEY_DOWN: u64 = 1u64 << K_CG_EVENT_KEY_DOWN;
pub const K_CG_KEYCODE_FIELD_KEYCODE: u32 = 9;
pub const K_CG_EVENT_FLAG_MASK_CONTROL: u64 = 1 << 18;
pub const K_CG_EVENT_FLAG_MASK_SHIFT: u64 = 1 << 17;
pub const K_CG_EVENT_FLAG_MASK_COMMAND: u64 = 1 << 20;
pub const K_CG_EVENT_FLAG_MASK_ALTERNATE: u64 = 1 << 19;

/// Command maps to Super, Option to Alt
pub fn flags_to_modifiers(flags: u64) -> Modifiers {
    Modifiers {
        super_key: (flags & K_CG_EVENT_FLAG_MASK_COMMAND) != 0,
        ctrl: (flags & K_CG_EVENT_FLAG_MASK_CONTROL) != 0,
        alt: (flags & K_CG_EVENT_FLAG_MASK_ALTERNATE) != 0,
        shift: (flags & K_CG_EVENT_FLAG_MASK_SHIFT) != 0,
    }
}

// Convert macOS virtual keycode to the key name used in accelerators.
// Positions follow the ANSI-US layout.
pub fn vk_to_key_name(vk: u16) -> Option<&'static str> {
    match vk {
        // Letters
        0x00 => Some("a"),
        0x0B => Some("b"),
        0x08 => Some("c"),
        0x02 => Some("d"),
        0x0E => Some("e"),
        0x03 => Some("f"),
        0x05 => Some("g"),
        0x04 => Some("h"),
        0x22 => Some("i"),
        0x26 => Some("j"),
        0x28 => Some("k"),
        0x25 => Some("l"),
        0x2E => Some("m"),
        0x2D => Some("n"),
        0x1F => Some("o"),
        0x23 => Some("p"),
        0x0C => Some("q"),
        0x0F => Some("r"),
        0x01 => Some("s"),
        0x11 => Some("t"),
        0x20 => Some("u"),
        0x09 => Some("v"),
        0x0D => Some("w"),
        0x07 => Some("x"),
        0x10 => Some("y"),
        0x06 => Some("z"),

        // Numbers
        0x12 => Some("1"),
        0x13 => Some("2"),
        0x14 => Some("3"),
        0x15 => Some("4"),
        0x17 => Some("5"),
        0x16 => Some("6"),
        0x1A => Some("7"),
        0x1C => Some("8"),
        0x19 => Some("9"),
        0x1D => Some("0"),

        // Special keys
        0x24 => Some("return"),
        0x35 => Some("escape"),
        0x33 => Some("backspace"),
        0x30 => Some("tab"),
        0x31 => Some("space"),
        0x1B => Some("minus"),
        0x18 => Some("equal"),
        0x21 => Some("bracketleft"),
        0x1E => Some("bracketright"),
        0x2A => Some("backslash"),
        0x29 => Some("semicolon"),
        0x27 => Some("apostrophe"),
        0x32 => Some("grave"),
        0x2B => Some("comma"),
        0x2F => Some("period"),
        0x2C => Some("slash"),

        // Function keys
        0x7A => Some("f1"),
        0x78 => Some("f2"),
        0x63 => Some("f3"),
        0x76 => Some("f4"),
        0x60 => Some("f5"),
        0x61 => Some("f6"),
        0x62 => Some("f7"),
        0x64 => Some("f8"),
        0x65 => Some("f9"),
        0x6D => Some("f10"),
        0x67 => Some("f11"),
        0x6F => Some("f12"),

        // Extended keys
        0x72 => Some("insert"),
        0x73 => Some("home"),
        0x74 => Some("page_up"),
        0x75 => Some("delete"),
        0x77 => Some("end"),
        0x79 => Some("page_down"),

        // Arrow keys
        0x7C => Some("right"),
        0x7B => Some("left"),
        0x7D => Some("down"),
        0x7E => Some("up"),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_to_modifiers() {
        let m = flags_to_modifiers(K_CG_EVENT_FLAG_MASK_CONTROL | K_CG_EVENT_FLAG_MASK_ALTERNATE);
        assert!(m.ctrl && m.alt);
        assert!(!m.super_key && !m.shift);

        let m = flags_to_modifiers(K_CG_EVENT_FLAG_MASK_COMMAND | K_CG_EVENT_FLAG_MASK_SHIFT);
        assert!(m.super_key && m.shift);
    }

    #[test]
    fn test_vk_names() {
        assert_eq!(vk_to_key_name(0x06), Some("z"));
        assert_eq!(vk_to_key_name(0x08), Some("c"));
        assert_eq!(vk_to_key_name(0x7E), Some("up"));
        assert_eq!(vk_to_key_name(0x3B), None);
    }
}

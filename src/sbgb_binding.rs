// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

/// Key binding model
///
/// Accelerators use the GTK string form stored by the settings file:
/// zero or more `<Modifier>` tokens followed by a key name, e.g.
/// `<Super><Shift>z`. A binding fires "reversed" when its chord is pressed
/// with Shift added on top of an accelerator that does not itself use Shift.

use std::fmt;

/// Named actions exposed to the key-binding layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionName {
    CycleSizes,
    CycleSizesBackward,
    CenterWindow,
}

impl ActionName {
    pub const ALL: [ActionName; 3] = [
        ActionName::CycleSizes,
        ActionName::CycleSizesBackward,
        ActionName::CenterWindow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionName::CycleSizes => "cycle-window-sizes",
            ActionName::CycleSizesBackward => "cycle-window-sizes-backward",
            ActionName::CenterWindow => "center-window",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.as_str() == s)
    }

    pub fn is_cycle(&self) -> bool {
        matches!(self, ActionName::CycleSizes | ActionName::CycleSizesBackward)
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub super_key: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub fn with_shift(self) -> Self {
        Self { shift: true, ..self }
    }
}

/// Parsed accelerator: modifier set plus a lowercase key name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Accelerator {
    pub modifiers: Modifiers,
    pub key: String,
}

impl Accelerator {
    pub fn parse(s: &str) -> Result<Self, String> {
        let mut modifiers = Modifiers::default();
        let mut rest = s.trim();

        while let Some(stripped) = rest.strip_prefix('<') {
            let end = stripped.find('>')
                .ok_or_else(|| format!("unterminated modifier in '{}'", s))?;
            let name = &stripped[..end];
            match name.to_lowercase().as_str() {
                "super" | "meta" | "cmd" => modifiers.super_key = true,
                "ctrl" | "control" | "primary" => modifiers.ctrl = true,
                "alt" | "option" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                _ => return Err(format!("unknown modifier <{}> in '{}'", name, s)),
            }
            rest = &stripped[end + 1..];
        }

        if rest.is_empty() {
            return Err(format!("missing key in '{}'", s));
        }
        if rest.contains('<') || rest.contains('>') {
            return Err(format!("stray bracket in '{}'", s));
        }

        Ok(Self { modifiers, key: rest.to_lowercase() })
    }

    /// Match a pressed chord: Some(false) for the plain form, Some(true) for
    /// the reversed (Shift-added) form
    pub fn matches(&self, key: &str, pressed: Modifiers) -> Option<bool> {
        if !self.key.eq_ignore_ascii_case(key) {
            return None;
        }
        if pressed == self.modifiers {
            Some(false)
        } else if !self.modifiers.shift && pressed == self.modifiers.with_shift() {
            Some(true)
        } else {
            None
        }
    }
}

impl fmt::Display for Accelerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.super_key { f.write_str("<Super>")?; }
        if self.modifiers.ctrl { f.write_str("<Ctrl>")?; }
        if self.modifiers.alt { f.write_str("<Alt>")?; }
        if self.modifiers.shift { f.write_str("<Shift>")?; }
        f.write_str(&self.key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindingScope {
    /// Only active while a window has focus; otherwise the chord reaches
    /// the frontmost app untouched
    #[default]
    PerWindow,
    /// Always consumed, even with nothing focused
    Global,
}

impl BindingScope {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "window" | "per-window" => Some(BindingScope::PerWindow),
            "global" => Some(BindingScope::Global),
            _ => None,
        }
    }

    /// Whether a matched chord should be taken given the current focus
    pub fn claims_chord(&self, window_focused: bool) -> bool {
        match self {
            BindingScope::PerWindow => window_focused,
            BindingScope::Global => true,
        }
    }
}

/// What the host tells a handler about the binding that fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingDescriptor {
    pub action: ActionName,
    pub reversed: bool,
    pub scope: BindingScope,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accelerator() {
        let accel = Accelerator::parse("<Super><Shift>Z").unwrap();
        assert!(accel.modifiers.super_key);
        assert!(accel.modifiers.shift);
        assert!(!accel.modifiers.ctrl);
        assert_eq!(accel.key, "z");
        assert_eq!(accel.to_string(), "<Super><Shift>z");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(Accelerator::parse("").is_err());
        assert!(Accelerator::parse("<Super>").is_err());
        assert!(Accelerator::parse("<Hyper>z").is_err());
        assert!(Accelerator::parse("<Super z").is_err());
        assert!(Accelerator::parse("<Super>z>").is_err());
    }

    #[test]
    fn test_reversed_chord_adds_shift() {
        let accel = Accelerator::parse("<Super>z").unwrap();
        let sup = Modifiers { super_key: true, ..Default::default() };

        assert_eq!(accel.matches("z", sup), Some(false));
        assert_eq!(accel.matches("z", sup.with_shift()), Some(true));
        assert_eq!(accel.matches("x", sup), None);
        assert_eq!(accel.matches("z", Modifiers::default()), None);
    }

    #[test]
    fn test_shift_accelerator_has_no_reversed_form() {
        let accel = Accelerator::parse("<Ctrl><Shift>c").unwrap();
        let pressed = Modifiers { ctrl: true, shift: true, ..Default::default() };
        assert_eq!(accel.matches("c", pressed), Some(false));
        assert_eq!(accel.matches("c", Modifiers { ctrl: true, ..Default::default() }), None);
    }

    #[test]
    fn test_action_names_round_trip() {
        for action in ActionName::ALL {
            assert_eq!(ActionName::parse(action.as_str()), Some(action));
        }
        assert_eq!(ActionName::parse("maximize"), None);
    }

    #[test]
    fn test_binding_scope() {
        assert_eq!(BindingScope::parse("global"), Some(BindingScope::Global));
        assert_eq!(BindingScope::parse(" Window "), Some(BindingScope::PerWindow));
        assert_eq!(BindingScope::parse("desktop"), None);
        assert_eq!(BindingScope::default(), BindingScope::PerWindow);

        assert!(BindingScope::PerWindow.claims_chord(true));
        assert!(!BindingScope::PerWindow.claims_chord(false));
        assert!(BindingScope::Global.claims_chord(false));
    }
}

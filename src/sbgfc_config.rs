// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

/// Settings store
/// Handles config path resolution, default deployment and XML parsing
///
/// Responsibilities:
/// - Config path resolution (~/.config/sizeboard/sizes.xml)
/// - Deployment of the embedded default when no config exists
/// - Parsing sizes, key bindings and notice timing
/// - Falling back to the embedded default when the user's file is invalid

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::sbgb_binding::BindingScope;
use crate::sbgc_core::Size;
use crate::sbge_error::ConfigError;

// ============================================================================
// SECTION 1: Embedded default configuration
// ============================================================================

const DEFAULT_SIZES_XML: &str = include_str!("../sizes.default.xml");

const DEFAULT_HOLD_MS: u64 = 500;
const DEFAULT_FADE_MS: u64 = 1500;

// ============================================================================
// SECTION 2: Runtime types
// ============================================================================

/// A binding as stored in settings; parsed and validated at registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingSpec {
    pub action: String,
    pub accel: String,
    pub scope: BindingScope,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoticeTiming {
    pub hold: Duration,
    pub fade: Duration,
}

impl Default for NoticeTiming {
    fn default() -> Self {
        Self {
            hold: Duration::from_millis(DEFAULT_HOLD_MS),
            fade: Duration::from_millis(DEFAULT_FADE_MS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub sizes: Vec<Size>,
    pub bindings: Vec<BindingSpec>,
    pub notice: NoticeTiming,
}

// ============================================================================
// SECTION 3: Path resolution and loading
// ============================================================================

/// Resolve the standard config file path
pub fn config_path() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(".config");
    path.push("sizeboard");
    path.push("sizes.xml");
    path
}

impl Config {
    /// Load from the standard location, deploying the default if missing
    pub fn load_from_file() -> Self {
        Self::load_from_path(&config_path())
    }

    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(xml) => {
                tracing::debug!("CONFIG: parsing {}", path.display());
                match Self::parse_xml(&xml) {
                    Ok(config) => {
                        tracing::info!(
                            "CONFIG: loaded {} sizes, {} bindings from {}",
                            config.sizes.len(), config.bindings.len(), path.display()
                        );
                        config
                    }
                    Err(e) => {
                        // Leave the user's invalid file in place
                        tracing::warn!("CONFIG: parse_error ({}), reverting to built-in default", e);
                        Self::embedded_default()
                    }
                }
            }
            Err(_) => {
                if let Err(e) = Self::deploy_default(path) {
                    tracing::warn!("CONFIG: failed to deploy default to {}: {}", path.display(), e);
                } else {
                    tracing::info!("CONFIG: deployed embedded default to {}", path.display());
                }
                Self::embedded_default()
            }
        }
    }

    fn deploy_default(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_SIZES_XML)?;
        Ok(())
    }

    /// Parse the embedded default; an empty config if even that fails
    pub fn embedded_default() -> Self {
        Self::parse_xml(DEFAULT_SIZES_XML).unwrap_or_else(|e| {
            tracing::error!("CONFIG: embedded default invalid: {}", e);
            Self {
                sizes: Vec::new(),
                bindings: Vec::new(),
                notice: NoticeTiming::default(),
            }
        })
    }

    // ========================================================================
    // SECTION 4: XML parsing
    // ========================================================================

    pub fn parse_xml(xml: &str) -> Result<Self, ConfigError> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut sizes = Vec::new();
        let mut bindings = Vec::new();
        let mut notice = NoticeTiming::default();
        let mut saw_root = false;

        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    match e.name().as_ref() {
                        b"Sizeboard" => saw_root = true,
                        b"Size" => {
                            if let Some(size) = Self::parse_size(e)? {
                                sizes.push(size);
                            }
                        }
                        b"Binding" => bindings.push(Self::parse_binding(e)?),
                        b"Notice" => notice = Self::parse_notice(e)?,
                        _ => {}
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !saw_root {
            return Err(ConfigError::Invalid("missing <Sizeboard> root".to_string()));
        }

        Ok(Self { sizes, bindings, notice })
    }

    /// Zero dimensions are skipped with a warning; non-numbers are errors
    fn parse_size(e: &BytesStart) -> Result<Option<Size>, ConfigError> {
        let mut width: Option<u32> = None;
        let mut height: Option<u32> = None;

        for attr in e.attributes() {
            let attr = attr?;
            let value = String::from_utf8_lossy(&attr.value).to_string();
            match attr.key.as_ref() {
                b"width" => width = Some(Self::parse_u32(&value)?),
                b"height" => height = Some(Self::parse_u32(&value)?),
                _ => {}
            }
        }

        match (width, height) {
            (Some(w), Some(h)) if w == 0 || h == 0 => {
                tracing::warn!("CONFIG: WARNING skipping size with zero dimension ({}x{})", w, h);
                Ok(None)
            }
            (Some(w), Some(h)) => Ok(Some(Size::new(w, h))),
            _ => Err(ConfigError::Invalid("Size missing required attributes (width, height)".to_string())),
        }
    }

    fn parse_binding(e: &BytesStart) -> Result<BindingSpec, ConfigError> {
        let mut action = None;
        let mut accel = None;
        let mut scope = BindingScope::default();

        for attr in e.attributes() {
            let attr = attr?;
            match attr.key.as_ref() {
                b"action" => action = Some(attr.unescape_value()?.into_owned()),
                b"accel" => accel = Some(attr.unescape_value()?.into_owned()),
                b"scope" => {
                    let value = attr.unescape_value()?;
                    scope = BindingScope::parse(&value)
                        .ok_or_else(|| ConfigError::Invalid(format!("invalid binding scope: {}", value)))?;
                }
                _ => {}
            }
        }

        match (action, accel) {
            (Some(action), Some(accel)) => Ok(BindingSpec { action, accel, scope }),
            _ => Err(ConfigError::Invalid("Binding missing required attributes (action, accel)".to_string())),
        }
    }

    fn parse_notice(e: &BytesStart) -> Result<NoticeTiming, ConfigError> {
        let mut timing = NoticeTiming::default();

        for attr in e.attributes() {
            let attr = attr?;
            let value = String::from_utf8_lossy(&attr.value).to_string();
            match attr.key.as_ref() {
                b"holdMs" => timing.hold = Duration::from_millis(Self::parse_u32(&value)? as u64),
                b"fadeMs" => timing.fade = Duration::from_millis(Self::parse_u32(&value)? as u64),
                _ => {}
            }
        }

        Ok(timing)
    }

    fn parse_u32(value: &str) -> Result<u32, ConfigError> {
        value.trim().parse::<u32>()
            .map_err(|_| ConfigError::Invalid(format!("invalid number: {}", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_default_parses() {
        let config = Config::parse_xml(DEFAULT_SIZES_XML).unwrap();
        assert!(!config.sizes.is_empty());
        assert_eq!(config.bindings.len(), 3);
        assert_eq!(config.bindings[0].action, "cycle-window-sizes");
        assert_eq!(config.bindings[0].accel, "<Ctrl><Alt>z");
    }

    #[test]
    fn test_parse_valid_xml() {
        let xml = r#"
            <Sizeboard>
                <Size width="1280" height="720"/>
                <Size width="1600" height="900"/>
                <Binding action="center-window" accel="&lt;Super&gt;c"/>
                <Notice holdMs="100" fadeMs="250"/>
            </Sizeboard>
        "#;

        let config = Config::parse_xml(xml).unwrap();
        assert_eq!(config.sizes, vec![Size::new(1280, 720), Size::new(1600, 900)]);
        assert_eq!(config.bindings, vec![BindingSpec {
            action: "center-window".to_string(),
            accel: "<Super>c".to_string(),
            scope: BindingScope::PerWindow,
        }]);
        assert_eq!(config.notice.hold, Duration::from_millis(100));
        assert_eq!(config.notice.fade, Duration::from_millis(250));
    }

    #[test]
    fn test_binding_scope_attribute() {
        let xml = r#"
            <Sizeboard>
                <Binding action="center-window" accel="c" scope="global"/>
                <Binding action="cycle-window-sizes" accel="z" scope="window"/>
            </Sizeboard>
        "#;

        let config = Config::parse_xml(xml).unwrap();
        assert_eq!(config.bindings[0].scope, BindingScope::Global);
        assert_eq!(config.bindings[1].scope, BindingScope::PerWindow);

        let xml = r#"<Sizeboard><Binding action="center-window" accel="c" scope="desktop"/></Sizeboard>"#;
        assert!(Config::parse_xml(xml).is_err());
    }

    #[test]
    fn test_skip_zero_dimension() {
        let xml = r#"
            <Sizeboard>
                <Size width="0" height="720"/>
                <Size width="1280" height="720"/>
            </Sizeboard>
        "#;

        let config = Config::parse_xml(xml).unwrap();
        assert_eq!(config.sizes, vec![Size::new(1280, 720)]);
    }

    #[test]
    fn test_invalid_number_is_error() {
        let xml = r#"<Sizeboard><Size width="-5" height="720"/></Sizeboard>"#;
        assert!(Config::parse_xml(xml).is_err());

        let xml = r#"<Sizeboard><Size width="1280"/></Sizeboard>"#;
        assert!(Config::parse_xml(xml).is_err());
    }

    #[test]
    fn test_empty_size_list_is_not_a_parse_error() {
        let xml = r#"<Sizeboard><Binding action="center-window" accel="c"/></Sizeboard>"#;
        let config = Config::parse_xml(xml).unwrap();
        assert!(config.sizes.is_empty());
        assert_eq!(config.notice, NoticeTiming::default());
    }

    #[test]
    fn test_missing_root_is_error() {
        assert!(Config::parse_xml("<Other/>").is_err());
    }

    #[test]
    fn test_missing_file_deploys_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sizes.xml");

        let config = Config::load_from_path(&path);
        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_SIZES_XML);
        assert_eq!(config.sizes, Config::embedded_default().sizes);
    }

    #[test]
    fn test_invalid_file_falls_back_without_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sizes.xml");
        fs::write(&path, "<Sizeboard><Size width=\"abc\" height=\"1\"/></Sizeboard>").unwrap();

        let config = Config::load_from_path(&path);
        assert_eq!(config.sizes, Config::embedded_default().sizes);
        assert!(fs::read_to_string(&path).unwrap().contains("abc"));
    }

    #[test]
    fn test_user_file_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sizes.xml");
        fs::write(&path, "<Sizeboard><Size width=\"800\" height=\"450\"/></Sizeboard>").unwrap();

        let config = Config::load_from_path(&path);
        assert_eq!(config.sizes, vec![Size::new(800, 450)]);
        assert!(config.bindings.is_empty());
    }
}

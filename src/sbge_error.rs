// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

/// Error types for actions, host calls and configuration loading

use thiserror::Error;

use crate::sbgb_binding::ActionName;
use crate::sbgc_core::Rect;

/// Failure reported by the window host (AX on macOS)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("ax_permission_missing_or_revoked")]
    Permission,
    #[error("size_constrained_or_fullscreen")]
    Constrained,
    #[error("ax_error(code={0})")]
    Platform(i32),
    #[error("window_gone")]
    WindowGone,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ActionError {
    /// No configured size fits the work area at the current scale
    #[error("no_fitting_candidate work_area={work_area} scale={scale}")]
    NoFittingCandidate { work_area: Rect, scale: f64 },
    #[error("no_focused_window")]
    NoFocusedWindow,
    #[error("action_not_registered name={0}")]
    NotRegistered(ActionName),
    #[error(transparent)]
    Host(#[from] HostError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io: {0}")]
    Io(#[from] std::io::Error),
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),
    #[error("{0}")]
    Invalid(String),
}

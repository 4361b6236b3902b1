// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

use std::sync::atomic::{AtomicBool, Ordering};

use tracing_subscriber::EnvFilter;

/// Set by SIZEBOARD_LOG_KEYS=1: log every chord the tap matches
pub static KEY_LOGGING_ENABLED: AtomicBool = AtomicBool::new(false);

/// Install the stderr subscriber. Filter comes from SIZEBOARD_LOG,
/// defaulting to info.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env("SIZEBOARD_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_err()
    {
        // Already installed
        return;
    }

    if let Ok(val) = std::env::var("SIZEBOARD_LOG_KEYS") {
        if val == "1" || val.eq_ignore_ascii_case("true") {
            KEY_LOGGING_ENABLED.store(true, Ordering::Release);
            tracing::info!("Key logging enabled (SIZEBOARD_LOG_KEYS={})", val);
        }
    }
}

pub fn key_logging_enabled() -> bool {
    KEY_LOGGING_ENABLED.load(Ordering::Acquire)
}

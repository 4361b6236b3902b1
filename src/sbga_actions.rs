// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

/// Action registry and dispatch
///
/// Each named action maps to a pure handler over an explicit input struct.
/// The dispatcher is the adapter between a host binding callback and those
/// handlers: it reads live geometry from the host window, runs the handler,
/// then applies the result and arranges the size notice.

use std::sync::{Arc, Mutex};

use crate::sbgb_binding::{Accelerator, ActionName, BindingDescriptor, BindingScope, Modifiers};
use crate::sbgc_core::{Direction, Rect, Size};
use crate::sbge_error::ActionError;
use crate::sbgfc_config::Config;
use crate::sbgh_host::HostWindow;
use crate::sbgm_message::format_size_message;
use crate::sbgn_center::center;
use crate::sbgo_notice::{LabelSurface, Notice};
use crate::sbgr_resize::ResizeSubscription;
use crate::sbgs_sizer::cycle;

// ============================================================================
// Handlers
// ============================================================================

/// Everything a handler may look at, captured fresh per key press
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionInput {
    pub frame: Rect,
    pub work_area: Rect,
    pub scale: f64,
    pub direction: Direction,
}

pub type Handler = fn(&ActionInput, &[Size]) -> Result<Rect, ActionError>;

fn handle_cycle(input: &ActionInput, sizes: &[Size]) -> Result<Rect, ActionError> {
    cycle(&input.frame, &input.work_area, sizes, input.scale, input.direction).map(|t| t.rect)
}

fn handle_center(input: &ActionInput, _sizes: &[Size]) -> Result<Rect, ActionError> {
    Ok(center(&input.frame, &input.work_area))
}

pub fn handler_for(action: ActionName) -> Handler {
    match action {
        ActionName::CycleSizes | ActionName::CycleSizesBackward => handle_cycle,
        ActionName::CenterWindow => handle_center,
    }
}

// ============================================================================
// Registry
// ============================================================================

#[derive(Debug, Clone)]
pub struct RegisteredAction {
    pub action: ActionName,
    pub accel: Accelerator,
    pub scope: BindingScope,
    pub handler: Handler,
}

#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    actions: Vec<RegisteredAction>,
    sizes: Vec<Size>,
}

impl ActionRegistry {
    /// Register every configured binding that can work. Bad bindings and
    /// cycle actions without any sizes are refused here, once, instead of
    /// failing on every key press.
    pub fn from_config(config: &Config) -> Self {
        let mut actions = Vec::new();

        for spec in &config.bindings {
            let Some(action) = ActionName::parse(&spec.action) else {
                tracing::warn!("BINDING: refused unknown action '{}'", spec.action);
                continue;
            };

            if action.is_cycle() && config.sizes.is_empty() {
                tracing::warn!("BINDING: refused {} reason=empty_size_list", action);
                continue;
            }

            let accel = match Accelerator::parse(&spec.accel) {
                Ok(a) => a,
                Err(e) => {
                    tracing::warn!("BINDING: refused {} reason=bad_accel ({})", action, e);
                    continue;
                }
            };

            tracing::info!("BINDING: {} → {}", accel, action);
            actions.push(RegisteredAction {
                action,
                accel,
                scope: spec.scope,
                handler: handler_for(action),
            });
        }

        Self { actions, sizes: config.sizes.clone() }
    }

    pub fn actions(&self) -> &[RegisteredAction] {
        &self.actions
    }

    pub fn get(&self, action: ActionName) -> Option<&RegisteredAction> {
        self.actions.iter().find(|a| a.action == action)
    }

    pub fn is_registered(&self, action: ActionName) -> bool {
        self.get(action).is_some()
    }

    /// Find the binding a pressed chord belongs to, first match wins
    pub fn match_chord(&self, key: &str, pressed: Modifiers) -> Option<BindingDescriptor> {
        self.actions.iter().find_map(|a| {
            a.accel.matches(key, pressed).map(|reversed| BindingDescriptor {
                action: a.action,
                reversed,
                scope: a.scope,
            })
        })
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

pub struct Dispatcher<S: LabelSurface + Send + 'static> {
    registry: ActionRegistry,
    notice: Arc<Mutex<Notice<S>>>,
    pending: Option<ResizeSubscription>,
}

impl<S: LabelSurface + Send + 'static> Dispatcher<S> {
    pub fn new(registry: ActionRegistry, notice: Arc<Mutex<Notice<S>>>) -> Self {
        Self { registry, notice, pending: None }
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Run the action a binding fired for. Returns the requested frame.
    pub fn invoke<W: HostWindow>(
        &mut self,
        window: Option<&mut W>,
        binding: &BindingDescriptor,
    ) -> Result<Rect, ActionError> {
        let result = self.invoke_inner(window, binding);
        match &result {
            Ok(frame) => tracing::info!(
                "SIZE: {} | SUCCESS reversed={} frame={}",
                binding.action, binding.reversed, frame
            ),
            Err(e) => tracing::warn!("SIZE: {} | FAILED reason={}", binding.action, e),
        }
        result
    }

    fn invoke_inner<W: HostWindow>(
        &mut self,
        window: Option<&mut W>,
        binding: &BindingDescriptor,
    ) -> Result<Rect, ActionError> {
        let registered = self.registry.get(binding.action)
            .ok_or(ActionError::NotRegistered(binding.action))?;
        let handler = registered.handler;

        let window = window.ok_or(ActionError::NoFocusedWindow)?;

        let backward = binding.action == ActionName::CycleSizesBackward || binding.reversed;
        let input = ActionInput {
            frame: window.frame_rect()?,
            work_area: window.work_area()?,
            scale: window.scale_factor(),
            direction: Direction::from_backward(backward),
        };
        tracing::debug!(
            "SIZE: {} window={} frame={} work_area={} scale={}",
            binding.action, window.describe(), input.frame, input.work_area, input.scale
        );

        // Nothing is touched until the handler succeeds
        let target = handler(&input, &self.registry.sizes)?;

        if window.maximize_state().any() {
            tracing::debug!("SIZE: unmaximizing before resize");
            window.unmaximize()?;
        }

        if let Some(previous) = self.pending.take() {
            if previous.cancel() {
                tracing::debug!("SIZE: dropped listener for superseded resize");
            }
        }

        if binding.action.is_cycle() {
            let notice = Arc::clone(&self.notice);
            let scale = input.scale;
            let subscription = window.resize_signal().connect_once(move |frame| {
                let message = format_size_message(&frame, scale);
                notice.lock().unwrap_or_else(|e| e.into_inner()).show(&message);
            });
            self.pending = Some(subscription);
        }

        if let Err(e) = window.move_resize_frame(target) {
            if let Some(subscription) = self.pending.take() {
                subscription.cancel();
            }
            return Err(e.into());
        }

        Ok(target)
    }
}

// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

/// One-shot resize completion signal
///
/// The host emits the confirmed frame once a move-resize lands. Listeners
/// are single-fire: emitting drains every connected listener, and a
/// subscription can be cancelled before it fires. Each invocation connects
/// a fresh listener so a notice is never shown for a resize it did not
/// request.

use std::sync::{Arc, Mutex, Weak};

use crate::sbgc_core::Rect;

type Listener = Box<dyn FnOnce(Rect) + Send>;

#[derive(Default)]
struct Slots {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Host-side signal; cloning shares the same listener set
#[derive(Clone, Default)]
pub struct ResizeSignal {
    slots: Arc<Mutex<Slots>>,
}

/// Handle to a pending listener
#[derive(Debug)]
pub struct ResizeSubscription {
    id: u64,
    slots: Weak<Mutex<Slots>>,
}

impl ResizeSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect a listener that fires at most once
    pub fn connect_once<F>(&self, listener: F) -> ResizeSubscription
    where
        F: FnOnce(Rect) + Send + 'static,
    {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        let id = slots.next_id;
        slots.next_id += 1;
        slots.listeners.push((id, Box::new(listener)));

        ResizeSubscription { id, slots: Arc::downgrade(&self.slots) }
    }

    /// Fire and detach every pending listener; returns how many fired
    pub fn emit(&self, frame: Rect) -> usize {
        // Take listeners out before calling so a listener may reconnect
        let drained: Vec<(u64, Listener)> = {
            let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::take(&mut slots.listeners)
        };

        let count = drained.len();
        for (_, listener) in drained {
            listener(frame);
        }
        count
    }

    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.slots.lock().map(|s| s.listeners.len()).unwrap_or(0)
    }
}

impl ResizeSubscription {
    /// Detach without firing; false if it already fired or was cancelled
    pub fn cancel(self) -> bool {
        let Some(slots) = self.slots.upgrade() else {
            return false;
        };
        let mut slots = slots.lock().unwrap_or_else(|e| e.into_inner());
        let before = slots.listeners.len();
        slots.listeners.retain(|(id, _)| *id != self.id);
        slots.listeners.len() != before
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        let Some(slots) = self.slots.upgrade() else {
            return false;
        };
        let slots = slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.listeners.iter().any(|(id, _)| *id == self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_listener_fires_once() {
        let signal = ResizeSignal::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let h = hits.clone();
        let sub = signal.connect_once(move |_| { h.fetch_add(1, Ordering::SeqCst); });
        assert!(sub.is_pending());

        assert_eq!(signal.emit(Rect::new(0, 0, 10, 10)), 1);
        assert_eq!(signal.emit(Rect::new(0, 0, 20, 20)), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!sub.is_pending());
        assert!(!sub.cancel());
    }

    #[test]
    fn test_cancelled_listener_never_fires() {
        let signal = ResizeSignal::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let h = hits.clone();
        let sub = signal.connect_once(move |_| { h.fetch_add(1, Ordering::SeqCst); });
        assert!(sub.cancel());
        assert_eq!(signal.pending(), 0);

        signal.emit(Rect::default());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_listener_receives_frame() {
        let signal = ResizeSignal::new();
        let seen = Arc::new(Mutex::new(None));

        let s = seen.clone();
        signal.connect_once(move |frame| { *s.lock().unwrap() = Some(frame); });
        signal.emit(Rect::new(5, 6, 700, 800));

        assert_eq!(*seen.lock().unwrap(), Some(Rect::new(5, 6, 700, 800)));
    }

    #[test]
    fn test_cancel_leaves_other_listeners() {
        let signal = ResizeSignal::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let h1 = hits.clone();
        let first = signal.connect_once(move |_| { h1.fetch_add(1, Ordering::SeqCst); });
        let h2 = hits.clone();
        let _second = signal.connect_once(move |_| { h2.fetch_add(10, Ordering::SeqCst); });

        first.cancel();
        signal.emit(Rect::default());
        assert_eq!(hits.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn test_cancel_after_signal_dropped() {
        let signal = ResizeSignal::new();
        let sub = signal.connect_once(|_| {});
        drop(signal);
        assert!(!sub.is_pending());
        assert!(!sub.cancel());
    }
}

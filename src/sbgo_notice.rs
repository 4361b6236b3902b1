// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Scale Invariant

/// Transient size notice
///
/// At most one label is ever live. A new message reuses it: the running fade
/// is cancelled and restarted, so the last message wins and nothing queues.
/// Fade completion carries the generation it was started with; a completion
/// from an earlier message is ignored.

use std::time::Duration;

use crate::sbgfc_config::NoticeTiming;

/// Platform drawing surface for the label
pub trait LabelSurface {
    fn create(&mut self);
    fn set_text(&mut self, text: &str);
    /// Hold fully visible, then fade out; report `generation` when done
    fn begin_fade(&mut self, generation: u64, hold: Duration, fade: Duration);
    fn cancel_fade(&mut self);
    fn destroy(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelState {
    Absent,
    Fading { generation: u64 },
}

pub struct Notice<S: LabelSurface> {
    surface: S,
    state: LabelState,
    generation: u64,
    timing: NoticeTiming,
}

impl<S: LabelSurface> Notice<S> {
    pub fn new(surface: S, timing: NoticeTiming) -> Self {
        Self {
            surface,
            state: LabelState::Absent,
            generation: 0,
            timing,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> LabelState {
        self.state
    }

    pub fn show(&mut self, text: &str) {
        match self.state {
            LabelState::Absent => self.surface.create(),
            LabelState::Fading { .. } => self.surface.cancel_fade(),
        }

        self.surface.set_text(text);
        self.generation += 1;
        self.surface.begin_fade(self.generation, self.timing.hold, self.timing.fade);
        self.state = LabelState::Fading { generation: self.generation };

        tracing::debug!("NOTICE: show \"{}\" generation={}", text, self.generation);
    }

    /// Called by the surface when a fade finishes
    pub fn fade_complete(&mut self, generation: u64) {
        match self.state {
            LabelState::Fading { generation: current } if current == generation => {
                self.surface.destroy();
                self.state = LabelState::Absent;
            }
            _ => {
                tracing::debug!("NOTICE: ignoring stale fade completion generation={}", generation);
            }
        }
    }

    #[cfg(test)]
    pub fn surface(&self) -> &S {
        &self.surface
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum Call {
        Create,
        SetText(String),
        BeginFade(u64),
        CancelFade,
        Destroy,
    }

    #[derive(Default)]
    pub(crate) struct RecordingSurface {
        pub calls: Vec<Call>,
    }

    impl LabelSurface for RecordingSurface {
        fn create(&mut self) { self.calls.push(Call::Create); }
        fn set_text(&mut self, text: &str) { self.calls.push(Call::SetText(text.to_string())); }
        fn begin_fade(&mut self, generation: u64, _hold: Duration, _fade: Duration) {
            self.calls.push(Call::BeginFade(generation));
        }
        fn cancel_fade(&mut self) { self.calls.push(Call::CancelFade); }
        fn destroy(&mut self) { self.calls.push(Call::Destroy); }
    }

    fn notice() -> Notice<RecordingSurface> {
        Notice::new(RecordingSurface::default(), NoticeTiming::default())
    }

    #[test]
    fn test_first_show_creates_label() {
        let mut n = notice();
        n.show("1280×720");

        assert_eq!(n.state(), LabelState::Fading { generation: 1 });
        assert_eq!(n.surface().calls, vec![
            Call::Create,
            Call::SetText("1280×720".to_string()),
            Call::BeginFade(1),
        ]);
    }

    #[test]
    fn test_second_show_cancels_and_restarts() {
        let mut n = notice();
        n.show("a");
        n.show("b");

        assert_eq!(n.state(), LabelState::Fading { generation: 2 });
        assert_eq!(&n.surface().calls[3..], &[
            Call::CancelFade,
            Call::SetText("b".to_string()),
            Call::BeginFade(2),
        ]);
        assert_eq!(n.surface().calls.iter().filter(|c| **c == Call::Create).count(), 1);
    }

    #[test]
    fn test_fade_complete_destroys() {
        let mut n = notice();
        n.show("a");
        n.fade_complete(1);

        assert_eq!(n.state(), LabelState::Absent);
        assert_eq!(n.surface().calls.last(), Some(&Call::Destroy));

        // Next message builds a fresh label
        n.show("b");
        assert_eq!(n.surface().calls.iter().filter(|c| **c == Call::Create).count(), 2);
    }

    #[test]
    fn test_stale_fade_completion_ignored() {
        let mut n = notice();
        n.show("a");
        n.show("b");
        n.fade_complete(1);

        assert_eq!(n.state(), LabelState::Fading { generation: 2 });
        assert!(!n.surface().calls.contains(&Call::Destroy));

        n.fade_complete(2);
        assert_eq!(n.state(), LabelState::Absent);
    }

    #[test]
    fn test_completion_while_absent_ignored() {
        let mut n = notice();
        n.fade_complete(7);
        assert_eq!(n.state(), LabelState::Absent);
        assert!(n.surface().calls.is_empty());
    }
}

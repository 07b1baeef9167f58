//! Per-invocation capture state machine.
//!
//! Idle → CapabilityChecked → AwaitingConsent → AwaitingFrame → Rendering → Exported,
//! with any non-terminal state able to fall into Failed.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    CapabilityChecked,
    AwaitingConsent,
    AwaitingFrame,
    Rendering,
    Exported,
    Failed,
}

impl CaptureState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CaptureState::Exported | CaptureState::Failed)
    }

    pub fn can_transition_to(&self, next: CaptureState) -> bool {
        use CaptureState::*;
        match (self, next) {
            (s, _) if s.is_terminal() => false,
            (_, Failed) => true,
            (Idle, CapabilityChecked)
            | (CapabilityChecked, AwaitingConsent)
            | (AwaitingConsent, AwaitingFrame)
            | (AwaitingFrame, Rendering)
            | (Rendering, Exported) => true,
            _ => false,
        }
    }
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Tracks the current state of one capture and logs each transition.
#[derive(Debug)]
pub struct StateTracker {
    current: CaptureState,
}

impl StateTracker {
    pub fn new() -> Self {
        Self {
            current: CaptureState::Idle,
        }
    }

    pub fn current(&self) -> CaptureState {
        self.current
    }

    pub fn advance(&mut self, next: CaptureState) {
        debug_assert!(
            self.current.can_transition_to(next),
            "illegal capture transition {} -> {}",
            self.current,
            next
        );
        log::debug!("[CAPTURE] {} -> {}", self.current, next);
        self.current = next;
    }
}

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::CaptureState::*;
    use super::*;

    #[test]
    fn happy_path_is_legal() {
        let path = [Idle, CapabilityChecked, AwaitingConsent, AwaitingFrame, Rendering, Exported];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn any_live_state_can_fail() {
        for s in [Idle, CapabilityChecked, AwaitingConsent, AwaitingFrame, Rendering] {
            assert!(s.can_transition_to(Failed));
        }
    }

    #[test]
    fn terminal_states_are_final() {
        assert!(!Exported.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Idle));
    }

    #[test]
    fn frame_readiness_is_not_rearmed() {
        assert!(!Rendering.can_transition_to(AwaitingFrame));
        assert!(!Idle.can_transition_to(Rendering));
    }

    #[test]
    fn tracker_starts_idle() {
        let mut t = StateTracker::new();
        assert_eq!(t.current(), Idle);
        t.advance(CapabilityChecked);
        t.advance(Failed);
        assert!(t.current().is_terminal());
    }
}

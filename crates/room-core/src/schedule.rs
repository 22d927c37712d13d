//! Explicit per-frame loop scheduling
//!
//! The navigation and manipulation steps only run while armed. Each loop is
//! armed when its precondition becomes true and disarmed as soon as it
//! stops holding, so an idle editor schedules nothing.

use tracing::debug;

/// The two recurring per-frame loops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopKind {
    /// First-person camera, runs while pointer capture is active
    Navigation,
    /// Keyboard manipulation, runs while an object is selected
    Manipulation,
}

/// What a loop step asks of the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Reschedule for the next frame
    Continue,
    /// Precondition no longer holds; stop rescheduling
    Stop,
}

/// Armed state of both loops
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameLoops {
    navigation: bool,
    manipulation: bool,
    frames: u64,
}

impl FrameLoops {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, kind: LoopKind) {
        let slot = self.slot(kind);
        if !*slot {
            *slot = true;
            debug!("Armed {:?} loop", kind);
        }
    }

    pub fn disarm(&mut self, kind: LoopKind) {
        let slot = self.slot(kind);
        if *slot {
            *slot = false;
            debug!("Disarmed {:?} loop", kind);
        }
    }

    pub fn is_armed(&self, kind: LoopKind) -> bool {
        match kind {
            LoopKind::Navigation => self.navigation,
            LoopKind::Manipulation => self.manipulation,
        }
    }

    /// Record a loop step's outcome
    pub fn settle(&mut self, kind: LoopKind, outcome: TickOutcome) {
        if outcome == TickOutcome::Stop {
            self.disarm(kind);
        }
    }

    /// Count a rendered frame
    pub fn advance(&mut self) -> u64 {
        self.frames += 1;
        self.frames
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn slot(&mut self, kind: LoopKind) -> &mut bool {
        match kind {
            LoopKind::Navigation => &mut self.navigation,
            LoopKind::Manipulation => &mut self.manipulation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_disarms() {
        let mut loops = FrameLoops::new();
        loops.arm(LoopKind::Manipulation);
        loops.settle(LoopKind::Manipulation, TickOutcome::Continue);
        assert!(loops.is_armed(LoopKind::Manipulation));
        loops.settle(LoopKind::Manipulation, TickOutcome::Stop);
        assert!(!loops.is_armed(LoopKind::Manipulation));
        assert!(!loops.is_armed(LoopKind::Navigation));
    }
}

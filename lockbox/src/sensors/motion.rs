// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Motion detection.
//!
//! Someone has to walk up to the enclosure and stop in front of it. The condition is satisfied
//! from the moment presence is seen until `threshold` ticks after the motion ends, then the
//! machine re-arms by itself.

use crate::config::MotionConfig;
use crate::fsm::Machine;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MotionState {
    Idle,
    Waiting,
    Accumulating,
    Resetting,
}

pub struct MotionDetection {
    config: MotionConfig,
    state: MotionState,
    count: u16,
}

impl MotionDetection {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            config,
            state: MotionState::Idle,
            count: 0,
        }
    }

    #[inline]
    pub fn count(&self) -> u16 {
        self.count
    }
}

impl Machine for MotionDetection {
    type State = MotionState;
    /// Current [`crate::cells::ActivityFlag`] value.
    type Inputs = bool;
    type Outputs = bool;

    fn init(&mut self) {
        self.state = MotionState::Idle;
        self.count = 0;
    }

    fn state(&self) -> MotionState {
        self.state
    }

    fn act(&mut self) -> bool {
        match self.state {
            MotionState::Idle | MotionState::Resetting => {
                self.count = 0;
                false
            }
            MotionState::Waiting => true,
            MotionState::Accumulating => {
                self.count = self.count.saturating_add(1);
                true
            }
        }
    }

    fn advance(&mut self, active: &bool) {
        self.state = match self.state {
            MotionState::Idle if *active => MotionState::Waiting,
            MotionState::Idle => MotionState::Idle,
            MotionState::Waiting if !*active => MotionState::Accumulating,
            MotionState::Waiting => MotionState::Waiting,
            MotionState::Accumulating if self.count >= self.config.threshold => {
                MotionState::Resetting
            }
            MotionState::Accumulating => MotionState::Accumulating,
            MotionState::Resetting => MotionState::Idle,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(threshold: u16) -> MotionDetection {
        let mut fsm = MotionDetection::new(MotionConfig::default().with_threshold(threshold));
        fsm.init();
        fsm
    }

    #[test]
    fn presence_satisfies_until_threshold_after_motion_ends() {
        let mut fsm = machine(3);

        assert!(!fsm.step(&false));
        assert!(!fsm.step(&true));
        assert_eq!(fsm.state(), MotionState::Waiting);
        assert!(fsm.step(&true));
        assert!(fsm.step(&false));
        assert_eq!(fsm.state(), MotionState::Accumulating);

        // Accumulating ignores the flag.
        assert!(fsm.step(&true));
        assert!(fsm.step(&false));
        assert!(fsm.step(&false));
        assert_eq!(fsm.state(), MotionState::Resetting);
        assert!(!fsm.step(&true));
        assert_eq!(fsm.state(), MotionState::Idle);
    }

    #[test]
    fn resetting_returns_to_idle_without_input() {
        let mut fsm = machine(1);
        fsm.step(&true);
        fsm.step(&false);
        fsm.step(&false);
        assert_eq!(fsm.state(), MotionState::Resetting);
        fsm.step(&false);
        assert_eq!(fsm.state(), MotionState::Idle);
        assert_eq!(fsm.count(), 0);
    }

    #[test]
    fn default_window_is_1000_ticks() {
        let mut fsm = machine(MotionConfig::default().threshold);
        fsm.step(&true);
        fsm.step(&false);
        let mut satisfied_ticks = 0;
        while fsm.state() != MotionState::Idle {
            if fsm.step(&false) {
                satisfied_ticks += 1;
            }
        }
        assert_eq!(satisfied_ticks, 1000);
    }
}

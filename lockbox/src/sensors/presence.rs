// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! PIR presence detector. Mirrors the sensor level into the [`crate::cells::ActivityFlag`].

use crate::fsm::Machine;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PresenceState {
    Off,
    On,
}

pub struct PresenceDetector {
    state: PresenceState,
}

impl PresenceDetector {
    pub const fn new() -> Self {
        Self {
            state: PresenceState::Off,
        }
    }
}

impl Default for PresenceDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine for PresenceDetector {
    type State = PresenceState;
    /// PIR output level.
    type Inputs = bool;
    /// Value to write to the activity flag.
    type Outputs = bool;

    fn init(&mut self) {
        self.state = PresenceState::Off;
    }

    fn state(&self) -> PresenceState {
        self.state
    }

    fn act(&mut self) -> bool {
        self.state == PresenceState::On
    }

    fn advance(&mut self, level: &bool) {
        self.state = if *level {
            PresenceState::On
        } else {
            PresenceState::Off
        };
    }
}

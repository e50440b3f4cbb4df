// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Light verification: the enclosure must be dark, i.e. the lid is seated.

use crate::config::LightConfig;
use crate::fsm::Machine;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LightState {
    Unverified,
    Verified,
}

pub struct LightVerification {
    config: LightConfig,
    state: LightState,
}

impl LightVerification {
    pub fn new(config: LightConfig) -> Self {
        Self {
            config,
            state: LightState::Unverified,
        }
    }

    #[inline]
    pub fn config(&self) -> &LightConfig {
        &self.config
    }
}

impl Machine for LightVerification {
    type State = LightState;
    /// Raw photo-sensor sample.
    type Inputs = u16;
    type Outputs = bool;

    fn init(&mut self) {
        self.state = LightState::Unverified;
    }

    fn state(&self) -> LightState {
        self.state
    }

    fn act(&mut self) -> bool {
        self.state == LightState::Verified
    }

    fn advance(&mut self, sample: &u16) {
        self.state = if *sample < self.config.threshold {
            LightState::Verified
        } else {
            LightState::Unverified
        };
    }
}

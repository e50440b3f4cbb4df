// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Force presence on the two FSR pads under the stored item.
//!
//! Both pads have to read inside their band for `threshold` consecutive accumulating ticks before
//! the item counts as present. Once satisfied the machine stays satisfied until the master
//! acknowledges the open door, then re-arms as soon as the acknowledge is withdrawn.

use crate::config::ForceConfig;
use crate::fsm::Machine;
use crate::link::Command;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ForceState {
    Checking,
    Accumulating,
    Satisfied,
    Resetting,
}

/// One tick's worth of samples.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ForceInputs {
    /// Raw ADC counts, in the order of [`ForceConfig::channels`].
    pub samples: [u16; 2],
    pub command: Option<Command>,
}

pub struct ForcePresence {
    config: ForceConfig,
    state: ForceState,
    count: u16,
}

impl ForcePresence {
    pub fn new(config: ForceConfig) -> Self {
        Self {
            config,
            state: ForceState::Checking,
            count: 0,
        }
    }

    #[inline]
    pub fn config(&self) -> &ForceConfig {
        &self.config
    }

    #[inline]
    pub fn count(&self) -> u16 {
        self.count
    }

    fn in_entry_bands(&self, samples: &[u16; 2]) -> bool {
        self.config
            .entry_bands
            .iter()
            .zip(samples)
            .all(|(band, &s)| band.contains(s))
    }

    fn in_hold_bands(&self, samples: &[u16; 2]) -> bool {
        self.config
            .hold_bands
            .iter()
            .zip(samples)
            .all(|(band, &s)| band.contains(s))
    }
}

impl Machine for ForcePresence {
    type State = ForceState;
    type Inputs = ForceInputs;
    /// Whether the force condition is satisfied.
    type Outputs = bool;

    fn init(&mut self) {
        self.state = ForceState::Checking;
        self.count = 0;
    }

    fn state(&self) -> ForceState {
        self.state
    }

    fn act(&mut self) -> bool {
        match self.state {
            ForceState::Checking | ForceState::Resetting => {
                self.count = 0;
                false
            }
            ForceState::Accumulating => {
                self.count = self.count.saturating_add(1);
                false
            }
            ForceState::Satisfied => true,
        }
    }

    fn advance(&mut self, inputs: &ForceInputs) {
        let acknowledged = inputs.command == Some(Command::Acknowledge);

        self.state = match self.state {
            ForceState::Checking if self.in_entry_bands(&inputs.samples) => {
                ForceState::Accumulating
            }
            ForceState::Checking => ForceState::Checking,
            ForceState::Accumulating if !self.in_hold_bands(&inputs.samples) => {
                self.count = 0;
                ForceState::Checking
            }
            ForceState::Accumulating if self.count >= self.config.threshold => {
                ForceState::Satisfied
            }
            ForceState::Accumulating => ForceState::Accumulating,
            ForceState::Satisfied if acknowledged => ForceState::Resetting,
            ForceState::Satisfied => ForceState::Satisfied,
            ForceState::Resetting if !acknowledged => ForceState::Checking,
            ForceState::Resetting => ForceState::Resetting,
        };
    }
}

// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Motor task on the master node.
//!
//! Wraps a [`MotorSequencer`] so that it is driven by the [`DriveCommand`] the control sequencer
//! publishes. A travel is loaded once per epoch; when the sequencer raises its completion flag the
//! wrapper consumes it, tags it with the epoch that was running, and hands it out on the next
//! action so the port can publish it to the [`crate::cells::CompletionCell`].

use crate::cells::DriveCommand;
use crate::fsm::Machine;
use crate::motors::{MotorInputs, MotorSequencer, Phase};

/// What the motor task emits each tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DriveOutputs {
    /// Coil pattern for this tick.
    pub pattern: u8,
    /// Epoch of a travel that finished since the previous tick.
    pub completed: Option<u8>,
}

pub struct DriveSequencer {
    sequencer: MotorSequencer,
    epoch: u8,
    pending: Option<u8>,
}

impl DriveSequencer {
    pub const fn new() -> Self {
        Self {
            sequencer: MotorSequencer::new(),
            epoch: 0,
            pending: None,
        }
    }

    /// Epoch of the travel currently loaded.
    #[inline]
    pub fn epoch(&self) -> u8 {
        self.epoch
    }

    #[inline]
    pub fn sequencer(&self) -> &MotorSequencer {
        &self.sequencer
    }
}

impl Default for DriveSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine for DriveSequencer {
    type State = Phase;
    type Inputs = DriveCommand;
    type Outputs = DriveOutputs;

    fn init(&mut self) {
        self.sequencer.init();
        self.pending = None;
    }

    fn state(&self) -> Phase {
        self.sequencer.state()
    }

    fn act(&mut self) -> DriveOutputs {
        DriveOutputs {
            pattern: self.sequencer.act(),
            completed: self.pending.take(),
        }
    }

    fn advance(&mut self, cmd: &DriveCommand) {
        let load = if cmd.epoch != self.epoch {
            self.epoch = cmd.epoch;
            Some(cmd.travel)
        } else {
            None
        };

        self.sequencer.advance(&MotorInputs {
            direction: cmd.direction,
            load,
        });

        if self.sequencer.take_completion() {
            self.pending = Some(self.epoch);
        }
    }
}

// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Door-cycle sequencer on the master node.
//!
//! The sequencer talks to the servants through its outputs: a state whose action polls the link
//! emits the command in [`ControlOutputs::broadcast`], the port performs the broadcast during
//! `apply`, and the resulting [`Poll`] comes back in the same tick's [`ControlInputs`]. Motor
//! travel goes out through [`ControlOutputs::drive`], tagged with a fresh epoch every time a new
//! travel is armed; the sequencer only accepts a completion carrying the epoch it armed.

use crate::cells::DriveCommand;
use crate::config::ControlConfig;
use crate::fsm::Machine;
use crate::link::{Command, Poll};
use crate::motors::Direction;
use crate::status::StatusByte;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ControlState {
    Init,
    Lock,
    Unlock,
    Opening,
    Open,
    Reset,
    Closing,
}

/// What one control action asks the port to do.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ControlOutputs {
    /// Command to send to every servant this tick.
    pub broadcast: Option<Command>,
    /// Drive request to publish for the motor task.
    pub drive: DriveCommand,
    /// Status to show on the debug display.
    pub display: Option<StatusByte>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ControlInputs {
    /// Result of this tick's broadcast, if there was one.
    pub poll: Option<Poll>,
    /// Release button pressed.
    pub release: bool,
    /// Epoch of the most recently completed travel.
    pub completed: u8,
}

pub struct ControlSequencer {
    config: ControlConfig,
    state: ControlState,
    travel: u16,
    aggregate: StatusByte,
    drive: DriveCommand,
    acks: u16,
}

impl ControlSequencer {
    pub fn new(config: ControlConfig) -> Self {
        Self {
            config,
            state: ControlState::Init,
            travel: 0,
            aggregate: StatusByte::BLOCKED,
            drive: DriveCommand::IDLE,
            acks: 0,
        }
    }

    /// Phase count of one latch travel.
    #[inline]
    pub fn travel(&self) -> u16 {
        self.travel
    }

    /// Aggregate from the last poll.
    #[inline]
    pub fn aggregate(&self) -> StatusByte {
        self.aggregate
    }

    /// Epoch of the travel currently armed.
    #[inline]
    pub fn armed_epoch(&self) -> u8 {
        self.drive.epoch
    }

    fn arm(&mut self, direction: Direction, travel: u16) {
        let epoch = match self.drive.epoch {
            u8::MAX => 1,
            e => e + 1,
        };
        self.drive = DriveCommand {
            direction,
            travel,
            epoch,
        };
    }

    fn recompute_travel(&mut self) {
        self.travel = self.config.geometry.phases_for(self.config.travel_deg);
    }
}

impl Machine for ControlSequencer {
    type State = ControlState;
    type Inputs = ControlInputs;
    type Outputs = ControlOutputs;

    fn init(&mut self) {
        self.state = ControlState::Init;
        self.aggregate = StatusByte::BLOCKED;
    }

    fn state(&self) -> ControlState {
        self.state
    }

    fn act(&mut self) -> ControlOutputs {
        let mut broadcast = None;
        let mut display = None;

        match self.state {
            ControlState::Init => {
                self.recompute_travel();
                self.arm(Direction::Hold, 0);
            }
            ControlState::Lock => {
                self.drive.direction = Direction::Hold;
                broadcast = Some(Command::Hold);
                display = Some(self.aggregate);
            }
            ControlState::Unlock => {
                self.recompute_travel();
                broadcast = Some(Command::Proceed);
                self.arm(Direction::Forward, self.travel);
            }
            ControlState::Opening => {}
            ControlState::Open => {
                self.drive.direction = Direction::Hold;
            }
            ControlState::Reset => {
                self.recompute_travel();
                broadcast = Some(Command::Acknowledge);
                self.arm(Direction::Reverse, self.travel);
                self.acks = 0;
            }
            ControlState::Closing => {
                // Keep Acknowledge latched on the servants until every FSM there has ticked.
                broadcast = Some(Command::Acknowledge);
                self.acks = self.acks.saturating_add(1);
            }
        }

        ControlOutputs {
            broadcast,
            drive: self.drive,
            display,
        }
    }

    fn advance(&mut self, inputs: &ControlInputs) {
        if let Some(poll) = inputs.poll {
            self.aggregate = poll.aggregate;
        }
        let travel_done = inputs.completed == self.drive.epoch;

        self.state = match self.state {
            ControlState::Init => ControlState::Lock,
            ControlState::Lock => match inputs.poll {
                Some(poll) if poll.command == Command::Hold && poll.all_clear() => {
                    ControlState::Unlock
                }
                _ => ControlState::Lock,
            },
            ControlState::Unlock => ControlState::Opening,
            ControlState::Opening if travel_done => ControlState::Open,
            ControlState::Opening => ControlState::Opening,
            ControlState::Open if inputs.release => ControlState::Reset,
            ControlState::Open => ControlState::Open,
            ControlState::Reset => ControlState::Closing,
            ControlState::Closing if travel_done && self.acks >= self.config.ack_ticks => {
                ControlState::Lock
            }
            ControlState::Closing => ControlState::Closing,
        };
    }
}

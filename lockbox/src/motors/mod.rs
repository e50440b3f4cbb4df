// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Latch Motor
//!
//! Four-coil unipolar stepper driven in half steps by a tick-driven phase sequencer.
//!
//! ## Modules
//!
//! - [`sequencer`] - Eight-phase commutation ring with a phase counter and completion flag.
//! - [`drive`] - Sequencer fed from the control sequencer's [`crate::cells::DriveCell`].
//! - [`geometry`] - Converts latch travel in degrees into phase counts.

pub mod drive;
pub mod geometry;
pub mod sequencer;

pub use drive::{DriveOutputs, DriveSequencer};
pub use geometry::StepperGeometry;
pub use sequencer::{MotorInputs, MotorSequencer, Phase};

/// Direction the sequencer walks the phase ring.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Hold,
    Forward,
    Reverse,
}

impl Direction {
    /// Wire encoding: 0 hold, 1 forward, 2 reverse.
    pub const fn code(self) -> u8 {
        match self {
            Direction::Hold => 0,
            Direction::Forward => 1,
            Direction::Reverse => 2,
        }
    }

    /// Unknown codes hold the motor in place.
    pub const fn from_code(code: u8) -> Self {
        match code {
            1 => Direction::Forward,
            2 => Direction::Reverse,
            _ => Direction::Hold,
        }
    }
}

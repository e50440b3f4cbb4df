// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Half-step phase sequencer.
//!
//! The eight active phases form a ring; forward walks it A → AB → B → … → DA → A, reverse walks it
//! the other way, hold stays put. Every tick spent on an active phase emits that phase's coil
//! pattern and consumes one count from the phase counter. When the counter reaches zero the
//! completion flag is raised and stays raised until [`MotorSequencer::take_completion`].
//!
//! The counter wraps below zero. Callers load a new travel before the counter runs out again.

use crate::fsm::Machine;
use crate::motors::Direction;

/// Position on the commutation ring, plus the idle state the sequencer starts in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    A,
    AB,
    B,
    BC,
    C,
    CD,
    D,
    DA,
}

impl Phase {
    /// Coil pattern, coil A in bit 0.
    pub const fn pattern(self) -> u8 {
        match self {
            Phase::Idle => 0x00,
            Phase::A => 0x01,
            Phase::AB => 0x03,
            Phase::B => 0x02,
            Phase::BC => 0x06,
            Phase::C => 0x04,
            Phase::CD => 0x0C,
            Phase::D => 0x08,
            Phase::DA => 0x09,
        }
    }

    /// Next phase walking forward. Idle always enters the ring at A.
    pub const fn next(self) -> Phase {
        match self {
            Phase::Idle => Phase::A,
            Phase::A => Phase::AB,
            Phase::AB => Phase::B,
            Phase::B => Phase::BC,
            Phase::BC => Phase::C,
            Phase::C => Phase::CD,
            Phase::CD => Phase::D,
            Phase::D => Phase::DA,
            Phase::DA => Phase::A,
        }
    }

    /// Next phase walking in reverse. Idle always enters the ring at A.
    pub const fn prev(self) -> Phase {
        match self {
            Phase::Idle => Phase::A,
            Phase::A => Phase::DA,
            Phase::AB => Phase::A,
            Phase::B => Phase::AB,
            Phase::BC => Phase::B,
            Phase::C => Phase::BC,
            Phase::CD => Phase::C,
            Phase::D => Phase::CD,
            Phase::DA => Phase::D,
        }
    }

    #[inline]
    pub const fn is_active(self) -> bool {
        !matches!(self, Phase::Idle)
    }
}

/// Inputs sampled once per tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MotorInputs {
    pub direction: Direction,
    /// New phase count to load; the completion check is skipped on the tick it is loaded.
    pub load: Option<u16>,
}

impl MotorInputs {
    pub const fn walk(direction: Direction) -> Self {
        Self {
            direction,
            load: None,
        }
    }
}

pub struct MotorSequencer {
    phase: Phase,
    remaining: u16,
    complete: bool,
}

impl MotorSequencer {
    pub const fn new() -> Self {
        Self {
            phase: Phase::Idle,
            remaining: 0,
            complete: false,
        }
    }

    /// Set the number of active-phase ticks until completion.
    #[inline]
    pub fn load(&mut self, phases: u16) {
        self.remaining = phases;
    }

    #[inline]
    pub fn remaining(&self) -> u16 {
        self.remaining
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Read and clear the completion flag.
    pub fn take_completion(&mut self) -> bool {
        core::mem::replace(&mut self.complete, false)
    }
}

impl Default for MotorSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine for MotorSequencer {
    type State = Phase;
    type Inputs = MotorInputs;
    type Outputs = u8;

    fn init(&mut self) {
        self.phase = Phase::Idle;
    }

    fn state(&self) -> Phase {
        self.phase
    }

    fn act(&mut self) -> u8 {
        if self.phase.is_active() {
            self.remaining = self.remaining.wrapping_sub(1);
        }
        self.phase.pattern()
    }

    fn advance(&mut self, inputs: &MotorInputs) {
        let was_active = self.phase.is_active();

        self.phase = match (self.phase, inputs.direction) {
            (Phase::Idle, _) => Phase::A,
            (phase, Direction::Forward) => phase.next(),
            (phase, Direction::Reverse) => phase.prev(),
            (phase, Direction::Hold) => phase,
        };

        if let Some(phases) = inputs.load {
            self.remaining = phases;
        } else if was_active && self.remaining == 0 {
            self.complete = true;
        }
    }
}

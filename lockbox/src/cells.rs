// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Single-writer message cells shared between tasks.
//!
//! Each cell has exactly one writing task. Readers see a value at most one tick (or one link
//! exchange) old; that delay is part of the protocol and the state machines are written around it,
//! so no cell adds locking.
//!
//! | Cell | Writer | Reader |
//! | ---- | ------ | ------ |
//! | [`CommandLatch`] | servant link ISR | servant FSMs |
//! | [`ActivityFlag`] | presence detector | motion detection |
//! | [`DriveCell`] | control sequencer | motor task |
//! | [`CompletionCell`] | motor task | control sequencer |

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use crate::link::Command;
use crate::motors::Direction;

/// Last command byte received from the master.
pub struct CommandLatch(AtomicU8);

impl CommandLatch {
    /// Nothing received yet; reads as a no-op command.
    pub const fn new() -> Self {
        Self(AtomicU8::new(0))
    }

    #[inline]
    pub fn store(&self, byte: u8) {
        self.0.store(byte, Ordering::Release);
    }

    #[inline]
    pub fn raw(&self) -> u8 {
        self.0.load(Ordering::Acquire)
    }

    /// Decoded command, `None` for reserved byte values.
    #[inline]
    pub fn latest(&self) -> Option<Command> {
        Command::from_byte(self.raw())
    }
}

impl Default for CommandLatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether the presence sensor currently sees someone.
pub struct ActivityFlag(AtomicBool);

impl ActivityFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    #[inline]
    pub fn set(&self, active: bool) {
        self.0.store(active, Ordering::Release);
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Default for ActivityFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Drive request from the control sequencer to the motor task.
///
/// `epoch` changes every time a new travel is armed; the motor loads `travel` into its phase
/// counter once per epoch. Epoch `0` means "never armed".
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DriveCommand {
    pub direction: Direction,
    pub travel: u16,
    pub epoch: u8,
}

impl DriveCommand {
    pub const IDLE: DriveCommand = DriveCommand {
        direction: Direction::Hold,
        travel: 0,
        epoch: 0,
    };

    fn pack(self) -> u32 {
        (self.epoch as u32) << 24 | (self.direction.code() as u32) << 16 | self.travel as u32
    }

    fn unpack(raw: u32) -> Self {
        Self {
            direction: Direction::from_code((raw >> 16) as u8),
            travel: raw as u16,
            epoch: (raw >> 24) as u8,
        }
    }
}

/// Latest [`DriveCommand`], written as a single word so the motor never sees a torn update.
pub struct DriveCell(AtomicU32);

impl DriveCell {
    pub const fn new() -> Self {
        // DriveCommand::IDLE packs to zero.
        Self(AtomicU32::new(0))
    }

    #[inline]
    pub fn publish(&self, cmd: DriveCommand) {
        self.0.store(cmd.pack(), Ordering::Release);
    }

    #[inline]
    pub fn load(&self) -> DriveCommand {
        DriveCommand::unpack(self.0.load(Ordering::Acquire))
    }
}

impl Default for DriveCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Epoch of the most recent travel the motor finished. `0` until the first completion.
pub struct CompletionCell(AtomicU8);

impl CompletionCell {
    pub const fn new() -> Self {
        Self(AtomicU8::new(0))
    }

    #[inline]
    pub fn publish(&self, epoch: u8) {
        self.0.store(epoch, Ordering::Release);
    }

    #[inline]
    pub fn latest(&self) -> u8 {
        self.0.load(Ordering::Acquire)
    }
}

impl Default for CompletionCell {
    fn default() -> Self {
        Self::new()
    }
}

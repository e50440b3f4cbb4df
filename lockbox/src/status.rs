// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Status byte exchanged over the servant link.
//!
//! Each bit stands for one monitored condition; a set bit means the condition is **not**
//! satisfied. `0x00` is the only all-clear value, so an unanswered or unknown node can always be
//! treated as `0xFF`.
//!
//! A node keeps its byte in a [`StatusRegister`]. Every FSM claims exactly one bit and receives a
//! [`StatusWriter`] for it, which keeps one writer per bit even though several tasks update the
//! same byte.

use core::fmt;
use core::ops::{BitOr, BitOrAssign};
use core::sync::atomic::{AtomicU8, Ordering};

/// Bitmask of unsatisfied conditions.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub struct StatusByte(u8);

impl StatusByte {
    /// Force sensors have not held their band long enough.
    pub const FORCE: StatusByte = StatusByte(1 << 0);
    /// Ambient light is above the darkness threshold.
    pub const LIGHT: StatusByte = StatusByte(1 << 1);
    /// Keypad lock has not accepted the passcode.
    pub const LOCK: StatusByte = StatusByte(1 << 2);
    /// No recent presence detected.
    pub const MOTION: StatusByte = StatusByte(1 << 3);

    /// Every condition satisfied.
    pub const CLEAR: StatusByte = StatusByte(0x00);
    /// Every condition blocked; used for silent or unknown nodes.
    pub const BLOCKED: StatusByte = StatusByte(0xFF);

    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn union(self, other: StatusByte) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    pub const fn contains(self, other: StatusByte) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when no condition is blocking.
    #[inline]
    pub const fn is_clear(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for StatusByte {
    type Output = StatusByte;

    fn bitor(self, rhs: StatusByte) -> StatusByte {
        self.union(rhs)
    }
}

impl BitOrAssign for StatusByte {
    fn bitor_assign(&mut self, rhs: StatusByte) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for StatusByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StatusByte({:#04x})", self.0)
    }
}

/// Node-local status byte shared between the FSM tasks and the link ISR.
///
/// Starts with every monitored bit set. Bits outside `monitored` stay clear forever, so a servant
/// that has no keypad never blocks on [`StatusByte::LOCK`].
pub struct StatusRegister {
    value: AtomicU8,
    monitored: u8,
    claimed: AtomicU8,
}

impl StatusRegister {
    pub const fn new(monitored: StatusByte) -> Self {
        Self {
            value: AtomicU8::new(monitored.bits()),
            monitored: monitored.bits(),
            claimed: AtomicU8::new(0),
        }
    }

    /// Hand out the only writer for `bit`.
    ///
    /// Returns `None` if `bit` is not a single monitored bit or has already been claimed.
    pub fn claim(&self, bit: StatusByte) -> Option<StatusWriter<'_>> {
        let mask = bit.bits();
        if mask.count_ones() != 1 || self.monitored & mask == 0 {
            return None;
        }
        let before = self.claimed.fetch_or(mask, Ordering::AcqRel);
        if before & mask != 0 {
            return None;
        }
        Some(StatusWriter {
            register: self,
            mask,
        })
    }

    /// Current value, as it would be presented on the next exchange.
    #[inline]
    pub fn snapshot(&self) -> StatusByte {
        StatusByte(self.value.load(Ordering::Acquire))
    }

    #[inline]
    pub fn monitored(&self) -> StatusByte {
        StatusByte(self.monitored)
    }
}

/// Exclusive handle to one bit of a [`StatusRegister`].
pub struct StatusWriter<'a> {
    register: &'a StatusRegister,
    mask: u8,
}

impl StatusWriter<'_> {
    /// Clear the bit when `satisfied`, set it otherwise.
    pub fn report(&mut self, satisfied: bool) {
        if satisfied {
            self.register.value.fetch_and(!self.mask, Ordering::AcqRel);
        } else {
            self.register.value.fetch_or(self.mask, Ordering::AcqRel);
        }
    }

    #[inline]
    pub fn bit(&self) -> StatusByte {
        StatusByte(self.mask)
    }
}

// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Synchronous master/servant link.
//!
//! Every transfer is one full-duplex byte: the master clocks out a [`Command`] while the servant
//! shifts out its status byte. The servant must preload its reply before the master starts
//! clocking, so:
//!
//! - a status change on a servant reaches the master one exchange later, and
//! - a command reaches the servant FSMs on their next tick after the exchange.
//!
//! Both delays are fixed and the state machines rely on them.

pub mod master;
pub mod messages;
pub mod servant;

pub use master::{MasterLink, Poll};
pub use messages::Command;
pub use servant::ServantEndpoint;

use crate::LinkError;

/// Upper bound on how long the master waits for one transfer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Timeout {
    /// Wait until the hardware reports completion, however long that takes.
    Unbounded,
    /// Give up after this many status-register polls.
    Spins(u32),
}

impl Timeout {
    /// Whether `spins` polls have used up the budget.
    #[inline]
    pub fn expired(&self, spins: u32) -> bool {
        match *self {
            Timeout::Unbounded => false,
            Timeout::Spins(limit) => spins >= limit,
        }
    }
}

/// Blocking byte exchange with one servant, selected by its enable line.
pub trait Transfer {
    /// Assert `servant`'s enable line, shift `byte` out and the reply in, then deassert.
    fn exchange(&mut self, servant: usize, byte: u8, timeout: Timeout) -> Result<u8, LinkError>;
}

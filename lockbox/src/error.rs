// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Error kinds surfaced by the master side of the servant link.
//!
//! The state machines themselves never fail; the link is the only place where a peer can stop
//! answering.

use thiserror::Error;

/// Failure of a single master-initiated exchange.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum LinkError {
    /// The transfer did not complete within the configured spin budget.
    #[error("servant {servant} did not complete the exchange in time")]
    Timeout { servant: usize },

    /// The SPI peripheral reported a fault (overrun, mode fault, CRC).
    #[error("bus fault while exchanging with servant {servant}")]
    Bus { servant: usize },

    /// No enable line is wired for this servant index.
    #[error("no servant at index {servant}")]
    NoSuchServant { servant: usize },
}

impl LinkError {
    /// Index of the servant the failed exchange was addressed to.
    pub fn servant(&self) -> usize {
        match *self {
            LinkError::Timeout { servant }
            | LinkError::Bus { servant }
            | LinkError::NoSuchServant { servant } => servant,
        }
    }
}

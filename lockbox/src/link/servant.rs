// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Servant side of the link, driven from the SPI transfer-complete interrupt.
//!
//! ```ignore
//! #[task(binds = SPI1, local = [endpoint, spi])]
//! fn spi_irq(cx: spi_irq::Context) {
//!     let received = cx.local.spi.read_byte();
//!     let reply = cx.local.endpoint.on_exchange(received);
//!     cx.local.spi.preload(reply);
//! }
//! ```

use crate::cells::CommandLatch;
use crate::status::StatusRegister;

/// Latches commands and supplies the reply for the following exchange.
pub struct ServantEndpoint<'a> {
    status: &'a StatusRegister,
    command: &'a CommandLatch,
    exchanges: u32,
}

impl<'a> ServantEndpoint<'a> {
    pub fn new(status: &'a StatusRegister, command: &'a CommandLatch) -> Self {
        Self {
            status,
            command,
            exchanges: 0,
        }
    }

    /// Reply to preload before the first exchange: every monitored condition blocked.
    pub fn initial_reply(&self) -> u8 {
        self.status.monitored().bits()
    }

    /// Handle one completed exchange.
    ///
    /// Latches `received` for the FSMs and returns the status byte to preload; the master sees it
    /// on the next exchange.
    pub fn on_exchange(&mut self, received: u8) -> u8 {
        self.command.store(received);
        self.exchanges = self.exchanges.wrapping_add(1);
        self.status.snapshot().bits()
    }

    /// Exchanges handled since boot.
    #[inline]
    pub fn exchanges(&self) -> u32 {
        self.exchanges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::Command;
    use crate::status::StatusByte;

    #[test]
    fn latches_command_and_returns_current_status() {
        let status = StatusRegister::new(StatusByte::FORCE | StatusByte::LIGHT);
        let latch = CommandLatch::new();
        let mut endpoint = ServantEndpoint::new(&status, &latch);
        assert_eq!(endpoint.initial_reply(), 0x03);

        let mut light = status.claim(StatusByte::LIGHT).unwrap();
        light.report(true);

        assert_eq!(endpoint.on_exchange(0x01), 0x01);
        assert_eq!(latch.latest(), Some(Command::Hold));
        assert_eq!(endpoint.exchanges(), 1);
    }
}

// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! USART debug log.
//!
//! Every node writes its FSM transitions and link faults to USART1 at 115 200 baud:
//!
//! ```text
//! control: Lock -> Unlock
//! link: servant 1 timed out
//! ```
//!
//! To access the terminal on the host machine, connect to the debug USB port and use
//! ```text
//! $ screen /dev/tty.usbmodem* 115200
//! ```
//!
//! To close the debug terminal, press `Ctrl+A` then `Ctrl+\` then `y`.

use core::fmt::{self, Write as _};
use nb::block;

use lockbox::{LinkError, Transition};
use stm32f7xx_hal::{
    prelude::*,
    serial::{Instance, Pins, Serial, Tx},
};

pub struct Usart<U: Instance> {
    tx: Tx<U>,
}

impl<U: Instance> Usart<U> {
    pub fn new<PINS: Pins<U>>(serial: Serial<U, PINS>) -> Self {
        let (tx, _rx) = serial.split();
        Self { tx }
    }

    #[inline]
    pub fn write_byte(&mut self, b: u8) {
        let _ = block!(self.tx.write(b));
    }

    pub fn write_str(&mut self, s: &str) {
        for &b in s.as_bytes() {
            self.write_byte(b);
        }
    }

    /// Write string and CRLF terminator.
    #[inline]
    pub fn println(&mut self, s: &str) {
        self.write_str(s);
        self.write_str("\r\n");
    }

    /// `<task>: <from> -> <to>`
    pub fn log_transition<S: fmt::Debug>(&mut self, task: &str, t: Transition<S>) {
        let _ = write!(self, "{}: {:?} -> {:?}\r\n", task, t.from, t.to);
    }

    pub fn log_link_error(&mut self, err: LinkError) {
        match err {
            LinkError::Timeout { servant } => {
                let _ = write!(self, "link: servant {} timed out\r\n", servant);
            }
            other => {
                let _ = write!(self, "link: {}\r\n", other);
            }
        }
    }

    /// Running count of servant exchanges that found the receiver in overrun.
    pub fn log_overruns(&mut self, total: u32) {
        let _ = write!(self, "link: {} overruns\r\n", total);
    }
}

// Implement `core::fmt::Write` so we can use `write!` / `writeln!` on `Usart`.
impl<U: Instance> fmt::Write for Usart<U> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Usart::write_str(self, s);
        Ok(())
    }
}

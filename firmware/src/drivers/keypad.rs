// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! 4x4 membrane keypad.
//!
//! One scan drives each row low in turn and reads the pulled-up columns. A key is reported once,
//! on the scan where it first appears; holding it down reports nothing further. Scanning at the
//! keypad task period doubles as debouncing.

use lockbox::io::KeySource;
use stm32f7xx_hal::gpio::{ErasedPin, Input, Output, PullUp, PushPull};

/// Legend, `KEYMAP[row][col]`.
pub const KEYMAP: [[u8; 4]; 4] = [
    *b"123A", //
    *b"456B", //
    *b"789C", //
    *b"*0#D",
];

/// Cycles to let a row settle before reading the columns (~2 µs at 216 MHz).
const ROW_SETTLE_CYCLES: u32 = 432;

pub struct MatrixKeypad {
    rows: [ErasedPin<Output<PushPull>>; 4],
    cols: [ErasedPin<Input<PullUp>>; 4],
    held: Option<u8>,
}

impl MatrixKeypad {
    pub fn new(rows: [ErasedPin<Output<PushPull>>; 4], cols: [ErasedPin<Input<PullUp>>; 4]) -> Self {
        let mut keypad = Self {
            rows,
            cols,
            held: None,
        };
        for row in keypad.rows.iter_mut() {
            row.set_high();
        }
        keypad
    }

    /// Key currently pressed, lowest row and column first.
    pub fn scan(&mut self) -> Option<u8> {
        let mut found = None;

        for (r, row) in self.rows.iter_mut().enumerate() {
            row.set_low();
            cortex_m::asm::delay(ROW_SETTLE_CYCLES);
            let col = self.cols.iter().position(|c| c.is_low());
            row.set_high();

            if let Some(c) = col {
                found = Some(KEYMAP[r][c]);
                break;
            }
        }

        found
    }
}

impl KeySource for MatrixKeypad {
    fn read_key(&mut self) -> Option<u8> {
        let now = self.scan();
        let fresh = match (self.held, now) {
            (Some(prev), Some(key)) if prev == key => None,
            (_, key) => key,
        };
        self.held = now;
        fresh
    }
}

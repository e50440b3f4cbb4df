// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Two daisy-chained 74HC595 shift registers driving a 16-segment LED bar.
//!
//! Bits are shifted MSB first on the rising clock edge and appear on the outputs at the rising
//! edge of the latch line.

use lockbox::io::DebugDisplay;
use stm32f7xx_hal::gpio::{ErasedPin, Output, PushPull};

/// Half a clock period; the '595 is good for well over 20 MHz, this is for the wiring.
const HALF_PERIOD_CYCLES: u32 = 16;

pub struct ShiftRegister {
    data: ErasedPin<Output<PushPull>>,
    clock: ErasedPin<Output<PushPull>>,
    latch: ErasedPin<Output<PushPull>>,
    shown: Option<u16>,
}

impl ShiftRegister {
    pub fn new(
        data: ErasedPin<Output<PushPull>>,
        clock: ErasedPin<Output<PushPull>>,
        latch: ErasedPin<Output<PushPull>>,
    ) -> Self {
        let mut sr = Self {
            data,
            clock,
            latch,
            shown: None,
        };
        sr.clock.set_low();
        sr.latch.set_low();
        sr.display(0);
        sr
    }

    fn shift_out(&mut self, value: u16) {
        for bit in (0..16).rev() {
            if value & (1 << bit) != 0 {
                self.data.set_high();
            } else {
                self.data.set_low();
            }
            self.clock.set_high();
            cortex_m::asm::delay(HALF_PERIOD_CYCLES);
            self.clock.set_low();
            cortex_m::asm::delay(HALF_PERIOD_CYCLES);
        }
        self.latch.set_high();
        cortex_m::asm::delay(HALF_PERIOD_CYCLES);
        self.latch.set_low();
    }
}

impl DebugDisplay for ShiftRegister {
    fn display(&mut self, value: u16) {
        // Skip redundant writes; the control task calls this every tick while locked.
        if self.shown != Some(value) {
            self.shift_out(value);
            self.shown = Some(value);
        }
    }
}

// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! 28BYJ-48 unipolar stepper behind a ULN2003 darlington array.
//!
//! The four coil inputs are plain GPIO outputs; a set bit in the phase pattern energizes the coil.

use lockbox::io::PhaseOutput;
use stm32f7xx_hal::gpio::{ErasedPin, Output, PushPull};

pub struct StepperCoils {
    coils: [ErasedPin<Output<PushPull>>; 4],
    pattern: u8,
}

impl StepperCoils {
    /// Coils in order A, B, C, D. All start de-energized.
    pub fn new(coils: [ErasedPin<Output<PushPull>>; 4]) -> Self {
        let mut stepper = Self { coils, pattern: 0 };
        stepper.emit(0);
        stepper
    }

    /// Last pattern written.
    #[inline]
    pub fn pattern(&self) -> u8 {
        self.pattern
    }

    pub fn free(self) -> [ErasedPin<Output<PushPull>>; 4] {
        self.coils
    }
}

impl PhaseOutput for StepperCoils {
    fn emit(&mut self, pattern: u8) {
        for (i, coil) in self.coils.iter_mut().enumerate() {
            if pattern & (1 << i) != 0 {
                coil.set_high();
            } else {
                coil.set_low();
            }
        }
        self.pattern = pattern & 0x0F;
    }
}

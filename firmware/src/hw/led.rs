// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Board indicator LEDs.

use stm32f7xx_hal::gpio::{ErasedPin, Output, PushPull};

/// Whether the LED is driven active-high or active-low on the board wiring.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ActiveLevel {
    High,
    Low,
}

/// LED that remembers its active level and last known state.
pub struct Led {
    pin: ErasedPin<Output<PushPull>>,
    active: ActiveLevel,
    is_on: bool,
}

impl Led {
    /// Create an LED wrapper, initializing it to OFF.
    pub fn new(pin: ErasedPin<Output<PushPull>>, active: ActiveLevel) -> Self {
        let mut led = Self {
            pin,
            active,
            is_on: true,
        };
        led.off();
        led
    }

    pub fn active_high(pin: ErasedPin<Output<PushPull>>) -> Self {
        Self::new(pin, ActiveLevel::High)
    }

    pub fn active_low(pin: ErasedPin<Output<PushPull>>) -> Self {
        Self::new(pin, ActiveLevel::Low)
    }

    /// Drive the LED logically ON (true) or OFF (false).
    pub fn set(&mut self, on: bool) {
        match (self.active, on) {
            (ActiveLevel::High, true) | (ActiveLevel::Low, false) => self.pin.set_high(),
            (ActiveLevel::High, false) | (ActiveLevel::Low, true) => self.pin.set_low(),
        }
        self.is_on = on;
    }

    #[inline]
    pub fn on(&mut self) {
        self.set(true);
    }

    #[inline]
    pub fn off(&mut self) {
        self.set(false);
    }

    pub fn toggle(&mut self) {
        self.set(!self.is_on);
    }

    #[inline]
    pub fn is_on(&self) -> bool {
        self.is_on
    }
}

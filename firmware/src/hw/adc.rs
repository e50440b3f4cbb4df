// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Analog front end for the servant sensors using direct PAC register access.
//!
//! ADC1 with blocking single-channel conversions. Selecting a channel routes it and waits a
//! fixed settling delay so the sample-and-hold sees the new source, which matters for the
//! high-impedance FSR dividers.
//!
//! Example:
//! ```ignore
//! let mut afe = AnalogFrontEnd::adc1(dp.ADC1, SETTLE_CYCLES);
//! let pad = afe.sample(0);
//! ```

use lockbox::io::{AnalogInput, ANALOG_BITS, MAX_ANALOG_CHANNEL};
use stm32f7xx_hal::pac;

/// ~50 µs at 216 MHz.
pub const SETTLE_CYCLES: u32 = 10_800;

/// CR1.RES encoding: 0b00 = 12 bit, 0b01 = 10 bit, 0b10 = 8 bit, 0b11 = 6 bit.
const RES: u8 = (12 - ANALOG_BITS) / 2;

pub struct AnalogFrontEnd {
    adc: pac::ADC1,
    settle_cycles: u32,
}

impl AnalogFrontEnd {
    /// Create and initialize ADC1: [`ANALOG_BITS`]-bit, right-aligned, software trigger.
    pub fn adc1(adc: pac::ADC1, settle_cycles: u32) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb2enr.modify(|_, w| w.adc1en().set_bit());

        let common = unsafe { &*pac::ADC_COMMON::ptr() };
        // ADC prescaler: PCLK2 / 4
        common.ccr.modify(|_, w| w.adcpre().div4());

        // Power off to configure
        adc.cr2.modify(|_, w| w.adon().clear_bit());

        adc.cr1.modify(|_, w| w.res().bits(RES));
        adc.cr2.modify(|_, w| {
            w.cont().clear_bit();
            w.align().right();
            w.exten().disabled();
            w
        });

        // Longest sample time on every external channel
        adc.smpr2.modify(|_, w| unsafe { w.bits(0x3FFF_FFFF) });
        adc.smpr1.modify(|_, w| unsafe { w.bits(0x0003_FFFF) });

        // Sequence length = 1 conversion
        adc.sqr1.modify(|_, w| w.l().bits(0));

        adc.cr2.modify(|_, w| w.adon().set_bit());

        let mut afe = Self {
            adc,
            settle_cycles,
        };
        afe.route(0);
        afe
    }

    fn route(&mut self, channel: u8) {
        self.adc
            .sqr3
            .modify(|_, w| unsafe { w.sq1().bits(channel & 0x1F) });
        cortex_m::asm::delay(self.settle_cycles);
    }

    pub fn free(self) -> pac::ADC1 {
        self.adc
    }
}

impl AnalogInput for AnalogFrontEnd {
    fn select_channel(&mut self, channel: u8) {
        if channel <= MAX_ANALOG_CHANNEL {
            self.route(channel);
        }
    }

    fn read_sample(&mut self) -> u16 {
        self.adc.cr2.modify(|_, w| w.swstart().set_bit());

        // Wait for completion
        while self.adc.sr.read().eoc().bit_is_clear() {}

        self.adc.dr.read().data().bits()
    }
}

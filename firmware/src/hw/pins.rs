// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the STM32F767 Lockbox boards.
//!
//! The master and both servants use the same board; each binary only claims the pins it needs.

use stm32f7xx_hal::{
    gpio::{gpioa, gpiob, gpiod, gpioe, Alternate, Analog, Floating, Input, Output, PullUp, PushPull},
    pac,
    prelude::*,
};

pub struct LedPins {
    pub red: gpiod::PD8<Output<PushPull>>,
    pub yellow: gpiod::PD9<Output<PushPull>>,
    pub green: gpiod::PD10<Output<PushPull>>,
}

pub struct Usart1Pins {
    pub tx: gpioa::PA9<Alternate<7>>,
    pub rx: gpioa::PA10<Alternate<7>>,
}

/// SPI4 SCK/MISO/MOSI and one enable line per servant
pub struct Spi4Pins {
    pub sck: gpioe::PE12<Alternate<5>>,
    pub miso: gpioe::PE13<Alternate<5>>,
    pub mosi: gpioe::PE14<Alternate<5>>,
    pub en_env: gpioe::PE4<Output<PushPull>>,
    pub en_entry: gpioe::PE11<Output<PushPull>>,
}

/// Latch stepper coils A-D (ULN2003 inputs)
pub struct CoilPins {
    pub a: gpiod::PD12<Output<PushPull>>,
    pub b: gpiod::PD13<Output<PushPull>>,
    pub c: gpiod::PD14<Output<PushPull>>,
    pub d: gpiod::PD15<Output<PushPull>>,
}

/// 74HC595 debug display chain
pub struct DisplayPins {
    pub data: gpiob::PB5<Output<PushPull>>,
    pub clock: gpiob::PB3<Output<PushPull>>,
    pub latch: gpiob::PB4<Output<PushPull>>,
}

/// Master board pins. Construct this once at startup using:
///
/// ```ignore
/// let pins = MasterPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOD, dp.GPIOE);
/// ```
pub struct MasterPins {
    pub leds: LedPins,
    pub usart1: Usart1Pins,
    pub spi4: Spi4Pins,
    pub coils: CoilPins,
    pub display: DisplayPins,
    /// Door release button, active-low.
    pub release: gpiod::PD0<Input<PullUp>>,
}

impl MasterPins {
    pub fn new(gpioa: pac::GPIOA, gpiob: pac::GPIOB, gpiod: pac::GPIOD, gpioe: pac::GPIOE) -> Self {
        let gpioa = gpioa.split();
        let gpiob = gpiob.split();
        let gpiod = gpiod.split();
        let gpioe = gpioe.split();

        Self {
            leds: LedPins {
                red: gpiod.pd8.into_push_pull_output(),
                yellow: gpiod.pd9.into_push_pull_output(),
                green: gpiod.pd10.into_push_pull_output(),
            },

            usart1: Usart1Pins {
                tx: gpioa.pa9.into_alternate::<7>(),
                rx: gpioa.pa10.into_alternate::<7>(),
            },

            spi4: Spi4Pins {
                sck: gpioe.pe12.into_alternate::<5>(),
                miso: gpioe.pe13.into_alternate::<5>(),
                mosi: gpioe.pe14.into_alternate::<5>(),
                en_env: gpioe.pe4.into_push_pull_output(),
                en_entry: gpioe.pe11.into_push_pull_output(),
            },

            coils: CoilPins {
                a: gpiod.pd12.into_push_pull_output(),
                b: gpiod.pd13.into_push_pull_output(),
                c: gpiod.pd14.into_push_pull_output(),
                d: gpiod.pd15.into_push_pull_output(),
            },

            display: DisplayPins {
                data: gpiob.pb5.into_push_pull_output(),
                clock: gpiob.pb3.into_push_pull_output(),
                latch: gpiob.pb4.into_push_pull_output(),
            },

            release: gpiod.pd0.into_pull_up_input(),
        }
    }
}

/// SPI1 as link servant, NSS driven by the master's enable line
pub struct Spi1Pins {
    pub nss: gpioa::PA4<Alternate<5>>,
    pub sck: gpioa::PA5<Alternate<5>>,
    pub miso: gpioa::PA6<Alternate<5>>,
    pub mosi: gpioa::PA7<Alternate<5>>,
}

/// Analog sensor inputs
pub struct SensorPins {
    pub fsr0: gpioa::PA0<Analog>, // ADC1_IN0
    pub fsr1: gpioa::PA1<Analog>, // ADC1_IN1
    pub photo: gpioa::PA2<Analog>, // ADC1_IN2
    /// PIR output, active-high.
    pub pir: gpiob::PB0<Input<Floating>>,
}

/// 4x4 keypad matrix: rows driven low one at a time, columns pulled up
pub struct KeypadPins {
    pub rows: (
        gpiod::PD0<Output<PushPull>>,
        gpiod::PD1<Output<PushPull>>,
        gpiod::PD2<Output<PushPull>>,
        gpiod::PD3<Output<PushPull>>,
    ),
    pub cols: (
        gpiod::PD4<Input<PullUp>>,
        gpiod::PD5<Input<PullUp>>,
        gpiod::PD6<Input<PullUp>>,
        gpiod::PD7<Input<PullUp>>,
    ),
}

/// One active-high LED per monitored condition.
///
/// Environment servant: `c0` force, `c1` light. Entry servant: `c0` PIR, `c1` motion window,
/// `c2` keypad checking, `c3` keypad unlocked.
pub struct ConditionLedPins {
    pub c0: gpiod::PD11<Output<PushPull>>,
    pub c1: gpiod::PD12<Output<PushPull>>,
    pub c2: gpiod::PD13<Output<PushPull>>,
    pub c3: gpiod::PD14<Output<PushPull>>,
}

/// Servant board pins.
pub struct ServantPins {
    pub leds: LedPins,
    pub conditions: ConditionLedPins,
    pub usart1: Usart1Pins,
    pub spi1: Spi1Pins,
    pub sensors: SensorPins,
    pub keypad: KeypadPins,
}

impl ServantPins {
    pub fn new(gpioa: pac::GPIOA, gpiob: pac::GPIOB, gpiod: pac::GPIOD) -> Self {
        let gpioa = gpioa.split();
        let gpiob = gpiob.split();
        let gpiod = gpiod.split();

        Self {
            leds: LedPins {
                red: gpiod.pd8.into_push_pull_output(),
                yellow: gpiod.pd9.into_push_pull_output(),
                green: gpiod.pd10.into_push_pull_output(),
            },

            conditions: ConditionLedPins {
                c0: gpiod.pd11.into_push_pull_output(),
                c1: gpiod.pd12.into_push_pull_output(),
                c2: gpiod.pd13.into_push_pull_output(),
                c3: gpiod.pd14.into_push_pull_output(),
            },

            usart1: Usart1Pins {
                tx: gpioa.pa9.into_alternate::<7>(),
                rx: gpioa.pa10.into_alternate::<7>(),
            },

            spi1: Spi1Pins {
                nss: gpioa.pa4.into_alternate::<5>(),
                sck: gpioa.pa5.into_alternate::<5>(),
                miso: gpioa.pa6.into_alternate::<5>(),
                mosi: gpioa.pa7.into_alternate::<5>(),
            },

            sensors: SensorPins {
                fsr0: gpioa.pa0.into_analog(),
                fsr1: gpioa.pa1.into_analog(),
                photo: gpioa.pa2.into_analog(),
                pir: gpiob.pb0.into_floating_input(),
            },

            keypad: KeypadPins {
                rows: (
                    gpiod.pd0.into_push_pull_output(),
                    gpiod.pd1.into_push_pull_output(),
                    gpiod.pd2.into_push_pull_output(),
                    gpiod.pd3.into_push_pull_output(),
                ),
                cols: (
                    gpiod.pd4.into_pull_up_input(),
                    gpiod.pd5.into_pull_up_input(),
                    gpiod.pd6.into_pull_up_input(),
                    gpiod.pd7.into_pull_up_input(),
                ),
            },
        }
    }
}

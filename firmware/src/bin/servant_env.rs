// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Environment servant: force pads under the stored item and the enclosure light sensor.
//!
//! | Task | Period | Priority | Status bit |
//! | ---- | ------ | -------- | ---------- |
//! | `force` | 50 ms | 1 | `FORCE` |
//! | `light` | 50 ms | 1 | `LIGHT` |
//! | `indicator` | 100 ms | 1 | |
//! | `link` | SPI1 IRQ | 2 | |
//!
//! Both sensor tasks share ADC1 and convert under its lock. Each lights its own condition LED
//! while satisfied; `indicator` blinks the heartbeat and reports link overruns.

#![no_main]
#![no_std]

use panic_halt as _;

use hal::{
    pac,
    prelude::*,
    serial::{Config, Serial},
};
use stm32f7xx_hal as hal;

use core::sync::atomic::{AtomicU32, Ordering};

use lockbox::cells::CommandLatch;
use lockbox::config::{ForceConfig, LightConfig, TaskPeriods};
use lockbox::link::ServantEndpoint;
use lockbox::sensors::{ForcePresence, ForceState, LightState, LightVerification};
use lockbox::{StatusByte, StatusRegister, TickBinding};
use lockbox_firmware::hw::{adc::SETTLE_CYCLES, AnalogFrontEnd, Led, ServantPins, SpiServant, Usart};
use lockbox_firmware::ports::{ForcePort, LightPort};

use rtic_monotonics::systick::prelude::*;

systick_monotonic!(Mono, 1000);

static STATUS: StatusRegister = StatusRegister::new(StatusByte::FORCE.union(StatusByte::LIGHT));
static COMMAND: CommandLatch = CommandLatch::new();
/// Exchanges that found SPI1 in overrun.
static OVERRUNS: AtomicU32 = AtomicU32::new(0);

#[rtic::app(device = stm32f7xx_hal::pac, peripherals = true, dispatchers = [UART4, UART5])]
mod app {
    use super::*;
    use rtic::mutex_prelude::*;

    #[shared]
    struct Shared {
        usart: Usart<pac::USART1>,
        adc: AnalogFrontEnd,
    }

    #[local]
    struct Local {
        spi: SpiServant,
        endpoint: ServantEndpoint<'static>,
        heartbeat: Led,
        force_led: Led,
        light_led: Led,
    }

    #[init]
    fn init(cx: init::Context) -> (Shared, Local) {
        let dp = cx.device;

        // Clocks
        let rcc = dp.RCC.constrain();
        let clocks = rcc.cfgr.sysclk(216.MHz()).freeze();

        Mono::start(cx.core.SYST, clocks.sysclk().to_Hz());

        let pins = ServantPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOD);

        // USART1 (DBG)
        let usart_cfg = Config {
            baud_rate: 115_200.bps(),
            ..Default::default()
        };
        let serial = Serial::new(dp.USART1, (pins.usart1.tx, pins.usart1.rx), &clocks, usart_cfg);
        let mut usart = Usart::new(serial);

        let adc = AnalogFrontEnd::adc1(dp.ADC1, SETTLE_CYCLES);

        // SPI1 servant, pins already in AF5
        let mut spi = SpiServant::spi1(dp.SPI1);
        let endpoint = ServantEndpoint::new(&STATUS, &COMMAND);
        spi.preload(endpoint.initial_reply());

        usart.println("lockbox environment servant up");

        let _ = force::spawn();
        let _ = light::spawn();
        let _ = indicator::spawn();

        (
            Shared { usart, adc },
            Local {
                spi,
                endpoint,
                heartbeat: Led::active_low(pins.leds.green.erase()),
                force_led: Led::active_high(pins.conditions.c0.erase()),
                light_led: Led::active_high(pins.conditions.c1.erase()),
            },
        )
    }

    /// One byte clocked in by the master: latch it, queue the status for the next exchange.
    #[task(binds = SPI1, local = [spi, endpoint], priority = 2)]
    fn link(cx: link::Context) {
        let received = cx.local.spi.read_byte();
        if cx.local.spi.clear_overrun() {
            OVERRUNS.fetch_add(1, Ordering::Relaxed);
        }
        let reply = cx.local.endpoint.on_exchange(received);
        cx.local.spi.preload(reply);
    }

    #[task(local = [force_led], shared = [usart, adc], priority = 1)]
    async fn force(cx: force::Context) {
        let led = cx.local.force_led;
        let mut usart = cx.shared.usart;
        let Some(writer) = STATUS.claim(StatusByte::FORCE) else {
            usart.lock(|u| u.println("force: status bit unavailable"));
            return;
        };

        let config = ForceConfig::default();
        let mut port = ForcePort::new(cx.shared.adc, config.channels, writer, &COMMAND);

        TickBinding::new("force", ForcePresence::new(config), TaskPeriods::default().force)
            .run(
                &mut port,
                |ms| Mono::delay(ms.millis()),
                |task, t| {
                    led.set(t.to == ForceState::Satisfied);
                    usart.lock(|u| u.log_transition(task, t));
                },
            )
            .await
    }

    #[task(local = [light_led], shared = [usart, adc], priority = 1)]
    async fn light(cx: light::Context) {
        let led = cx.local.light_led;
        let mut usart = cx.shared.usart;
        let Some(writer) = STATUS.claim(StatusByte::LIGHT) else {
            usart.lock(|u| u.println("light: status bit unavailable"));
            return;
        };

        let config = LightConfig::default();
        let mut port = LightPort::new(cx.shared.adc, config.channel, writer);

        TickBinding::new("light", LightVerification::new(config), TaskPeriods::default().light)
            .run(
                &mut port,
                |ms| Mono::delay(ms.millis()),
                |task, t| {
                    led.set(t.to == LightState::Verified);
                    usart.lock(|u| u.log_transition(task, t));
                },
            )
            .await
    }

    #[task(local = [heartbeat], shared = [usart], priority = 1)]
    async fn indicator(mut cx: indicator::Context) {
        let period = TaskPeriods::default().display;
        let mut ticks: u32 = 0;
        let mut overruns: u32 = 0;

        loop {
            let seen = OVERRUNS.load(Ordering::Relaxed);
            if seen != overruns {
                overruns = seen;
                cx.shared.usart.lock(|u| u.log_overruns(overruns));
            }

            // 1 Hz blink
            if ticks % 5 == 0 {
                cx.local.heartbeat.toggle();
            }
            ticks = ticks.wrapping_add(1);

            Mono::delay(period.millis()).await;
        }
    }
}

// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Entry servant: PIR motion sensor and the passcode keypad.
//!
//! | Task | Period | Priority | Status bit |
//! | ---- | ------ | -------- | ---------- |
//! | `presence` | 10 ms | 1 | |
//! | `motion` | 10 ms | 1 | `MOTION` |
//! | `keypad` | 50 ms | 1 | `LOCK` |
//! | `indicator` | 100 ms | 1 | |
//! | `link` | SPI1 IRQ | 2 | |
//!
//! `presence` only mirrors the PIR output into `ACTIVITY`; `motion` turns that into a window of
//! recent presence. Condition LEDs: PIR high, motion window running, keypad checking, keypad
//! unlocked.

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

use lockbox::cells::{ActivityFlag, CommandLatch};
use lockbox::config::{MotionConfig, PasscodeConfig, TaskPeriods};
use lockbox::link::ServantEndpoint;
use lockbox::passcode::{KeypadLock, KeypadState};
use lockbox::sensors::{MotionDetection, MotionState, PresenceDetector, PresenceState};
use lockbox::{StatusByte, StatusRegister, TickBinding};
use lockbox_firmware::drivers::MatrixKeypad;
use lockbox_firmware::hw::{Led, ServantPins, SpiServant, Usart};
use lockbox_firmware::ports::{KeypadPort, MotionPort, PresencePort};

use rtic_monotonics::systick::prelude::*;

systick_monotonic!(Mono, 1000);

static STATUS: StatusRegister = StatusRegister::new(StatusByte::LOCK.union(StatusByte::MOTION));
static COMMAND: CommandLatch = CommandLatch::new();
/// PIR output as last seen by `presence`.
static ACTIVITY: ActivityFlag = ActivityFlag::new();
/// Exchanges that found SPI1 in overrun.
static OVERRUNS: AtomicU32 = AtomicU32::new(0);

#[rtic::app(device = stm32f7xx_hal::pac, peripherals = true, dispatchers = [UART4, UART5])]
mod app {
    use super::*;
    use rtic::mutex_prelude::*;

    #[shared]
    struct Shared {
        usart: Usart<pac::USART1>,
    }

    #[local]
    struct Local {
        spi: SpiServant,
        endpoint: ServantEndpoint<'static>,
        presence: PresencePort<'static>,
        motion: MotionPort<'static>,
        keypad: KeypadPort<'static, MatrixKeypad>,
        heartbeat: Led,
        pir_led: Led,
        motion_led: Led,
        checking_led: Led,
        unlocked_led: Led,
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

        // SPI1 servant, pins already in AF5
        let mut spi = SpiServant::spi1(dp.SPI1);
        let endpoint = ServantEndpoint::new(&STATUS, &COMMAND);
        spi.preload(endpoint.initial_reply());

        let presence = PresencePort::new(pins.sensors.pir.erase(), &ACTIVITY);

        let motion_writer = STATUS
            .claim(StatusByte::MOTION)
            .expect("MOTION bit is monitored and unclaimed at init");
        let motion = MotionPort::new(&ACTIVITY, motion_writer);

        let (r0, r1, r2, r3) = pins.keypad.rows;
        let (c0, c1, c2, c3) = pins.keypad.cols;
        let matrix = MatrixKeypad::new(
            [r0.erase(), r1.erase(), r2.erase(), r3.erase()],
            [c0.erase(), c1.erase(), c2.erase(), c3.erase()],
        );
        let lock_writer = STATUS
            .claim(StatusByte::LOCK)
            .expect("LOCK bit is monitored and unclaimed at init");
        let keypad = KeypadPort::new(matrix, lock_writer, &COMMAND);

        usart.println("lockbox entry servant up");

        let _ = presence::spawn();
        let _ = motion::spawn();
        let _ = keypad::spawn();
        let _ = indicator::spawn();

        (
            Shared { usart },
            Local {
                spi,
                endpoint,
                presence,
                motion,
                keypad,
                heartbeat: Led::active_low(pins.leds.green.erase()),
                pir_led: Led::active_high(pins.conditions.c0.erase()),
                motion_led: Led::active_high(pins.conditions.c1.erase()),
                checking_led: Led::active_high(pins.conditions.c2.erase()),
                unlocked_led: Led::active_high(pins.conditions.c3.erase()),
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

    #[task(local = [presence, pir_led], priority = 1)]
    async fn presence(cx: presence::Context) {
        let led = cx.local.pir_led;
        // Follows the PIR pin directly; the motion task logs what matters.
        TickBinding::new("presence", PresenceDetector::new(), TaskPeriods::default().presence)
            .run(
                cx.local.presence,
                |ms| Mono::delay(ms.millis()),
                |_, t| led.set(t.to == PresenceState::On),
            )
            .await
    }

    #[task(local = [motion, motion_led], shared = [usart], priority = 1)]
    async fn motion(cx: motion::Context) {
        let led = cx.local.motion_led;
        let mut usart = cx.shared.usart;
        TickBinding::new(
            "motion",
            MotionDetection::new(MotionConfig::default()),
            TaskPeriods::default().motion,
        )
        .run(
            cx.local.motion,
            |ms| Mono::delay(ms.millis()),
            |task, t| {
                led.set(t.to == MotionState::Accumulating);
                usart.lock(|u| u.log_transition(task, t));
            },
        )
        .await
    }

    #[task(local = [keypad, checking_led, unlocked_led], shared = [usart], priority = 1)]
    async fn keypad(cx: keypad::Context) {
        let (checking, unlocked) = (cx.local.checking_led, cx.local.unlocked_led);
        let mut usart = cx.shared.usart;
        TickBinding::new(
            "keypad",
            KeypadLock::new(PasscodeConfig::default()),
            TaskPeriods::default().keypad,
        )
        .run(
            cx.local.keypad,
            |ms| Mono::delay(ms.millis()),
            |task, t| {
                checking.set(t.to.is_checking());
                unlocked.set(t.to == KeypadState::Unlocked);
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

// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Master node: door-cycle sequencer, latch stepper and servant link.
//!
//! | Task | Period | Priority |
//! | ---- | ------ | -------- |
//! | `control` | 5 ms | 1 |
//! | `motor` | 5 ms | 1 |
//! | `indicator` | 100 ms | 1 |
//!
//! `control` publishes drive requests through `DRIVE`; `motor` reports finished travels through
//! `COMPLETION`.

#![no_main]
#![no_std]

use core::sync::atomic::{AtomicBool, Ordering};
use panic_halt as _;

use hal::{
    gpio::{gpioe, Alternate},
    pac,
    prelude::*,
    serial::{Config, Serial},
    spi::{Mode, Phase, Polarity, Spi},
};
use stm32f7xx_hal as hal;

use lockbox::cells::{CompletionCell, DriveCell};
use lockbox::config::{ControlConfig, LinkConfig, TaskPeriods};
use lockbox::control::ControlSequencer;
use lockbox::link::MasterLink;
use lockbox::motors::{Direction, DriveSequencer};
use lockbox::TickBinding;
use lockbox_firmware::drivers::{ShiftRegister, StepperCoils};
use lockbox_firmware::hw::{ChipSelect, Led, MasterPins, SpiMaster, Usart};
use lockbox_firmware::ports::{ControlPort, MotorPort};

use rtic_monotonics::systick::prelude::*;

systick_monotonic!(Mono, 1000);

/// Environment servant, then entry servant.
const SERVANTS: usize = 2;

/// Latest drive request from `control`.
static DRIVE: DriveCell = DriveCell::new();
/// Epoch of the last travel `motor` finished.
static COMPLETION: CompletionCell = CompletionCell::new();
/// Last broadcast lost at least one servant.
static LINK_FAULT: AtomicBool = AtomicBool::new(false);

type Spi4Pins = (
    gpioe::PE12<Alternate<5>>,
    gpioe::PE13<Alternate<5>>,
    gpioe::PE14<Alternate<5>>,
);
type LinkBus = SpiMaster<pac::SPI4, Spi4Pins, SERVANTS>;
type Control = ControlPort<'static, LinkBus, ShiftRegister, SERVANTS>;
type Motor = MotorPort<'static, StepperCoils>;

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
        control: Control,
        motor: Motor,
        heartbeat: Led,
        moving: Led,
        fault: Led,
    }

    #[init]
    fn init(cx: init::Context) -> (Shared, Local) {
        let dp = cx.device;

        // Clocks
        let rcc = dp.RCC.constrain();
        let clocks = rcc.cfgr.sysclk(216.MHz()).freeze();
        let mut apb2 = rcc.apb2;

        Mono::start(cx.core.SYST, clocks.sysclk().to_Hz());

        let pins = MasterPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOD, dp.GPIOE);

        // USART1 (DBG)
        let usart_cfg = Config {
            baud_rate: 115_200.bps(),
            ..Default::default()
        };
        let serial = Serial::new(dp.USART1, (pins.usart1.tx, pins.usart1.rx), &clocks, usart_cfg);
        let mut usart = Usart::new(serial);

        // SPI4 (servant link)
        let spi_mode = Mode {
            polarity: Polarity::IdleLow,
            phase: Phase::CaptureOnFirstTransition,
        };
        let spi4 = Spi::new(dp.SPI4, (pins.spi4.sck, pins.spi4.miso, pins.spi4.mosi))
            .enable::<u8>(spi_mode, 100.kHz(), &clocks, &mut apb2);

        let mut enables = [
            ChipSelect::active_low(pins.spi4.en_env),
            ChipSelect::active_low(pins.spi4.en_entry),
        ];
        for enable in enables.iter_mut() {
            enable.deselect();
        }

        let link_config = if cfg!(feature = "unbounded-link") {
            LinkConfig::unbounded()
        } else {
            LinkConfig::default()
        };
        let link = MasterLink::new(SpiMaster::new(spi4, enables), link_config);

        let display = ShiftRegister::new(
            pins.display.data.erase(),
            pins.display.clock.erase(),
            pins.display.latch.erase(),
        );
        let control = ControlPort::new(
            link,
            pins.release.erase(),
            display,
            &DRIVE,
            &COMPLETION,
        );

        let coils = StepperCoils::new([
            pins.coils.a.erase(),
            pins.coils.b.erase(),
            pins.coils.c.erase(),
            pins.coils.d.erase(),
        ]);
        let motor = MotorPort::new(coils, &DRIVE, &COMPLETION);

        usart.println("lockbox master up");
        if cfg!(feature = "unbounded-link") {
            usart.println("link: unbounded exchanges");
        }

        let _ = control::spawn();
        let _ = motor::spawn();
        let _ = indicator::spawn();

        (
            Shared { usart },
            Local {
                control,
                motor,
                heartbeat: Led::active_low(pins.leds.green.erase()),
                moving: Led::active_low(pins.leds.yellow.erase()),
                fault: Led::active_low(pins.leds.red.erase()),
            },
        )
    }

    #[task(local = [control], shared = [usart], priority = 1)]
    async fn control(mut cx: control::Context) {
        let port = cx.local.control;
        let mut binding = TickBinding::new(
            "control",
            ControlSequencer::new(ControlConfig::default()),
            TaskPeriods::default().control,
        );

        loop {
            if let Some(t) = binding.tick(port) {
                cx.shared.usart.lock(|u| u.log_transition(binding.name(), t));
            }
            if let Some(err) = port.take_error() {
                cx.shared.usart.lock(|u| u.log_link_error(err));
            }
            LINK_FAULT.store(port.faulted(), Ordering::Relaxed);
            Mono::delay(binding.period_ms().millis()).await;
        }
    }

    #[task(local = [motor], priority = 1)]
    async fn motor(cx: motor::Context) {
        // Phase changes every tick while driving; too chatty to log.
        TickBinding::new("motor", DriveSequencer::new(), TaskPeriods::default().motor)
            .run(cx.local.motor, |ms| Mono::delay(ms.millis()), |_, _| {})
            .await
    }

    #[task(local = [heartbeat, moving, fault], priority = 1)]
    async fn indicator(cx: indicator::Context) {
        let period = TaskPeriods::default().display;
        let mut ticks: u32 = 0;

        loop {
            let drive = DRIVE.load();
            cx.local
                .moving
                .set(drive.direction != Direction::Hold && drive.epoch != COMPLETION.latest());

            // 1 Hz blink
            if ticks % 5 == 0 {
                cx.local.heartbeat.toggle();
            }
            cx.local.fault.set(LINK_FAULT.load(Ordering::Relaxed));
            ticks = ticks.wrapping_add(1);

            Mono::delay(period.millis()).await;
        }
    }
}

// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Serial Peripheral Interface (SPI) abstraction layer for the servant link.
//!
//! - `SpiMaster` wraps a configured HAL SPI instance (8-bit words) plus one enable line per
//!   servant and implements [`Transfer`].
//! - `ChipSelect` is an active-low GPIO output wrapper for manual enable control.
//! - `SpiServant` configures SPI1 as a servant with hardware NSS at the PAC level, since the HAL
//!   only drives the peripheral as master.

use core::ptr;

use lockbox::link::{Timeout, Transfer};
use lockbox::LinkError;
use stm32f7xx_hal::{
    gpio::{self, ErasedPin, Output, PinState, PushPull},
    pac,
    prelude::*,
    spi::{self, Enabled, Spi},
};

/// Poll a non-blocking SPI operation until it completes, faults or runs out of spins.
fn spin<T>(
    timeout: Timeout,
    servant: usize,
    mut op: impl FnMut() -> nb::Result<T, spi::Error>,
) -> Result<T, LinkError> {
    let mut spins: u32 = 0;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(nb::Error::Other(_)) => return Err(LinkError::Bus { servant }),
            Err(nb::Error::WouldBlock) => {
                if timeout.expired(spins) {
                    return Err(LinkError::Timeout { servant });
                }
                spins = spins.wrapping_add(1);
            }
        }
    }
}

/// Link master: one SPI bus, `N` servant enable lines.
pub struct SpiMaster<I, P, const N: usize> {
    spi: Spi<I, P, Enabled<u8>>,
    enables: [ChipSelect; N],
}

impl<I, P, const N: usize> SpiMaster<I, P, N>
where
    I: spi::Instance,
    P: spi::Pins<I>,
{
    pub fn new(spi: Spi<I, P, Enabled<u8>>, enables: [ChipSelect; N]) -> Self {
        Self { spi, enables }
    }

    pub fn free(self) -> (Spi<I, P, Enabled<u8>>, [ChipSelect; N]) {
        (self.spi, self.enables)
    }
}

impl<I, P, const N: usize> Transfer for SpiMaster<I, P, N>
where
    I: spi::Instance,
    P: spi::Pins<I>,
{
    fn exchange(&mut self, servant: usize, byte: u8, timeout: Timeout) -> Result<u8, LinkError> {
        let enable = self
            .enables
            .get_mut(servant)
            .ok_or(LinkError::NoSuchServant { servant })?;
        let spi = &mut self.spi;

        enable.select();
        let reply = spin(timeout, servant, || spi.send(byte))
            .and_then(|()| spin(timeout, servant, || spi.read()));
        enable.deselect();

        reply
    }
}

/// Manual chip-select line, active-low.
pub struct ChipSelect {
    pin: ErasedPin<Output<PushPull>>,
}

impl ChipSelect {
    /// Create an active-low chip select and set to the inactive state (i.e., high).
    pub fn active_low<const P: char, const N: u8, MODE>(pin: gpio::Pin<P, N, MODE>) -> Self {
        let mut pin = pin.into_push_pull_output();
        pin.set_state(PinState::High);
        Self { pin: pin.erase() }
    }

    /// Assert the chip select.
    #[inline]
    pub fn select(&mut self) {
        self.pin.set_low();
    }

    /// Deassert the chip select.
    #[inline]
    pub fn deselect(&mut self) {
        self.pin.set_high();
    }

    pub fn free(self) -> ErasedPin<Output<PushPull>> {
        self.pin
    }
}

/// SPI1 as link servant: mode 0, 8-bit frames, hardware NSS, RXNE interrupt.
pub struct SpiServant {
    spi: pac::SPI1,
}

impl SpiServant {
    /// Enable and configure SPI1. The SCK/MISO/MOSI/NSS pins must already be in AF5.
    pub fn spi1(spi: pac::SPI1) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb2enr.modify(|_, w| w.spi1en().set_bit());

        // Disable to configure
        spi.cr1.modify(|_, w| w.spe().clear_bit());

        spi.cr1.write(|w| {
            w.mstr().clear_bit();
            w.cpol().clear_bit();
            w.cpha().clear_bit();
            w.ssm().clear_bit();
            w.lsbfirst().clear_bit()
        });

        // 8-bit data, RXNE at one byte, interrupt on receive
        spi.cr2.write(|w| {
            unsafe { w.ds().bits(0b0111) };
            w.frxth().set_bit();
            w.rxneie().set_bit()
        });

        spi.cr1.modify(|_, w| w.spe().set_bit());

        Self { spi }
    }

    /// Byte-wide view of the data register; a 32-bit access would move four FIFO entries.
    #[inline]
    fn dr8(&self) -> *mut u8 {
        &self.spi.dr as *const _ as *mut u8
    }

    /// Queue the byte shifted out on the next exchange.
    #[inline]
    pub fn preload(&mut self, byte: u8) {
        unsafe { ptr::write_volatile(self.dr8(), byte) }
    }

    /// Byte received in the exchange that just completed. Clears RXNE.
    #[inline]
    pub fn read_byte(&mut self) -> u8 {
        unsafe { ptr::read_volatile(self.dr8()) }
    }

    /// Whether the master clocked a byte in before the previous one was read, clearing the flag.
    ///
    /// Call right after [`read_byte`](Self::read_byte): OVR clears on a DR read followed by an SR
    /// read. While OVR is set the peripheral drops every incoming frame.
    #[inline]
    pub fn clear_overrun(&mut self) -> bool {
        self.spi.sr.read().ovr().bit_is_set()
    }

    pub fn free(self) -> pac::SPI1 {
        self.spi
    }
}

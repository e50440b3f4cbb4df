// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! I/O collaborators the state machines sample from and drive.
//!
//! These are deliberately thin: the firmware implements them over the MCU peripherals, tests
//! implement them over plain fields.

/// Highest external ADC input channel.
pub const MAX_ANALOG_CHANNEL: u8 = 15;

/// Resolution of every [`AnalogInput`] sample. Thresholds and bands in
/// [`crate::config`] are in counts of this width.
pub const ANALOG_BITS: u8 = 10;

/// Largest sample an [`AnalogInput`] returns.
pub const ANALOG_FULL_SCALE: u16 = (1 << ANALOG_BITS) - 1;

/// Multiplexed analog input.
pub trait AnalogInput {
    /// Route `channel` to the converter and wait for it to settle.
    ///
    /// Implementations ignore channels above [`MAX_ANALOG_CHANNEL`] and keep the previous routing.
    fn select_channel(&mut self, channel: u8);

    /// Convert the selected channel.
    fn read_sample(&mut self) -> u16;

    /// Select `channel` and convert it.
    fn sample(&mut self, channel: u8) -> u16 {
        self.select_channel(channel);
        self.read_sample()
    }
}

/// Non-blocking keypad. At most one buffered symbol is returned per call.
pub trait KeySource {
    fn read_key(&mut self) -> Option<u8>;
}

/// Fire-and-forget 16-bit debug output (LED bar, shift register chain).
pub trait DebugDisplay {
    fn display(&mut self, value: u16);
}

/// Stepper coil outputs; the low nibble of `pattern` maps to coils A–D.
pub trait PhaseOutput {
    fn emit(&mut self, pattern: u8);
}

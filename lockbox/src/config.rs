// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Tunable thresholds, bands and periods for every FSM.
//!
//! Each FSM takes its config by value in its constructor. `Default` carries the values the
//! enclosure was commissioned with; the `with_*` builders override them.
//!
//! Setters that select hardware resources ignore out-of-range values and keep the previous
//! setting instead of failing.

use crate::io::{ANALOG_FULL_SCALE, MAX_ANALOG_CHANNEL};
use crate::link::Timeout;
use crate::motors::StepperGeometry;

/// Open interval `(low, high)` of raw ADC counts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Band {
    pub low: u16,
    pub high: u16,
}

impl Band {
    pub const fn new(low: u16, high: u16) -> Self {
        Self { low, high }
    }

    /// Strictly inside the band; both edges are excluded.
    #[inline]
    pub fn contains(&self, sample: u16) -> bool {
        sample > self.low && sample < self.high
    }
}

/// [`crate::sensors::ForcePresence`] parameters.
///
/// `entry_bands` gate the move into accumulation; `hold_bands` must keep holding on every
/// accumulating tick. They are independent per channel and need not match.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ForceConfig {
    pub channels: [u8; 2],
    pub entry_bands: [Band; 2],
    pub hold_bands: [Band; 2],
    /// Accumulating ticks needed before the force is accepted.
    pub threshold: u16,
}

impl Default for ForceConfig {
    fn default() -> Self {
        let band = Band::new(0x0200, 0x0300);
        Self {
            channels: [0, 1],
            entry_bands: [band, band],
            hold_bands: [band, band],
            threshold: 500,
        }
    }
}

impl ForceConfig {
    /// Select the two ADC channels. Ignored if either is out of range.
    pub fn set_channels(&mut self, channels: [u8; 2]) {
        if channels.iter().all(|&ch| ch <= MAX_ANALOG_CHANNEL) {
            self.channels = channels;
        }
    }

    pub fn with_channels(mut self, channels: [u8; 2]) -> Self {
        self.set_channels(channels);
        self
    }

    pub fn with_entry_bands(mut self, bands: [Band; 2]) -> Self {
        self.entry_bands = bands;
        self
    }

    pub fn with_hold_bands(mut self, bands: [Band; 2]) -> Self {
        self.hold_bands = bands;
        self
    }

    pub fn with_threshold(mut self, threshold: u16) -> Self {
        self.threshold = threshold;
        self
    }
}

/// [`crate::sensors::LightVerification`] parameters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LightConfig {
    pub channel: u8,
    /// Samples strictly below this count the enclosure as dark.
    pub threshold: u16,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            channel: 2,
            threshold: 0x0010,
        }
    }
}

impl LightConfig {
    /// Select the ADC channel. Ignored if out of range.
    pub fn set_channel(&mut self, channel: u8) {
        if channel <= MAX_ANALOG_CHANNEL {
            self.channel = channel;
        }
    }

    pub fn with_channel(mut self, channel: u8) -> Self {
        self.set_channel(channel);
        self
    }

    pub fn with_threshold(mut self, threshold: u16) -> Self {
        self.threshold = threshold;
        self
    }
}

/// [`crate::sensors::MotionDetection`] parameters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MotionConfig {
    /// Ticks a detected presence stays valid after motion stops.
    pub threshold: u16,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self { threshold: 1000 }
    }
}

impl MotionConfig {
    pub fn with_threshold(mut self, threshold: u16) -> Self {
        self.threshold = threshold;
        self
    }
}

/// Length of the keypad passcode.
pub const CODE_LEN: usize = 4;

/// [`crate::passcode::KeypadLock`] parameters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PasscodeConfig {
    pub code: [u8; CODE_LEN],
    /// Key that relocks an unlocked keypad without waiting for the master.
    pub relock_key: Option<u8>,
}

impl Default for PasscodeConfig {
    fn default() -> Self {
        Self {
            code: *b"1234",
            relock_key: Some(b'#'),
        }
    }
}

impl PasscodeConfig {
    pub fn with_code(mut self, code: [u8; CODE_LEN]) -> Self {
        self.code = code;
        self
    }

    pub fn with_relock_key(mut self, key: Option<u8>) -> Self {
        self.relock_key = key;
        self
    }
}

/// [`crate::control::ControlSequencer`] parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ControlConfig {
    /// Latch travel per open/close, in degrees of the output shaft.
    pub travel_deg: f32,
    pub geometry: StepperGeometry,
    /// Closing ticks that keep re-sending Acknowledge before Lock is allowed. Must span two
    /// periods of the slowest servant FSM, or a short travel relocks on a stale all-clear.
    pub ack_ticks: u16,
}

impl Default for ControlConfig {
    fn default() -> Self {
        let periods = TaskPeriods::default();
        let slowest = periods.force.max(periods.light).max(periods.keypad);
        Self {
            travel_deg: 135.0,
            geometry: StepperGeometry::default(),
            // A servant needs one tick to see Acknowledge and another to report the reset.
            ack_ticks: (2 * slowest / periods.control + 1) as u16,
        }
    }
}

impl ControlConfig {
    pub fn with_travel_deg(mut self, deg: f32) -> Self {
        self.travel_deg = deg;
        self
    }

    pub fn with_geometry(mut self, geometry: StepperGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_ack_ticks(mut self, ticks: u16) -> Self {
        self.ack_ticks = ticks;
        self
    }
}

/// [`crate::link::MasterLink`] parameters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LinkConfig {
    pub timeout: Timeout,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            timeout: Timeout::Spins(50_000),
        }
    }
}

impl LinkConfig {
    /// Wait forever for every exchange, as the first hardware revision did.
    pub const fn unbounded() -> Self {
        Self {
            timeout: Timeout::Unbounded,
        }
    }

    pub fn with_timeout(mut self, timeout: Timeout) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Tick period of each task, in milliseconds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TaskPeriods {
    pub force: u32,
    pub light: u32,
    pub keypad: u32,
    pub motion: u32,
    pub presence: u32,
    pub motor: u32,
    pub control: u32,
    pub display: u32,
}

impl Default for TaskPeriods {
    fn default() -> Self {
        Self {
            force: 50,
            light: 50,
            keypad: 50,
            motion: 10,
            presence: 10,
            motor: 5,
            control: 5,
            display: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_excludes_both_edges() {
        let band = Band::new(0x200, 0x300);
        assert!(!band.contains(0x200));
        assert!(band.contains(0x201));
        assert!(band.contains(0x2FF));
        assert!(!band.contains(0x300));
    }

    #[test]
    fn out_of_range_channels_keep_previous_selection() {
        let mut force = ForceConfig::default();
        force.set_channels([3, 4]);
        assert_eq!(force.channels, [3, 4]);
        force.set_channels([5, MAX_ANALOG_CHANNEL + 1]);
        assert_eq!(force.channels, [3, 4]);

        let light = LightConfig::default().with_channel(200);
        assert_eq!(light.channel, LightConfig::default().channel);
    }

    #[test]
    fn default_levels_fit_the_sample_width() {
        let force = ForceConfig::default();
        for band in force.entry_bands.iter().chain(force.hold_bands.iter()) {
            assert!(band.low < band.high);
            assert!(band.high <= ANALOG_FULL_SCALE);
        }
        // Commissioned on a 10-bit converter: the pads sit in the middle third of the range.
        assert_eq!(ANALOG_FULL_SCALE, 0x3FF);
        assert!(force.entry_bands[0].low > ANALOG_FULL_SCALE / 4);
        assert!(LightConfig::default().threshold < ANALOG_FULL_SCALE / 32);
    }
}

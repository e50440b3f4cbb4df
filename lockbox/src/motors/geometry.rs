// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Latch stepper geometry.

/// Step angle and gearbox of the latch stepper.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StepperGeometry {
    /// Rotor degrees per half step.
    pub step_angle_deg: f32,
    /// Rotor turns per output-shaft turn.
    pub gear_ratio: f32,
}

impl Default for StepperGeometry {
    fn default() -> Self {
        Self {
            step_angle_deg: 5.625,
            gear_ratio: 64.0,
        }
    }
}

impl StepperGeometry {
    /// Phases for one full turn of the output shaft.
    pub fn phases_per_rev(&self) -> u32 {
        (360.0 / self.step_angle_deg * self.gear_ratio) as u32
    }

    /// Phases to turn the output shaft by `deg`, truncated. Negative angles give zero and
    /// travel beyond the counter's range saturates.
    pub fn phases_for(&self, deg: f32) -> u16 {
        (deg / self.step_angle_deg * self.gear_ratio) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_latch_travel() {
        let geo = StepperGeometry::default();
        assert_eq!(geo.phases_for(135.0), 1536);
        assert_eq!(geo.phases_per_rev(), 4096);
    }

    #[test]
    fn truncates_and_saturates() {
        let geo = StepperGeometry::default();
        assert_eq!(geo.phases_for(0.1), 1);
        assert_eq!(geo.phases_for(-10.0), 0);
        assert_eq!(geo.phases_for(10_000.0), u16::MAX);
    }
}

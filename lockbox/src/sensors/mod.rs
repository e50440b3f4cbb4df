// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Sensor FSMs
//!
//! Every sensor machine owns one status bit. Its action reports whether the condition is
//! satisfied, as a pure function of the current state; the port forwards that to its
//! [`crate::StatusWriter`].
//!
//! | Machine | Bit | Inputs |
//! | ------- | --- | ------ |
//! | [`ForcePresence`] | `FORCE` | two FSR channels, latched command |
//! | [`LightVerification`] | `LIGHT` | one photo-sensor channel |
//! | [`MotionDetection`] | `MOTION` | [`crate::cells::ActivityFlag`] |
//! | [`PresenceDetector`] | none | PIR level; writes the activity flag |

pub mod force;
pub mod light;
pub mod motion;
pub mod presence;

pub use force::{ForceInputs, ForcePresence, ForceState};
pub use light::{LightState, LightVerification};
pub use motion::{MotionDetection, MotionState};
pub use presence::{PresenceDetector, PresenceState};

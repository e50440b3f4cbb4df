// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! Drivers that sit above the raw `hw/` layer and implement the `lockbox::io` traits.
//!
//! ## Existing drivers
//!
//! - [`keypad`] – 4x4 membrane keypad matrix
//! - [`shift_register`] – 74HC595 chain for the debug LED bar
//! - [`stepper`] – 28BYJ-48 stepper coils through a ULN2003

pub mod keypad;
pub mod shift_register;
pub mod stepper;

pub use keypad::MatrixKeypad;
pub use shift_register::ShiftRegister;
pub use stepper::StepperCoils;

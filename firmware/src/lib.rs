// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Lockbox Firmware
//!
//! Board support for the Lockbox enclosure on STM32F767 nodes: one master driving the latch
//! stepper and polling the servants, an environment servant (force pads and light) and an entry
//! servant (PIR and keypad). The state machines themselves live in the `lockbox` crate; this
//! crate binds them to pins, peripherals and RTIC tasks.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`hw`] | MCU-level wrappers around USART, SPI, ADC and GPIO |
//! | [`drivers`] | Device-level drivers (keypad, 74HC595, 28BYJ-48) |
//! | [`ports`] | `Port` implementations tying each FSM to its hardware |
//!
//! Binaries: `master`, `servant_env`, `servant_entry`.
//!
//! ## Getting Started
//!
//! Build docs:
//!
//! ```bash
//! cargo doc --no-deps --open
//! ```
//!
//! Flash a board:
//!
//! ```bash
//! cargo run --release --bin master
//! cargo run --release --bin servant_env
//! cargo run --release --bin servant_entry
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![no_std]

pub mod drivers;
pub mod hw;
pub mod ports;

// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Lockbox Core
//!
//! Hardware-independent state machines for the Lockbox enclosure: one master node drives the
//! latch motor and polls one or more servant nodes over SPI; servants verify force, light, motion
//! and passcode conditions and answer with a status byte.
//!
//! Everything here is `no_std`, allocation-free and runs on the host for testing. Board support
//! lives in the `lockbox-firmware` crate.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`fsm`] | `Machine`/`Port` traits and the periodic tick binding |
//! | [`status`] | Status byte and the per-node status register |
//! | [`cells`] | Single-writer message cells shared between tasks |
//! | [`link`] | Master/servant SPI exchange protocol |
//! | [`sensors`] | Force, light, motion and presence FSMs |
//! | [`passcode`] | Keypad lock FSM |
//! | [`motors`] | Stepper phase sequencer and geometry |
//! | [`control`] | Door-cycle sequencer on the master |
//! | [`config`] | Thresholds, bands and task periods |
//! | [`io`] | Traits for the external I/O collaborators |
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

pub mod cells;
pub mod config;
pub mod control;
pub mod error;
pub mod fsm;
pub mod io;
pub mod link;
pub mod motors;
pub mod passcode;
pub mod sensors;
pub mod status;

pub use error::LinkError;
pub use fsm::{Machine, Port, TickBinding, Transition};
pub use status::{StatusByte, StatusRegister, StatusWriter};

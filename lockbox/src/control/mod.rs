// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Door Control
//!
//! The master node's door cycle: wait for every servant to report its conditions satisfied,
//! open the latch, wait for the release button, close the latch and start over.
//!
//! ```text
//! Init -> Lock -(fresh all-clear poll)-> Unlock -> Opening -(travel done)-> Open
//!          ^                                                                  |
//!          +---(travel done)-- Closing <- Reset <------(release pressed)------+
//! ```
//!
//! Reset and Closing both send Acknowledge. Closing keeps sending it for at least
//! [`ControlConfig::ack_ticks`](crate::config::ControlConfig::ack_ticks) ticks, so every servant
//! FSM sees it before Lock overwrites it with Hold.

pub mod sequencer;

pub use sequencer::{ControlInputs, ControlOutputs, ControlSequencer, ControlState};

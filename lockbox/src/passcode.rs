// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Keypad passcode lock.
//!
//! Keys are checked one at a time against the code as they arrive; once as many keys as the code
//! is long have been typed, the match count decides whether the lock opens. A wrong code gives no
//! feedback and simply starts over. The lock stays open until the master acknowledges the open
//! door or the relock key is typed.

use crate::config::{PasscodeConfig, CODE_LEN};
use crate::fsm::Machine;
use crate::link::Command;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeypadState {
    Locked,
    Checking,
    Comparing,
    Unlocked,
}

impl KeypadState {
    /// An attempt is in progress: a key is being checked or a full code compared.
    #[inline]
    pub const fn is_checking(self) -> bool {
        matches!(self, KeypadState::Checking | KeypadState::Comparing)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct KeypadInputs {
    /// Key pressed since the previous tick, if any.
    pub key: Option<u8>,
    pub command: Option<Command>,
}

pub struct KeypadLock {
    config: PasscodeConfig,
    state: KeypadState,
    key: u8,
    position: usize,
    matches: usize,
    open: bool,
}

impl KeypadLock {
    pub fn new(config: PasscodeConfig) -> Self {
        Self {
            config,
            state: KeypadState::Locked,
            key: 0,
            position: 0,
            matches: 0,
            open: false,
        }
    }

    /// Keys typed toward the current attempt.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.open
    }

    fn is_relock(&self, key: Option<u8>) -> bool {
        key.is_some() && key == self.config.relock_key
    }
}

impl Machine for KeypadLock {
    type State = KeypadState;
    type Inputs = KeypadInputs;
    /// Whether the lock condition is satisfied, i.e. the keypad is open.
    type Outputs = bool;

    fn init(&mut self) {
        self.state = KeypadState::Locked;
        self.position = 0;
        self.matches = 0;
        self.open = false;
    }

    fn state(&self) -> KeypadState {
        self.state
    }

    fn act(&mut self) -> bool {
        match self.state {
            KeypadState::Locked => false,
            KeypadState::Checking => {
                if self.config.code.get(self.position) == Some(&self.key) {
                    self.matches += 1;
                }
                self.position = self.position.saturating_add(1);
                false
            }
            KeypadState::Comparing => {
                self.open = self.matches == CODE_LEN;
                self.matches = 0;
                self.position = 0;
                false
            }
            KeypadState::Unlocked => true,
        }
    }

    fn advance(&mut self, inputs: &KeypadInputs) {
        self.state = match self.state {
            KeypadState::Locked => match inputs.key {
                Some(key) => {
                    self.key = key;
                    KeypadState::Checking
                }
                None if self.position >= CODE_LEN => KeypadState::Comparing,
                None => KeypadState::Locked,
            },
            KeypadState::Checking => KeypadState::Locked,
            KeypadState::Comparing if self.open => KeypadState::Unlocked,
            KeypadState::Comparing => KeypadState::Locked,
            KeypadState::Unlocked
                if inputs.command == Some(Command::Acknowledge) || self.is_relock(inputs.key) =>
            {
                self.open = false;
                KeypadState::Locked
            }
            KeypadState::Unlocked => KeypadState::Unlocked,
        };
    }
}

// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Simulated enclosure: one master and two servants sharing a millisecond clock.
//!
//! Each node's tasks are [`TickBinding`]s ticked when the clock reaches a multiple of their
//! period. The wire emulates the SPI shift register: a servant's reply is whatever it preloaded
//! at its previous exchange.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::vec::Vec;

use lockbox::cells::{ActivityFlag, CommandLatch, CompletionCell, DriveCell, DriveCommand};
use lockbox::config::{
    ControlConfig, ForceConfig, LightConfig, LinkConfig, MotionConfig, PasscodeConfig,
    TaskPeriods,
};
use lockbox::control::{ControlInputs, ControlOutputs, ControlSequencer, ControlState};
use lockbox::link::{MasterLink, Poll, ServantEndpoint, Timeout, Transfer};
use lockbox::motors::{DriveOutputs, DriveSequencer};
use lockbox::passcode::{KeypadInputs, KeypadLock};
use lockbox::sensors::{
    ForceInputs, ForcePresence, LightVerification, MotionDetection, PresenceDetector,
};
use lockbox::{LinkError, Machine, Port, StatusByte, StatusRegister, StatusWriter, TickBinding};

pub const ENV: usize = 0;
pub const ENTRY: usize = 1;

/// Physical inputs of the enclosure.
#[derive(Default)]
pub struct World {
    pub now: Cell<u32>,
    pub pads: Cell<[u16; 2]>,
    pub light: Cell<u16>,
    pub pir: Cell<bool>,
    pub release: Cell<bool>,
    /// Keys and the time at which they are pressed.
    pub keys: RefCell<VecDeque<(u32, u8)>>,
    /// Servants that stop answering.
    pub silent: Cell<Option<usize>>,
}

impl World {
    pub fn load_pads(&self) {
        self.pads.set([0x280, 0x280]);
    }

    pub fn type_code(&self, start: u32, code: &[u8]) {
        let mut keys = self.keys.borrow_mut();
        for (i, &k) in code.iter().enumerate() {
            keys.push_back((start + 200 * i as u32, k));
        }
    }
}

/// One servant's side of the wire: its endpoint and the byte sitting in its shift register.
pub struct ServantSlot {
    pub endpoint: ServantEndpoint<'static>,
    pub preload: u8,
}

pub struct Wire<'w> {
    pub world: &'w World,
    pub slots: Vec<ServantSlot>,
    /// (time, servant, command, reply)
    pub log: Vec<(u32, usize, u8, u8)>,
}

impl Transfer for Wire<'_> {
    fn exchange(&mut self, servant: usize, byte: u8, _timeout: Timeout) -> Result<u8, LinkError> {
        if self.world.silent.get() == Some(servant) {
            return Err(LinkError::Timeout { servant });
        }
        let slot = self
            .slots
            .get_mut(servant)
            .ok_or(LinkError::NoSuchServant { servant })?;
        let reply = slot.preload;
        slot.preload = slot.endpoint.on_exchange(byte);
        self.log.push((self.world.now.get(), servant, byte, reply));
        Ok(reply)
    }
}

fn leak<T>(value: T) -> &'static T {
    Box::leak(Box::new(value))
}

// --- servant ports ---------------------------------------------------------

pub struct ForcePort<'w> {
    world: &'w World,
    writer: StatusWriter<'static>,
    command: &'static CommandLatch,
}

impl Port<ForcePresence> for ForcePort<'_> {
    fn apply(&mut self, satisfied: bool) {
        self.writer.report(satisfied);
    }

    fn sample(&mut self) -> ForceInputs {
        ForceInputs {
            samples: self.world.pads.get(),
            command: self.command.latest(),
        }
    }
}

pub struct LightPort<'w> {
    world: &'w World,
    writer: StatusWriter<'static>,
}

impl Port<LightVerification> for LightPort<'_> {
    fn apply(&mut self, satisfied: bool) {
        self.writer.report(satisfied);
    }

    fn sample(&mut self) -> u16 {
        self.world.light.get()
    }
}

pub struct PresencePort<'w> {
    world: &'w World,
    flag: &'static ActivityFlag,
}

impl Port<PresenceDetector> for PresencePort<'_> {
    fn apply(&mut self, active: bool) {
        self.flag.set(active);
    }

    fn sample(&mut self) -> bool {
        self.world.pir.get()
    }
}

pub struct MotionPort {
    writer: StatusWriter<'static>,
    flag: &'static ActivityFlag,
}

impl Port<MotionDetection> for MotionPort {
    fn apply(&mut self, satisfied: bool) {
        self.writer.report(satisfied);
    }

    fn sample(&mut self) -> bool {
        self.flag.is_active()
    }
}

pub struct KeypadPort<'w> {
    world: &'w World,
    writer: StatusWriter<'static>,
    command: &'static CommandLatch,
}

impl Port<KeypadLock> for KeypadPort<'_> {
    fn apply(&mut self, satisfied: bool) {
        self.writer.report(satisfied);
    }

    fn sample(&mut self) -> KeypadInputs {
        let mut keys = self.world.keys.borrow_mut();
        let key = match keys.front() {
            Some(&(at, key)) if at <= self.world.now.get() => {
                keys.pop_front();
                Some(key)
            }
            _ => None,
        };
        KeypadInputs {
            key,
            command: self.command.latest(),
        }
    }
}

// --- master ports ----------------------------------------------------------

pub struct ControlPort<'w> {
    pub world: &'w World,
    pub link: MasterLink<Wire<'w>, 2>,
    pub drive: &'static DriveCell,
    pub completion: &'static CompletionCell,
    pub poll: Option<Poll>,
    pub displayed: Vec<StatusByte>,
}

impl Port<ControlSequencer> for ControlPort<'_> {
    fn apply(&mut self, outputs: ControlOutputs) {
        self.drive.publish(outputs.drive);
        self.poll = outputs.broadcast.map(|cmd| self.link.broadcast(cmd));
        if let Some(status) = outputs.display {
            self.displayed.push(status);
        }
    }

    fn sample(&mut self) -> ControlInputs {
        ControlInputs {
            poll: self.poll.take(),
            release: self.world.release.get(),
            completed: self.completion.latest(),
        }
    }
}

pub struct MotorPort {
    pub drive: &'static DriveCell,
    pub completion: &'static CompletionCell,
    pub patterns: Vec<u8>,
}

impl Port<DriveSequencer> for MotorPort {
    fn apply(&mut self, outputs: DriveOutputs) {
        self.patterns.push(outputs.pattern);
        if let Some(epoch) = outputs.completed {
            self.completion.publish(epoch);
        }
    }

    fn sample(&mut self) -> DriveCommand {
        self.drive.load()
    }
}

// --- the enclosure ---------------------------------------------------------

pub struct Enclosure<'w> {
    pub world: &'w World,
    pub periods: TaskPeriods,

    pub env_status: &'static StatusRegister,
    pub entry_status: &'static StatusRegister,

    pub force: TickBinding<ForcePresence>,
    pub force_port: ForcePort<'w>,
    pub light: TickBinding<LightVerification>,
    pub light_port: LightPort<'w>,

    pub presence: TickBinding<PresenceDetector>,
    pub presence_port: PresencePort<'w>,
    pub motion: TickBinding<MotionDetection>,
    pub motion_port: MotionPort,
    pub keypad: TickBinding<KeypadLock>,
    pub keypad_port: KeypadPort<'w>,

    pub control: TickBinding<ControlSequencer>,
    pub control_port: ControlPort<'w>,
    pub motor: TickBinding<DriveSequencer>,
    pub motor_port: MotorPort,

    /// (time, from, to) of every control transition.
    pub control_log: Vec<(u32, ControlState, ControlState)>,
}

/// Tunables for a simulated run. Thresholds are shortened so a cycle fits in a few seconds.
pub struct Tuning {
    pub force: ForceConfig,
    pub motion: MotionConfig,
    pub control: ControlConfig,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            force: ForceConfig::default().with_threshold(20),
            motion: MotionConfig::default().with_threshold(50),
            control: ControlConfig::default().with_travel_deg(22.5),
        }
    }
}

impl<'w> Enclosure<'w> {
    pub fn new(world: &'w World, tuning: Tuning) -> Self {
        let env_status = leak(StatusRegister::new(StatusByte::FORCE | StatusByte::LIGHT));
        let entry_status = leak(StatusRegister::new(StatusByte::LOCK | StatusByte::MOTION));
        let env_command = leak(CommandLatch::new());
        let entry_command = leak(CommandLatch::new());
        let activity = leak(ActivityFlag::new());
        let drive = leak(DriveCell::new());
        let completion = leak(CompletionCell::new());

        let slots = [(env_status, env_command), (entry_status, entry_command)]
            .into_iter()
            .map(|(status, command)| {
                let endpoint = ServantEndpoint::new(status, command);
                ServantSlot {
                    preload: endpoint.initial_reply(),
                    endpoint,
                }
            })
            .collect();

        let periods = TaskPeriods::default();
        let claim = |reg: &'static StatusRegister, bit| reg.claim(bit).expect("bit claimed twice");

        Self {
            world,
            periods,
            env_status,
            entry_status,

            force: TickBinding::new("force", ForcePresence::new(tuning.force), periods.force),
            force_port: ForcePort {
                world,
                writer: claim(env_status, StatusByte::FORCE),
                command: env_command,
            },
            light: TickBinding::new(
                "light",
                LightVerification::new(LightConfig::default()),
                periods.light,
            ),
            light_port: LightPort {
                world,
                writer: claim(env_status, StatusByte::LIGHT),
            },

            presence: TickBinding::new("presence", PresenceDetector::new(), periods.presence),
            presence_port: PresencePort {
                world,
                flag: activity,
            },
            motion: TickBinding::new("motion", MotionDetection::new(tuning.motion), periods.motion),
            motion_port: MotionPort {
                writer: claim(entry_status, StatusByte::MOTION),
                flag: activity,
            },
            keypad: TickBinding::new(
                "keypad",
                KeypadLock::new(PasscodeConfig::default()),
                periods.keypad,
            ),
            keypad_port: KeypadPort {
                world,
                writer: claim(entry_status, StatusByte::LOCK),
                command: entry_command,
            },

            control: TickBinding::new(
                "control",
                ControlSequencer::new(tuning.control),
                periods.control,
            ),
            control_port: ControlPort {
                world,
                link: MasterLink::new(
                    Wire {
                        world,
                        slots,
                        log: Vec::new(),
                    },
                    LinkConfig::default(),
                ),
                drive,
                completion,
                poll: None,
                displayed: Vec::new(),
            },
            motor: TickBinding::new("motor", DriveSequencer::new(), periods.motor),
            motor_port: MotorPort {
                drive,
                completion,
                patterns: Vec::new(),
            },

            control_log: Vec::new(),
        }
    }

    /// Advance the clock by one millisecond, ticking every task that is due.
    pub fn step_ms(&mut self) {
        let now = self.world.now.get();
        let due = |period: u32| now % period == 0;

        if due(self.periods.force) {
            self.force.tick(&mut self.force_port);
        }
        if due(self.periods.light) {
            self.light.tick(&mut self.light_port);
        }
        if due(self.periods.presence) {
            self.presence.tick(&mut self.presence_port);
        }
        if due(self.periods.motion) {
            self.motion.tick(&mut self.motion_port);
        }
        if due(self.periods.keypad) {
            self.keypad.tick(&mut self.keypad_port);
        }
        if due(self.periods.motor) {
            self.motor.tick(&mut self.motor_port);
        }
        if due(self.periods.control) {
            if let Some(t) = self.control.tick(&mut self.control_port) {
                self.control_log.push((now, t.from, t.to));
            }
        }

        self.world.now.set(now + 1);
    }

    pub fn run_for(&mut self, ms: u32) {
        for _ in 0..ms {
            self.step_ms();
        }
    }

    /// Run until the control sequencer enters `state`; returns the time it did.
    pub fn run_until(&mut self, state: ControlState, limit_ms: u32) -> Option<u32> {
        for _ in 0..limit_ms {
            self.step_ms();
            if self.control.machine().state() == state {
                return Some(self.world.now.get());
            }
        }
        None
    }

    pub fn control_state(&self) -> ControlState {
        self.control.machine().state()
    }

    pub fn wire(&mut self) -> &mut Wire<'w> {
        self.control_port.link.transfer_mut()
    }

    /// Satisfy every servant condition.
    pub fn present_everything(&self, code_at: u32) {
        self.world.load_pads();
        self.world.light.set(0x05);
        self.world.pir.set(true);
        self.world.type_code(code_at, b"1234");
    }
}

// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Hardware side of every Lockbox state machine.
//!
//! Each port owns (or locks) the peripherals its machine samples and drives, and holds the
//! [`StatusWriter`] or message cells it publishes to. Peripherals shared between tasks of equal
//! priority, like the ADC on the environment servant, come in as RTIC resource proxies.

use lockbox::cells::{ActivityFlag, CommandLatch, CompletionCell, DriveCell, DriveCommand};
use lockbox::control::{ControlInputs, ControlOutputs, ControlSequencer};
use lockbox::io::{AnalogInput, DebugDisplay, KeySource, PhaseOutput};
use lockbox::link::{MasterLink, Poll, Transfer};
use lockbox::motors::{DriveOutputs, DriveSequencer};
use lockbox::passcode::{KeypadInputs, KeypadLock};
use lockbox::sensors::{
    ForceInputs, ForcePresence, LightVerification, MotionDetection, PresenceDetector,
};
use lockbox::{LinkError, Port, StatusWriter};
use rtic::Mutex;
use stm32f7xx_hal::gpio::{ErasedPin, Floating, Input, PullUp};

// --- environment servant ---------------------------------------------------

pub struct ForcePort<'a, A> {
    adc: A,
    channels: [u8; 2],
    writer: StatusWriter<'a>,
    command: &'a CommandLatch,
}

impl<'a, A> ForcePort<'a, A> {
    pub fn new(
        adc: A,
        channels: [u8; 2],
        writer: StatusWriter<'a>,
        command: &'a CommandLatch,
    ) -> Self {
        Self {
            adc,
            channels,
            writer,
            command,
        }
    }
}

impl<A> Port<ForcePresence> for ForcePort<'_, A>
where
    A: Mutex,
    A::T: AnalogInput,
{
    fn apply(&mut self, satisfied: bool) {
        self.writer.report(satisfied);
    }

    fn sample(&mut self) -> ForceInputs {
        let [ch0, ch1] = self.channels;
        let samples = self.adc.lock(|adc| [adc.sample(ch0), adc.sample(ch1)]);
        ForceInputs {
            samples,
            command: self.command.latest(),
        }
    }
}

pub struct LightPort<'a, A> {
    adc: A,
    channel: u8,
    writer: StatusWriter<'a>,
}

impl<'a, A> LightPort<'a, A> {
    pub fn new(adc: A, channel: u8, writer: StatusWriter<'a>) -> Self {
        Self {
            adc,
            channel,
            writer,
        }
    }
}

impl<A> Port<LightVerification> for LightPort<'_, A>
where
    A: Mutex,
    A::T: AnalogInput,
{
    fn apply(&mut self, satisfied: bool) {
        self.writer.report(satisfied);
    }

    fn sample(&mut self) -> u16 {
        let channel = self.channel;
        self.adc.lock(|adc| adc.sample(channel))
    }
}

// --- entry servant ---------------------------------------------------------

pub struct PresencePort<'a> {
    pir: ErasedPin<Input<Floating>>,
    flag: &'a ActivityFlag,
}

impl<'a> PresencePort<'a> {
    pub fn new(pir: ErasedPin<Input<Floating>>, flag: &'a ActivityFlag) -> Self {
        Self { pir, flag }
    }
}

impl Port<PresenceDetector> for PresencePort<'_> {
    fn apply(&mut self, active: bool) {
        self.flag.set(active);
    }

    fn sample(&mut self) -> bool {
        self.pir.is_high()
    }
}

pub struct MotionPort<'a> {
    flag: &'a ActivityFlag,
    writer: StatusWriter<'a>,
}

impl<'a> MotionPort<'a> {
    pub fn new(flag: &'a ActivityFlag, writer: StatusWriter<'a>) -> Self {
        Self { flag, writer }
    }
}

impl Port<MotionDetection> for MotionPort<'_> {
    fn apply(&mut self, satisfied: bool) {
        self.writer.report(satisfied);
    }

    fn sample(&mut self) -> bool {
        self.flag.is_active()
    }
}

pub struct KeypadPort<'a, K> {
    keypad: K,
    writer: StatusWriter<'a>,
    command: &'a CommandLatch,
}

impl<'a, K> KeypadPort<'a, K> {
    pub fn new(keypad: K, writer: StatusWriter<'a>, command: &'a CommandLatch) -> Self {
        Self {
            keypad,
            writer,
            command,
        }
    }
}

impl<K: KeySource> Port<KeypadLock> for KeypadPort<'_, K> {
    fn apply(&mut self, satisfied: bool) {
        self.writer.report(satisfied);
    }

    fn sample(&mut self) -> KeypadInputs {
        KeypadInputs {
            key: self.keypad.read_key(),
            command: self.command.latest(),
        }
    }
}

// --- master ----------------------------------------------------------------

/// Control sequencer port: owns the link, the release button and the debug display.
pub struct ControlPort<'a, T, D, const N: usize> {
    link: MasterLink<T, N>,
    release: ErasedPin<Input<PullUp>>,
    display: D,
    drive: &'a DriveCell,
    completion: &'a CompletionCell,
    poll: Option<Poll>,
    error: Option<LinkError>,
    faulted: bool,
}

impl<'a, T, D, const N: usize> ControlPort<'a, T, D, N>
where
    T: Transfer,
    D: DebugDisplay,
{
    pub fn new(
        link: MasterLink<T, N>,
        release: ErasedPin<Input<PullUp>>,
        display: D,
        drive: &'a DriveCell,
        completion: &'a CompletionCell,
    ) -> Self {
        Self {
            link,
            release,
            display,
            drive,
            completion,
            poll: None,
            error: None,
            faulted: false,
        }
    }

    /// Most recent link failure since the last call.
    pub fn take_error(&mut self) -> Option<LinkError> {
        self.error.take()
    }

    /// The last broadcast failed to reach at least one servant.
    #[inline]
    pub fn faulted(&self) -> bool {
        self.faulted
    }
}

impl<T, D, const N: usize> Port<ControlSequencer> for ControlPort<'_, T, D, N>
where
    T: Transfer,
    D: DebugDisplay,
{
    fn apply(&mut self, outputs: ControlOutputs) {
        self.drive.publish(outputs.drive);

        self.poll = outputs.broadcast.map(|command| self.link.broadcast(command));
        if let Some(poll) = self.poll {
            self.faulted = poll.failed != 0;
            if poll.last_error.is_some() {
                self.error = poll.last_error;
            }
        }

        if let Some(status) = outputs.display {
            self.display.display(status.bits() as u16);
        }
    }

    fn sample(&mut self) -> ControlInputs {
        ControlInputs {
            poll: self.poll.take(),
            release: self.release.is_low(),
            completed: self.completion.latest(),
        }
    }
}

/// Motor task port: stepper coils plus the drive and completion cells.
pub struct MotorPort<'a, O> {
    coils: O,
    drive: &'a DriveCell,
    completion: &'a CompletionCell,
}

impl<'a, O: PhaseOutput> MotorPort<'a, O> {
    pub fn new(coils: O, drive: &'a DriveCell, completion: &'a CompletionCell) -> Self {
        Self {
            coils,
            drive,
            completion,
        }
    }
}

impl<O: PhaseOutput> Port<DriveSequencer> for MotorPort<'_, O> {
    fn apply(&mut self, outputs: DriveOutputs) {
        self.coils.emit(outputs.pattern);
        if let Some(epoch) = outputs.completed {
            self.completion.publish(epoch);
        }
    }

    fn sample(&mut self) -> DriveCommand {
        self.drive.load()
    }
}

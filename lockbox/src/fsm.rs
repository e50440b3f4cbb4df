// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Cooperative tick-driven state machines.
//!
//! Every behavior in the enclosure is a [`Machine`]: a tagged state plus private counters, with an
//! action for the current state and a transition evaluated against fresh inputs. The hardware side
//! of a machine is its [`Port`]. A [`TickBinding`] ties the two to a fixed period.
//!
//! One tick is:
//!
//! ```text
//! act()  ->  port.apply(outputs)  ->  port.sample()  ->  advance(inputs)
//! ```
//!
//! Actions never read the inputs of their own tick, so sampling after the action is equivalent to
//! sampling at the top of the tick. Applying outputs first lets the control sequencer poll the
//! servants in its action and gate on the replies in the same tick.
//!
//! Typical usage from an RTIC task:
//!
//! ```ignore
//! TickBinding::new("force", ForcePresence::new(cfg), 50)
//!     .run(&mut port, |ms| Mono::delay(ms.millis()), |task, t| log_transition(task, t))
//!     .await
//! ```

use core::fmt;
use core::future::Future;

/// A finite-state machine advanced one tick at a time.
pub trait Machine {
    type State: Copy + PartialEq + fmt::Debug;
    type Inputs;
    type Outputs;

    /// Enter the initial state. Called once before the first tick.
    fn init(&mut self);

    fn state(&self) -> Self::State;

    /// Run the action of the current state.
    fn act(&mut self) -> Self::Outputs;

    /// Evaluate the transition of the current state.
    fn advance(&mut self, inputs: &Self::Inputs);

    /// Action followed by transition, for callers that already hold this tick's inputs.
    fn step(&mut self, inputs: &Self::Inputs) -> Self::Outputs {
        let outputs = self.act();
        self.advance(inputs);
        outputs
    }
}

/// Hardware side of one machine.
pub trait Port<M: Machine> {
    fn apply(&mut self, outputs: M::Outputs);
    fn sample(&mut self) -> M::Inputs;
}

/// State change observed during one tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Transition<S> {
    pub from: S,
    pub to: S,
}

/// A machine bound to a task name and a tick period.
pub struct TickBinding<M> {
    name: &'static str,
    machine: M,
    period_ms: u32,
    started: bool,
}

impl<M: Machine> TickBinding<M> {
    pub fn new(name: &'static str, machine: M, period_ms: u32) -> Self {
        Self {
            name,
            machine,
            period_ms,
            started: false,
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    #[inline]
    pub fn machine(&self) -> &M {
        &self.machine
    }

    #[inline]
    pub fn machine_mut(&mut self) -> &mut M {
        &mut self.machine
    }

    /// Run one tick, initializing the machine first if this is the first one.
    pub fn tick<P: Port<M>>(&mut self, port: &mut P) -> Option<Transition<M::State>> {
        if !self.started {
            self.machine.init();
            self.started = true;
        }

        let from = self.machine.state();
        let outputs = self.machine.act();
        port.apply(outputs);
        let inputs = port.sample();
        self.machine.advance(&inputs);
        let to = self.machine.state();

        (from != to).then_some(Transition { from, to })
    }

    /// Tick forever, sleeping one period between ticks.
    ///
    /// `sleep(ms)` yields to the scheduler; `report` receives every state change. A tick that
    /// overruns the period simply delays the next one.
    pub async fn run<P, S, F, R>(mut self, port: &mut P, mut sleep: S, mut report: R) -> !
    where
        P: Port<M>,
        S: FnMut(u32) -> F,
        F: Future<Output = ()>,
        R: FnMut(&'static str, Transition<M::State>),
    {
        self.machine.init();
        self.started = true;

        loop {
            if let Some(transition) = self.tick(port) {
                report(self.name, transition);
            }
            sleep(self.period_ms).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::pin::pin;
    use core::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};
    use std::vec::Vec;

    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    enum Blink {
        Off,
        On,
    }

    struct Blinker {
        state: Blink,
        inits: u32,
    }

    impl Machine for Blinker {
        type State = Blink;
        type Inputs = bool;
        type Outputs = bool;

        fn init(&mut self) {
            self.state = Blink::Off;
            self.inits += 1;
        }

        fn state(&self) -> Blink {
            self.state
        }

        fn act(&mut self) -> bool {
            self.state == Blink::On
        }

        fn advance(&mut self, enabled: &bool) {
            self.state = match (self.state, *enabled) {
                (_, false) => Blink::Off,
                (Blink::Off, true) => Blink::On,
                (Blink::On, true) => Blink::Off,
            };
        }
    }

    struct Wire {
        enabled: bool,
        lamp: Vec<bool>,
    }

    impl Port<Blinker> for Wire {
        fn apply(&mut self, lit: bool) {
            self.lamp.push(lit);
        }

        fn sample(&mut self) -> bool {
            self.enabled
        }
    }

    fn blinker() -> Blinker {
        Blinker {
            state: Blink::On,
            inits: 0,
        }
    }

    #[test]
    fn first_tick_initializes_once() {
        let mut binding = TickBinding::new("blink", blinker(), 10);
        let mut wire = Wire {
            enabled: true,
            lamp: Vec::new(),
        };

        binding.tick(&mut wire);
        binding.tick(&mut wire);
        binding.tick(&mut wire);

        assert_eq!(binding.machine().inits, 1);
        assert_eq!(wire.lamp, [false, true, false]);
    }

    #[test]
    fn tick_reports_only_state_changes() {
        let mut binding = TickBinding::new("blink", blinker(), 10);
        let mut wire = Wire {
            enabled: false,
            lamp: Vec::new(),
        };

        assert_eq!(binding.tick(&mut wire), None);
        wire.enabled = true;
        assert_eq!(
            binding.tick(&mut wire),
            Some(Transition {
                from: Blink::Off,
                to: Blink::On
            })
        );
    }

    struct YieldOnce(bool);

    impl Future for YieldOnce {
        type Output = ();

        fn poll(mut self: core::pin::Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
            if self.0 {
                Poll::Ready(())
            } else {
                self.0 = true;
                Poll::Pending
            }
        }
    }

    const NOOP_VTABLE: RawWakerVTable = RawWakerVTable::new(noop_clone, noop, noop, noop);

    unsafe fn noop_clone(_: *const ()) -> RawWaker {
        RawWaker::new(core::ptr::null(), &NOOP_VTABLE)
    }

    unsafe fn noop(_: *const ()) {}

    fn noop_waker() -> Waker {
        // SAFETY: every vtable entry ignores the data pointer.
        unsafe { Waker::from_raw(RawWaker::new(core::ptr::null(), &NOOP_VTABLE)) }
    }

    #[test]
    fn run_sleeps_one_period_between_ticks() {
        let mut wire = Wire {
            enabled: true,
            lamp: Vec::new(),
        };
        let mut sleeps = Vec::new();
        let mut reports = Vec::new();

        {
            let binding = TickBinding::new("blink", blinker(), 25);
            let fut = binding.run(
                &mut wire,
                |ms| {
                    sleeps.push(ms);
                    YieldOnce(false)
                },
                |task, t| reports.push((task, t)),
            );
            let mut fut = pin!(fut);
            let waker = noop_waker();
            let mut cx = Context::from_waker(&waker);
            for _ in 0..4 {
                assert!(fut.as_mut().poll(&mut cx).is_pending());
            }
        }

        assert_eq!(sleeps, [25, 25, 25, 25]);
        assert_eq!(wire.lamp.len(), 4);
        assert_eq!(reports.len(), 4);
        assert!(reports.iter().all(|(task, _)| *task == "blink"));
    }
}

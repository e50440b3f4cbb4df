// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! One-exchange latencies across the link, in both directions.

mod common;

use common::{ServantSlot, Wire, World};
use lockbox::cells::CommandLatch;
use lockbox::config::{ForceConfig, LinkConfig};
use lockbox::link::{Command, MasterLink, ServantEndpoint};
use lockbox::sensors::{ForceInputs, ForcePresence, ForceState};
use lockbox::{Machine, StatusByte, StatusRegister};

fn leak<T>(value: T) -> &'static T {
    Box::leak(Box::new(value))
}

fn single_servant(
    world: &World,
    monitored: StatusByte,
) -> (
    MasterLink<Wire<'_>, 1>,
    &'static StatusRegister,
    &'static CommandLatch,
) {
    let status = leak(StatusRegister::new(monitored));
    let command = leak(CommandLatch::new());
    let endpoint = ServantEndpoint::new(status, command);
    let wire = Wire {
        world,
        slots: vec![ServantSlot {
            preload: endpoint.initial_reply(),
            endpoint,
        }],
        log: Vec::new(),
    };
    (
        MasterLink::new(wire, LinkConfig::default()),
        status,
        command,
    )
}

#[test]
fn status_change_is_seen_one_exchange_later() {
    let world = World::default();
    let (mut link, status, _) = single_servant(&world, StatusByte::FORCE);
    let mut force = status.claim(StatusByte::FORCE).unwrap();

    assert_eq!(link.broadcast(Command::Hold).aggregate, StatusByte::FORCE);
    force.report(true);

    // Preloaded before the change.
    assert_eq!(link.broadcast(Command::Hold).aggregate, StatusByte::FORCE);
    let poll = link.broadcast(Command::Hold);
    assert!(poll.aggregate.is_clear());
    assert!(poll.all_clear());

    force.report(false);
    assert!(link.broadcast(Command::Hold).all_clear());
    assert!(!link.broadcast(Command::Hold).all_clear());
}

#[test]
fn command_reaches_the_fsm_on_its_next_tick() {
    let world = World::default();
    let (mut link, _, latch) = single_servant(&world, StatusByte::FORCE);

    let mut fsm = ForcePresence::new(ForceConfig::default().with_threshold(1));
    fsm.init();
    let sample = |latch: &CommandLatch| ForceInputs {
        samples: [0x280, 0x280],
        command: latch.latest(),
    };

    fsm.step(&sample(latch));
    fsm.step(&sample(latch));
    assert_eq!(fsm.state(), ForceState::Satisfied);

    // Inputs sampled before the exchange still carry the old command.
    let before = sample(latch);
    link.broadcast(Command::Acknowledge);
    fsm.step(&before);
    assert_eq!(fsm.state(), ForceState::Satisfied);

    fsm.step(&sample(latch));
    assert_eq!(fsm.state(), ForceState::Resetting);
}

#[test]
fn unmonitored_bits_never_block() {
    let world = World::default();
    let (mut link, status, _) = single_servant(&world, StatusByte::LIGHT);
    let mut light = status.claim(StatusByte::LIGHT).unwrap();
    assert!(status.claim(StatusByte::FORCE).is_none());

    light.report(true);
    link.broadcast(Command::Hold);
    assert_eq!(link.broadcast(Command::Hold).aggregate, StatusByte::CLEAR);
}

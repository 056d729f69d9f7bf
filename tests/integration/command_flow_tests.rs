//! Integration tests for the command → driver → report pipeline.
//!
//! These run on the host and verify the full chain from a decoded host
//! command down to register writes and drain reports, with simulated
//! edges injected through the ISR entry points.

use crate::mock_hw::{MockPins, MockTimerQueue, RegWrite, VecSink, make_service};

use tachsense::Fatal;
use tachsense::app::commands::Command;
use tachsense::app::events::TachResponse;
use tachsense::irq::TriggerMode;
use tachsense::variant::SUPPORTED_PINS;

// ── Happy path: configure, arm, count, report ────────────────

#[test]
fn seven_rising_edges_are_reported_then_counter_is_clear() {
    let (service, _regs) = make_service();
    let mut pins = MockPins::default();
    let mut timers = MockTimerQueue::default();

    service
        .handle_command(
            Command::ConfigTachometer {
                oid: 3,
                pin: SUPPORTED_PINS[0],
            },
            &mut pins,
            &mut timers,
        )
        .unwrap();
    service
        .handle_command(
            Command::SetTachIrqState { oid: 3, mode: 3 },
            &mut pins,
            &mut timers,
        )
        .unwrap();

    // The sensor pin was put into input mode with no pull-up.
    assert_eq!(pins.configured, vec![(SUPPORTED_PINS[0], false)]);

    for _ in 0..7 {
        service.pulse_isr(0);
    }

    service
        .handle_command(
            Command::UpdateTachTimer {
                clock: 1_000,
                rest_ticks: 200,
            },
            &mut pins,
            &mut timers,
        )
        .unwrap();
    assert_eq!(timers.scheduled, vec![1_000]);

    let mut sink = VecSink::default();
    service.timer_isr();
    service.poll(&mut sink);
    assert_eq!(
        sink.responses,
        vec![TachResponse {
            oid: 3,
            pulse_count: 7
        }]
    );

    // Immediate second drain with no new edges reports zero.
    service.timer_isr();
    service.poll(&mut sink);
    assert_eq!(
        sink.responses[1],
        TachResponse {
            oid: 3,
            pulse_count: 0
        }
    );
}

#[test]
fn poll_without_timer_expiry_reports_nothing() {
    let (service, _regs) = make_service();
    let mut pins = MockPins::default();
    let mut timers = MockTimerQueue::default();

    service
        .handle_command(
            Command::ConfigTachometer {
                oid: 1,
                pin: SUPPORTED_PINS[0],
            },
            &mut pins,
            &mut timers,
        )
        .unwrap();
    service
        .handle_command(
            Command::SetTachIrqState { oid: 1, mode: 2 },
            &mut pins,
            &mut timers,
        )
        .unwrap();
    service.pulse_isr(0);

    let mut sink = VecSink::default();
    service.poll(&mut sink);
    assert!(sink.responses.is_empty());
}

#[test]
fn disabled_instances_are_excluded_from_reports() {
    let (service, _regs) = make_service();
    let mut pins = MockPins::default();
    let mut timers = MockTimerQueue::default();

    for (oid, pin) in [(1u8, SUPPORTED_PINS[0]), (2u8, SUPPORTED_PINS[1])] {
        service
            .handle_command(
                Command::ConfigTachometer { oid, pin },
                &mut pins,
                &mut timers,
            )
            .unwrap();
    }
    // Only oid=1 is armed; oid=2 stays disabled.
    service
        .handle_command(
            Command::SetTachIrqState { oid: 1, mode: 1 },
            &mut pins,
            &mut timers,
        )
        .unwrap();

    service.pulse_isr(0);
    service.pulse_isr(0);

    let mut sink = VecSink::default();
    service.timer_isr();
    service.poll(&mut sink);
    assert_eq!(
        sink.responses,
        vec![TachResponse {
            oid: 1,
            pulse_count: 2
        }]
    );
}

// ── Fixed-rate scheduling ────────────────────────────────────

#[test]
fn wake_times_advance_additively_from_the_schedule() {
    let (service, _regs) = make_service();
    let mut pins = MockPins::default();
    let mut timers = MockTimerQueue::default();

    service
        .handle_command(
            Command::UpdateTachTimer {
                clock: 1_000,
                rest_ticks: 200,
            },
            &mut pins,
            &mut timers,
        )
        .unwrap();

    // The k-th wake is initial + k * rest_ticks, regardless of when the
    // drain task actually ran in between.
    assert_eq!(service.timer_isr(), 1_200);
    assert_eq!(service.timer_isr(), 1_400);
    assert_eq!(service.timer_isr(), 1_600);
}

#[test]
fn zero_rest_ticks_cancels_without_rescheduling() {
    let (service, _regs) = make_service();
    let mut pins = MockPins::default();
    let mut timers = MockTimerQueue::default();

    service
        .handle_command(
            Command::UpdateTachTimer {
                clock: 500,
                rest_ticks: 0,
            },
            &mut pins,
            &mut timers,
        )
        .unwrap();
    assert_eq!(timers.cancels, 1);
    assert!(timers.scheduled.is_empty());
}

// ── Hardware write discipline ────────────────────────────────

#[test]
fn arming_writes_the_full_register_sequence() {
    let (service, regs) = make_service();
    let mut pins = MockPins::default();
    let mut timers = MockTimerQueue::default();

    service
        .handle_command(
            Command::ConfigTachometer {
                oid: 1,
                pin: SUPPORTED_PINS[0],
            },
            &mut pins,
            &mut timers,
        )
        .unwrap();
    service
        .handle_command(
            Command::SetTachIrqState { oid: 1, mode: 3 },
            &mut pins,
            &mut timers,
        )
        .unwrap();

    let line = tachsense::variant::LINES[0].line_id;
    assert_eq!(
        *regs.writes.borrow(),
        vec![
            RegWrite::Mask(line),
            RegWrite::ClearTrigger(line),
            RegWrite::Program(line, TriggerMode::RisingEdge),
            RegWrite::AckPending(line),
            RegWrite::Unmask(line),
        ]
    );
}

#[test]
fn redundant_mode_requests_touch_no_registers() {
    let (service, regs) = make_service();
    let mut pins = MockPins::default();
    let mut timers = MockTimerQueue::default();

    service
        .handle_command(
            Command::ConfigTachometer {
                oid: 1,
                pin: SUPPORTED_PINS[0],
            },
            &mut pins,
            &mut timers,
        )
        .unwrap();

    let set_mode = |mode| {
        service.handle_command(
            Command::SetTachIrqState { oid: 1, mode },
            &mut MockPins::default(),
            &mut MockTimerQueue::default(),
        )
    };

    set_mode(3).unwrap();
    let after_arm = regs.write_count();
    set_mode(3).unwrap();
    assert_eq!(regs.write_count(), after_arm);

    set_mode(4).unwrap();
    let after_disable = regs.write_count();
    set_mode(4).unwrap();
    assert_eq!(regs.write_count(), after_disable);
}

// ── Fatal paths ──────────────────────────────────────────────

#[test]
fn configure_on_an_unwired_pin_is_fatal_and_creates_no_instance() {
    let (service, _regs) = make_service();
    let mut pins = MockPins::default();
    let mut timers = MockTimerQueue::default();

    let unwired = tachsense::pins::gpio(b'A', 0);
    assert_eq!(
        service.handle_command(
            Command::ConfigTachometer { oid: 5, pin: unwired },
            &mut pins,
            &mut timers,
        ),
        Err(Fatal::UnsupportedPin)
    );

    // No instance exists for oid=5 afterwards.
    assert_eq!(
        service.handle_command(
            Command::SetTachIrqState { oid: 5, mode: 1 },
            &mut pins,
            &mut timers,
        ),
        Err(Fatal::UnknownOid)
    );
}

#[test]
fn mode_above_four_is_fatal() {
    let (service, _regs) = make_service();
    let mut pins = MockPins::default();
    let mut timers = MockTimerQueue::default();

    service
        .handle_command(
            Command::ConfigTachometer {
                oid: 5,
                pin: SUPPORTED_PINS[0],
            },
            &mut pins,
            &mut timers,
        )
        .unwrap();
    assert_eq!(
        service.handle_command(
            Command::SetTachIrqState { oid: 5, mode: 9 },
            &mut pins,
            &mut timers,
        ),
        Err(Fatal::InvalidMode)
    );
}

#[test]
fn duplicate_oid_configuration_is_fatal() {
    let (service, _regs) = make_service();
    let mut pins = MockPins::default();
    let mut timers = MockTimerQueue::default();

    service
        .handle_command(
            Command::ConfigTachometer {
                oid: 1,
                pin: SUPPORTED_PINS[0],
            },
            &mut pins,
            &mut timers,
        )
        .unwrap();
    assert_eq!(
        service.handle_command(
            Command::ConfigTachometer {
                oid: 1,
                pin: SUPPORTED_PINS[1],
            },
            &mut pins,
            &mut timers,
        ),
        Err(Fatal::OidInUse)
    );
}

// ── Sink adapters ────────────────────────────────────────────

#[test]
fn queue_sink_buffers_reports_for_the_host_link() {
    use tachsense::adapters::queue_sink::QueueSink;

    let (service, _regs) = make_service();
    let mut pins = MockPins::default();
    let mut timers = MockTimerQueue::default();

    service
        .handle_command(
            Command::ConfigTachometer {
                oid: 7,
                pin: SUPPORTED_PINS[1],
            },
            &mut pins,
            &mut timers,
        )
        .unwrap();
    service
        .handle_command(
            Command::SetTachIrqState { oid: 7, mode: 2 },
            &mut pins,
            &mut timers,
        )
        .unwrap();
    service.pulse_isr(1);
    service.pulse_isr(1);
    service.pulse_isr(1);

    let mut sink = QueueSink::new();
    service.timer_isr();
    service.poll(&mut sink);

    let report = sink.pop().unwrap();
    assert_eq!(report.oid, 7);
    assert_eq!(report.pulse_count, 3);
    assert!(sink.pop().is_none());
}

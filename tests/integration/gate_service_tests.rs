//! Integration tests for the GateService → FSM → actuator → reporter
//! pipeline.
//!
//! These run on the host (x86_64) and verify the full tick chain — from a
//! scripted distance reading down to servo angles and wire frames —
//! without any real hardware or network.

use crate::mock_hw::{FrameRecorder, LogSink, MockHardware, ScriptedTransport};

use smartgate::app::commands::GateCommand;
use smartgate::app::ports::SendOutcome;
use smartgate::app::service::GateService;
use smartgate::config::GateConfig;
use smartgate::fsm::StateId;
use smartgate::link::{ConnectionManager, LinkState};
use smartgate::sensors::ultrasonic::FAR_DISTANCE_CM;

const CLOSED_FRAME: &str = r#"{"type":"gate_state","gate":"CLOSED"}"#;
const OPEN_FRAME: &str = r#"{"type":"gate_state","gate":"OPEN"}"#;

fn make_gate() -> (GateService, MockHardware, FrameRecorder, LogSink) {
    let mut gate = GateService::new(GateConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = LogSink::new();
    gate.start(&mut hw, &mut sink).expect("start");
    (gate, hw, FrameRecorder::new(), sink)
}

// ── Scenario A: [20, 20, 10, 20, 20, ...] at 50 ms, threshold 15,
//    hold 4 s → OPEN at tick 3, CLOSED at tick 83 ─────────────

#[test]
fn scenario_a_open_at_tick_3_closed_at_tick_83() {
    let (mut gate, mut hw, mut link, mut sink) = make_gate();
    hw.queue_readings(&[20.0, 20.0, 10.0]);
    hw.default_cm = 20.0;

    for tick in 1..=2 {
        gate.tick(&mut hw, &mut link, &mut sink).unwrap();
        assert_eq!(gate.state(), StateId::Closed, "tick {tick}");
    }

    gate.tick(&mut hw, &mut link, &mut sink).unwrap();
    assert_eq!(gate.state(), StateId::Open, "tick 3");

    // Ticks 4..=82: hold window still running.
    for tick in 4..=82 {
        gate.tick(&mut hw, &mut link, &mut sink).unwrap();
        assert_eq!(gate.state(), StateId::Open, "tick {tick}");
    }

    // Tick 83 = 3 + 80 (4.0 s / 50 ms): the gate closes.
    gate.tick(&mut hw, &mut link, &mut sink).unwrap();
    assert_eq!(gate.state(), StateId::Closed, "tick 83");

    // Exactly three frames: boot announce, open, close.
    assert_eq!(link.frames, vec![CLOSED_FRAME, OPEN_FRAME, CLOSED_FRAME]);

    // Servo history: boot close, open, close — reversed angle convention.
    assert_eq!(hw.angles, vec![90, 0, 90]);
}

#[test]
fn scenario_a_interrupting_retrigger_restarts_hold_window() {
    let (mut gate, mut hw, mut link, mut sink) = make_gate();
    hw.queue_readings(&[10.0]);
    hw.default_cm = 20.0;

    gate.tick(&mut hw, &mut link, &mut sink).unwrap();
    assert_eq!(gate.state(), StateId::Open); // tick 1

    // 40 far ticks into the hold window...
    for _ in 0..40 {
        gate.tick(&mut hw, &mut link, &mut sink).unwrap();
    }
    assert_eq!(gate.state(), StateId::Open);

    // ...a fresh near reading restarts the window.
    hw.queued_cm.push_back(10.0);
    gate.tick(&mut hw, &mut link, &mut sink).unwrap();
    assert_eq!(gate.state(), StateId::Open);

    // A full 80-tick quiet window must elapse again.
    for tick in 0..79 {
        gate.tick(&mut hw, &mut link, &mut sink).unwrap();
        assert_eq!(gate.state(), StateId::Open, "retrigger + {tick}");
    }
    gate.tick(&mut hw, &mut link, &mut sink).unwrap();
    assert_eq!(gate.state(), StateId::Closed);

    // The retrigger produced no extra frames — still one OPEN, one CLOSE.
    assert_eq!(link.frames, vec![CLOSED_FRAME, OPEN_FRAME, CLOSED_FRAME]);
}

// ── Scenario B: echo timeout is "far", never a trigger ────────

#[test]
fn scenario_b_sensor_timeout_never_opens() {
    let (mut gate, mut hw, mut link, mut sink) = make_gate();
    hw.default_cm = FAR_DISTANCE_CM; // every reading is a timeout

    for _ in 0..200 {
        gate.tick(&mut hw, &mut link, &mut sink).unwrap();
        assert_eq!(gate.state(), StateId::Closed);
    }

    // Only the boot announcement ever went out.
    assert_eq!(link.frames, vec![CLOSED_FRAME]);
}

// ── Scenario C: flip while disconnected → report lost, no back-fill ──

#[test]
fn scenario_c_report_lost_while_disconnected_no_backfill() {
    let mut gate = GateService::new(GateConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = LogSink::new();
    gate.start(&mut hw, &mut sink).unwrap();

    let (transport, script) = ScriptedTransport::new();
    let mut link = ConnectionManager::new(transport, GateConfig::default().backoff_ticks());

    // Link is down: boot announce and the OPEN flip are both dropped.
    hw.default_cm = 20.0;
    gate.tick(&mut hw, &mut link, &mut sink).unwrap();

    hw.queued_cm.push_back(10.0);
    gate.tick(&mut hw, &mut link, &mut sink).unwrap();
    assert_eq!(gate.state(), StateId::Open);

    // ReportedState updated anyway — best-effort policy.
    assert_eq!(gate.reported_state(), Some(StateId::Open));
    assert!(script.sent().is_empty());

    // Connection comes back up.
    script.set_allow_connect(true);
    while link.state() != LinkState::Connected {
        link.poll();
    }

    // Near readings keep the gate open; nothing is re-announced.
    hw.default_cm = 10.0;
    for _ in 0..20 {
        gate.tick(&mut hw, &mut link, &mut sink).unwrap();
    }
    assert!(script.sent().is_empty(), "no back-fill after reconnect");

    // Only the next actual flip produces a frame.
    hw.default_cm = 20.0;
    for _ in 0..80 {
        gate.tick(&mut hw, &mut link, &mut sink).unwrap();
    }
    assert_eq!(gate.state(), StateId::Closed);
    assert_eq!(script.sent(), vec![CLOSED_FRAME.to_string()]);
}

// ── Scenario D: angle mapping via the actuator port ───────────

#[test]
fn scenario_d_open_and_close_drive_configured_angles() {
    let (mut gate, mut hw, mut link, mut sink) = make_gate();
    assert_eq!(hw.last_angle(), Some(90), "boots closed at 90 degrees");

    hw.queued_cm.push_back(5.0);
    gate.tick(&mut hw, &mut link, &mut sink).unwrap();
    assert_eq!(hw.last_angle(), Some(0), "open drives the 0-degree angle");
}

// ── Reporting invariants across the whole pipeline ────────────

#[test]
fn never_two_consecutive_identical_frames() {
    let (mut gate, mut hw, mut link, mut sink) = make_gate();
    hw.default_cm = 20.0;

    // A few open/close cycles.
    for _ in 0..3 {
        hw.queued_cm.push_back(10.0);
        for _ in 0..100 {
            gate.tick(&mut hw, &mut link, &mut sink).unwrap();
        }
    }

    assert!(link.frames.len() >= 5);
    for pair in link.frames.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
}

#[test]
fn link_failure_never_stops_control() {
    let (mut gate, mut hw, mut link, mut sink) = make_gate();
    link.outcome = SendOutcome::Failed;

    hw.queued_cm.push_back(10.0);
    hw.default_cm = 20.0;
    for _ in 0..100 {
        gate.tick(&mut hw, &mut link, &mut sink).unwrap();
    }

    // The gate opened and closed on schedule despite every send failing.
    assert_eq!(gate.state(), StateId::Closed);
    assert_eq!(hw.angles, vec![90, 0, 90]);
}

// ── Inbound command path (anticipated, not wired to the link) ─

#[test]
fn remote_command_applies_only_on_change() {
    let (mut gate, mut hw, _link, mut sink) = make_gate();

    gate.handle_command(GateCommand::Close, &mut hw, &mut sink)
        .unwrap();
    assert_eq!(hw.angles, vec![90], "redundant CLOSE is a no-op");

    gate.handle_command(GateCommand::Open, &mut hw, &mut sink)
        .unwrap();
    assert_eq!(gate.state(), StateId::Open);
    assert_eq!(hw.angles, vec![90, 0]);
}

#[test]
fn actuator_fault_is_fatal_to_the_tick() {
    let (mut gate, mut hw, mut link, mut sink) = make_gate();

    hw.fail_writes = true;
    hw.queued_cm.push_back(5.0);
    assert!(gate.tick(&mut hw, &mut link, &mut sink).is_err());
}

//! Mock adapters for integration tests.
//!
//! Records every actuator call and every frame handed to the link so
//! tests can assert on the full history without touching GPIO or sockets.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use smartgate::app::events::AppEvent;
use smartgate::app::ports::{ActuatorPort, EventSink, ReportSink, SendOutcome, SensorPort};
use smartgate::link::transport::Transport;
use smartgate::sensors::ultrasonic::{DistanceReading, FAR_DISTANCE_CM};
use smartgate::{ActuatorError, LinkError};

// ── MockHardware ──────────────────────────────────────────────

/// Sensor + actuator stand-in. Distance readings are scripted: queued
/// values are consumed first, then `default_cm` repeats forever.
pub struct MockHardware {
    pub queued_cm: VecDeque<f32>,
    pub default_cm: f32,
    /// Every angle written to the servo, in order.
    pub angles: Vec<u8>,
    pub fail_writes: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            queued_cm: VecDeque::new(),
            default_cm: FAR_DISTANCE_CM,
            angles: Vec::new(),
            fail_writes: false,
        }
    }

    pub fn queue_readings(&mut self, cm: &[f32]) {
        self.queued_cm.extend(cm.iter().copied());
    }

    pub fn last_angle(&self) -> Option<u8> {
        self.angles.last().copied()
    }
}

impl SensorPort for MockHardware {
    fn measure_distance(&mut self) -> DistanceReading {
        let cm = self.queued_cm.pop_front().unwrap_or(self.default_cm);
        if cm >= FAR_DISTANCE_CM {
            DistanceReading { echo_us: None, cm: FAR_DISTANCE_CM }
        } else {
            DistanceReading { echo_us: Some((cm * 20000.0 / 340.0) as u32), cm }
        }
    }
}

impl ActuatorPort for MockHardware {
    fn set_angle(&mut self, angle_deg: u8) -> Result<(), ActuatorError> {
        if self.fail_writes {
            return Err(ActuatorError::PwmWriteFailed);
        }
        self.angles.push(angle_deg);
        Ok(())
    }

    fn open_gate(&mut self) -> Result<(), ActuatorError> {
        // Reversed mounting convention: 0 degrees is OPEN.
        self.set_angle(0)
    }

    fn close_gate(&mut self) -> Result<(), ActuatorError> {
        self.set_angle(90)
    }
}

// ── Frame recorder (ReportSink) ───────────────────────────────

/// Direct sink stand-in with a switchable outcome.
pub struct FrameRecorder {
    pub frames: Vec<String>,
    pub outcome: SendOutcome,
}

#[allow(dead_code)]
impl FrameRecorder {
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            outcome: SendOutcome::Sent,
        }
    }
}

impl ReportSink for FrameRecorder {
    fn send_report(&mut self, frame: &str) -> SendOutcome {
        self.frames.push(frame.to_string());
        self.outcome
    }
}

// ── Scripted transport (for ConnectionManager tests) ──────────

#[derive(Default)]
struct ScriptState {
    allow_connect: bool,
    open: bool,
    fail_sends: bool,
    sent: Vec<String>,
}

/// Transport whose session comes up only when allowed, recording every
/// frame that actually got through. The manager takes the transport by
/// value, so tests keep a [`ScriptHandle`] to steer it from outside.
pub struct ScriptedTransport {
    state: Arc<Mutex<ScriptState>>,
}

/// Test-side handle to a [`ScriptedTransport`] owned by a manager.
#[derive(Clone)]
pub struct ScriptHandle {
    state: Arc<Mutex<ScriptState>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn new() -> (Self, ScriptHandle) {
        let state = Arc::new(Mutex::new(ScriptState::default()));
        (
            Self {
                state: state.clone(),
            },
            ScriptHandle { state },
        )
    }
}

#[allow(dead_code)]
impl ScriptHandle {
    pub fn set_allow_connect(&self, allow: bool) {
        self.state.lock().unwrap().allow_connect = allow;
    }

    pub fn set_fail_sends(&self, fail: bool) {
        self.state.lock().unwrap().fail_sends = fail;
    }

    pub fn drop_session(&self) {
        self.state.lock().unwrap().open = false;
    }

    pub fn sent(&self) -> Vec<String> {
        self.state.lock().unwrap().sent.clone()
    }
}

impl Transport for ScriptedTransport {
    fn connect(&mut self) -> Result<(), LinkError> {
        let mut s = self.state.lock().unwrap();
        if s.allow_connect {
            s.open = true;
            Ok(())
        } else {
            Err(LinkError::ConnectFailed)
        }
    }

    fn send_text(&mut self, frame: &str) -> Result<(), LinkError> {
        let mut s = self.state.lock().unwrap();
        if s.fail_sends {
            return Err(LinkError::SendFailed);
        }
        s.sent.push(frame.to_string());
        Ok(())
    }

    fn close(&mut self) {
        self.state.lock().unwrap().open = false;
    }

    fn is_open(&self) -> bool {
        self.state.lock().unwrap().open
    }
}

// ── Event recorder (EventSink) ────────────────────────────────

pub struct LogSink {
    pub events: Vec<String>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(format!("{:?}", event));
    }
}

//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ GateService (domain)
//! ```
//!
//! Driven adapters (the ultrasonic ranger, the servo, the reporting link,
//! the serial log) implement these traits. The
//! [`GateService`](super::service::GateService) consumes them via
//! generics, so the domain core never touches hardware directly.

use crate::error::ActuatorError;
use crate::sensors::ultrasonic::DistanceReading;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per tick to obtain a fresh
/// distance reading. Implementations must be timeout-safe — a missing
/// echo comes back as the sentinel far distance, never as an error.
pub trait SensorPort {
    fn measure_distance(&mut self) -> DistanceReading;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to drive the gate servo.
///
/// Every method is fallible and the caller treats failure as fatal — a
/// servo that stops accepting commands must not be commanded further as
/// if nothing happened.
pub trait ActuatorPort {
    /// Drive the servo to an explicit angle (0–180 degrees).
    fn set_angle(&mut self, angle_deg: u8) -> Result<(), ActuatorError>;

    /// Drive to the configured OPEN angle.
    fn open_gate(&mut self) -> Result<(), ActuatorError>;

    /// Drive to the configured CLOSED angle.
    fn close_gate(&mut self) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Report sink port (driven adapter: domain → reporting link)
// ───────────────────────────────────────────────────────────────

/// What became of a frame handed to the sink.
///
/// None of these is an error to the caller: a dropped or failed report
/// must never disturb control timing. Failure handling (reconnect,
/// backoff) belongs entirely to the link layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The frame was accepted for transmission.
    Sent,
    /// The link was down or still connecting; the frame was discarded.
    Dropped,
    /// The link was up but transmission failed; the session is being torn
    /// down and the frame was discarded.
    Failed,
}

/// The reporter hands serialized frames through this port. The networked
/// build wires it to the ConnectionManager; tests wire it to a recorder.
pub trait ReportSink {
    fn send_report(&mut self, frame: &str) -> SendOutcome;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log today;
/// anything else tomorrow).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

//! Unified error types for the SmartGate firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! top-level control loop's error handling uniform. All variants are `Copy`
//! so they can be cheaply passed through the FSM and link layer without
//! allocation.
//!
//! Note the asymmetry baked into the taxonomy: a [`LinkError`] is always
//! recoverable (it feeds the ConnectionManager's reconnect cycle and never
//! unwinds into the control loop), while an [`ActuatorError`] is fatal —
//! the loop must not keep commanding a servo that stopped accepting duty
//! writes. An echo timeout is not an error at all; the sensor maps it to a
//! sentinel "far" reading.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor GPIO could not be driven or read.
    Sensor(SensorError),
    /// An actuator command failed. Fatal — not retried.
    Actuator(ActuatorError),
    /// The reporting link failed. Recoverable via reconnect.
    Link(LinkError),
    /// Peripheral or network initialisation failed at boot.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Link(e) => write!(f, "link: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// Hard sensor faults. An echo timeout is *not* among them — the absence of
/// an echo is a normal outcome (debris, out-of-range target, noise) and is
/// reported as a sentinel distance instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The trigger line could not be pulsed.
    TriggerFailed,
    /// The echo GPIO could not be read.
    GpioReadFailed,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TriggerFailed => write!(f, "trigger pulse failed"),
            Self::GpioReadFailed => write!(f, "echo GPIO read failed"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// LEDC duty-cycle write failed.
    PwmWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Link errors
// ---------------------------------------------------------------------------

/// Failures on the reporting link. All of these are caught at the
/// ConnectionManager boundary and converted into a reconnect cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// The WebSocket session could not be established.
    ConnectFailed,
    /// A text frame could not be transmitted on an open session.
    SendFailed,
    /// The peer closed the session or the transport reported it dead.
    ConnectionLost,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectFailed => write!(f, "connect failed"),
            Self::SendFailed => write!(f, "send failed"),
            Self::ConnectionLost => write!(f, "connection lost"),
        }
    }
}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Self::Link(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

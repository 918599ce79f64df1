//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the ultrasonic ranger and the servo driver, exposing them through
//! [`SensorPort`] and [`ActuatorPort`]. This is the only module in the
//! system that touches actual hardware. On non-espidf targets, the
//! underlying drivers use cfg-gated simulation stubs.
//!
//! The open/closed angle mapping lives here: the domain speaks logical
//! positions, and this adapter knows that OPEN is 0° and CLOSED is 90°
//! (the inversion mirrors the physical servo mounting).

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::servo::ServoDriver;
use crate::error::ActuatorError;
use crate::sensors::ultrasonic::{DistanceReading, UltrasonicSensor};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    ranger: UltrasonicSensor,
    servo: ServoDriver,
    open_angle_deg: u8,
    closed_angle_deg: u8,
}

impl HardwareAdapter {
    pub fn new(
        ranger: UltrasonicSensor,
        servo: ServoDriver,
        open_angle_deg: u8,
        closed_angle_deg: u8,
    ) -> Self {
        Self {
            ranger,
            servo,
            open_angle_deg,
            closed_angle_deg,
        }
    }

    /// Last angle successfully written to the servo.
    pub fn servo_angle(&self) -> Option<u8> {
        self.servo.angle()
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn measure_distance(&mut self) -> DistanceReading {
        self.ranger.measure()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn set_angle(&mut self, angle_deg: u8) -> Result<(), ActuatorError> {
        self.servo.set_angle(angle_deg)
    }

    fn open_gate(&mut self) -> Result<(), ActuatorError> {
        self.servo.set_angle(self.open_angle_deg)
    }

    fn close_gate(&mut self) -> Result<(), ActuatorError> {
        self.servo.set_angle(self.closed_angle_deg)
    }
}

//! Gate servo driver (standard 50 Hz hobby servo on LEDC).
//!
//! Angle maps linearly onto a 500–2500 µs pulse inside the 20 ms frame,
//! then onto the 16-bit LEDC duty range. The driver is a dumb actuator —
//! the open/closed angle convention lives in configuration, not here.
//!
//! A failed duty write is surfaced as [`ActuatorError::PwmWriteFailed`].
//! The caller treats it as fatal: a servo that stopped accepting commands
//! must not be silently commanded further.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: writes real LEDC duty via hw_init helpers.
//! On host/test: tracks the last duty in-memory; a static flag can force
//! write failures to exercise the fatal path.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, Ordering};

use crate::drivers::hw_init;
use crate::error::ActuatorError;

/// Pulse width commanding 0 degrees.
const MIN_PULSE_US: f32 = 500.0;
/// Pulse width commanding 180 degrees.
const MAX_PULSE_US: f32 = 2500.0;
/// Servo frame length at 50 Hz.
const FRAME_US: f32 = 20_000.0;
/// Full-scale 16-bit duty.
const DUTY_MAX: f32 = 65_535.0;

#[cfg(not(target_os = "espidf"))]
static SIM_PWM_FAIL: AtomicBool = AtomicBool::new(false);

/// Force subsequent duty writes to fail (host-side tests only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_pwm_fail(fail: bool) {
    SIM_PWM_FAIL.store(fail, Ordering::Relaxed);
}

pub struct ServoDriver {
    /// Last successfully commanded angle; `None` until the first write.
    angle_deg: Option<u8>,
    last_duty: u16,
}

impl ServoDriver {
    pub fn new() -> Self {
        Self {
            angle_deg: None,
            last_duty: 0,
        }
    }

    /// Drive the servo to `angle_deg` (clamped to 0–180).
    pub fn set_angle(&mut self, angle_deg: u8) -> Result<(), ActuatorError> {
        let angle = angle_deg.min(180);
        let duty = angle_to_duty(angle);

        self.write_duty(duty)?;

        self.angle_deg = Some(angle);
        self.last_duty = duty;
        Ok(())
    }

    /// Last successfully commanded angle.
    pub fn angle(&self) -> Option<u8> {
        self.angle_deg
    }

    /// Last successfully written duty value.
    pub fn duty(&self) -> u16 {
        self.last_duty
    }

    #[cfg(target_os = "espidf")]
    fn write_duty(&self, duty: u16) -> Result<(), ActuatorError> {
        let rc = hw_init::ledc_set_u16(hw_init::LEDC_CH_SERVO, duty);
        if rc != 0 {
            log::error!("servo: LEDC duty write failed (rc={})", rc);
            return Err(ActuatorError::PwmWriteFailed);
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn write_duty(&self, duty: u16) -> Result<(), ActuatorError> {
        if SIM_PWM_FAIL.load(Ordering::Relaxed) {
            return Err(ActuatorError::PwmWriteFailed);
        }
        let _ = hw_init::ledc_set_u16(hw_init::LEDC_CH_SERVO, duty);
        Ok(())
    }
}

/// Angle (0–180) → pulse width in microseconds.
pub fn pulse_us_for_angle(angle_deg: u8) -> f32 {
    MIN_PULSE_US + (MAX_PULSE_US - MIN_PULSE_US) * (f32::from(angle_deg) / 180.0)
}

/// Angle (0–180) → normalized 16-bit LEDC duty.
fn angle_to_duty(angle_deg: u8) -> u16 {
    (pulse_us_for_angle(angle_deg) / FRAME_US * DUTY_MAX) as u16
}
